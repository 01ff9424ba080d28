//! GraphQL API definitions.

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod closure;
pub mod contract;
pub mod customer;
pub mod location;
mod mutation;
mod query;
pub mod reservation;
pub mod resource;
pub mod scalar;
pub mod session;
mod subscription;

use crate::define_error;

pub use self::{
    booking::Booking,
    closure::Closure,
    contract::{Contract, ContractValue},
    location::Location,
    mutation::Mutation,
    query::Query,
    reservation::Reservation,
    resource::Resource,
    session::Session,
    subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PrivilegeError {
        #[code = "NOT_AN_OPERATOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `Customer` must be an operator"]
        Operator,
    }
}

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
