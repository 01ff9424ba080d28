//! Customer-related definitions.
//!
//! Customers are managed by the external identity provider, so only what
//! their verified session tokens carry surfaces in this API.

use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::api::scalar;

/// Unique identifier of a customer.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::customer::Id)]
#[into(domain::customer::Id)]
#[graphql(name = "CustomerId", transparent)]
pub struct Id(Uuid);

/// Display name of a customer.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerName",
    with = scalar::Via::<domain::customer::Name>,
)]
pub struct Name(domain::customer::Name);

/// Email address of a customer.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerEmail",
    with = scalar::Via::<domain::customer::Email>,
)]
pub struct Email(domain::customer::Email);

/// Role of a customer, as granted by the identity provider.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "CustomerRole")]
pub enum Role {
    /// Regular customer booking resources for themselves.
    Customer,

    /// Operator managing the catalog and seeing all bookings.
    Operator,
}

impl From<domain::customer::Role> for Role {
    fn from(role: domain::customer::Role) -> Self {
        use domain::customer::Role as R;
        match role {
            R::Customer => Self::Customer,
            R::Operator => Self::Operator,
        }
    }
}
