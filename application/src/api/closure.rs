//! [`Closure`]-related definitions.

use common::{Date, DateTime};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar, GraphQLUnion};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Period when a [`Location`] or a single [`Resource`] is closed and accepts
/// no reservations.
///
/// [`Location`]: api::Location
/// [`Resource`]: api::Resource
#[derive(Clone, Debug, From)]
pub struct Closure(domain::Closure);

/// Period when a `Location` or a single `Resource` is closed and accepts no
/// reservations.
#[graphql_object(context = Context)]
impl Closure {
    /// Unique identifier of this `Closure`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Scope this `Closure` applies to.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.0.scope.into()
    }

    /// First closed `Date`, inclusive.
    #[must_use]
    pub fn starts_on(&self) -> Date {
        self.0.starts_on.coerce()
    }

    /// Last closed `Date`, inclusive.
    #[must_use]
    pub fn ends_on(&self) -> Date {
        self.0.ends_on.coerce()
    }

    /// Reason of this `Closure`.
    #[must_use]
    pub fn reason(&self) -> Reason {
        self.0.reason.clone().into()
    }

    /// `DateTime` when this `Closure` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Closure`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::closure::Id)]
#[into(domain::closure::Id)]
#[graphql(name = "ClosureId", transparent)]
pub struct Id(Uuid);

/// Reason of a `Closure`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ClosureReason",
    with = scalar::Via::<domain::closure::Reason>,
)]
pub struct Reason(domain::closure::Reason);

/// Scope of a [`Closure`].
#[derive(Clone, Debug, From, GraphQLUnion)]
#[graphql(name = "ClosureScope", context = Context)]
pub enum Scope {
    /// Closure of a whole `Location`, blocking every resource in it.
    Location(LocationScope),

    /// Closure of a single `Resource`.
    Resource(ResourceScope),
}

impl From<domain::closure::Scope> for Scope {
    fn from(scope: domain::closure::Scope) -> Self {
        use domain::closure::Scope as S;
        match scope {
            S::Location(id) => {
                #[expect(
                    unsafe_code,
                    reason = "`Scope` loaded from repository guarantees \
                              `Location` existence"
                )]
                LocationScope {
                    location: unsafe { api::Location::new_unchecked(id) },
                }
                .into()
            }
            S::Resource(id) => {
                #[expect(
                    unsafe_code,
                    reason = "`Scope` loaded from repository guarantees \
                              `Resource` existence"
                )]
                ResourceScope {
                    resource: unsafe { api::Resource::new_unchecked(id) },
                }
                .into()
            }
        }
    }
}

/// [`Scope`] closing a whole `Location`.
#[derive(Clone, Debug)]
pub struct LocationScope {
    /// Closed `Location`.
    location: api::Location,
}

/// `ClosureScope` closing a whole `Location`.
#[graphql_object(name = "ClosureLocationScope", context = Context)]
impl LocationScope {
    /// Closed `Location`.
    #[must_use]
    pub fn location(&self) -> &api::Location {
        &self.location
    }
}

/// [`Scope`] closing a single `Resource`.
#[derive(Clone, Debug)]
pub struct ResourceScope {
    /// Closed `Resource`.
    resource: api::Resource,
}

/// `ClosureScope` closing a single `Resource`.
#[graphql_object(name = "ClosureResourceScope", context = Context)]
impl ResourceScope {
    /// Closed `Resource`.
    #[must_use]
    pub fn resource(&self) -> &api::Resource {
        &self.resource
    }
}
