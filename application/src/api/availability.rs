//! Availability [`Decision`]-related definitions.

use juniper::{graphql_object, GraphQLEnum};
use service::domain;

use crate::{api, Context};

/// Outcome of resolving an availability request.
#[derive(Clone, Debug)]
pub struct Decision {
    /// Resolved `Resource`, if any.
    resource: Option<api::Resource>,

    /// Name of the resolved `Resource`, if any.
    resource_name: Option<api::resource::Name>,

    /// [`Refusal`], if the request cannot be satisfied.
    refusal: Option<Refusal>,
}

impl From<domain::availability::Decision> for Decision {
    fn from(decision: domain::availability::Decision) -> Self {
        use domain::availability::Decision as D;
        match decision {
            D::Available { id, name } => Self {
                #[expect(
                    unsafe_code,
                    reason = "`Decision` resolved from repository \
                              guarantees `Resource` existence"
                )]
                resource: Some(unsafe { api::Resource::new_unchecked(id) }),
                resource_name: Some(name.into()),
                refusal: None,
            },
            D::Unavailable(refusal) => Self {
                resource: None,
                resource_name: None,
                refusal: Some(refusal.into()),
            },
        }
    }
}

/// Outcome of resolving an availability request.
#[graphql_object(name = "AvailabilityDecision", context = Context)]
impl Decision {
    /// Indicator whether the request can be satisfied.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.refusal.is_none()
    }

    /// `Resource` satisfying the request, if it can be satisfied.
    #[must_use]
    pub fn resource(&self) -> Option<&api::Resource> {
        self.resource.as_ref()
    }

    /// Name of the `Resource` satisfying the request, if it can be
    /// satisfied.
    #[must_use]
    pub fn resource_name(&self) -> Option<&api::resource::Name> {
        self.resource_name.as_ref()
    }

    /// Refusal explaining why the request cannot be satisfied.
    #[must_use]
    pub fn refusal(&self) -> Option<Refusal> {
        self.refusal
    }
}

/// Reason an availability request cannot be satisfied.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "AvailabilityRefusal")]
pub enum Refusal {
    /// No bookable resources match the target at all.
    NoResources,

    /// Every matching resource is closed for the requested dates.
    Closed,

    /// Every matching resource is closed on the requested weekday.
    ClosedWeekday,

    /// Every matching resource is occupied for the requested dates.
    FullyBooked,
}

impl From<domain::availability::Refusal> for Refusal {
    fn from(refusal: domain::availability::Refusal) -> Self {
        use domain::availability::Refusal as R;
        match refusal {
            R::NoResources => Self::NoResources,
            R::Closed => Self::Closed,
            R::ClosedWeekday => Self::ClosedWeekday,
            R::FullyBooked => Self::FullyBooked,
        }
    }
}
