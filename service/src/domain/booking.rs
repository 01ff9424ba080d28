//! [`Booking`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateOf, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contract, customer, resource};
#[cfg(doc)]
use crate::domain::{Contract, Resource};

/// Date-range booking of a [`Resource`] under a subscription [`Contract`].
///
/// A confirmed [`Booking`] occupies its [`Resource`] like a full-day
/// reservation on every covered [`Date`].
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`Resource`].
    pub resource_id: resource::Id,

    /// ID of the [`Contract`] this [`Booking`] is made under.
    pub contract_id: contract::Id,

    /// ID of the customer this [`Booking`] belongs to.
    pub customer_id: customer::Id,

    /// First booked [`Date`], inclusive.
    pub starts_on: StartDate,

    /// Last booked [`Date`], inclusive.
    pub ends_on: EndDate,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// Indicator whether this [`Booking`] is archived.
    ///
    /// Archived [`Booking`]s are excluded from availability resolution, but
    /// never deleted.
    pub is_archived: bool,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was cancelled, if it was.
    pub cancelled_at: Option<CancellationDateTime>,
}

impl Booking {
    /// Indicates whether this [`Booking`] covers the given [`Date`].
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.starts_on.coerce() <= date && date <= self.ends_on.coerce()
    }

    /// Indicates whether this [`Booking`] occupies its [`Resource`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Confirmed && !self.is_archived
    }

    /// Cancels this [`Booking`], archiving it.
    ///
    /// The [`Booking`] row is kept for auditing, it only stops occupying its
    /// [`Resource`].
    pub fn cancel(&mut self, at: CancellationDateTime) {
        self.status = Status::Cancelled;
        self.is_archived = true;
        self.cancelled_at = Some(at);
    }
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "The [`Booking`] is confirmed and occupies its resource."]
        Confirmed = 1,

        #[doc = "The [`Booking`] is cancelled."]
        Cancelled = 2,
    }
}

/// First [`Date`] covered by a [`Booking`].
pub type StartDate = DateOf<(Booking, unit::Start)>;

/// Last [`Date`] covered by a [`Booking`].
pub type EndDate = DateOf<(Booking, unit::End)>;

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Booking, unit::Cancellation)>;
