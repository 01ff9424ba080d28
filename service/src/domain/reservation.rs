//! [`Reservation`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateOf, DateTimeOf, Entries};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contract, customer, resource};
#[cfg(doc)]
use crate::domain::{Contract, Resource};

/// Single-day reservation of a [`Resource`] under an entry package
/// [`Contract`].
#[derive(Clone, Debug)]
pub struct Reservation {
    /// ID of this [`Reservation`].
    pub id: Id,

    /// ID of the reserved [`Resource`].
    pub resource_id: resource::Id,

    /// ID of the [`Contract`] this [`Reservation`] consumes entries of.
    pub contract_id: contract::Id,

    /// ID of the customer this [`Reservation`] belongs to.
    pub customer_id: customer::Id,

    /// [`Date`] this [`Reservation`] is made for.
    pub date: Date,

    /// [`Span`] of the day this [`Reservation`] occupies.
    pub span: Span,

    /// [`Entries`] this [`Reservation`] consumed when it was confirmed.
    pub entries: Entries,

    /// [`Status`] of this [`Reservation`].
    pub status: Status,

    /// Indicator whether this [`Reservation`] is archived.
    ///
    /// Archived [`Reservation`]s are excluded from availability resolution,
    /// but never deleted.
    pub is_archived: bool,

    /// [`DateTime`] when this [`Reservation`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Reservation`] was cancelled, if it was.
    pub cancelled_at: Option<CancellationDateTime>,
}

impl Reservation {
    /// Indicates whether this [`Reservation`] occupies its [`Resource`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Confirmed && !self.is_archived
    }

    /// Cancels this [`Reservation`], archiving it.
    ///
    /// The [`Reservation`] row is kept for auditing, it only stops occupying
    /// its [`Resource`].
    pub fn cancel(&mut self, at: CancellationDateTime) {
        self.status = Status::Cancelled;
        self.is_archived = true;
        self.cancelled_at = Some(at);
    }
}

/// ID of a [`Reservation`].
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

/// Part of a day a [`Reservation`] occupies.
///
/// A [`Slot`] exists for half-day [`Reservation`]s only, so a full-day one
/// carrying a [`Slot`] is unrepresentable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Span {
    /// Whole day.
    FullDay,

    /// Half of a day, either morning or afternoon.
    HalfDay(Slot),
}

impl Span {
    /// Creates a new [`Span`] from the given [`Duration`] and [`Slot`], if
    /// they agree.
    ///
    /// A [`Slot`] is required for a [`Duration::HalfDay`] and rejected for a
    /// [`Duration::FullDay`].
    #[must_use]
    pub fn new(duration: Duration, slot: Option<Slot>) -> Option<Self> {
        match (duration, slot) {
            (Duration::FullDay, None) => Some(Self::FullDay),
            (Duration::HalfDay, Some(slot)) => Some(Self::HalfDay(slot)),
            (Duration::FullDay, Some(_)) | (Duration::HalfDay, None) => None,
        }
    }

    /// Returns [`Duration`] of this [`Span`].
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::FullDay => Duration::FullDay,
            Self::HalfDay(_) => Duration::HalfDay,
        }
    }

    /// Returns [`Slot`] of this [`Span`], if it's a half-day one.
    #[must_use]
    pub fn slot(self) -> Option<Slot> {
        match self {
            Self::FullDay => None,
            Self::HalfDay(slot) => Some(slot),
        }
    }

    /// Returns the [`Entries`] weight this [`Span`] consumes.
    #[must_use]
    pub fn weight(self) -> Entries {
        match self {
            Self::FullDay => Entries::ONE,
            Self::HalfDay(_) => Entries::HALF,
        }
    }
}

define_kind! {
    #[doc = "Duration of a [`Reservation`]."]
    enum Duration {
        #[doc = "Reservation for a whole day."]
        FullDay = 1,

        #[doc = "Reservation for a half of a day."]
        HalfDay = 2,
    }
}

define_kind! {
    #[doc = "Time slot of a half-day [`Reservation`]."]
    enum Slot {
        #[doc = "Morning half of a day."]
        Morning = 1,

        #[doc = "Afternoon half of a day."]
        Afternoon = 2,
    }
}

define_kind! {
    #[doc = "Status of a [`Reservation`]."]
    enum Status {
        #[doc = "The [`Reservation`] is confirmed and occupies its resource."]
        Confirmed = 1,

        #[doc = "The [`Reservation`] is cancelled."]
        Cancelled = 2,
    }
}

/// [`common::Date`] a [`Reservation`] is made for.
pub type Date = DateOf<Reservation>;

/// [`DateTime`] when a [`Reservation`] was created.
pub type CreationDateTime = DateTimeOf<(Reservation, unit::Creation)>;

/// [`DateTime`] when a [`Reservation`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Reservation, unit::Cancellation)>;

#[cfg(test)]
mod spec {
    use common::Entries;

    use super::{Duration, Slot, Span};

    #[test]
    fn span_requires_slot_for_half_day_only() {
        assert_eq!(
            Span::new(Duration::FullDay, None),
            Some(Span::FullDay),
        );
        assert_eq!(
            Span::new(Duration::HalfDay, Some(Slot::Morning)),
            Some(Span::HalfDay(Slot::Morning)),
        );

        assert_eq!(Span::new(Duration::FullDay, Some(Slot::Morning)), None);
        assert_eq!(Span::new(Duration::HalfDay, None), None);
    }

    #[test]
    fn span_weight() {
        assert_eq!(Span::FullDay.weight(), Entries::ONE);
        assert_eq!(Span::HalfDay(Slot::Morning).weight(), Entries::HALF);
        assert_eq!(Span::HalfDay(Slot::Afternoon).weight(), Entries::HALF);
    }
}
