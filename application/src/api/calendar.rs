//! Calendar [`Timeline`]-related definitions.

use common::Date;
use derive_more::From;
use juniper::{graphql_object, GraphQLUnion};
use service::read;

use crate::{api, Context};

/// Per-resource occupancy of a [`Location`] over an inclusive date range.
///
/// [`Location`]: api::Location
#[derive(Clone, Debug, From)]
pub struct Timeline(read::calendar::Timeline);

/// Per-resource occupancy of a `Location` over an inclusive date range.
#[graphql_object(name = "CalendarTimeline", context = Context)]
impl Timeline {
    /// `Location` this `CalendarTimeline` is of.
    #[must_use]
    pub fn location(&self) -> api::Location {
        #[expect(
            unsafe_code,
            reason = "`Timeline` loaded from repository guarantees \
                      `Location` existence"
        )]
        unsafe {
            api::Location::new_unchecked(self.0.location_id)
        }
    }

    /// First `Date` of this `CalendarTimeline`, inclusive.
    #[must_use]
    pub fn starts_on(&self) -> Date {
        self.0.starts_on
    }

    /// Last `Date` of this `CalendarTimeline`, inclusive.
    #[must_use]
    pub fn ends_on(&self) -> Date {
        self.0.ends_on
    }

    /// Lanes of this `CalendarTimeline`, one per resource, ordered by
    /// resource name ascending.
    #[must_use]
    pub fn lanes(&self) -> Vec<Lane> {
        self.0.lanes.iter().cloned().map(Into::into).collect()
    }
}

/// One resource's lane in a [`Timeline`].
#[derive(Clone, Debug, From)]
pub struct Lane(read::calendar::Lane);

/// One resource's lane in a `CalendarTimeline`.
#[graphql_object(name = "CalendarLane", context = Context)]
impl Lane {
    /// `Resource` this `CalendarLane` is of.
    #[must_use]
    pub fn resource(&self) -> api::Resource {
        #[expect(
            unsafe_code,
            reason = "`Lane` loaded from repository guarantees `Resource` \
                      existence"
        )]
        unsafe {
            api::Resource::new_unchecked(self.0.resource_id)
        }
    }

    /// Name of the `Resource`.
    #[must_use]
    pub fn name(&self) -> api::resource::Name {
        self.0.name.clone().into()
    }

    /// Category of the `Resource`.
    #[must_use]
    pub fn category(&self) -> api::resource::Category {
        self.0.category.clone().into()
    }

    /// Entries occupying the `Resource` within the `CalendarTimeline`'s
    /// range.
    #[must_use]
    pub fn entries(&self) -> Vec<Entry> {
        self.0.entries.iter().cloned().map(Into::into).collect()
    }
}

/// Single entry in a [`Lane`].
#[derive(Clone, Debug, From, GraphQLUnion)]
#[graphql(name = "CalendarEntry", context = Context)]
pub enum Entry {
    /// Confirmed reservation on its date.
    Reservation(ReservationEntry),

    /// Confirmed booking, clipped to the timeline's range.
    Booking(BookingEntry),

    /// Closure covering the resource, clipped to the timeline's range.
    Closure(ClosureEntry),
}

impl From<read::calendar::Entry> for Entry {
    fn from(entry: read::calendar::Entry) -> Self {
        use read::calendar::Entry as E;
        match entry {
            E::Reservation {
                id,
                customer_id,
                date,
                span,
            } => ReservationEntry {
                id: id.into(),
                customer_id: customer_id.into(),
                date: date.coerce(),
                duration: span.duration().into(),
                slot: span.slot().map(Into::into),
            }
            .into(),
            E::Booking {
                id,
                customer_id,
                starts_on,
                ends_on,
            } => BookingEntry {
                id: id.into(),
                customer_id: customer_id.into(),
                starts_on,
                ends_on,
            }
            .into(),
            E::Closure {
                id,
                starts_on,
                ends_on,
                reason,
            } => ClosureEntry {
                id: id.into(),
                starts_on,
                ends_on,
                reason: reason.into(),
            }
            .into(),
        }
    }
}

/// Confirmed reservation in a [`Lane`].
#[derive(Clone, Debug)]
pub struct ReservationEntry {
    /// ID of the reservation.
    id: api::reservation::Id,

    /// ID of the customer holding the reservation.
    customer_id: api::customer::Id,

    /// Date of the reservation.
    date: Date,

    /// Duration of the reservation.
    duration: api::reservation::Duration,

    /// Time slot of the reservation, for half-day ones only.
    slot: Option<api::reservation::Slot>,
}

/// Confirmed reservation in a `CalendarLane`.
#[graphql_object(name = "CalendarReservationEntry", context = Context)]
impl ReservationEntry {
    /// `Reservation` behind this `CalendarReservationEntry`.
    #[must_use]
    pub fn reservation(&self) -> api::Reservation {
        #[expect(
            unsafe_code,
            reason = "`Entry` loaded from repository guarantees \
                      `Reservation` existence"
        )]
        unsafe {
            api::Reservation::new_unchecked(self.id)
        }
    }

    /// Identifier of the customer holding the reservation.
    #[must_use]
    pub fn customer_id(&self) -> api::customer::Id {
        self.customer_id
    }

    /// `Date` of the reservation.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Duration of the reservation.
    #[must_use]
    pub fn duration(&self) -> api::reservation::Duration {
        self.duration
    }

    /// Time slot of the reservation, for half-day ones only.
    #[must_use]
    pub fn slot(&self) -> Option<api::reservation::Slot> {
        self.slot
    }
}

/// Confirmed booking in a [`Lane`], clipped to the [`Timeline`]'s range.
#[derive(Clone, Debug)]
pub struct BookingEntry {
    /// ID of the booking.
    id: api::booking::Id,

    /// ID of the customer holding the booking.
    customer_id: api::customer::Id,

    /// First covered date within the range.
    starts_on: Date,

    /// Last covered date within the range.
    ends_on: Date,
}

/// Confirmed booking in a `CalendarLane`, clipped to the timeline's range.
#[graphql_object(name = "CalendarBookingEntry", context = Context)]
impl BookingEntry {
    /// `Booking` behind this `CalendarBookingEntry`.
    #[must_use]
    pub fn booking(&self) -> api::Booking {
        #[expect(
            unsafe_code,
            reason = "`Entry` loaded from repository guarantees `Booking` \
                      existence"
        )]
        unsafe {
            api::Booking::new_unchecked(self.id)
        }
    }

    /// Identifier of the customer holding the booking.
    #[must_use]
    pub fn customer_id(&self) -> api::customer::Id {
        self.customer_id
    }

    /// First covered `Date` within the timeline's range.
    #[must_use]
    pub fn starts_on(&self) -> Date {
        self.starts_on
    }

    /// Last covered `Date` within the timeline's range.
    #[must_use]
    pub fn ends_on(&self) -> Date {
        self.ends_on
    }
}

/// Closure in a [`Lane`], clipped to the [`Timeline`]'s range.
#[derive(Clone, Debug)]
pub struct ClosureEntry {
    /// ID of the closure.
    id: api::closure::Id,

    /// First covered date within the range.
    starts_on: Date,

    /// Last covered date within the range.
    ends_on: Date,

    /// Reason of the closure.
    reason: api::closure::Reason,
}

/// Closure in a `CalendarLane`, clipped to the timeline's range.
#[graphql_object(name = "CalendarClosureEntry", context = Context)]
impl ClosureEntry {
    /// Identifier of the closure.
    #[must_use]
    pub fn id(&self) -> api::closure::Id {
        self.id
    }

    /// First covered `Date` within the timeline's range.
    #[must_use]
    pub fn starts_on(&self) -> Date {
        self.starts_on
    }

    /// Last covered `Date` within the timeline's range.
    #[must_use]
    pub fn ends_on(&self) -> Date {
        self.ends_on
    }

    /// Reason of the closure.
    #[must_use]
    pub fn reason(&self) -> &api::closure::Reason {
        &self.reason
    }
}
