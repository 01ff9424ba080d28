//! [`Timeline`] read model definition.

use common::Date;

use crate::domain::{
    booking, closure, customer, location, reservation, reservation::Span,
    resource,
};
#[cfg(doc)]
use crate::domain::{Booking, Closure, Location, Reservation, Resource};

/// Per-resource occupancy of a [`Location`] over an inclusive date range.
///
/// Serves calendar views: one [`Lane`] per [`Resource`] of the [`Location`],
/// each carrying everything occupying it within the range.
#[derive(Clone, Debug)]
pub struct Timeline {
    /// ID of the [`Location`] this [`Timeline`] is of.
    pub location_id: location::Id,

    /// First [`Date`] of this [`Timeline`], inclusive.
    pub starts_on: Date,

    /// Last [`Date`] of this [`Timeline`], inclusive.
    pub ends_on: Date,

    /// [`Lane`]s of this [`Timeline`], ordered by [`resource::Name`]
    /// ascending.
    pub lanes: Vec<Lane>,
}

impl Timeline {
    /// Returns the day axis of this [`Timeline`].
    pub fn days(&self) -> impl Iterator<Item = Date> {
        self.starts_on.through(self.ends_on)
    }
}

/// One [`Resource`]'s lane in a [`Timeline`].
#[derive(Clone, Debug)]
pub struct Lane {
    /// ID of the [`Resource`] this [`Lane`] is of.
    pub resource_id: resource::Id,

    /// [`resource::Name`] of the [`Resource`].
    pub name: resource::Name,

    /// [`resource::Category`] of the [`Resource`].
    pub category: resource::Category,

    /// [`Entry`]s occupying the [`Resource`] within the [`Timeline`]'s
    /// range.
    pub entries: Vec<Entry>,
}

/// Single entry in a [`Lane`].
#[derive(Clone, Debug)]
pub enum Entry {
    /// Confirmed [`Reservation`] on its date.
    Reservation {
        /// ID of the [`Reservation`].
        id: reservation::Id,

        /// ID of the customer holding the [`Reservation`].
        customer_id: customer::Id,

        /// [`reservation::Date`] of the [`Reservation`].
        date: reservation::Date,

        /// [`Span`] of the day the [`Reservation`] occupies.
        span: Span,
    },

    /// Confirmed [`Booking`], clipped to the [`Timeline`]'s range.
    Booking {
        /// ID of the [`Booking`].
        id: booking::Id,

        /// ID of the customer holding the [`Booking`].
        customer_id: customer::Id,

        /// First covered [`Date`] within the range.
        starts_on: Date,

        /// Last covered [`Date`] within the range.
        ends_on: Date,
    },

    /// [`Closure`] covering the [`Resource`], clipped to the [`Timeline`]'s
    /// range.
    Closure {
        /// ID of the [`Closure`].
        id: closure::Id,

        /// First covered [`Date`] within the range.
        starts_on: Date,

        /// Last covered [`Date`] within the range.
        ends_on: Date,

        /// [`closure::Reason`] of the [`Closure`].
        reason: closure::Reason,
    },
}

/// Selector of a [`Timeline`].
#[derive(Clone, Copy, Debug)]
pub struct Selector {
    /// ID of the [`Location`] to assemble the [`Timeline`] of.
    pub location: location::Id,

    /// First [`Date`] of interest, inclusive.
    pub starts_on: Date,

    /// Last [`Date`] of interest, inclusive.
    pub ends_on: Date,
}
