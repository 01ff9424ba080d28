//! In-process feed of booking ledger events.
//!
//! Stands in for an external realtime change feed: confirmations and
//! cancellations are broadcast to whoever is listening (the GraphQL
//! subscription root, mainly), and dropped on the floor when nobody is.

use tokio::sync::broadcast;

use crate::domain::{booking, location, reservation, resource};
#[cfg(doc)]
use crate::domain::{Booking, Location, Reservation, Resource};

/// Capacity of the [`Feed`]'s broadcast channel.
///
/// Slow subscribers falling further behind than this observe a lag and skip
/// to the newest [`Event`]s.
const CAPACITY: usize = 64;

/// Single event of the booking ledger.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// A [`Reservation`] was confirmed or cancelled.
    Reservation {
        /// ID of the [`Reservation`].
        id: reservation::Id,

        /// ID of the reserved [`Resource`].
        resource_id: resource::Id,

        /// ID of the [`Location`] hosting the [`Resource`].
        location_id: location::Id,

        /// [`reservation::Date`] of the [`Reservation`].
        date: reservation::Date,

        /// Current [`reservation::Status`] of the [`Reservation`].
        status: reservation::Status,
    },

    /// A [`Booking`] was created or cancelled.
    Booking {
        /// ID of the [`Booking`].
        id: booking::Id,

        /// ID of the booked [`Resource`].
        resource_id: resource::Id,

        /// ID of the [`Location`] hosting the [`Resource`].
        location_id: location::Id,

        /// First covered [`common::Date`], inclusive.
        starts_on: booking::StartDate,

        /// Last covered [`common::Date`], inclusive.
        ends_on: booking::EndDate,

        /// Current [`booking::Status`] of the [`Booking`].
        status: booking::Status,
    },
}

impl Event {
    /// Returns ID of the [`Location`] this [`Event`] happened at.
    #[must_use]
    pub fn location_id(&self) -> location::Id {
        match *self {
            Self::Reservation { location_id, .. }
            | Self::Booking { location_id, .. } => location_id,
        }
    }
}

/// Broadcast feed of [`Event`]s.
#[derive(Clone, Debug)]
pub struct Feed {
    /// Sending side of the broadcast channel.
    ///
    /// Receivers are created on demand via [`Feed::subscribe()`].
    sender: broadcast::Sender<Event>,
}

impl Feed {
    /// Creates a new [`Feed`] with no subscribers yet.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Publishes the given [`Event`] to all current subscribers.
    ///
    /// Publishing with no subscribers is a no-op.
    pub fn publish(&self, event: Event) {
        // An error here only means there are no receivers right now.
        drop(self.sender.send(event));
    }

    /// Subscribes to all [`Event`]s published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{Event, Feed};
    use crate::domain::{location, reservation, resource};

    fn event(location_id: location::Id) -> Event {
        Event::Reservation {
            id: reservation::Id::new(),
            resource_id: resource::Id::new(),
            location_id,
            date: Date::from_iso8601("2024-06-10").unwrap().coerce(),
            status: reservation::Status::Confirmed,
        }
    }

    #[test]
    fn delivers_to_every_subscriber() {
        let feed = Feed::new();
        let mut first = feed.subscribe();
        let mut second = feed.subscribe();

        let location_id = location::Id::new();
        feed.publish(event(location_id));

        for rx in [&mut first, &mut second] {
            let received = rx.try_recv().unwrap();
            assert_eq!(received.location_id(), location_id);
        }
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        Feed::new().publish(event(location::Id::new()));
    }

    #[test]
    fn subscription_starts_from_the_moment_of_subscribing() {
        let feed = Feed::new();
        feed.publish(event(location::Id::new()));

        let mut late = feed.subscribe();
        assert!(late.try_recv().is_err());
    }
}
