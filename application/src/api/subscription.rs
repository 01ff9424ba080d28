//! GraphQL [`Subscription`]s definitions.

use common::{Date, DateTime};
use futures::{
    stream::{self, BoxStream},
    FutureExt as _, StreamExt as _,
};
use juniper::{graphql_object, graphql_subscription, GraphQLUnion};
use service::{domain, event, query, Query as _};
use tokio::sync::broadcast::error::RecvError;

use crate::{api, context, AsError, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription waiting for the current authenticated session to expire.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - if the current session is not
    ///                              authenticated or session expired.
    pub async fn wait_session(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<bool, Error>>, Error> {
        let session = ctx.current_session().await?;
        let timeout = session.claims.expires_at.coerce() - DateTime::now();
        Ok(stream::once(
            tokio::time::sleep(timeout).map(|()| {
                Err(context::AuthError::AuthroizationRequired.into())
            }),
        )
        .boxed())
    }

    /// Feed of `Reservation` and `Booking` changes at the specified
    /// `Location`, starting from the moment of subscribing.
    ///
    /// Subscribers lagging behind the feed skip the missed events and
    /// continue from the newest ones.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOCATION_NOT_EXISTS` - the `Location` with the specified ID does
    ///                           not exist.
    pub async fn ledger(
        &self,
        location: api::location::Id,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<LedgerEvent, Error>>, Error> {
        let location_id = domain::location::Id::from(location);
        let _ = ctx
            .service()
            .execute(query::location::ById::by(location_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::LocationError::NotExists.into())
            .map_err(ctx.error())?;

        let events = ctx.service().events().subscribe();
        Ok(stream::unfold(events, move |mut events| async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.location_id() == location_id => {
                        return Some((Ok(event.into()), events));
                    }
                    // Events of other `Location`s, and the ones missed
                    // while lagging behind, are skipped.
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed())
    }
}

/// Single change of a `Location`'s booking ledger.
#[derive(Clone, Copy, Debug, GraphQLUnion)]
#[graphql(name = "LedgerEvent", context = Context)]
pub enum LedgerEvent {
    /// A `Reservation` was confirmed or cancelled.
    Reservation(ReservationEvent),

    /// A `Booking` was created or cancelled.
    Booking(BookingEvent),
}

impl From<event::Event> for LedgerEvent {
    fn from(event: event::Event) -> Self {
        use event::Event as E;
        match event {
            E::Reservation { id, resource_id, date, status, .. } => {
                Self::Reservation(ReservationEvent {
                    id: id.into(),
                    resource_id,
                    date: date.coerce(),
                    status: status.into(),
                })
            }
            E::Booking {
                id,
                resource_id,
                starts_on,
                ends_on,
                status,
                ..
            } => Self::Booking(BookingEvent {
                id: id.into(),
                resource_id,
                starts_on: starts_on.coerce(),
                ends_on: ends_on.coerce(),
                status: status.into(),
            }),
        }
    }
}

/// [`LedgerEvent`] about a reservation.
#[derive(Clone, Copy, Debug)]
pub struct ReservationEvent {
    /// ID of the reservation.
    id: api::reservation::Id,

    /// ID of the reserved resource.
    resource_id: domain::resource::Id,

    /// Date of the reservation.
    date: Date,

    /// Current status of the reservation.
    status: api::reservation::Status,
}

/// Notification about a `Reservation` being confirmed or cancelled.
#[graphql_object(name = "LedgerReservationEvent", context = Context)]
impl ReservationEvent {
    /// `Reservation` this event is about.
    #[must_use]
    pub fn reservation(&self) -> api::Reservation {
        #[expect(
            unsafe_code,
            reason = "`LedgerEvent` is emitted for an existing `Reservation` \
                      only"
        )]
        unsafe {
            api::Reservation::new_unchecked(self.id)
        }
    }

    /// `Resource` the `Reservation` occupies.
    #[must_use]
    pub fn resource(&self) -> api::Resource {
        #[expect(
            unsafe_code,
            reason = "`LedgerEvent` is emitted for an existing `Resource` \
                      only"
        )]
        unsafe {
            api::Resource::new_unchecked(self.resource_id)
        }
    }

    /// `Date` the `Reservation` is for.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Current status of the `Reservation`.
    #[must_use]
    pub fn status(&self) -> api::reservation::Status {
        self.status
    }
}

/// [`LedgerEvent`] about a booking.
#[derive(Clone, Copy, Debug)]
pub struct BookingEvent {
    /// ID of the booking.
    id: api::booking::Id,

    /// ID of the booked resource.
    resource_id: domain::resource::Id,

    /// First covered date, inclusive.
    starts_on: Date,

    /// Last covered date, inclusive.
    ends_on: Date,

    /// Current status of the booking.
    status: api::booking::Status,
}

/// Notification about a `Booking` being created or cancelled.
#[graphql_object(name = "LedgerBookingEvent", context = Context)]
impl BookingEvent {
    /// `Booking` this event is about.
    #[must_use]
    pub fn booking(&self) -> api::Booking {
        #[expect(
            unsafe_code,
            reason = "`LedgerEvent` is emitted for an existing `Booking` only"
        )]
        unsafe {
            api::Booking::new_unchecked(self.id)
        }
    }

    /// `Resource` the `Booking` occupies.
    #[must_use]
    pub fn resource(&self) -> api::Resource {
        #[expect(
            unsafe_code,
            reason = "`LedgerEvent` is emitted for an existing `Resource` \
                      only"
        )]
        unsafe {
            api::Resource::new_unchecked(self.resource_id)
        }
    }

    /// First `Date` covered by the `Booking`, inclusive.
    #[must_use]
    pub fn starts_on(&self) -> Date {
        self.starts_on
    }

    /// Last `Date` covered by the `Booking`, inclusive.
    #[must_use]
    pub fn ends_on(&self) -> Date {
        self.ends_on
    }

    /// Current status of the `Booking`.
    #[must_use]
    pub fn status(&self) -> api::booking::Status {
        self.status
    }
}
