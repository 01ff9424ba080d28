//! [`Command`] for cancelling a [`Booking`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking,
        customer::{Role, Session},
        resource, Booking, Resource,
    },
    event::Event,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a confirmed [`Booking`].
///
/// The [`Booking`] row is archived rather than deleted, so the covered dates
/// become bookable again while the history stays intact.
#[derive(Clone, Debug)]
pub struct CancelBooking {
    /// ID of the [`Booking`] to cancel.
    pub id: booking::Id,

    /// [`Session`] of the customer (or an operator acting for one)
    /// cancelling the [`Booking`].
    pub session: Session,
}

impl<Db> Command<CancelBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Resource>, resource::Id>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Resource, resource::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelBooking { id, session } = cmd;

        let booking = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(id))
            .map_err(tracerr::wrap!())?;

        if session.role != Role::Operator
            && booking.customer_id != session.customer_id
        {
            return Err(tracerr::new!(E::BookingNotOwned(id)));
        }

        let resource = self
            .database()
            .execute(Select(By::<Option<Resource>, _>::new(
                booking.resource_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ResourceNotExists(booking.resource_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Resource`.
        tx.execute(Lock(By::new(resource.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(id))
            .map_err(tracerr::wrap!())?;

        if !booking.is_active() {
            return Err(tracerr::new!(E::BookingAlreadyCancelled(id)));
        }

        booking.cancel(DateTime::now().coerce());

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.events().publish(Event::Booking {
            id: booking.id,
            resource_id: resource.id,
            location_id: resource.location_id,
            starts_on: booking.starts_on,
            ends_on: booking.ends_on,
            status: booking.status,
        });

        Ok(booking)
    }
}

/// Error of [`CancelBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] is already cancelled.
    #[display("`Booking(id: {_0})` is already cancelled")]
    BookingAlreadyCancelled(#[error(not(source))] booking::Id),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] belongs to another customer.
    #[display("`Booking(id: {_0})` belongs to another customer")]
    BookingNotOwned(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Resource`] with the provided ID does not exist.
    #[display("`Resource(id: {_0})` does not exist")]
    ResourceNotExists(#[error(not(source))] resource::Id),
}
