//! [`Command`] for cancelling a [`Reservation`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        contract,
        customer::{Role, Session},
        location, reservation, resource, Contract, Location, Reservation,
        Resource,
    },
    event::Event,
    ics,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a confirmed [`Reservation`].
///
/// The [`Reservation`] row is archived rather than deleted, and the entries
/// it consumed are restored to its [`Contract`]'s balance.
#[derive(Clone, Debug)]
pub struct CancelReservation {
    /// ID of the [`Reservation`] to cancel.
    pub id: reservation::Id,

    /// [`Session`] of the customer (or an operator acting for one)
    /// cancelling the [`Reservation`].
    pub session: Session,
}

impl<Db> Command<CancelReservation> for Service<Db>
where
    Db: Database<
            Select<By<Option<Reservation>, reservation::Id>>,
            Ok = Option<Reservation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Resource>, resource::Id>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Location>, location::Id>>,
            Ok = Option<Location>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Resource, resource::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Reservation>, reservation::Id>>,
            Ok = Option<Reservation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Reservation>, Err = Traced<database::Error>>
        + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CancelReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelReservation { id, session } = cmd;

        let reservation = self
            .database()
            .execute(Select(By::<Option<Reservation>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReservationNotExists(id))
            .map_err(tracerr::wrap!())?;

        if session.role != Role::Operator
            && reservation.customer_id != session.customer_id
        {
            return Err(tracerr::new!(E::ReservationNotOwned(id)));
        }

        let resource = self
            .database()
            .execute(Select(By::<Option<Resource>, _>::new(
                reservation.resource_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ResourceNotExists(reservation.resource_id))
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
        // Avoid concurrent actions upon the same `Contract`.
        tx.execute(Lock(By::new(reservation.contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut reservation = tx
            .execute(Select(By::<Option<Reservation>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReservationNotExists(id))
            .map_err(tracerr::wrap!())?;

        if !reservation.is_active() {
            return Err(tracerr::new!(E::ReservationAlreadyCancelled(id)));
        }

        reservation.cancel(DateTime::now().coerce());

        tx.execute(Update(reservation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Give the spent entries back to the package's balance.
        if let Some(Contract::EntryPackage(mut package)) = tx
            .execute(Select(By::<Option<Contract>, _>::new(
                reservation.contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            package.restore(reservation.entries);
            tx.execute(Update(Contract::from(package)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.events().publish(Event::Reservation {
            id: reservation.id,
            resource_id: resource.id,
            location_id: resource.location_id,
            date: reservation.date,
            status: reservation.status,
        });

        if let Some(mailer) = self.mailer() {
            match self
                .database()
                .execute(Select(By::<Option<Location>, _>::new(
                    resource.location_id,
                )))
                .await
            {
                Ok(Some(location)) => {
                    let subject = format!(
                        "Reservation cancelled: {} at {}",
                        resource.name, location.name,
                    );
                    let body = format!(
                        "Your reservation of {} at {} on {} is cancelled.",
                        resource.name,
                        location.name,
                        reservation.date.to_iso8601(),
                    );
                    let calendar = ics::render(
                        &reservation,
                        &resource.name,
                        &location.name,
                    );
                    let mailer = mailer.clone();
                    let to = session.email;
                    drop(tokio::task::spawn(async move {
                        mailer
                            .send(&to, subject, body, calendar)
                            .await
                            .unwrap_or_else(|e| {
                                log::warn!(
                                    "cannot send cancellation email: {e}",
                                );
                            });
                    }));
                }
                Ok(None) => log::warn!(
                    "`Location(id: {})` of a cancelled `Reservation` \
                     not found",
                    resource.location_id,
                ),
                Err(e) => log::warn!(
                    "cannot load `Location` for a cancellation email: {e}",
                ),
            }
        }

        Ok(reservation)
    }
}

/// Error of [`CancelReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Reservation`] is already cancelled.
    #[display("`Reservation(id: {_0})` is already cancelled")]
    ReservationAlreadyCancelled(#[error(not(source))] reservation::Id),

    /// [`Reservation`] with the provided ID does not exist.
    #[display("`Reservation(id: {_0})` does not exist")]
    ReservationNotExists(#[error(not(source))] reservation::Id),

    /// [`Reservation`] belongs to another customer.
    #[display("`Reservation(id: {_0})` belongs to another customer")]
    ReservationNotOwned(#[error(not(source))] reservation::Id),

    /// [`Resource`] with the provided ID does not exist.
    #[display("`Resource(id: {_0})` does not exist")]
    ResourceNotExists(#[error(not(source))] resource::Id),
}
