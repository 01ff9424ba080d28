//! [`Command`] for confirming a [`Reservation`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Entries,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        availability::{self, Decision, Refusal, Target, Window},
        contract::{self, Binding},
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

/// [`Command`] for confirming a single-day [`Reservation`] under an entry
/// package [`Contract`].
///
/// When no exact [`Resource`] is requested, one is picked by availability
/// resolution over the [`Contract`]'s [`Binding`]. The picked [`Resource`]
/// and the [`Contract`] are re-validated under locks before the entries are
/// spent, so concurrent requests cannot oversell a day.
#[derive(Clone, Debug)]
pub struct ConfirmReservation {
    /// ID of the [`Contract`] to spend entries of.
    pub contract_id: contract::Id,

    /// [`reservation::Date`] to reserve.
    pub date: reservation::Date,

    /// [`reservation::Span`] of the day to reserve.
    pub span: reservation::Span,

    /// Exact [`Resource`] to reserve, if any.
    ///
    /// [`None`] lets the availability resolution pick one matching the
    /// [`Contract`]'s [`Binding`].
    pub resource_id: Option<resource::Id>,

    /// [`Session`] of the customer (or an operator acting for one) making
    /// the [`Reservation`].
    pub session: Session,
}

impl<Db> Command<ConfirmReservation> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Location>, location::Id>>,
            Ok = Option<Location>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<availability::Candidate>, Window>>,
            Ok = Vec<availability::Candidate>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Resource, resource::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<availability::Candidate>, Window>>,
            Ok = Vec<availability::Candidate>,
            Err = Traced<database::Error>,
        > + Database<Insert<Reservation>, Err = Traced<database::Error>>
        + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    #[expect(clippy::too_many_lines, reason = "still readable")]
    async fn execute(
        &self,
        cmd: ConfirmReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConfirmReservation {
            contract_id,
            date,
            span,
            resource_id,
            session,
        } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        if session.role != Role::Operator
            && contract.customer_id() != session.customer_id
        {
            return Err(tracerr::new!(E::ContractNotOwned(contract_id)));
        }
        if !matches!(contract, Contract::EntryPackage(_)) {
            return Err(tracerr::new!(E::NotAnEntryPackage(contract_id)));
        }
        if !contract.is_active_on(date.coerce()) {
            return Err(tracerr::new!(E::OutOfContractWindow {
                id: contract_id,
                date,
            }));
        }

        let target = match (contract.binding(), resource_id) {
            (Binding::Resource(bound), Some(requested)) => {
                if requested != *bound {
                    return Err(tracerr::new!(E::ResourceNotCovered(
                        requested
                    )));
                }
                Target::Resource(requested)
            }
            (Binding::Resource(bound), None) => Target::Resource(*bound),
            // Coverage of an explicitly requested `Resource` is checked
            // against the fresh row under the lock below.
            (Binding::Category { .. }, Some(requested)) => {
                Target::Resource(requested)
            }
            (Binding::Category { category, location }, None) => {
                Target::Category {
                    category: category.clone(),
                    location: *location,
                }
            }
        };

        let candidates = self
            .database()
            .execute(Select(By::<Vec<availability::Candidate>, _>::new(
                Window::on(target, date.coerce()),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let decision = availability::resolve(date.coerce(), span, candidates);
        let chosen = match decision {
            Decision::Available { id, .. } => id,
            Decision::Unavailable(Refusal::NoResources) => {
                return Err(tracerr::new!(E::NoResources));
            }
            Decision::Unavailable(refusal) => {
                return Err(tracerr::new!(E::Unavailable(refusal)));
            }
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Resource`.
        tx.execute(Lock(By::new(chosen)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        // Avoid concurrent actions upon the same `Contract`.
        tx.execute(Lock(By::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let candidate = tx
            .execute(Select(By::<Vec<availability::Candidate>, _>::new(
                Window::on(Target::Resource(chosen), date.coerce()),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .next()
            .ok_or(E::ResourceNotExists(chosen))
            .map_err(tracerr::wrap!())?;

        let contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        if !contract.applies_to(&candidate.resource) {
            return Err(tracerr::new!(E::ResourceNotCovered(chosen)));
        }
        if !contract.is_active_on(date.coerce()) {
            return Err(tracerr::new!(E::OutOfContractWindow {
                id: contract_id,
                date,
            }));
        }
        let Contract::EntryPackage(mut package) = contract else {
            return Err(tracerr::new!(E::NotAnEntryPackage(contract_id)));
        };

        let weight = span.weight();
        if !package.remaining().covers(weight) {
            return Err(tracerr::new!(E::InsufficientEntries {
                remaining: package.remaining(),
                required: weight,
            }));
        }

        if let Some(refusal) = candidate.refusal(date.coerce(), span) {
            return Err(tracerr::new!(E::Unavailable(refusal)));
        }

        let reservation = Reservation {
            id: reservation::Id::new(),
            resource_id: candidate.resource.id,
            contract_id,
            customer_id: package.customer_id,
            date,
            span,
            entries: weight,
            status: reservation::Status::Confirmed,
            is_archived: false,
            created_at: DateTime::now().coerce(),
            cancelled_at: None,
        };

        tx.execute(Insert(reservation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        package.record_usage(weight);
        tx.execute(Update(Contract::from(package)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let resource = candidate.resource;
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
                        "Reservation confirmed: {} at {}",
                        resource.name, location.name,
                    );
                    let body = format!(
                        "Your reservation of {} at {} on {} is confirmed.",
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
                                    "cannot send confirmation email: {e}",
                                );
                            });
                    }));
                }
                Ok(None) => log::warn!(
                    "`Location(id: {})` of a confirmed `Reservation` \
                     not found",
                    resource.location_id,
                ),
                Err(e) => log::warn!(
                    "cannot load `Location` for a confirmation email: {e}",
                ),
            }
        }

        Ok(reservation)
    }
}

/// Error of [`ConfirmReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Contract`] belongs to another customer.
    #[display("`Contract(id: {_0})` belongs to another customer")]
    ContractNotOwned(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`]'s entry balance cannot cover the [`Reservation`].
    #[display(
        "insufficient entries: {remaining} remaining, {required} required"
    )]
    InsufficientEntries {
        /// [`Entries`] remaining on the [`Contract`].
        remaining: Entries,

        /// [`Entries`] the [`Reservation`] requires.
        required: Entries,
    },

    /// No [`Resource`]s match the request at all.
    #[display("no resources match the request")]
    NoResources,

    /// [`Contract`] is not an entry package.
    #[display("`Contract(id: {_0})` is not an entry package")]
    NotAnEntryPackage(#[error(not(source))] contract::Id),

    /// Requested date lies outside the [`Contract`]'s validity period.
    #[display(
        "{} is out of `Contract(id: {id})` validity period",
        date.to_iso8601()
    )]
    OutOfContractWindow {
        /// ID of the [`Contract`].
        id: contract::Id,

        /// Requested date.
        date: reservation::Date,
    },

    /// [`Resource`] is not covered by the [`Contract`]'s [`Binding`].
    #[display("`Resource(id: {_0})` is not covered by the contract")]
    ResourceNotCovered(#[error(not(source))] resource::Id),

    /// [`Resource`] with the provided ID does not exist.
    #[display("`Resource(id: {_0})` does not exist")]
    ResourceNotExists(#[error(not(source))] resource::Id),

    /// No [`Resource`] can take the request.
    #[display("cannot be reserved: {_0}")]
    Unavailable(#[error(not(source))] Refusal),
}
