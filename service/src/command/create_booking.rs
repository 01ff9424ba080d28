//! [`Command`] for creating a [`Booking`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        availability::{self, Decision, Refusal, Target, Window},
        booking,
        contract::{self, Binding},
        customer::{Role, Session},
        resource, Booking, Contract, Resource,
    },
    event::Event,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a date-range [`Booking`] under a subscription
/// [`Contract`].
///
/// A confirmed [`Booking`] occupies its [`Resource`] like a full-day
/// reservation on every covered date. The picked [`Resource`] and the
/// [`Contract`] are re-validated under locks before the [`Booking`] lands,
/// so concurrent requests cannot oversell any covered date.
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// ID of the [`Contract`] to book under.
    pub contract_id: contract::Id,

    /// First date to book, inclusive.
    pub starts_on: booking::StartDate,

    /// Last date to book, inclusive.
    pub ends_on: booking::EndDate,

    /// Exact [`Resource`] to book, if any.
    ///
    /// [`None`] lets the availability resolution pick one matching the
    /// [`Contract`]'s [`Binding`].
    pub resource_id: Option<resource::Id>,

    /// [`Session`] of the customer (or an operator acting for one) making
    /// the [`Booking`].
    pub session: Session,
}

impl<Db> Command<CreateBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
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
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    #[expect(clippy::too_many_lines, reason = "still readable")]
    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            contract_id,
            starts_on,
            ends_on,
            resource_id,
            session,
        } = cmd;

        if starts_on.coerce::<()>() > ends_on.coerce() {
            return Err(tracerr::new!(E::InvalidPeriod { starts_on, ends_on }));
        }

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
        if !matches!(contract, Contract::Subscription(_)) {
            return Err(tracerr::new!(E::NotASubscription(contract_id)));
        }
        if !contract.is_active_on(starts_on.coerce())
            || !contract.is_active_on(ends_on.coerce())
        {
            return Err(tracerr::new!(E::OutOfContractWindow {
                id: contract_id,
                starts_on,
                ends_on,
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
                Window {
                    target,
                    starts_on: starts_on.coerce(),
                    ends_on: ends_on.coerce(),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let chosen = match availability::resolve_range(
            starts_on.coerce(),
            ends_on.coerce(),
            candidates,
        ) {
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
                Window {
                    target: Target::Resource(chosen),
                    starts_on: starts_on.coerce(),
                    ends_on: ends_on.coerce(),
                },
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
        if !contract.is_active_on(starts_on.coerce())
            || !contract.is_active_on(ends_on.coerce())
        {
            return Err(tracerr::new!(E::OutOfContractWindow {
                id: contract_id,
                starts_on,
                ends_on,
            }));
        }
        let Contract::Subscription(subscription) = contract else {
            return Err(tracerr::new!(E::NotASubscription(contract_id)));
        };

        if let Some(refusal) =
            candidate.refusal_for_range(starts_on.coerce(), ends_on.coerce())
        {
            return Err(tracerr::new!(E::Unavailable(refusal)));
        }

        let booking = Booking {
            id: booking::Id::new(),
            resource_id: candidate.resource.id,
            contract_id,
            customer_id: subscription.customer_id,
            starts_on,
            ends_on,
            status: booking::Status::Confirmed,
            is_archived: false,
            created_at: DateTime::now().coerce(),
            cancelled_at: None,
        };

        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.events().publish(Event::Booking {
            id: booking.id,
            resource_id: candidate.resource.id,
            location_id: candidate.resource.location_id,
            starts_on: booking.starts_on,
            ends_on: booking.ends_on,
            status: booking.status,
        });

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
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

    /// Provided period is reversed.
    #[display(
        "period starting on {} cannot end on {}",
        starts_on.to_iso8601(),
        ends_on.to_iso8601()
    )]
    InvalidPeriod {
        /// First date of the period.
        starts_on: booking::StartDate,

        /// Last date of the period.
        ends_on: booking::EndDate,
    },

    /// No [`Resource`]s match the request at all.
    #[display("no resources match the request")]
    NoResources,

    /// [`Contract`] is not a subscription.
    #[display("`Contract(id: {_0})` is not a subscription")]
    NotASubscription(#[error(not(source))] contract::Id),

    /// Requested period lies outside the [`Contract`]'s validity period.
    #[display(
        "{} to {} lies outside `Contract(id: {id})` validity period",
        starts_on.to_iso8601(),
        ends_on.to_iso8601()
    )]
    OutOfContractWindow {
        /// ID of the [`Contract`].
        id: contract::Id,

        /// First requested date.
        starts_on: booking::StartDate,

        /// Last requested date.
        ends_on: booking::EndDate,
    },

    /// [`Resource`] is not covered by the [`Contract`]'s [`Binding`].
    #[display("`Resource(id: {_0})` is not covered by the contract")]
    ResourceNotCovered(#[error(not(source))] resource::Id),

    /// [`Resource`] with the provided ID does not exist.
    #[display("`Resource(id: {_0})` does not exist")]
    ResourceNotExists(#[error(not(source))] resource::Id),

    /// No [`Resource`] can take the request.
    #[display("cannot be booked: {_0}")]
    Unavailable(#[error(not(source))] Refusal),
}
