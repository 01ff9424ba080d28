//! [`Command`] for registering a [`Closure`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        closure,
        customer::{self, Role, Session},
        location, resource, Closure, Location, Resource,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a [`Closure`] of a [`Location`] or a single
/// [`Resource`].
///
/// Registering an identical [`Closure`] twice is idempotent and returns the
/// previously registered one.
#[derive(Clone, Debug)]
pub struct CreateClosure {
    /// [`closure::Scope`] of the [`Closure`] to register.
    pub scope: closure::Scope,

    /// First closed date, inclusive.
    pub starts_on: closure::StartDate,

    /// Last closed date, inclusive.
    pub ends_on: closure::EndDate,

    /// [`closure::Reason`] of the [`Closure`] to register.
    pub reason: closure::Reason,

    /// [`Session`] of the operator registering the [`Closure`].
    pub initiator: Session,
}

impl<Db> Command<CreateClosure> for Service<Db>
where
    Db: Database<
            Select<By<Option<Closure>, closure::Fingerprint>>,
            Ok = Option<Closure>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Location>, location::Id>>,
            Ok = Option<Location>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Resource>, resource::Id>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Closure>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Closure>, closure::Fingerprint>>,
            Ok = Option<Closure>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Closure;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateClosure) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateClosure { scope, starts_on, ends_on, reason, initiator } =
            cmd;

        if initiator.role != Role::Operator {
            return Err(tracerr::new!(E::NotAnOperator(initiator.customer_id)));
        }

        if starts_on.coerce::<()>() > ends_on.coerce() {
            return Err(tracerr::new!(E::InvalidPeriod { starts_on, ends_on }));
        }

        match scope {
            closure::Scope::Location(id) => {
                self.database()
                    .execute(Select(By::<Option<Location>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::LocationNotExists(id))
                    .map_err(tracerr::wrap!())
                    .map(drop)?;
            }
            closure::Scope::Resource(id) => {
                self.database()
                    .execute(Select(By::<Option<Resource>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::ResourceNotExists(id))
                    .map_err(tracerr::wrap!())
                    .map(drop)?;
            }
        }

        let fingerprint =
            closure::Fingerprint::new(scope, starts_on, ends_on, &reason);

        if let Some(existing) = self
            .database()
            .execute(Select(By::<Option<Closure>, _>::new(fingerprint)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Ok(existing);
        }

        let closure = Closure {
            id: closure::Id::new(),
            fingerprint,
            scope,
            starts_on,
            ends_on,
            reason,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Insert(closure.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Under a concurrent identical registration the insert is a no-op,
        // so re-read the row that actually won.
        let closure = tx
            .execute(Select(By::<Option<Closure>, _>::new(fingerprint)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or(closure);

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(closure)
    }
}

/// Error of [`CreateClosure`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
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
        starts_on: closure::StartDate,

        /// Last date of the period.
        ends_on: closure::EndDate,
    },

    /// [`Location`] with the provided ID does not exist.
    #[display("`Location(id: {_0})` does not exist")]
    LocationNotExists(#[error(not(source))] location::Id),

    /// Initiator is not an operator.
    #[display("`Customer(id: {_0})` is not an operator")]
    NotAnOperator(#[error(not(source))] customer::Id),

    /// [`Resource`] with the provided ID does not exist.
    #[display("`Resource(id: {_0})` does not exist")]
    ResourceNotExists(#[error(not(source))] resource::Id),
}
