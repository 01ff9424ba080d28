//! [`Command`] for creating a new [`Location`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        customer::{self, Role, Session},
        location, Location,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Location`].
#[derive(Clone, Debug)]
pub struct CreateLocation {
    /// [`location::Name`] of a new [`Location`].
    pub name: location::Name,

    /// [`location::Address`] of a new [`Location`].
    pub address: location::Address,

    /// [`Session`] of the operator creating the [`Location`].
    pub initiator: Session,
}

impl<Db> Command<CreateLocation> for Service<Db>
where
    Db: for<'n> Database<
            Select<By<Option<Location>, &'n location::Name>>,
            Ok = Option<Location>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Location>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Location;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateLocation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateLocation {
            name,
            address,
            initiator,
        } = cmd;

        if initiator.role != Role::Operator {
            return Err(tracerr::new!(E::NotAnOperator(initiator.customer_id)));
        }

        let existing = self
            .database()
            .execute(Select(By::new(&name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::NameOccupied(name)));
        }

        let location = Location {
            id: location::Id::new(),
            name,
            address,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(location.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(location)
    }
}

/// Error of [`CreateLocation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`location::Name`] is already occupied.
    #[display("`{_0}` location name is occupied")]
    NameOccupied(#[error(not(source))] location::Name),

    /// Initiator is not an operator.
    #[display("`Customer(id: {_0})` is not an operator")]
    NotAnOperator(#[error(not(source))] customer::Id),
}
