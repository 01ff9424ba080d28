//! [`Command`] for creating a new [`Resource`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        customer::{self, Role, Session},
        location, resource, Location, Resource,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Resource`] at a [`Location`].
#[derive(Clone, Debug)]
pub struct CreateResource {
    /// ID of the [`Location`] to host a new [`Resource`] at.
    pub location_id: location::Id,

    /// [`resource::Name`] of a new [`Resource`].
    pub name: resource::Name,

    /// [`resource::Category`] of a new [`Resource`].
    pub category: resource::Category,

    /// [`resource::Capacity`] of a new [`Resource`].
    pub capacity: resource::Capacity,

    /// [`Session`] of the operator creating the [`Resource`].
    pub initiator: Session,
}

impl<Db> Command<CreateResource> for Service<Db>
where
    Db: Database<
            Select<By<Option<Location>, location::Id>>,
            Ok = Option<Location>,
            Err = Traced<database::Error>,
        > + for<'n> Database<
            Select<By<Option<Resource>, (location::Id, &'n resource::Name)>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Resource>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Resource;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateResource,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateResource {
            location_id,
            name,
            category,
            capacity,
            initiator,
        } = cmd;

        if initiator.role != Role::Operator {
            return Err(tracerr::new!(E::NotAnOperator(initiator.customer_id)));
        }

        self.database()
            .execute(Select(By::<Option<Location>, _>::new(location_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LocationNotExists(location_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let existing = self
            .database()
            .execute(Select(By::<Option<Resource>, _>::new((
                location_id,
                &name,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::NameOccupied(name)));
        }

        let resource = Resource {
            id: resource::Id::new(),
            location_id,
            name,
            category,
            capacity,
            is_available: true,
            created_at: DateTime::now().coerce(),
            retired_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(resource.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(resource)
    }
}

/// Error of [`CreateResource`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Location`] with the provided ID does not exist.
    #[display("`Location(id: {_0})` does not exist")]
    LocationNotExists(#[error(not(source))] location::Id),

    /// [`resource::Name`] is already occupied at the [`Location`].
    #[display("`{_0}` resource name is occupied at the location")]
    NameOccupied(#[error(not(source))] resource::Name),

    /// Initiator is not an operator.
    #[display("`Customer(id: {_0})` is not an operator")]
    NotAnOperator(#[error(not(source))] customer::Id),
}
