//! [`Command`] for retiring a [`Resource`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        customer::{self, Role, Session},
        resource, Resource,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for retiring a [`Resource`].
///
/// Retiring clears the availability flag and stamps the retirement time, so
/// the [`Resource`] takes no further requests while its reservation history
/// stays intact.
#[derive(Clone, Debug)]
pub struct RetireResource {
    /// ID of the [`Resource`] to retire.
    pub id: resource::Id,

    /// [`Session`] of the operator retiring the [`Resource`].
    pub initiator: Session,
}

impl<Db> Command<RetireResource> for Service<Db>
where
    Db: Database<
            Select<By<Option<Resource>, resource::Id>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Resource, resource::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Resource>, resource::Id>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<Update<Resource>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Resource;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RetireResource,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RetireResource { id, initiator } = cmd;

        if initiator.role != Role::Operator {
            return Err(tracerr::new!(E::NotAnOperator(initiator.customer_id)));
        }

        self.database()
            .execute(Select(By::<Option<Resource>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ResourceNotExists(id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Resource`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut resource = tx
            .execute(Select(By::<Option<Resource>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ResourceNotExists(id))
            .map_err(tracerr::wrap!())?;

        if resource.retired_at.is_some() {
            return Err(tracerr::new!(E::ResourceAlreadyRetired(id)));
        }

        resource.retire(DateTime::now().coerce());

        tx.execute(Update(resource.clone()))
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

/// Error of [`RetireResource`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Initiator is not an operator.
    #[display("`Customer(id: {_0})` is not an operator")]
    NotAnOperator(#[error(not(source))] customer::Id),

    /// [`Resource`] is already retired.
    #[display("`Resource(id: {_0})` is already retired")]
    ResourceAlreadyRetired(#[error(not(source))] resource::Id),

    /// [`Resource`] with the provided ID does not exist.
    #[display("`Resource(id: {_0})` does not exist")]
    ResourceNotExists(#[error(not(source))] resource::Id),
}
