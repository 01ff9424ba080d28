//! [`Command`] for removing a [`Closure`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        closure,
        customer::{self, Role, Session},
        Closure,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a previously registered [`Closure`].
///
/// The [`Closure`] is deleted for good, so the covered dates become
/// reservable again right away.
#[derive(Clone, Debug)]
pub struct RemoveClosure {
    /// ID of the [`Closure`] to remove.
    pub id: closure::Id,

    /// [`Session`] of the operator removing the [`Closure`].
    pub initiator: Session,
}

impl<Db> Command<RemoveClosure> for Service<Db>
where
    Db: Database<
            Select<By<Option<Closure>, closure::Id>>,
            Ok = Option<Closure>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Closure, closure::Id>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Closure;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RemoveClosure) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RemoveClosure { id, initiator } = cmd;

        if initiator.role != Role::Operator {
            return Err(tracerr::new!(E::NotAnOperator(initiator.customer_id)));
        }

        let closure = self
            .database()
            .execute(Select(By::<Option<Closure>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClosureNotExists(id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Delete(By::<Closure, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(closure)
    }
}

/// Error of [`RemoveClosure`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Closure`] with the provided ID does not exist.
    #[display("`Closure(id: {_0})` does not exist")]
    ClosureNotExists(#[error(not(source))] closure::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Initiator is not an operator.
    #[display("`Customer(id: {_0})` is not an operator")]
    NotAnOperator(#[error(not(source))] customer::Id),
}
