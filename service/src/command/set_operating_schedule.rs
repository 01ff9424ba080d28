//! [`Command`] for setting an [`OperatingSchedule`] rule.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        customer::{self, Role, Session},
        resource, schedule, OperatingSchedule, Resource,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for setting a weekly [`OperatingSchedule`] rule of a
/// [`Resource`].
///
/// Overwrites the previous rule for the same ([`Resource`],
/// [`schedule::Weekday`]) pair, if any.
#[derive(Clone, Debug)]
pub struct SetOperatingSchedule {
    /// ID of the [`Resource`] to set the rule for.
    pub resource_id: resource::Id,

    /// [`schedule::Weekday`] the rule applies to.
    pub weekday: schedule::Weekday,

    /// Indicator whether the [`Resource`] is closed on the
    /// [`schedule::Weekday`].
    pub is_closed: bool,

    /// [`Session`] of the operator setting the rule.
    pub initiator: Session,
}

impl<Db> Command<SetOperatingSchedule> for Service<Db>
where
    Db: Database<
            Select<By<Option<Resource>, resource::Id>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<Update<OperatingSchedule>, Err = Traced<database::Error>>,
{
    type Ok = OperatingSchedule;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetOperatingSchedule,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetOperatingSchedule {
            resource_id,
            weekday,
            is_closed,
            initiator,
        } = cmd;

        if initiator.role != Role::Operator {
            return Err(tracerr::new!(E::NotAnOperator(initiator.customer_id)));
        }

        self.database()
            .execute(Select(By::<Option<Resource>, _>::new(resource_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ResourceNotExists(resource_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let rule = OperatingSchedule { resource_id, weekday, is_closed };

        self.database()
            .execute(Update(rule))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rule)
    }
}

/// Error of [`SetOperatingSchedule`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Initiator is not an operator.
    #[display("`Customer(id: {_0})` is not an operator")]
    NotAnOperator(#[error(not(source))] customer::Id),

    /// [`Resource`] with the provided ID does not exist.
    #[display("`Resource(id: {_0})` does not exist")]
    ResourceNotExists(#[error(not(source))] resource::Id),
}
