//! [`Command`] for creating a [`Contract`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Entries, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contract::{self, Binding, EntryPackage, Subscription},
        customer::{self, Role, Session},
        location, resource, Contract, Location, Resource,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`].
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the customer the [`Contract`] is sold to.
    pub customer_id: customer::Id,

    /// [`Binding`] of the [`Contract`] to create.
    pub binding: Binding,

    /// First date the [`Contract`] is valid on, inclusive.
    pub starts_on: contract::StartDate,

    /// Last date the [`Contract`] is valid on, inclusive.
    pub ends_on: contract::EndDate,

    /// [`Terms`] of the [`Contract`] to create.
    pub terms: Terms,

    /// Price the [`Contract`] is sold for.
    pub price: Money,

    /// [`Session`] of the operator creating the [`Contract`].
    pub initiator: Session,
}

/// Terms distinguishing the [`Contract`] kinds.
#[derive(Clone, Copy, Debug)]
pub enum Terms {
    /// [`EntryPackage`] [`Contract`] terms.
    EntryPackage {
        /// Total [`Entries`] the package grants.
        max_entries: Entries,
    },

    /// [`Subscription`] [`Contract`] terms.
    Subscription,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<
            Select<By<Option<Location>, location::Id>>,
            Ok = Option<Location>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Resource>, resource::Id>>,
            Ok = Option<Resource>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            customer_id,
            binding,
            starts_on,
            ends_on,
            terms,
            price,
            initiator,
        } = cmd;

        if initiator.role != Role::Operator {
            return Err(tracerr::new!(E::NotAnOperator(initiator.customer_id)));
        }

        if starts_on.coerce::<()>() > ends_on.coerce() {
            return Err(tracerr::new!(E::InvalidPeriod { starts_on, ends_on }));
        }

        match &binding {
            Binding::Resource(id) => {
                let resource = self
                    .database()
                    .execute(Select(By::<Option<Resource>, _>::new(*id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::ResourceNotExists(*id))
                    .map_err(tracerr::wrap!())?;
                if resource.retired_at.is_some() {
                    return Err(tracerr::new!(E::ResourceRetired(*id)));
                }
            }
            Binding::Category { location, .. } => {
                self.database()
                    .execute(Select(By::<Option<Location>, _>::new(*location)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::LocationNotExists(*location))
                    .map_err(tracerr::wrap!())
                    .map(drop)?;
            }
        }

        let created_at = DateTime::now().coerce();
        let contract = match terms {
            Terms::EntryPackage { max_entries } => {
                Contract::from(EntryPackage {
                    id: contract::Id::new(),
                    customer_id,
                    binding,
                    starts_on,
                    ends_on,
                    max_entries,
                    entries_used: Entries::ZERO,
                    price,
                    created_at,
                    terminated_at: None,
                })
            }
            Terms::Subscription => Contract::from(Subscription {
                id: contract::Id::new(),
                customer_id,
                binding,
                starts_on,
                ends_on,
                price,
                created_at,
                terminated_at: None,
            }),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided validity period is reversed.
    #[display(
        "period starting on {} cannot end on {}",
        starts_on.to_iso8601(),
        ends_on.to_iso8601()
    )]
    InvalidPeriod {
        /// First date of the period.
        starts_on: contract::StartDate,

        /// Last date of the period.
        ends_on: contract::EndDate,
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

    /// [`Resource`] with the provided ID is retired.
    #[display("`Resource(id: {_0})` is retired")]
    ResourceRetired(#[error(not(source))] resource::Id),
}
