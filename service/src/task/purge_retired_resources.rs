//! [`PurgeRetiredResources`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{resource, Resource},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`PurgeRetiredResources`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between purge runs.
    pub interval: time::Duration,

    /// Timeout a retired [`Resource`] is kept around for before purging.
    pub timeout: time::Duration,
}

/// [`Task`] for purging long-retired [`Resource`]s nothing refers to
/// anymore.
#[derive(Clone, Copy, Debug)]
pub struct PurgeRetiredResources<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<PurgeRetiredResources<Self>, Config>>> for Service<Db>
where
    PurgeRetiredResources<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PurgeRetiredResources<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = PurgeRetiredResources {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::PurgeRetiredResources` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for PurgeRetiredResources<Service<Db>>
where
    Db: Database<
        Delete<By<Resource, resource::RetirementDateTime>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline =
            resource::RetirementDateTime::now() - self.config.timeout;
        self.service
            .database()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`PurgeRetiredResources`] execution.
pub type ExecutionError = Traced<database::Error>;
