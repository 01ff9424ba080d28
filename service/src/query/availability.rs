//! Availability resolution [`Query`]s.

use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Booking, Reservation, Resource};
use crate::{
    domain::{
        availability::{self, Decision, Window},
        reservation::Span,
    },
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] to resolve whether an [`availability::Target`] can take a
/// [`Reservation`] of the given [`Span`] on the given [`Date`].
///
/// Runs the same rules as the reserving itself, but without any locks, so an
/// available [`Decision`] is a hint rather than a hold.
#[derive(Clone, Debug)]
pub struct OnDate {
    /// [`availability::Target`] to resolve.
    pub target: availability::Target,

    /// [`Date`] to resolve on.
    pub date: Date,

    /// Requested [`Span`] of the day.
    pub span: Span,
}

impl<Db> Query<OnDate> for Service<Db>
where
    Db: Database<
        Select<By<Vec<availability::Candidate>, Window>>,
        Ok = Vec<availability::Candidate>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Decision;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        OnDate { target, date, span }: OnDate,
    ) -> Result<Self::Ok, Self::Err> {
        let candidates = self
            .database()
            .execute(Select(By::new(Window::on(target, date))))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(availability::resolve(date, span, candidates))
    }
}

/// [`Query`] to resolve whether an [`availability::Target`] can take a
/// [`Booking`] over the given inclusive range of [`Date`]s, the same way
/// [`OnDate`] does for a single one.
#[derive(Clone, Debug)]
pub struct OverRange {
    /// [`availability::Target`] to resolve.
    pub target: availability::Target,

    /// First [`Date`] of the range, inclusive.
    pub starts_on: Date,

    /// Last [`Date`] of the range, inclusive.
    pub ends_on: Date,
}

impl<Db> Query<OverRange> for Service<Db>
where
    Db: Database<
        Select<By<Vec<availability::Candidate>, Window>>,
        Ok = Vec<availability::Candidate>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Decision;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        OverRange { target, starts_on, ends_on }: OverRange,
    ) -> Result<Self::Ok, Self::Err> {
        let candidates = self
            .database()
            .execute(Select(By::new(Window {
                target,
                starts_on,
                ends_on,
            })))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(availability::resolve_range(starts_on, ends_on, candidates))
    }
}
