//! [`OperatingSchedule`]-related [`Database`] implementations.

use common::operations::{By, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{resource, OperatingSchedule},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Vec<OperatingSchedule>, resource::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<OperatingSchedule>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<OperatingSchedule>, resource::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let resource_id: resource::Id = by.into_inner();

        const SQL: &str = "\
            SELECT resource_id, weekday, is_closed \
            FROM resource_operating_schedules \
            WHERE resource_id = $1::UUID \
            ORDER BY weekday ASC";
        Ok(self
            .query(SQL, &[&resource_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| OperatingSchedule {
                resource_id: row.get("resource_id"),
                weekday: row.get("weekday"),
                is_closed: row.get("is_closed"),
            })
            .collect())
    }
}

impl<C> Database<Update<OperatingSchedule>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rule): Update<OperatingSchedule>,
    ) -> Result<Self::Ok, Self::Err> {
        let OperatingSchedule {
            resource_id,
            weekday,
            is_closed,
        } = rule;

        const SQL: &str = "\
            INSERT INTO resource_operating_schedules (\
                resource_id, weekday, is_closed\
            ) \
            VALUES ($1::UUID, $2::INT2, $3::BOOLEAN) \
            ON CONFLICT (resource_id, weekday) DO UPDATE \
            SET is_closed = EXCLUDED.is_closed";
        self.exec(SQL, &[&resource_id, &weekday, &is_closed])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
