//! [`availability::Candidate`] snapshot [`Database`] implementations.

use common::operations::{By, Select};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{
        availability::{self, Entry, Target},
        booking,
        closure::{Scope, ScopeKind},
        reservation::{self, Span},
        resource,
        Closure, OperatingSchedule, Resource,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C>
    Database<Select<By<Vec<availability::Candidate>, availability::Window>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<availability::Candidate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<availability::Candidate>, availability::Window>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let availability::Window { target, starts_on, ends_on } =
            by.into_inner();

        let resources = match target {
            Target::Resource(id) => {
                const SQL: &str = "\
                    SELECT id, location_id, name, category, capacity, \
                           is_available, created_at, retired_at \
                    FROM location_resources \
                    WHERE id = $1::UUID \
                      AND is_available \
                      AND retired_at IS NULL \
                    LIMIT 1";
                self.query(SQL, &[&id]).await.map_err(tracerr::wrap!())?
            }
            Target::Category { category, location } => {
                const SQL: &str = "\
                    SELECT id, location_id, name, category, capacity, \
                           is_available, created_at, retired_at \
                    FROM location_resources \
                    WHERE location_id = $1::UUID \
                      AND category = $2::VARCHAR \
                      AND is_available \
                      AND retired_at IS NULL \
                    ORDER BY name ASC";
                self.query(SQL, &[&location, &category])
                    .await
                    .map_err(tracerr::wrap!())?
            }
        }
        .into_iter()
        .map(|row| Resource {
            id: row.get("id"),
            location_id: row.get("location_id"),
            name: row.get("name"),
            category: row.get("category"),
            capacity: row.get("capacity"),
            is_available: row.get("is_available"),
            created_at: row.get("created_at"),
            retired_at: row.get("retired_at"),
        })
        .collect::<Vec<_>>();
        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let ids = resources.iter().map(|r| r.id).collect::<Vec<_>>();
        let ids_limit = i32::try_from(ids.len()).unwrap();
        let location_ids = resources
            .iter()
            .map(|r| r.location_id)
            .unique()
            .collect::<Vec<_>>();
        let locations_limit = i32::try_from(location_ids.len()).unwrap();

        const CLOSURES_SQL: &str = "\
            SELECT id, fingerprint, scope_kind, scope_id, \
                   starts_on, ends_on, reason, created_at \
            FROM operating_closures \
            WHERE starts_on <= $2::DATE \
              AND ends_on >= $1::DATE \
              AND ((scope_kind = $3::INT2 \
                    AND scope_id IN \
                        (SELECT unnest($4::UUID[]) LIMIT $5::INT4)) \
                OR (scope_kind = $6::INT2 \
                    AND scope_id IN \
                        (SELECT unnest($7::UUID[]) LIMIT $8::INT4)))";
        let closures = self
            .query(
                CLOSURES_SQL,
                &[
                    &starts_on,
                    &ends_on,
                    &ScopeKind::Location,
                    &location_ids,
                    &locations_limit,
                    &ScopeKind::Resource,
                    &ids,
                    &ids_limit,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Closure {
                id: row.get("id"),
                fingerprint: row.get("fingerprint"),
                scope: match row.get("scope_kind") {
                    ScopeKind::Location => {
                        Scope::Location(row.get("scope_id"))
                    }
                    ScopeKind::Resource => {
                        Scope::Resource(row.get("scope_id"))
                    }
                },
                starts_on: row.get("starts_on"),
                ends_on: row.get("ends_on"),
                reason: row.get("reason"),
                created_at: row.get("created_at"),
            })
            .collect::<Vec<_>>();

        const SCHEDULES_SQL: &str = "\
            SELECT resource_id, weekday, is_closed \
            FROM resource_operating_schedules \
            WHERE resource_id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4)";
        let mut schedules = self
            .query(SCHEDULES_SQL, &[&ids, &ids_limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let schedule = OperatingSchedule {
                    resource_id: row.get("resource_id"),
                    weekday: row.get("weekday"),
                    is_closed: row.get("is_closed"),
                };
                (schedule.resource_id, schedule)
            })
            .into_group_map();

        const RESERVATIONS_SQL: &str = "\
            SELECT resource_id, date, duration, slot \
            FROM package_reservations \
            WHERE resource_id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
              AND status = $3::INT2 \
              AND NOT is_archived \
              AND date >= $4::DATE \
              AND date <= $5::DATE";
        let reserved = self
            .query(
                RESERVATIONS_SQL,
                &[
                    &ids,
                    &ids_limit,
                    &reservation::Status::Confirmed,
                    &starts_on,
                    &ends_on,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let date = row.get("date");
                (
                    row.get::<_, resource::Id>("resource_id"),
                    Entry {
                        span: Span::new(row.get("duration"), row.get("slot"))
                            .expect("`duration` and `slot` agree"),
                        starts_on: date,
                        ends_on: date,
                    },
                )
            });

        const BOOKINGS_SQL: &str = "\
            SELECT resource_id, starts_on, ends_on \
            FROM bookings \
            WHERE resource_id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
              AND status = $3::INT2 \
              AND NOT is_archived \
              AND starts_on <= $5::DATE \
              AND ends_on >= $4::DATE";
        let booked = self
            .query(
                BOOKINGS_SQL,
                &[
                    &ids,
                    &ids_limit,
                    &booking::Status::Confirmed,
                    &starts_on,
                    &ends_on,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                (
                    row.get("resource_id"),
                    Entry {
                        span: Span::FullDay,
                        starts_on: row.get("starts_on"),
                        ends_on: row.get("ends_on"),
                    },
                )
            });
        let mut entries = reserved.chain(booked).into_group_map();

        Ok(resources
            .into_iter()
            .map(|resource| availability::Candidate {
                closures: closures
                    .iter()
                    .filter(|c| c.applies_to(&resource))
                    .cloned()
                    .collect(),
                schedule: schedules
                    .remove(&resource.id)
                    .unwrap_or_default(),
                entries: entries.remove(&resource.id).unwrap_or_default(),
                resource,
            })
            .collect())
    }
}
