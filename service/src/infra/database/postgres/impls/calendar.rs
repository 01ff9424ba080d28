use common::{
    operations::{By, Select},
    Date,
};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{
        booking,
        closure::{Scope, ScopeKind},
        reservation::{self, Span},
        resource,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::calendar,
};

impl<C> Database<Select<By<Option<calendar::Timeline>, calendar::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<calendar::Timeline>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<calendar::Timeline>, calendar::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let calendar::Selector { location, starts_on, ends_on } =
            by.into_inner();

        const LOCATION_SQL: &str = "\
            SELECT id \
            FROM locations \
            WHERE id = $1::UUID \
            LIMIT 1";
        if self
            .query_opt(LOCATION_SQL, &[&location])
            .await
            .map_err(tracerr::wrap!())?
            .is_none()
        {
            return Ok(None);
        }

        const RESOURCES_SQL: &str = "\
            SELECT id, name, category \
            FROM location_resources \
            WHERE location_id = $1::UUID \
              AND retired_at IS NULL \
            ORDER BY name ASC";
        let resources = self
            .query(RESOURCES_SQL, &[&location])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                (
                    row.get::<_, resource::Id>("id"),
                    row.get::<_, resource::Name>("name"),
                    row.get::<_, resource::Category>("category"),
                )
            })
            .collect::<Vec<_>>();
        if resources.is_empty() {
            return Ok(Some(calendar::Timeline {
                location_id: location,
                starts_on,
                ends_on,
                lanes: Vec::new(),
            }));
        }

        let ids = resources.iter().map(|(id, ..)| *id).collect::<Vec<_>>();
        let ids_limit = i32::try_from(ids.len()).unwrap();

        const RESERVATIONS_SQL: &str = "\
            SELECT id, resource_id, customer_id, date, duration, slot \
            FROM package_reservations \
            WHERE resource_id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
              AND status = $3::INT2 \
              AND NOT is_archived \
              AND date >= $4::DATE \
              AND date <= $5::DATE \
            ORDER BY date ASC";
        let reservations = self
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
                (
                    row.get::<_, resource::Id>("resource_id"),
                    calendar::Entry::Reservation {
                        id: row.get("id"),
                        customer_id: row.get("customer_id"),
                        date: row.get("date"),
                        span: Span::new(row.get("duration"), row.get("slot"))
                            .expect("`duration` and `slot` agree"),
                    },
                )
            });

        const BOOKINGS_SQL: &str = "\
            SELECT id, resource_id, customer_id, starts_on, ends_on \
            FROM bookings \
            WHERE resource_id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
              AND status = $3::INT2 \
              AND NOT is_archived \
              AND starts_on <= $5::DATE \
              AND ends_on >= $4::DATE \
            ORDER BY starts_on ASC";
        let bookings = self
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
                    row.get::<_, resource::Id>("resource_id"),
                    calendar::Entry::Booking {
                        id: row.get("id"),
                        customer_id: row.get("customer_id"),
                        starts_on: row
                            .get::<_, Date>("starts_on")
                            .max(starts_on),
                        ends_on: row.get::<_, Date>("ends_on").min(ends_on),
                    },
                )
            });
        let mut entries = reservations.chain(bookings).into_group_map();

        const CLOSURES_SQL: &str = "\
            SELECT id, scope_kind, scope_id, starts_on, ends_on, reason \
            FROM operating_closures \
            WHERE starts_on <= $2::DATE \
              AND ends_on >= $1::DATE \
              AND ((scope_kind = $3::INT2 AND scope_id = $4::UUID) \
                OR (scope_kind = $5::INT2 \
                    AND scope_id IN \
                        (SELECT unnest($6::UUID[]) LIMIT $7::INT4))) \
            ORDER BY starts_on ASC";
        let closures = self
            .query(
                CLOSURES_SQL,
                &[
                    &starts_on,
                    &ends_on,
                    &ScopeKind::Location,
                    &location,
                    &ScopeKind::Resource,
                    &ids,
                    &ids_limit,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let scope = match row.get("scope_kind") {
                    ScopeKind::Location => {
                        Scope::Location(row.get("scope_id"))
                    }
                    ScopeKind::Resource => {
                        Scope::Resource(row.get("scope_id"))
                    }
                };
                (
                    scope,
                    calendar::Entry::Closure {
                        id: row.get("id"),
                        starts_on: row
                            .get::<_, Date>("starts_on")
                            .max(starts_on),
                        ends_on: row.get::<_, Date>("ends_on").min(ends_on),
                        reason: row.get("reason"),
                    },
                )
            })
            .collect::<Vec<_>>();

        let lanes = resources
            .into_iter()
            .map(|(id, name, category)| {
                let mut lane = entries.remove(&id).unwrap_or_default();
                lane.extend(closures.iter().filter_map(|(scope, entry)| {
                    match scope {
                        Scope::Location(_) => Some(entry.clone()),
                        Scope::Resource(rid) => {
                            (*rid == id).then(|| entry.clone())
                        }
                    }
                }));
                calendar::Lane {
                    resource_id: id,
                    name,
                    category,
                    entries: lane,
                }
            })
            .collect();

        Ok(Some(calendar::Timeline {
            location_id: location,
            starts_on,
            ends_on,
            lanes,
        }))
    }
}
