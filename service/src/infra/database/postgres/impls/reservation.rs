//! [`Reservation`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{
        reservation::{self, Span},
        Reservation,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<reservation::Id, Reservation>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[reservation::Id]>,
{
    type Ok = HashMap<reservation::Id, Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<reservation::Id, Reservation>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[reservation::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, resource_id, contract_id, customer_id, \
                   date, duration, slot, entries, \
                   status, is_archived, \
                   created_at, cancelled_at \
            FROM package_reservations \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Reservation {
                        id,
                        resource_id: row.get("resource_id"),
                        contract_id: row.get("contract_id"),
                        customer_id: row.get("customer_id"),
                        date: row.get("date"),
                        span: Span::new(row.get("duration"), row.get("slot"))
                            .expect("`duration` and `slot` agree"),
                        entries: row.get("entries"),
                        status: row.get("status"),
                        is_archived: row.get("is_archived"),
                        created_at: row.get("created_at"),
                        cancelled_at: row.get("cancelled_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Reservation>, reservation::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<reservation::Id, Reservation>, [reservation::Id; 1]>>,
        Ok = HashMap<reservation::Id, Reservation>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Reservation>, reservation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Reservation>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Reservation>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(reservation): Insert<Reservation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(reservation))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Reservation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(reservation): Update<Reservation>,
    ) -> Result<Self::Ok, Self::Err> {
        let Reservation {
            id,
            resource_id,
            contract_id,
            customer_id,
            date,
            span,
            entries,
            status,
            is_archived,
            created_at,
            cancelled_at,
        } = reservation;

        let duration = span.duration();
        let slot = span.slot();

        const SQL: &str = "\
            INSERT INTO package_reservations (\
                id, resource_id, contract_id, customer_id, \
                date, duration, slot, entries, \
                status, is_archived, \
                created_at, cancelled_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::DATE, $6::INT2, $7::INT2, $8::NUMERIC, \
                $9::INT2, $10::BOOLEAN, \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET resource_id = EXCLUDED.resource_id, \
                contract_id = EXCLUDED.contract_id, \
                customer_id = EXCLUDED.customer_id, \
                date = EXCLUDED.date, \
                duration = EXCLUDED.duration, \
                slot = EXCLUDED.slot, \
                entries = EXCLUDED.entries, \
                status = EXCLUDED.status, \
                is_archived = EXCLUDED.is_archived, \
                created_at = EXCLUDED.created_at, \
                cancelled_at = EXCLUDED.cancelled_at";
        self.exec(
            SQL,
            &[
                &id,
                &resource_id,
                &contract_id,
                &customer_id,
                &date,
                &duration,
                &slot,
                &entries,
                &status,
                &is_archived,
                &created_at,
                &cancelled_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<
        Select<
            By<
                read::reservation::list::Page,
                read::reservation::list::Selector,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::reservation::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::reservation::list::Page,
                read::reservation::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::reservation::list::Selector {
            arguments,
            filter:
                read::reservation::list::Filter {
                    customer,
                    resource,
                    contract,
                    dates,
                    status,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let customer_idx = customer.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let resource_idx = resource.as_ref().map(|r| {
            ps.push(r);
            ps.len()
        });
        let contract_idx = contract.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let dates_idx = dates.as_ref().map(|range| {
            ps.push(range.start());
            let from = ps.len();
            ps.push(range.end());
            (from, ps.len())
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM package_reservations \
             WHERE true \
                   {cursor} \
                   {customer_filtering} \
                   {resource_filtering} \
                   {contract_filtering} \
                   {dates_filtering} \
                   {status_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            resource_filtering =
                resource_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND resource_id = ${idx}::UUID"))
                }),
            contract_filtering =
                contract_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND contract_id = ${idx}::UUID"))
                }),
            dates_filtering =
                dates_idx.into_iter().format_with("", |(from, to), f| {
                    f(&format_args!(
                        "AND date >= ${from}::DATE AND date <= ${to}::DATE"
                    ))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                })
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::reservation::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<
            By<
                read::reservation::list::TotalCount,
                read::reservation::list::Filter,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::reservation::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::reservation::list::TotalCount,
                read::reservation::list::Filter,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::reservation::list::Filter {
            customer,
            resource,
            contract,
            dates,
            status,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let customer_idx = customer.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let resource_idx = resource.as_ref().map(|r| {
            ps.push(r);
            ps.len()
        });
        let contract_idx = contract.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let dates_idx = dates.as_ref().map(|range| {
            ps.push(range.start());
            let from = ps.len();
            ps.push(range.end());
            (from, ps.len())
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT COUNT(*)::INT4 \
             FROM package_reservations \
             WHERE true \
                   {customer_filtering} \
                   {resource_filtering} \
                   {contract_filtering} \
                   {dates_filtering} \
                   {status_filtering}",
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            resource_filtering =
                resource_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND resource_id = ${idx}::UUID"))
                }),
            contract_filtering =
                contract_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND contract_id = ${idx}::UUID"))
                }),
            dates_filtering =
                dates_idx.into_iter().format_with("", |(from, to), f| {
                    f(&format_args!(
                        "AND date >= ${from}::DATE AND date <= ${to}::DATE"
                    ))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                })
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
