//! [`Booking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<booking::Id, Booking>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[booking::Id]>,
{
    type Ok = HashMap<booking::Id, Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<booking::Id, Booking>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[booking::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, resource_id, contract_id, customer_id, \
                   starts_on, ends_on, \
                   status, is_archived, \
                   created_at, cancelled_at \
            FROM bookings \
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
                    Booking {
                        id,
                        resource_id: row.get("resource_id"),
                        contract_id: row.get("contract_id"),
                        customer_id: row.get("customer_id"),
                        starts_on: row.get("starts_on"),
                        ends_on: row.get("ends_on"),
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

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<booking::Id, Booking>, [booking::Id; 1]>>,
        Ok = HashMap<booking::Id, Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            resource_id,
            contract_id,
            customer_id,
            starts_on,
            ends_on,
            status,
            is_archived,
            created_at,
            cancelled_at,
        } = booking;

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, resource_id, contract_id, customer_id, \
                starts_on, ends_on, \
                status, is_archived, \
                created_at, cancelled_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::DATE, $6::DATE, \
                $7::INT2, $8::BOOLEAN, \
                $9::TIMESTAMPTZ, $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET resource_id = EXCLUDED.resource_id, \
                contract_id = EXCLUDED.contract_id, \
                customer_id = EXCLUDED.customer_id, \
                starts_on = EXCLUDED.starts_on, \
                ends_on = EXCLUDED.ends_on, \
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
                &starts_on,
                &ends_on,
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
        Select<By<read::booking::list::Page, read::booking::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::Page, read::booking::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Selector {
            arguments,
            filter:
                read::booking::list::Filter {
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
             FROM bookings \
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
                        "AND starts_on <= ${to}::DATE \
                         AND ends_on >= ${from}::DATE"
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

        Ok(read::booking::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<
            By<read::booking::list::TotalCount, read::booking::list::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::TotalCount, read::booking::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Filter {
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
             FROM bookings \
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
                        "AND starts_on <= ${to}::DATE \
                         AND ends_on >= ${from}::DATE"
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
