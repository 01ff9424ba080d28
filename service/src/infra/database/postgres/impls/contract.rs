//! [`Contract`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{
        contract::{self, Binding},
        Contract,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<contract::Id, Contract>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[contract::Id]>,
{
    type Ok = HashMap<contract::Id, Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<contract::Id, Contract>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[contract::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        #[expect(clippy::items_after_statements, reason = "more readable")]
        const SQL: &str = "\
            SELECT id, kind, customer_id, \
                   binding_kind, resource_id, category, location_id, \
                   starts_on, ends_on, \
                   max_entries, entries_used, \
                   price, price_currency, \
                   created_at, terminated_at \
            FROM contracts \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                let customer_id = row.get("customer_id");
                let binding = match row.get("binding_kind") {
                    contract::BindingKind::Resource => {
                        Binding::Resource(row.get("resource_id"))
                    }
                    contract::BindingKind::Category => Binding::Category {
                        category: row.get("category"),
                        location: row.get("location_id"),
                    },
                };
                let starts_on = row.get("starts_on");
                let ends_on = row.get("ends_on");
                let price = Money {
                    amount: row.get("price"),
                    currency: row.get("price_currency"),
                };
                let created_at = row.get("created_at");
                let terminated_at = row.get("terminated_at");
                let contract = match row.get("kind") {
                    contract::Kind::EntryPackage => contract::EntryPackage {
                        id,
                        customer_id,
                        binding,
                        starts_on,
                        ends_on,
                        max_entries: row.get("max_entries"),
                        entries_used: row.get("entries_used"),
                        price,
                        created_at,
                        terminated_at,
                    }
                    .into(),
                    contract::Kind::Subscription => contract::Subscription {
                        id,
                        customer_id,
                        binding,
                        starts_on,
                        ends_on,
                        price,
                        created_at,
                        terminated_at,
                    }
                    .into(),
                };
                (id, contract)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<contract::Id, Contract>, [contract::Id; 1]>>,
        Ok = HashMap<contract::Id, Contract>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = contract.id();
        let kind = contract.kind();
        let customer_id = contract.customer_id();
        let (binding_kind, resource_id, category, location_id) =
            match contract.binding() {
                Binding::Resource(id) => {
                    (contract::BindingKind::Resource, Some(*id), None, None)
                }
                Binding::Category { category, location } => (
                    contract::BindingKind::Category,
                    None,
                    Some(category.clone()),
                    Some(*location),
                ),
            };
        let starts_on = contract.starts_on();
        let ends_on = contract.ends_on();
        let (max_entries, entries_used) = match &contract {
            Contract::EntryPackage(c) => {
                (Some(c.max_entries), Some(c.entries_used))
            }
            Contract::Subscription(_) => (None, None),
        };
        let price = contract.price();
        let created_at = contract.created_at();
        let terminated_at = contract.terminated_at();

        const SQL: &str = "\
            INSERT INTO contracts (\
                id, kind, customer_id, \
                binding_kind, resource_id, category, location_id, \
                starts_on, ends_on, \
                max_entries, entries_used, \
                price, price_currency, \
                created_at, terminated_at\
            ) VALUES (\
                $1::UUID, $2::INT2, $3::UUID, \
                $4::INT2, $5::UUID, $6::VARCHAR, $7::UUID, \
                $8::DATE, $9::DATE, \
                $10::NUMERIC, $11::NUMERIC, \
                $12::NUMERIC, $13::INT2, \
                $14::TIMESTAMPTZ, $15::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET kind = EXCLUDED.kind, \
                customer_id = EXCLUDED.customer_id, \
                binding_kind = EXCLUDED.binding_kind, \
                resource_id = EXCLUDED.resource_id, \
                category = EXCLUDED.category, \
                location_id = EXCLUDED.location_id, \
                starts_on = EXCLUDED.starts_on, \
                ends_on = EXCLUDED.ends_on, \
                max_entries = EXCLUDED.max_entries, \
                entries_used = EXCLUDED.entries_used, \
                price = EXCLUDED.price, \
                price_currency = EXCLUDED.price_currency, \
                created_at = EXCLUDED.created_at, \
                terminated_at = EXCLUDED.terminated_at";
        self.exec(
            SQL,
            &[
                &id,
                &kind,
                &customer_id,
                &binding_kind,
                &resource_id,
                &category,
                &location_id,
                &starts_on,
                &ends_on,
                &max_entries,
                &entries_used,
                &price.amount,
                &price.currency,
                &created_at,
                &terminated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Contract, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO contracts_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::contract::list::Page, read::contract::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::contract::list::Page, read::contract::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::list::Selector {
            arguments,
            filter: read::contract::list::Filter { customer, kind },
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
        let kind_idx = kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });

        let sql = format!(
            "SELECT id, kind \
             FROM contracts \
             WHERE true \
                   {cursor} \
                   {customer_filtering} \
                   {kind_filtering} \
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
            kind_filtering = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND kind = ${idx}::INT2"))
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
                let kind = row.get("kind");
                (id, (id, kind))
            })
            .collect::<Vec<_>>();

        Ok(read::contract::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<
            By<read::contract::list::TotalCount, read::contract::list::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::contract::list::TotalCount, read::contract::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::list::Filter { customer, kind } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let customer_idx = customer.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let kind_idx = kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });

        let sql = format!(
            "SELECT COUNT(*)::INT4 \
             FROM contracts \
             WHERE true \
                   {customer_filtering} \
                   {kind_filtering}",
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            kind_filtering = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND kind = ${idx}::INT2"))
            })
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
