//! [`Resource`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{location, resource, Resource},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<resource::Id, Resource>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[resource::Id]>,
{
    type Ok = HashMap<resource::Id, Resource>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<resource::Id, Resource>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[resource::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, location_id, \
                   name, category, capacity, \
                   is_available, \
                   created_at, retired_at \
            FROM location_resources \
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
                    Resource {
                        id,
                        location_id: row.get("location_id"),
                        name: row.get("name"),
                        category: row.get("category"),
                        capacity: row.get("capacity"),
                        is_available: row.get("is_available"),
                        created_at: row.get("created_at"),
                        retired_at: row.get("retired_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Resource>, resource::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<resource::Id, Resource>, [resource::Id; 1]>>,
        Ok = HashMap<resource::Id, Resource>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Resource>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Resource>, resource::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'n, C>
    Database<
        Select<By<Option<Resource>, (location::Id, &'n resource::Name)>>,
    > for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Resource>, resource::Id>>,
        Ok = Option<Resource>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Resource>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<Resource>, (location::Id, &'n resource::Name)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (location_id, name) = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM location_resources \
            WHERE location_id = $1::UUID \
              AND name = $2::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&location_id, &name])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Resource>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Resource>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(resource): Insert<Resource>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(resource))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Resource>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(resource): Update<Resource>,
    ) -> Result<Self::Ok, Self::Err> {
        let Resource {
            id,
            location_id,
            name,
            category,
            capacity,
            is_available,
            created_at,
            retired_at,
        } = resource;

        const SQL: &str = "\
            INSERT INTO location_resources (\
                id, location_id, \
                name, category, capacity, \
                is_available, \
                created_at, retired_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::INT4, \
                $6::BOOLEAN, \
                $7::TIMESTAMPTZ, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET location_id = EXCLUDED.location_id, \
                name = EXCLUDED.name, \
                category = EXCLUDED.category, \
                capacity = EXCLUDED.capacity, \
                is_available = EXCLUDED.is_available, \
                created_at = EXCLUDED.created_at, \
                retired_at = EXCLUDED.retired_at";
        self.exec(
            SQL,
            &[
                &id,
                &location_id,
                &name,
                &category,
                &capacity,
                &is_available,
                &created_at,
                &retired_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Resource, resource::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Resource, resource::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: resource::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO location_resources_lock \
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
        Select<By<read::resource::list::Page, read::resource::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::resource::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::resource::list::Page, read::resource::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::resource::list::Selector {
            arguments,
            filter:
                read::resource::list::Filter {
                    location,
                    category,
                    name,
                    bookable,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let location_idx = location.as_ref().map(|l| {
            ps.push(l);
            ps.len()
        });
        let category_idx = category.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let name_idx = name.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let name_pattern = name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let name_pattern_idx = name_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM location_resources \
             WHERE true \
                   {cursor} \
                   {location_filtering} \
                   {category_filtering} \
                   {name_filtering} \
                   {bookable_filtering} \
             ORDER BY {name_ordering} \
                      id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            location_filtering =
                location_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND location_id = ${idx}::UUID"))
                }),
            category_filtering =
                category_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND category = ${idx}::VARCHAR"))
                }),
            name_filtering =
                name_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            bookable_filtering = bookable
                .map(|b| if b {
                    "AND is_available AND retired_at IS NULL"
                } else {
                    "AND NOT (is_available AND retired_at IS NULL)"
                })
                .unwrap_or_default(),
            name_ordering = name_idx.into_iter().format_with("", |idx, f| {
                let order = arguments.kind().order().sql();
                f(&format_args!(
                    "LEVENSHTEIN(name, ${idx}::VARCHAR, 1, 1, 0) {order},"
                ))
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

        Ok(read::resource::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::resource::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::resource::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::resource::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM location_resources";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Delete<By<Resource, resource::RetirementDateTime>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Resource, resource::RetirementDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline: resource::RetirementDateTime = by.into_inner();

        const SQL: &str = "\
            DELETE FROM location_resources \
            WHERE retired_at IS NOT NULL \
              AND retired_at < $1 \
              AND (SELECT COUNT(*) \
                   FROM package_reservations \
                   WHERE resource_id = location_resources.id) = 0 \
              AND (SELECT COUNT(*) \
                   FROM bookings \
                   WHERE resource_id = location_resources.id) = 0 \
              AND (SELECT COUNT(*) \
                   FROM contracts \
                   WHERE resource_id = location_resources.id) = 0";
        self.exec(SQL, &[&deadline])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
