//! [`Closure`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{
        closure::{self, Scope, ScopeKind},
        Closure,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Closure>, closure::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Closure>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Closure>, closure::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: closure::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, fingerprint, \
                   scope_kind, scope_id, \
                   starts_on, ends_on, \
                   reason, created_at \
            FROM operating_closures \
            WHERE id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                row.map(|row| Closure {
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
            })
    }
}

impl<C> Database<Select<By<Option<Closure>, closure::Fingerprint>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Closure>, closure::Id>>,
        Ok = Option<Closure>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Closure>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Closure>, closure::Fingerprint>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let fingerprint: closure::Fingerprint = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM operating_closures \
            WHERE fingerprint = $1::UUID \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&fingerprint])
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

impl<C> Database<Insert<Closure>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(closure): Insert<Closure>,
    ) -> Result<Self::Ok, Self::Err> {
        let Closure {
            id,
            fingerprint,
            scope,
            starts_on,
            ends_on,
            reason,
            created_at,
        } = closure;

        let scope_kind = scope.kind();
        let scope_id = scope.id();

        // Registering an identical `Closure` twice is a no-op, keeping the
        // row that won the `fingerprint` uniqueness first.
        const SQL: &str = "\
            INSERT INTO operating_closures (\
                id, fingerprint, \
                scope_kind, scope_id, \
                starts_on, ends_on, \
                reason, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::INT2, $4::UUID, \
                $5::DATE, $6::DATE, \
                $7::VARCHAR, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (fingerprint) DO NOTHING";
        self.exec(
            SQL,
            &[
                &id,
                &fingerprint,
                &scope_kind,
                &scope_id,
                &starts_on,
                &ends_on,
                &reason,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Closure, closure::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Closure, closure::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: closure::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM operating_closures \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
