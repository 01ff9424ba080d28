//! [`Location`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A coworking location.
#[derive(Clone, Debug, From)]
pub struct Location {
    /// ID of this [`Location`].
    id: Id,

    /// Underlying [`domain::Location`].
    location: OnceCell<domain::Location>,
}

impl From<domain::Location> for Location {
    fn from(location: domain::Location) -> Self {
        Self {
            id: location.id.into(),
            location: OnceCell::new_with(Some(location)),
        }
    }
}

impl Location {
    /// Creates a new [`Location`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Location`] with the provided ID exists,
    /// otherwise accessing this [`Location`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            location: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Location`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Location`] doesn't exist.
    async fn location(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Location, Error> {
        let id = self.id.into();
        self.location
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::location::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|l| {
                        future::ready(l.ok_or_else(|| {
                            api::query::LocationError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A coworking location.
#[graphql_object(context = Context)]
impl Location {
    /// Unique identifier of this `Location`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Location.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Location`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Location.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.location(ctx).await?.name.clone().into())
    }

    /// Postal address of this `Location`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Location.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.location(ctx).await?.address.clone().into())
    }

    /// `DateTime` when this `Location` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Location.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.location(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Location`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::location::Id)]
#[into(domain::location::Id)]
#[graphql(name = "LocationId", transparent)]
pub struct Id(Uuid);

/// Name of a `Location`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LocationName",
    with = scalar::Via::<domain::location::Name>,
)]
pub struct Name(domain::location::Name);

/// Postal address of a `Location`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LocationAddress",
    with = scalar::Via::<domain::location::Address>,
)]
pub struct Address(domain::location::Address);

pub mod list {
    //! Definitions related to the [`Location`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Location};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Location` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::location::list::Cursor)]
    #[graphql(
        name = "LocationListCursor",
        with = scalar::Via::<read::location::list::Cursor>,
    )]
    pub struct Cursor(pub read::location::list::Cursor);

    /// Edge in the [`Location`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::location::list::Edge);

    /// Edge in the `Location` list.
    #[graphql_object(name = "LocationListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `LocationListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `LocationListEdge`.
        #[must_use]
        pub fn node(&self) -> Location {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Location` existence"
            )]
            unsafe {
                Location::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Location`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::location::list::Connection);

    /// Connection of the `Location` list.
    #[graphql_object(name = "LocationListConnection", context = Context)]
    impl Connection {
        /// Edges of this `LocationListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::location::list::PageInfo`].
        info: read::location::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `LocationListConnection` page.
    #[graphql_object(name = "LocationListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Location` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::locations::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
