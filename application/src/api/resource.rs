//! [`Resource`]-related definitions.

use std::future;

use common::{DateTime, DateTimeOf, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A bookable resource of a [`Location`], such as a desk or a meeting room.
///
/// [`Location`]: api::Location
#[derive(Clone, Debug)]
pub struct Resource {
    /// ID of this [`Resource`].
    id: Id,

    /// Underlying [`domain::Resource`].
    resource: OnceCell<domain::Resource>,

    /// [`api::Location`] hosting this [`Resource`].
    location: OnceCell<api::Location>,
}

impl From<domain::Resource> for Resource {
    fn from(resource: domain::Resource) -> Self {
        Self {
            id: resource.id.into(),
            resource: OnceCell::new_with(Some(resource)),
            location: OnceCell::new(),
        }
    }
}

impl Resource {
    /// Creates a new [`Resource`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Resource`] with the provided ID exists,
    /// otherwise accessing this [`Resource`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            resource: OnceCell::new(),
            location: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Resource`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Resource`] doesn't exist.
    async fn resource(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Resource, Error> {
        let id = self.id.into();
        self.resource
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::resource::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::ResourceError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A bookable resource of a `Location`, such as a desk or a meeting room.
#[graphql_object(context = Context)]
impl Resource {
    /// Unique identifier of this `Resource`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Location` hosting this `Resource`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(
        &self,
        ctx: &Context,
    ) -> Result<&api::Location, Error> {
        let id = self.resource(ctx).await?.location_id;
        self.location
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::location::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|l| {
                        future::ready(l.map_or_else(
                            || {
                                Err(api::query::LocationError::NotExists
                                    .into())
                            },
                            |l| Ok(l.into()),
                        ))
                    })
            })
            .await
    }

    /// Name of this `Resource`, unique within its `Location`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.resource(ctx).await?.name.clone().into())
    }

    /// Category of this `Resource`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(&self, ctx: &Context) -> Result<Category, Error> {
        Ok(self.resource(ctx).await?.category.clone().into())
    }

    /// How many simultaneous full-day reservations this `Resource` holds.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.capacity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn capacity(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.resource(ctx).await?.capacity.into())
    }

    /// Indicator whether this `Resource` accepts new reservations.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.isAvailable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_available(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.resource(ctx).await?.is_available)
    }

    /// Indicator whether this `Resource` is available and not retired.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.isBookable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_bookable(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.resource(ctx).await?.is_bookable())
    }

    /// Weekly operating rules of this `Resource`.
    ///
    /// Weekdays without an explicit rule are open.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.schedule",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn schedule(
        &self,
        ctx: &Context,
    ) -> Result<Vec<OperatingSchedule>, Error> {
        ctx.service()
            .execute(query::schedule::ByResource::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rules| rules.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Resource` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.resource(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Resource` was retired.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Resource.retiredAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn retired_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.resource(ctx).await?.retired_at.map(DateTimeOf::coerce))
    }
}

/// Unique identifier of a `Resource`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::resource::Id)]
#[into(domain::resource::Id)]
#[graphql(name = "ResourceId", transparent)]
pub struct Id(Uuid);

/// Name of a `Resource`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ResourceName",
    with = scalar::Via::<domain::resource::Name>,
)]
pub struct Name(domain::resource::Name);

/// Category of a `Resource`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ResourceCategory",
    with = scalar::Via::<domain::resource::Category>,
)]
pub struct Category(domain::resource::Category);

/// Weekly operating rule of a `Resource`.
#[derive(Clone, Copy, Debug, From)]
pub struct OperatingSchedule(domain::schedule::OperatingSchedule);

/// Weekly operating rule of a `Resource`.
#[graphql_object(name = "ResourceOperatingSchedule", context = Context)]
impl OperatingSchedule {
    /// Weekday this rule applies to.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday.into()
    }

    /// Indicator whether the `Resource` is closed on the weekday.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.is_closed
    }
}

/// Day of a week.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum Weekday {
    /// Sunday.
    Sunday,

    /// Monday.
    Monday,

    /// Tuesday.
    Tuesday,

    /// Wednesday.
    Wednesday,

    /// Thursday.
    Thursday,

    /// Friday.
    Friday,

    /// Saturday.
    Saturday,
}

impl From<domain::schedule::Weekday> for Weekday {
    fn from(weekday: domain::schedule::Weekday) -> Self {
        use domain::schedule::Weekday as W;
        match weekday {
            W::Sunday => Self::Sunday,
            W::Monday => Self::Monday,
            W::Tuesday => Self::Tuesday,
            W::Wednesday => Self::Wednesday,
            W::Thursday => Self::Thursday,
            W::Friday => Self::Friday,
            W::Saturday => Self::Saturday,
        }
    }
}

impl From<Weekday> for domain::schedule::Weekday {
    fn from(weekday: Weekday) -> Self {
        use domain::schedule::Weekday as W;
        match weekday {
            Weekday::Sunday => W::Sunday,
            Weekday::Monday => W::Monday,
            Weekday::Tuesday => W::Tuesday,
            Weekday::Wednesday => W::Wednesday,
            Weekday::Thursday => W::Thursday,
            Weekday::Friday => W::Friday,
            Weekday::Saturday => W::Saturday,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Resource`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Resource};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Resource` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::resource::list::Cursor)]
    #[graphql(
        name = "ResourceListCursor",
        with = scalar::Via::<read::resource::list::Cursor>,
    )]
    pub struct Cursor(pub read::resource::list::Cursor);

    /// Edge in the [`Resource`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::resource::list::Edge);

    /// Edge in the `Resource` list.
    #[graphql_object(name = "ResourceListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ResourceListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ResourceListEdge`.
        #[must_use]
        pub fn node(&self) -> Resource {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Resource` existence"
            )]
            unsafe {
                Resource::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Resource`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::resource::list::Connection);

    /// Connection of the `Resource` list.
    #[graphql_object(name = "ResourceListConnection", context = Context)]
    impl Connection {
        /// Edges of this `ResourceListConnection`.
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
        /// Underlying [`read::resource::list::PageInfo`].
        info: read::resource::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `ResourceListConnection` page.
    #[graphql_object(name = "ResourceListPageInfo", context = Context)]
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

        /// Total `Resource` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::resources::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
