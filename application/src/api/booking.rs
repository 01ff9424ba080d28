//! [`Booking`]-related definitions.

use std::future;

use common::{Date, DateTime, DateTimeOf, Handler as _};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// Multi-day booking of a [`Resource`] under a subscription contract.
///
/// [`Resource`]: api::Resource
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    id: Id,

    /// Underlying [`domain::Booking`].
    booking: OnceCell<domain::Booking>,

    /// Booked [`api::Resource`].
    resource: OnceCell<api::Resource>,

    /// [`api::ContractValue`] this [`Booking`] is covered by.
    contract: OnceCell<api::ContractValue>,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        Self {
            id: booking.id.into(),
            booking: OnceCell::new_with(Some(booking)),
            resource: OnceCell::new(),
            contract: OnceCell::new(),
        }
    }
}

impl Booking {
    /// Creates a new [`Booking`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Booking`] with the provided ID exists,
    /// otherwise accessing this [`Booking`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            booking: OnceCell::new(),
            resource: OnceCell::new(),
            contract: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Booking`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Booking`] doesn't exist.
    async fn booking(&self, ctx: &Context) -> Result<&domain::Booking, Error> {
        let id = self.id.into();
        self.booking
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::booking::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BookingError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// Multi-day booking of a `Resource` under a subscription contract.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Booked `Resource`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.resource",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn resource(
        &self,
        ctx: &Context,
    ) -> Result<&api::Resource, Error> {
        let id = self.booking(ctx).await?.resource_id;
        self.resource
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::resource::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.map_or_else(
                            || {
                                Err(api::query::ResourceError::NotExists
                                    .into())
                            },
                            |r| Ok(r.into()),
                        ))
                    })
            })
            .await
    }

    /// `Contract` this `Booking` is covered by.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.contract",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&api::ContractValue, Error> {
        let id = self.booking(ctx).await?.contract_id;
        self.contract
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::contract::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.map_or_else(
                            || {
                                Err(api::query::ContractError::NotExists
                                    .into())
                            },
                            |c| Ok(c.into()),
                        ))
                    })
            })
            .await
    }

    /// Identifier of the customer this `Booking` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.customerId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer_id(
        &self,
        ctx: &Context,
    ) -> Result<api::customer::Id, Error> {
        Ok(self.booking(ctx).await?.customer_id.into())
    }

    /// First `Date` this `Booking` occupies.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.startsOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn starts_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.booking(ctx).await?.starts_on.coerce())
    }

    /// Last `Date` this `Booking` occupies.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.endsOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ends_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.booking(ctx).await?.ends_on.coerce())
    }

    /// Status of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.booking(ctx).await?.status.into())
    }

    /// `DateTime` when this `Booking` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Booking` was cancelled.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.cancelledAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cancelled_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self
            .booking(ctx)
            .await?
            .cancelled_at
            .map(DateTimeOf::coerce))
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// The `Booking` is confirmed and occupies its resource.
    Confirmed,

    /// The `Booking` is cancelled.
    Cancelled,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::booking::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Confirmed => Self::Confirmed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Booking`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Booking, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Booking` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::booking::list::Cursor)]
    #[graphql(
        name = "BookingListCursor",
        with = scalar::Via::<read::booking::list::Cursor>,
    )]
    pub struct Cursor(pub read::booking::list::Cursor);

    /// Edge in the [`Booking`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::booking::list::Edge);

    /// Edge in the `Booking` list.
    #[graphql_object(name = "BookingListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `BookingListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `BookingListEdge`.
        #[must_use]
        pub fn node(&self) -> Booking {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Booking` existence"
            )]
            unsafe {
                Booking::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Booking`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::booking::list::Page`].
        page: read::booking::list::Page,

        /// Filter the page was selected with.
        filter: read::booking::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] over the page selected with the
        /// provided filter.
        #[must_use]
        pub fn new(
            page: read::booking::list::Page,
            filter: read::booking::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Booking` list.
    #[graphql_object(name = "BookingListConnection", context = Context)]
    impl Connection {
        /// Edges of this `BookingListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.page.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.page.page_info(),
                start_cursor: self
                    .page
                    .edges
                    .first()
                    .map(|e| e.cursor.into()),
                end_cursor: self.page.edges.last().map(|e| e.cursor.into()),
                filter: self.filter.clone(),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::booking::list::PageInfo`].
        info: read::booking::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// Filter the page was selected with.
        filter: read::booking::list::Filter,
    }

    /// Information about a `BookingListConnection` page.
    #[graphql_object(name = "BookingListPageInfo", context = Context)]
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

        /// Total count of the matching `Booking`s.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::bookings::TotalCount::by(self.filter.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
