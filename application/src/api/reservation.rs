//! [`Reservation`]-related definitions.

use std::future;

use common::{Date, DateTime, DateTimeOf, Entries, Handler as _};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// Single-day reservation of a [`Resource`] under an entry package contract.
///
/// [`Resource`]: api::Resource
#[derive(Clone, Debug)]
pub struct Reservation {
    /// ID of this [`Reservation`].
    id: Id,

    /// Underlying [`domain::Reservation`].
    reservation: OnceCell<domain::Reservation>,

    /// Reserved [`api::Resource`].
    resource: OnceCell<api::Resource>,

    /// [`api::ContractValue`] this [`Reservation`] consumes entries of.
    contract: OnceCell<api::ContractValue>,
}

impl From<domain::Reservation> for Reservation {
    fn from(reservation: domain::Reservation) -> Self {
        Self {
            id: reservation.id.into(),
            reservation: OnceCell::new_with(Some(reservation)),
            resource: OnceCell::new(),
            contract: OnceCell::new(),
        }
    }
}

impl Reservation {
    /// Creates a new [`Reservation`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Reservation`] with the provided ID exists,
    /// otherwise accessing this [`Reservation`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            reservation: OnceCell::new(),
            resource: OnceCell::new(),
            contract: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Reservation`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Reservation`] doesn't exist.
    async fn reservation(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Reservation, Error> {
        let id = self.id.into();
        self.reservation
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::reservation::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::ReservationError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// Single-day reservation of a `Resource` under an entry package contract.
#[graphql_object(context = Context)]
impl Reservation {
    /// Unique identifier of this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Reserved `Resource`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.resource",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn resource(
        &self,
        ctx: &Context,
    ) -> Result<&api::Resource, Error> {
        let id = self.reservation(ctx).await?.resource_id;
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

    /// `Contract` this `Reservation` consumes entries of.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.contract",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&api::ContractValue, Error> {
        let id = self.reservation(ctx).await?.contract_id;
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

    /// Identifier of the customer this `Reservation` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.customerId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer_id(
        &self,
        ctx: &Context,
    ) -> Result<api::customer::Id, Error> {
        Ok(self.reservation(ctx).await?.customer_id.into())
    }

    /// `Date` this `Reservation` is made for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.date",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.reservation(ctx).await?.date.coerce())
    }

    /// Duration of this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.duration",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn duration(&self, ctx: &Context) -> Result<Duration, Error> {
        Ok(self.reservation(ctx).await?.span.duration().into())
    }

    /// Time slot of this `Reservation`, for half-day ones only.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.slot",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn slot(&self, ctx: &Context) -> Result<Option<Slot>, Error> {
        Ok(self.reservation(ctx).await?.span.slot().map(Into::into))
    }

    /// Entries this `Reservation` consumed when it was confirmed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.entries",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn entries(&self, ctx: &Context) -> Result<Entries, Error> {
        Ok(self.reservation(ctx).await?.entries)
    }

    /// Status of this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.reservation(ctx).await?.status.into())
    }

    /// `DateTime` when this `Reservation` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.reservation(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Reservation` was cancelled.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.cancelledAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cancelled_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self
            .reservation(ctx)
            .await?
            .cancelled_at
            .map(DateTimeOf::coerce))
    }
}

/// Unique identifier of a `Reservation`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::reservation::Id)]
#[into(domain::reservation::Id)]
#[graphql(name = "ReservationId", transparent)]
pub struct Id(Uuid);

/// Duration of a `Reservation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ReservationDuration")]
pub enum Duration {
    /// Reservation for a whole day.
    FullDay,

    /// Reservation for a half of a day.
    HalfDay,
}

impl From<domain::reservation::Duration> for Duration {
    fn from(duration: domain::reservation::Duration) -> Self {
        use domain::reservation::Duration as D;
        match duration {
            D::FullDay => Self::FullDay,
            D::HalfDay => Self::HalfDay,
        }
    }
}

impl From<Duration> for domain::reservation::Duration {
    fn from(duration: Duration) -> Self {
        match duration {
            Duration::FullDay => Self::FullDay,
            Duration::HalfDay => Self::HalfDay,
        }
    }
}

/// Time slot of a half-day `Reservation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ReservationSlot")]
pub enum Slot {
    /// Morning half of a day.
    Morning,

    /// Afternoon half of a day.
    Afternoon,
}

impl From<domain::reservation::Slot> for Slot {
    fn from(slot: domain::reservation::Slot) -> Self {
        use domain::reservation::Slot as S;
        match slot {
            S::Morning => Self::Morning,
            S::Afternoon => Self::Afternoon,
        }
    }
}

impl From<Slot> for domain::reservation::Slot {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Morning => Self::Morning,
            Slot::Afternoon => Self::Afternoon,
        }
    }
}

/// Status of a `Reservation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ReservationStatus")]
pub enum Status {
    /// The `Reservation` is confirmed and occupies its resource.
    Confirmed,

    /// The `Reservation` is cancelled.
    Cancelled,
}

impl From<domain::reservation::Status> for Status {
    fn from(status: domain::reservation::Status) -> Self {
        use domain::reservation::Status as S;
        match status {
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::reservation::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Confirmed => Self::Confirmed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Reservation`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Reservation};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Reservation` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::reservation::list::Cursor)]
    #[graphql(
        name = "ReservationListCursor",
        with = scalar::Via::<read::reservation::list::Cursor>,
    )]
    pub struct Cursor(pub read::reservation::list::Cursor);

    /// Edge in the [`Reservation`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::reservation::list::Edge);

    /// Edge in the `Reservation` list.
    #[graphql_object(name = "ReservationListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ReservationListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ReservationListEdge`.
        #[must_use]
        pub fn node(&self) -> Reservation {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Reservation` existence"
            )]
            unsafe {
                Reservation::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Reservation`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::reservation::list::Page`].
        page: read::reservation::list::Page,

        /// Filter the page was selected with.
        filter: read::reservation::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] over the page selected with the
        /// provided filter.
        #[must_use]
        pub fn new(
            page: read::reservation::list::Page,
            filter: read::reservation::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Reservation` list.
    #[graphql_object(name = "ReservationListConnection", context = Context)]
    impl Connection {
        /// Edges of this `ReservationListConnection`.
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
        /// Underlying [`read::reservation::list::PageInfo`].
        info: read::reservation::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// Filter the page was selected with.
        filter: read::reservation::list::Filter,
    }

    /// Information about a `ReservationListConnection` page.
    #[graphql_object(name = "ReservationListPageInfo", context = Context)]
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

        /// Total count of the matching `Reservation`s.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::reservations::TotalCount::by(
                    self.filter.clone(),
                ))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
