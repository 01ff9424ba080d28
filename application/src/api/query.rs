//! GraphQL [`Query`]s definitions.

use common::Date;
use itertools::Itertools as _;
use juniper::{graphql_object, GraphQLInputObject};
use service::{
    domain::{availability, customer, reservation::Span},
    query, read, Query as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";

    /// Builds an [`availability::Target`] out of the provided arguments.
    ///
    /// # Errors
    ///
    /// If not exactly either a `resource`, or a `category` with a
    /// `location`, is specified.
    fn target(
        resource: Option<api::resource::Id>,
        category: Option<api::resource::Category>,
        location: Option<api::location::Id>,
    ) -> Result<availability::Target, Error> {
        match (resource, category, location) {
            (Some(r), None, None) => {
                Ok(availability::Target::Resource(r.into()))
            }
            (None, Some(c), Some(l)) => Ok(availability::Target::Category {
                category: c.into(),
                location: l.into(),
            }),
            _ => Err(TargetError::Invalid.into()),
        }
    }
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated customer's `Session`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "session",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn session(ctx: &Context) -> Result<api::Session, Error> {
        Ok(ctx.current_session().await?.into())
    }

    /// Returns the `Location` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOCATION_NOT_EXISTS` - the `Location` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "location",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn location(
        id: api::location::Id,
        ctx: &Context,
    ) -> Result<api::location::list::Edge, Error> {
        Self::locations(None, Some(id.into()), None, Some(id.into()), None, ctx)
            .await?
            .edges()
            .into_iter()
            .exactly_one()
            .map_err(|_| LocationError::NotExists.into())
            .map_err(ctx.error())
    }

    /// Fetches the page of `Location`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "locations",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn locations(
        first: Option<i32>,
        after: Option<api::location::list::Cursor>,
        last: Option<i32>,
        before: Option<api::location::list::Cursor>,
        name: Option<api::location::Name>,
        ctx: &Context,
    ) -> Result<api::location::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::locations::List::by(
                read::location::list::Selector {
                    arguments: read::location::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::location::list::Filter {
                        name: name.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Resource` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RESOURCE_NOT_EXISTS` - the `Resource` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "resource",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn resource(
        id: api::resource::Id,
        ctx: &Context,
    ) -> Result<api::resource::list::Edge, Error> {
        Self::resources(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| ResourceError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Resource`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            bookable = ?bookable,
            category = ?category.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "resources",
            last = ?last,
            location = ?location,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn resources(
        first: Option<i32>,
        after: Option<api::resource::list::Cursor>,
        last: Option<i32>,
        before: Option<api::resource::list::Cursor>,
        location: Option<api::location::Id>,
        category: Option<api::resource::Category>,
        name: Option<api::resource::Name>,
        bookable: Option<bool>,
        ctx: &Context,
    ) -> Result<api::resource::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::resources::List::by(
                read::resource::list::Selector {
                    arguments: read::resource::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::resource::list::Filter {
                        location: location.map(Into::into),
                        category: category.map(Into::into),
                        name: name.map(Into::into),
                        bookable,
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Contract` with the specified ID.
    ///
    /// Customers can reach their own `Contract`s only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "contract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::contract::list::Edge, Error> {
        Self::contracts(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| ContractError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Contract`s.
    ///
    /// Customers see their own `Contract`s only, operators see everything.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `NOT_AN_OPERATOR` - the current customer filters by another
    ///                       customer.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            customer = ?customer,
            first = ?first,
            gql.name = "contracts",
            kind = ?kind,
            last = ?last,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contracts(
        first: Option<i32>,
        after: Option<api::contract::list::Cursor>,
        last: Option<i32>,
        before: Option<api::contract::list::Cursor>,
        customer: Option<api::customer::Id>,
        kind: Option<api::contract::Kind>,
        ctx: &Context,
    ) -> Result<api::contract::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::contract::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let session = ctx.current_session().await?;
        let customer = match session.claims.role {
            customer::Role::Operator => customer.map(Into::into),
            customer::Role::Customer => {
                let my_id = session.claims.customer_id;
                if customer.is_some_and(|id| customer::Id::from(id) != my_id)
                {
                    return Err(api::PrivilegeError::Operator.into());
                }
                Some(my_id)
            }
        };

        let filter = read::contract::list::Filter {
            customer,
            kind: kind.map(Into::into),
        };
        ctx.service()
            .execute(query::contracts::List::by(
                read::contract::list::Selector {
                    arguments,
                    filter: filter.clone(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::contract::list::Connection::new(page, filter))
    }

    /// Returns the `Reservation` with the specified ID.
    ///
    /// Customers can reach their own `Reservation`s only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` with the specified ID
    ///                              does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "reservation",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reservation(
        id: api::reservation::Id,
        ctx: &Context,
    ) -> Result<api::reservation::list::Edge, Error> {
        Self::reservations(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| ReservationError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Reservation`s.
    ///
    /// Customers see their own `Reservation`s only, operators see
    /// everything.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `NOT_AN_OPERATOR` - the current customer filters by another
    ///                       customer.
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            contract = ?contract,
            customer = ?customer,
            dates = ?dates,
            first = ?first,
            gql.name = "reservations",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            resource = ?resource,
            status = ?status,
        ),
    )]
    pub async fn reservations(
        first: Option<i32>,
        after: Option<api::reservation::list::Cursor>,
        last: Option<i32>,
        before: Option<api::reservation::list::Cursor>,
        customer: Option<api::customer::Id>,
        resource: Option<api::resource::Id>,
        contract: Option<api::contract::Id>,
        dates: Option<DateRange>,
        status: Option<api::reservation::Status>,
        ctx: &Context,
    ) -> Result<api::reservation::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::reservation::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let session = ctx.current_session().await?;
        let customer = match session.claims.role {
            customer::Role::Operator => customer.map(Into::into),
            customer::Role::Customer => {
                let my_id = session.claims.customer_id;
                if customer.is_some_and(|id| customer::Id::from(id) != my_id)
                {
                    return Err(api::PrivilegeError::Operator.into());
                }
                Some(my_id)
            }
        };

        let filter = read::reservation::list::Filter {
            customer,
            resource: resource.map(Into::into),
            contract: contract.map(Into::into),
            dates: dates.map(|r| r.from..=r.to),
            status: status.map(Into::into),
        };
        ctx.service()
            .execute(query::reservations::List::by(
                read::reservation::list::Selector {
                    arguments,
                    filter: filter.clone(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| {
                api::reservation::list::Connection::new(page, filter)
            })
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// Customers can reach their own `Booking`s only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::booking::list::Edge, Error> {
        Self::bookings(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| BookingError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Booking`s.
    ///
    /// Customers see their own `Booking`s only, operators see everything.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `NOT_AN_OPERATOR` - the current customer filters by another
    ///                       customer.
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            contract = ?contract,
            customer = ?customer,
            dates = ?dates,
            first = ?first,
            gql.name = "bookings",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            resource = ?resource,
            status = ?status,
        ),
    )]
    pub async fn bookings(
        first: Option<i32>,
        after: Option<api::booking::list::Cursor>,
        last: Option<i32>,
        before: Option<api::booking::list::Cursor>,
        customer: Option<api::customer::Id>,
        resource: Option<api::resource::Id>,
        contract: Option<api::contract::Id>,
        dates: Option<DateRange>,
        status: Option<api::booking::Status>,
        ctx: &Context,
    ) -> Result<api::booking::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::booking::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let session = ctx.current_session().await?;
        let customer = match session.claims.role {
            customer::Role::Operator => customer.map(Into::into),
            customer::Role::Customer => {
                let my_id = session.claims.customer_id;
                if customer.is_some_and(|id| customer::Id::from(id) != my_id)
                {
                    return Err(api::PrivilegeError::Operator.into());
                }
                Some(my_id)
            }
        };

        let filter = read::booking::list::Filter {
            customer,
            resource: resource.map(Into::into),
            contract: contract.map(Into::into),
            dates: dates.map(|r| r.from..=r.to),
            status: status.map(Into::into),
        };
        ctx.service()
            .execute(query::bookings::List::by(
                read::booking::list::Selector {
                    arguments,
                    filter: filter.clone(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::booking::list::Connection::new(page, filter))
    }

    /// Resolves availability of a single date reservation with the
    /// specified shape.
    ///
    /// The target is either a `resource`, or a `category` with a
    /// `location`. An available decision is a hint, not a hold: it may be
    /// outdated by the time the reservation is confirmed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_AVAILABILITY_TARGET` - not exactly either a `resource`,
    ///                                   or a `category` with a `location`,
    ///                                   is specified;
    /// - `INVALID_SPAN` - the `duration` and `slot` arguments contradict
    ///                    each other.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category.as_ref().map(ToString::to_string),
            date = ?date,
            duration = ?duration,
            gql.name = "availabilityOnDate",
            location = ?location,
            otel.name = Self::SPAN_NAME,
            resource = ?resource,
            slot = ?slot,
        ),
    )]
    pub async fn availability_on_date(
        resource: Option<api::resource::Id>,
        category: Option<api::resource::Category>,
        location: Option<api::location::Id>,
        date: Date,
        duration: api::reservation::Duration,
        slot: Option<api::reservation::Slot>,
        ctx: &Context,
    ) -> Result<api::availability::Decision, Error> {
        let target = Self::target(resource, category, location)
            .map_err(ctx.error())?;
        let span = Span::new(duration.into(), slot.map(Into::into))
            .ok_or_else(|| SpanError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::availability::OnDate { target, date, span })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Resolves availability of a booking over the specified inclusive
    /// range of dates.
    ///
    /// The target is either a `resource`, or a `category` with a
    /// `location`. An available decision is a hint, not a hold: it may be
    /// outdated by the time the booking is confirmed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_AVAILABILITY_TARGET` - not exactly either a `resource`,
    ///                                   or a `category` with a `location`,
    ///                                   is specified;
    /// - `INVALID_PERIOD` - `startsOn` is after `endsOn`.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category.as_ref().map(ToString::to_string),
            ends_on = ?ends_on,
            gql.name = "availabilityOverRange",
            location = ?location,
            otel.name = Self::SPAN_NAME,
            resource = ?resource,
            starts_on = ?starts_on,
        ),
    )]
    pub async fn availability_over_range(
        resource: Option<api::resource::Id>,
        category: Option<api::resource::Category>,
        location: Option<api::location::Id>,
        starts_on: Date,
        ends_on: Date,
        ctx: &Context,
    ) -> Result<api::availability::Decision, Error> {
        let target = Self::target(resource, category, location)
            .map_err(ctx.error())?;
        if starts_on > ends_on {
            return Err(PeriodError::Invalid.into());
        }

        ctx.service()
            .execute(query::availability::OverRange {
                target,
                starts_on,
                ends_on,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assembles the calendar timeline of a `Location` over the specified
    /// inclusive range of dates: one lane per resource, carrying everything
    /// occupying it within the range.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOCATION_NOT_EXISTS` - the `Location` with the specified ID does
    ///                           not exist;
    /// - `INVALID_PERIOD` - `startsOn` is after `endsOn`;
    /// - `NOT_AN_OPERATOR` - the current customer is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            ends_on = ?ends_on,
            gql.name = "calendar",
            location = %location,
            otel.name = Self::SPAN_NAME,
            starts_on = ?starts_on,
        ),
    )]
    pub async fn calendar(
        location: api::location::Id,
        starts_on: Date,
        ends_on: Date,
        ctx: &Context,
    ) -> Result<api::calendar::Timeline, Error> {
        if starts_on > ends_on {
            return Err(PeriodError::Invalid.into());
        }
        let session = ctx.current_session().await?;
        if session.claims.role != customer::Role::Operator {
            return Err(api::PrivilegeError::Operator.into());
        }

        ctx.service()
            .execute(query::calendar::Timeline::by(read::calendar::Selector {
                location: location.into(),
                starts_on,
                ends_on,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| LocationError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Inclusive range of `Date`s to filter by.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
pub struct DateRange {
    /// First `Date` of the range, inclusive.
    pub from: Date,

    /// Last `Date` of the range, inclusive.
    pub to: Date,
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum LocationError {
        #[code = "LOCATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Location` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PeriodError {
        #[code = "INVALID_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "`startsOn` date must not be after `endsOn` date"]
        Invalid,
    }
}

define_error! {
    enum ReservationError {
        #[code = "RESERVATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Reservation` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ResourceError {
        #[code = "RESOURCE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Resource` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum SpanError {
        #[code = "INVALID_SPAN"]
        #[status = BAD_REQUEST]
        #[message = "half-day `duration` requires a `slot`, while full-day \
                     one forbids it"]
        Invalid,
    }
}

define_error! {
    enum TargetError {
        #[code = "INVALID_AVAILABILITY_TARGET"]
        #[status = BAD_REQUEST]
        #[message = "either a `resource`, or a `category` with a `location`, \
                     must be specified"]
        Invalid,
    }
}
