//! GraphQL [`Mutation`]s definitions.

use common::{Date, Entries, Money};
use juniper::graphql_object;
use service::{
    command,
    domain::{closure, contract, reservation::Span, resource},
    Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";

    /// Builds a [`contract::Binding`] out of the provided arguments.
    ///
    /// # Errors
    ///
    /// If not exactly either a `resource`, or a `category` with a
    /// `location`, is specified.
    fn binding(
        resource: Option<api::resource::Id>,
        category: Option<api::resource::Category>,
        location: Option<api::location::Id>,
    ) -> Result<contract::Binding, Error> {
        match (resource, category, location) {
            (Some(r), None, None) => {
                Ok(contract::Binding::Resource(r.into()))
            }
            (None, Some(c), Some(l)) => Ok(contract::Binding::Category {
                category: c.into(),
                location: l.into(),
            }),
            _ => Err(BindingError::Invalid.into()),
        }
    }

    /// Builds a [`closure::Scope`] out of the provided arguments.
    ///
    /// # Errors
    ///
    /// If not exactly one of a `location` or a `resource` is specified.
    fn scope(
        location: Option<api::location::Id>,
        resource: Option<api::resource::Id>,
    ) -> Result<closure::Scope, Error> {
        match (location, resource) {
            (Some(l), None) => Ok(closure::Scope::Location(l.into())),
            (None, Some(r)) => Ok(closure::Scope::Resource(r.into())),
            _ => Err(ScopeError::Invalid.into()),
        }
    }

    /// Builds [`command::create_contract::Terms`] out of the provided
    /// arguments.
    ///
    /// # Errors
    ///
    /// If `maxEntries` is missing for an entry package, or is specified for
    /// a subscription.
    fn terms(
        kind: api::contract::Kind,
        max_entries: Option<Entries>,
    ) -> Result<command::create_contract::Terms, Error> {
        use command::create_contract::Terms;

        match (kind, max_entries) {
            (api::contract::Kind::EntryPackage, Some(max_entries)) => {
                Ok(Terms::EntryPackage { max_entries })
            }
            (api::contract::Kind::Subscription, None) => {
                Ok(Terms::Subscription)
            }
            _ => Err(TermsError::Invalid.into()),
        }
    }
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Location` with the provided details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOCATION_NAME_OCCUPIED` - a `Location` with the specified name
    ///                              exists already;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            address = %address,
            gql.name = "createLocation",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_location(
        name: api::location::Name,
        address: api::location::Address,
        ctx: &Context,
    ) -> Result<api::Location, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::CreateLocation {
                name: name.into(),
                address: address.into(),
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Resource` at the specified `Location`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_CAPACITY` - the specified `capacity` is not positive;
    /// - `LOCATION_NOT_EXISTS` - the `Location` with the specified ID does
    ///                           not exist;
    /// - `RESOURCE_NAME_OCCUPIED` - a `Resource` with the specified name
    ///                              exists already at the `Location`;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            capacity = %capacity,
            category = %category,
            gql.name = "createResource",
            location_id = %location,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_resource(
        location: api::location::Id,
        name: api::resource::Name,
        category: api::resource::Category,
        capacity: i32,
        ctx: &Context,
    ) -> Result<api::Resource, Error> {
        let session = ctx.current_session().await?.claims;
        let capacity = resource::Capacity::new(capacity)
            .ok_or_else(|| CapacityError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateResource {
                location_id: location.into(),
                name: name.into(),
                category: category.into(),
                capacity,
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets the weekly operating rule of the specified `Resource`.
    ///
    /// Overwrites the previous rule of the same `weekday`, if any.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RESOURCE_NOT_EXISTS` - the `Resource` with the specified ID does
    ///                           not exist;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "setOperatingSchedule",
            is_closed = %is_closed,
            otel.name = Self::SPAN_NAME,
            resource_id = %resource,
            weekday = ?weekday,
        ),
    )]
    pub async fn set_operating_schedule(
        resource: api::resource::Id,
        weekday: api::resource::Weekday,
        is_closed: bool,
        ctx: &Context,
    ) -> Result<api::resource::OperatingSchedule, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::SetOperatingSchedule {
                resource_id: resource.into(),
                weekday: weekday.into(),
                is_closed,
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Retires the `Resource` with the specified ID.
    ///
    /// A retired `Resource` takes no further reservations or bookings,
    /// while its history stays intact.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RESOURCE_NOT_EXISTS` - the `Resource` with the specified ID does
    ///                           not exist or is retired already;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "retireResource",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn retire_resource(
        id: api::resource::Id,
        ctx: &Context,
    ) -> Result<api::Resource, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::RetireResource {
                id: id.into(),
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Closure` over the specified period.
    ///
    /// The `Closure` covers either a whole `Location`, or one exact
    /// `Resource`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_CLOSURE_SCOPE` - not exactly one of a `location` or a
    ///                             `resource` is specified;
    /// - `INVALID_PERIOD` - the `startsOn` date is after the `endsOn` date;
    /// - `LOCATION_NOT_EXISTS` - the `Location` with the specified ID does
    ///                           not exist;
    /// - `RESOURCE_NOT_EXISTS` - the `Resource` with the specified ID does
    ///                           not exist;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            ends_on = ?ends_on,
            gql.name = "createClosure",
            location_id = ?location.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            reason = %reason,
            resource_id = ?resource.as_ref().map(ToString::to_string),
            starts_on = ?starts_on,
        ),
    )]
    pub async fn create_closure(
        location: Option<api::location::Id>,
        resource: Option<api::resource::Id>,
        starts_on: Date,
        ends_on: Date,
        reason: api::closure::Reason,
        ctx: &Context,
    ) -> Result<api::Closure, Error> {
        let session = ctx.current_session().await?.claims;
        let scope = Self::scope(location, resource).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateClosure {
                scope,
                starts_on: starts_on.coerce(),
                ends_on: ends_on.coerce(),
                reason: reason.into(),
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `Closure` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLOSURE_NOT_EXISTS` - the `Closure` with the specified ID does not
    ///                          exist;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeClosure",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_closure(
        id: api::closure::Id,
        ctx: &Context,
    ) -> Result<api::Closure, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::RemoveClosure {
                id: id.into(),
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Contract` for the specified `Customer`.
    ///
    /// The `Contract` binds either one exact `resource`, or any `Resource`
    /// of the `category` at the `location`. Entry package `Contract`s
    /// require `maxEntries`, while subscription ones forbid it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_CONTRACT_BINDING` - not exactly either a `resource`, or a
    ///                                `category` with a `location`, is
    ///                                specified;
    /// - `INVALID_CONTRACT_TERMS` - `maxEntries` is missing for an entry
    ///                              package, or is specified for a
    ///                              subscription;
    /// - `INVALID_PERIOD` - the `startsOn` date is after the `endsOn` date;
    /// - `LOCATION_NOT_EXISTS` - the `Location` with the specified ID does
    ///                           not exist;
    /// - `RESOURCE_NOT_EXISTS` - the `Resource` with the specified ID does
    ///                           not exist;
    /// - `RESOURCE_RETIRED` - the `Resource` with the specified ID is
    ///                        retired;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category.as_ref().map(ToString::to_string),
            customer_id = %customer,
            ends_on = ?ends_on,
            gql.name = "createContract",
            kind = ?kind,
            location_id = ?location.as_ref().map(ToString::to_string),
            max_entries = ?max_entries.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            price = price.to_string(),
            resource_id = ?resource.as_ref().map(ToString::to_string),
            starts_on = ?starts_on,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_contract(
        customer: api::customer::Id,
        resource: Option<api::resource::Id>,
        category: Option<api::resource::Category>,
        location: Option<api::location::Id>,
        starts_on: Date,
        ends_on: Date,
        kind: api::contract::Kind,
        max_entries: Option<Entries>,
        price: Money,
        ctx: &Context,
    ) -> Result<api::ContractValue, Error> {
        let session = ctx.current_session().await?.claims;
        let binding =
            Self::binding(resource, category, location).map_err(ctx.error())?;
        let terms = Self::terms(kind, max_entries).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateContract {
                customer_id: customer.into(),
                binding,
                starts_on: starts_on.coerce(),
                ends_on: ends_on.coerce(),
                terms,
                price,
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Terminates the `Contract` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist or is terminated already;
    /// - `NOT_AN_OPERATOR` - the current `Customer` is not an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "terminateContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn terminate_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::ContractValue, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::TerminateContract {
                id: id.into(),
                initiator: session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Confirms a `Reservation` for one date under the specified entry
    /// package `Contract`.
    ///
    /// Unless an exact `resource` is requested, an available `Resource`
    /// covered by the `Contract` is picked automatically.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist;
    /// - `CONTRACT_NOT_OWNED` - the current `Customer` does not own the
    ///                          `Contract`;
    /// - `INSUFFICIENT_ENTRIES` - the `Contract` does not have enough
    ///                            remaining entries;
    /// - `INVALID_SPAN` - the `duration` and the `slot` contradict each
    ///                    other;
    /// - `NO_RESOURCES` - no active `Resource` matches the `Contract`
    ///                    binding;
    /// - `NOT_AN_ENTRY_PACKAGE` - the `Contract` with the specified ID is
    ///                            not an entry package;
    /// - `OUT_OF_CONTRACT_WINDOW` - the requested date is outside the
    ///                              `Contract` validity window;
    /// - `RESOURCE_NOT_COVERED` - the requested `Resource` is not covered
    ///                            by the `Contract`;
    /// - `RESOURCE_NOT_EXISTS` - the `Resource` with the specified ID does
    ///                           not exist;
    /// - `UNAVAILABLE` - the requested date cannot be served.
    #[tracing::instrument(
        skip_all,
        fields(
            contract_id = %contract,
            date = ?date,
            duration = ?duration,
            gql.name = "confirmReservation",
            otel.name = Self::SPAN_NAME,
            resource_id = ?resource.as_ref().map(ToString::to_string),
            slot = ?slot,
        ),
    )]
    pub async fn confirm_reservation(
        contract: api::contract::Id,
        date: Date,
        duration: api::reservation::Duration,
        slot: Option<api::reservation::Slot>,
        resource: Option<api::resource::Id>,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        let session = ctx.current_session().await?.claims;
        let span = Span::new(duration.into(), slot.map(Into::into))
            .ok_or_else(|| api::query::SpanError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::ConfirmReservation {
                contract_id: contract.into(),
                date: date.coerce(),
                span,
                resource_id: resource.map(Into::into),
                session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Reservation` with the specified ID, restoring the
    /// entries it consumed to its `Contract`.
    ///
    /// Operators may cancel any `Reservation`, while `Customer`s only their
    /// own ones.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` with the specified ID
    ///                              does not exist or is cancelled already;
    /// - `RESERVATION_NOT_OWNED` - the current `Customer` does not own the
    ///                             `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelReservation",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_reservation(
        id: api::reservation::Id,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::CancelReservation { id: id.into(), session })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a `Booking` over the specified period under the specified
    /// subscription `Contract`.
    ///
    /// Unless an exact `resource` is requested, an available `Resource`
    /// covered by the `Contract` is picked automatically.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist;
    /// - `CONTRACT_NOT_OWNED` - the current `Customer` does not own the
    ///                          `Contract`;
    /// - `INVALID_PERIOD` - the `startsOn` date is after the `endsOn` date;
    /// - `NO_RESOURCES` - no active `Resource` matches the `Contract`
    ///                    binding;
    /// - `NOT_A_SUBSCRIPTION` - the `Contract` with the specified ID is not
    ///                          a subscription;
    /// - `OUT_OF_CONTRACT_WINDOW` - the requested period is outside the
    ///                              `Contract` validity window;
    /// - `RESOURCE_NOT_COVERED` - the requested `Resource` is not covered
    ///                            by the `Contract`;
    /// - `RESOURCE_NOT_EXISTS` - the `Resource` with the specified ID does
    ///                           not exist;
    /// - `UNAVAILABLE` - the requested period cannot be served.
    #[tracing::instrument(
        skip_all,
        fields(
            contract_id = %contract,
            ends_on = ?ends_on,
            gql.name = "createBooking",
            otel.name = Self::SPAN_NAME,
            resource_id = ?resource.as_ref().map(ToString::to_string),
            starts_on = ?starts_on,
        ),
    )]
    pub async fn create_booking(
        contract: api::contract::Id,
        starts_on: Date,
        ends_on: Date,
        resource: Option<api::resource::Id>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::CreateBooking {
                contract_id: contract.into(),
                starts_on: starts_on.coerce(),
                ends_on: ends_on.coerce(),
                resource_id: resource.map(Into::into),
                session,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Booking` with the specified ID.
    ///
    /// Operators may cancel any `Booking`, while `Customer`s only their own
    /// ones.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does
    ///                          not exist or is cancelled already;
    /// - `BOOKING_NOT_OWNED` - the current `Customer` does not own the
    ///                         `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let session = ctx.current_session().await?.claims;

        ctx.service()
            .execute(command::CancelBooking { id: id.into(), session })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::create_location::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOCATION_NAME_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`Location` with the specified name exists \
                             already"]
                NameOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NameOccupied(_) => Error::NameOccupied.into(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
        })
    }
}

impl AsError for command::create_resource::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOCATION_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Location` with the specified ID does not exist"]
                LocationNotExists,

                #[code = "RESOURCE_NAME_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`Resource` with the specified name exists \
                             already at the `Location`"]
                NameOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::LocationNotExists(_) => Error::LocationNotExists.into(),
            Self::NameOccupied(_) => Error::NameOccupied.into(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
        })
    }
}

impl AsError for command::set_operating_schedule::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "RESOURCE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Resource` with the specified ID does not exist"]
                ResourceNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
            Self::ResourceNotExists(_) => Error::ResourceNotExists.into(),
        })
    }
}

impl AsError for command::retire_resource::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "RESOURCE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Resource` with the specified ID does not exist \
                             or is retired already"]
                ResourceNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
            Self::ResourceAlreadyRetired(_) | Self::ResourceNotExists(_) => {
                Error::ResourceNotExists.into()
            }
        })
    }
}

impl AsError for command::create_closure::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "`startsOn` date must not be after `endsOn` date"]
                InvalidPeriod,

                #[code = "LOCATION_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Location` with the specified ID does not exist"]
                LocationNotExists,

                #[code = "RESOURCE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Resource` with the specified ID does not exist"]
                ResourceNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidPeriod { .. } => Error::InvalidPeriod.into(),
            Self::LocationNotExists(_) => Error::LocationNotExists.into(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
            Self::ResourceNotExists(_) => Error::ResourceNotExists.into(),
        })
    }
}

impl AsError for command::remove_closure::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CLOSURE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Closure` with the specified ID does not exist"]
                ClosureNotExists,
            }
        }

        Some(match self {
            Self::ClosureNotExists(_) => Error::ClosureNotExists.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
        })
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "`startsOn` date must not be after `endsOn` date"]
                InvalidPeriod,

                #[code = "LOCATION_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Location` with the specified ID does not exist"]
                LocationNotExists,

                #[code = "RESOURCE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Resource` with the specified ID does not exist"]
                ResourceNotExists,

                #[code = "RESOURCE_RETIRED"]
                #[status = CONFLICT]
                #[message = "`Resource` with the specified ID is retired"]
                ResourceRetired,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidPeriod { .. } => Error::InvalidPeriod.into(),
            Self::LocationNotExists(_) => Error::LocationNotExists.into(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
            Self::ResourceNotExists(_) => Error::ResourceNotExists.into(),
            Self::ResourceRetired(_) => Error::ResourceRetired.into(),
        })
    }
}

impl AsError for command::terminate_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CONTRACT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Contract` with the specified ID does not exist \
                             or is terminated already"]
                ContractNotExists,
            }
        }

        Some(match self {
            Self::ContractAlreadyTerminated(_) | Self::ContractNotExists(_) => {
                Error::ContractNotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::NotAnOperator(_) => api::PrivilegeError::Operator.into(),
        })
    }
}

impl AsError for command::confirm_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CONTRACT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Contract` with the specified ID does not exist"]
                ContractNotExists,

                #[code = "CONTRACT_NOT_OWNED"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `Customer` does not own the \
                             `Contract`"]
                ContractNotOwned,

                #[code = "INSUFFICIENT_ENTRIES"]
                #[status = CONFLICT]
                #[message = "`Contract` does not have enough remaining \
                             entries"]
                InsufficientEntries,

                #[code = "NO_RESOURCES"]
                #[status = NOT_FOUND]
                #[message = "No active `Resource` matches the `Contract` \
                             binding"]
                NoResources,

                #[code = "NOT_AN_ENTRY_PACKAGE"]
                #[status = CONFLICT]
                #[message = "`Contract` with the specified ID is not an \
                             entry package"]
                NotAnEntryPackage,

                #[code = "OUT_OF_CONTRACT_WINDOW"]
                #[status = CONFLICT]
                #[message = "Requested date is outside the `Contract` \
                             validity window"]
                OutOfContractWindow,

                #[code = "RESOURCE_NOT_COVERED"]
                #[status = CONFLICT]
                #[message = "Requested `Resource` is not covered by the \
                             `Contract`"]
                ResourceNotCovered,

                #[code = "RESOURCE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Resource` with the specified ID does not exist"]
                ResourceNotExists,

                #[code = "UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "Requested date cannot be served by the targeted \
                             `Resource`s"]
                Unavailable,
            }
        }

        Some(match self {
            Self::ContractNotExists(_) => Error::ContractNotExists.into(),
            Self::ContractNotOwned(_) => Error::ContractNotOwned.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::InsufficientEntries { .. } => {
                Error::InsufficientEntries.into()
            }
            Self::NoResources => Error::NoResources.into(),
            Self::NotAnEntryPackage(_) => Error::NotAnEntryPackage.into(),
            Self::OutOfContractWindow { .. } => {
                Error::OutOfContractWindow.into()
            }
            Self::ResourceNotCovered(_) => Error::ResourceNotCovered.into(),
            Self::ResourceNotExists(_) => Error::ResourceNotExists.into(),
            Self::Unavailable(_) => Error::Unavailable.into(),
        })
    }
}

impl AsError for command::cancel_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "RESERVATION_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Reservation` with the specified ID does not \
                             exist or is cancelled already"]
                ReservationNotExists,

                #[code = "RESERVATION_NOT_OWNED"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `Customer` does not own the \
                             `Reservation`"]
                ReservationNotOwned,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ReservationAlreadyCancelled(_)
            | Self::ReservationNotExists(_) => {
                Error::ReservationNotExists.into()
            }
            Self::ReservationNotOwned(_) => Error::ReservationNotOwned.into(),
            Self::ResourceNotExists(_) => return None,
        })
    }
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CONTRACT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Contract` with the specified ID does not exist"]
                ContractNotExists,

                #[code = "CONTRACT_NOT_OWNED"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `Customer` does not own the \
                             `Contract`"]
                ContractNotOwned,

                #[code = "INVALID_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "`startsOn` date must not be after `endsOn` date"]
                InvalidPeriod,

                #[code = "NO_RESOURCES"]
                #[status = NOT_FOUND]
                #[message = "No active `Resource` matches the `Contract` \
                             binding"]
                NoResources,

                #[code = "NOT_A_SUBSCRIPTION"]
                #[status = CONFLICT]
                #[message = "`Contract` with the specified ID is not a \
                             subscription"]
                NotASubscription,

                #[code = "OUT_OF_CONTRACT_WINDOW"]
                #[status = CONFLICT]
                #[message = "Requested period is outside the `Contract` \
                             validity window"]
                OutOfContractWindow,

                #[code = "RESOURCE_NOT_COVERED"]
                #[status = CONFLICT]
                #[message = "Requested `Resource` is not covered by the \
                             `Contract`"]
                ResourceNotCovered,

                #[code = "RESOURCE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Resource` with the specified ID does not exist"]
                ResourceNotExists,

                #[code = "UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "Requested period cannot be served by the \
                             targeted `Resource`s"]
                Unavailable,
            }
        }

        Some(match self {
            Self::ContractNotExists(_) => Error::ContractNotExists.into(),
            Self::ContractNotOwned(_) => Error::ContractNotOwned.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidPeriod { .. } => Error::InvalidPeriod.into(),
            Self::NoResources => Error::NoResources.into(),
            Self::NotASubscription(_) => Error::NotASubscription.into(),
            Self::OutOfContractWindow { .. } => {
                Error::OutOfContractWindow.into()
            }
            Self::ResourceNotCovered(_) => Error::ResourceNotCovered.into(),
            Self::ResourceNotExists(_) => Error::ResourceNotExists.into(),
            Self::Unavailable(_) => Error::Unavailable.into(),
        })
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the specified ID does not exist \
                             or is cancelled already"]
                BookingNotExists,

                #[code = "BOOKING_NOT_OWNED"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `Customer` does not own the \
                             `Booking`"]
                BookingNotOwned,
            }
        }

        Some(match self {
            Self::BookingAlreadyCancelled(_) | Self::BookingNotExists(_) => {
                Error::BookingNotExists.into()
            }
            Self::BookingNotOwned(_) => Error::BookingNotOwned.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::ResourceNotExists(_) => return None,
        })
    }
}

define_error! {
    enum BindingError {
        #[code = "INVALID_CONTRACT_BINDING"]
        #[status = BAD_REQUEST]
        #[message = "either a `resource`, or a `category` with a `location`, \
                     must be specified"]
        Invalid,
    }
}

define_error! {
    enum CapacityError {
        #[code = "INVALID_CAPACITY"]
        #[status = BAD_REQUEST]
        #[message = "`capacity` must be a positive number"]
        Invalid,
    }
}

define_error! {
    enum ScopeError {
        #[code = "INVALID_CLOSURE_SCOPE"]
        #[status = BAD_REQUEST]
        #[message = "either a `location`, or a `resource`, must be specified"]
        Invalid,
    }
}

define_error! {
    enum TermsError {
        #[code = "INVALID_CONTRACT_TERMS"]
        #[status = BAD_REQUEST]
        #[message = "`maxEntries` is required for entry package `Contract`s \
                     and forbidden for subscription ones"]
        Invalid,
    }
}
