use std::future;

use common::{Date, DateTime, DateTimeOf, Money};
use futures::TryFutureExt as _;
use juniper::graphql_object;
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;

#[cfg(doc)]
use crate::api::Contract;
use crate::{api, AsError, Context, Error};

use super::{Binding, ContractValue, Id, Status};

/// [`Contract`] granting unlimited entries over its validity period.
#[derive(Clone, Debug)]
pub struct Subscription {
    /// ID of this [`Contract`].
    id: Id,

    /// Underlying [`domain::contract::Subscription`].
    contract: OnceCell<domain::contract::Subscription>,
}

impl From<domain::contract::Subscription> for Subscription {
    fn from(contract: domain::contract::Subscription) -> Self {
        Self {
            id: contract.id.into(),
            contract: OnceCell::new_with(Some(contract)),
        }
    }
}

impl Subscription {
    /// Creates a new [`Subscription`] [`Contract`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that provided ID relates to an existing
    /// [`domain::contract::Subscription`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            contract: OnceCell::new(),
        }
    }

    /// Returns [`domain::contract::Subscription`] representing this
    /// [`Contract`].
    ///
    /// # Errors
    ///
    /// Returns an error if the [`domain::contract::Subscription`] does not
    /// exist.
    async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&domain::contract::Subscription, Error> {
        self.contract
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::contract::ById::by(self.id.into()))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(match c {
                            Some(domain::Contract::Subscription(c)) => Ok(c),
                            _ => Err(api::query::ContractError::NotExists
                                .into()),
                        })
                    })
            })
            .await
    }
}

/// `Contract` granting unlimited entries over its validity period.
#[graphql_object(
    name = "SubscriptionContract",
    context = Context,
    impl = ContractValue,
)]
impl Subscription {
    /// Unique identifier of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Identifier of the customer this `Contract` is sold to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.customerId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer_id(
        &self,
        ctx: &Context,
    ) -> Result<api::customer::Id, Error> {
        Ok(self.contract(ctx).await?.customer_id.into())
    }

    /// What this `Contract` entitles the customer to book.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.binding",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn binding(&self, ctx: &Context) -> Result<Binding, Error> {
        Ok((&self.contract(ctx).await?.binding).into())
    }

    /// First `Date` this `Contract` is valid on, inclusive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.startsOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn starts_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.starts_on.coerce())
    }

    /// Last `Date` this `Contract` is valid on, inclusive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.endsOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ends_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.ends_on.coerce())
    }

    /// Price this `Contract` was sold for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.contract(ctx).await?.price)
    }

    /// Status of this `Contract` as of today.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        let contract = self.contract(ctx).await?.clone();
        Ok(domain::Contract::from(contract).status().into())
    }

    /// `DateTime` when this `Contract` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.contract(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Contract` was terminated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SubscriptionContract.terminatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn terminated_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self
            .contract(ctx)
            .await?
            .terminated_at
            .map(DateTimeOf::coerce))
    }
}
