use std::future;

use common::{Date, DateTime, DateTimeOf, Entries, Money};
use futures::TryFutureExt as _;
use juniper::graphql_object;
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;

#[cfg(doc)]
use crate::api::Contract;
use crate::{api, AsError, Context, Error};

use super::{Binding, ContractValue, Id, Status};

/// [`Contract`] selling a prepaid package of entries.
#[derive(Clone, Debug)]
pub struct EntryPackage {
    /// ID of this [`Contract`].
    id: Id,

    /// Underlying [`domain::contract::EntryPackage`].
    contract: OnceCell<domain::contract::EntryPackage>,
}

impl From<domain::contract::EntryPackage> for EntryPackage {
    fn from(contract: domain::contract::EntryPackage) -> Self {
        Self {
            id: contract.id.into(),
            contract: OnceCell::new_with(Some(contract)),
        }
    }
}

impl EntryPackage {
    /// Creates a new [`EntryPackage`] [`Contract`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that provided ID relates to an existing
    /// [`domain::contract::EntryPackage`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            contract: OnceCell::new(),
        }
    }

    /// Returns [`domain::contract::EntryPackage`] representing this
    /// [`Contract`].
    ///
    /// # Errors
    ///
    /// Returns an error if the [`domain::contract::EntryPackage`] does not
    /// exist.
    async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&domain::contract::EntryPackage, Error> {
        self.contract
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::contract::ById::by(self.id.into()))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(match c {
                            Some(domain::Contract::EntryPackage(c)) => Ok(c),
                            _ => Err(api::query::ContractError::NotExists
                                .into()),
                        })
                    })
            })
            .await
    }
}

/// `Contract` selling a prepaid package of entries.
#[graphql_object(
    name = "EntryPackageContract",
    context = Context,
    impl = ContractValue,
)]
impl EntryPackage {
    /// Unique identifier of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "EntryPackageContract.id",
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
            gql.name = "EntryPackageContract.customerId",
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
            gql.name = "EntryPackageContract.binding",
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
            gql.name = "EntryPackageContract.startsOn",
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
            gql.name = "EntryPackageContract.endsOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ends_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.ends_on.coerce())
    }

    /// Total entries this `Contract` grants.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "EntryPackageContract.maxEntries",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn max_entries(&self, ctx: &Context) -> Result<Entries, Error> {
        Ok(self.contract(ctx).await?.max_entries)
    }

    /// Entries already consumed by confirmed reservations.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "EntryPackageContract.entriesUsed",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn entries_used(&self, ctx: &Context) -> Result<Entries, Error> {
        Ok(self.contract(ctx).await?.entries_used)
    }

    /// Entries still available for reservations.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "EntryPackageContract.remainingEntries",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn remaining_entries(
        &self,
        ctx: &Context,
    ) -> Result<Entries, Error> {
        Ok(self.contract(ctx).await?.remaining())
    }

    /// Price this `Contract` was sold for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "EntryPackageContract.price",
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
            gql.name = "EntryPackageContract.status",
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
            gql.name = "EntryPackageContract.createdAt",
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
            gql.name = "EntryPackageContract.terminatedAt",
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
