//! [`Contract`]-related definitions.

mod entry_package;
mod subscription;

use common::{Date, DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLInterface, GraphQLUnion};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

pub use self::{entry_package::EntryPackage, subscription::Subscription};

/// Contract entitling a customer to book resources.
#[derive(Clone, Debug, GraphQLInterface)]
#[graphql(
    context = Context,
    for = [
        EntryPackage,
        Subscription,
    ]
)]
pub struct Contract {
    /// Unique identifier of the `Contract`.
    id: Id,

    /// Identifier of the customer the `Contract` is sold to.
    customer_id: api::customer::Id,

    /// What the `Contract` entitles the customer to book.
    binding: Binding,

    /// First `Date` the `Contract` is valid on, inclusive.
    starts_on: Date,

    /// Last `Date` the `Contract` is valid on, inclusive.
    ends_on: Date,

    /// Price the `Contract` was sold for.
    price: Money,

    /// Status of the `Contract` as of today.
    status: Status,

    /// `DateTime` when this `Contract` was created.
    created_at: DateTime,

    /// `DateTime` when this `Contract` was terminated.
    terminated_at: Option<DateTime>,
}

impl From<domain::Contract> for ContractValue {
    fn from(contract: domain::Contract) -> Self {
        use domain::Contract;
        match contract {
            Contract::EntryPackage(c) => Self::EntryPackage(c.into()),
            Contract::Subscription(c) => Self::Subscription(c.into()),
        }
    }
}

impl ContractValue {
    /// Creates a new [`ContractValue`] from the provided [`Id`] and [`Kind`].
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Contract`] with the provided ID exists,
    /// otherwise accessing this [`Contract`] will result with an error.
    ///
    /// [`Kind`]: domain::contract::Kind
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(
        id: impl Into<Id>,
        kind: domain::contract::Kind,
    ) -> Self {
        use domain::contract::Kind;
        match kind {
            Kind::EntryPackage => {
                Self::EntryPackage(EntryPackage::new_unchecked(id))
            }
            Kind::Subscription => {
                Self::Subscription(Subscription::new_unchecked(id))
            }
        }
    }
}

/// Unique identifier of a `Contract`.
#[derive(Clone, Copy, Debug, Display, Into, From, juniper::GraphQLScalar)]
#[from(domain::contract::Id)]
#[into(domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(Uuid);

/// Kind of a `Contract`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ContractKind")]
pub enum Kind {
    /// A prepaid package of entries.
    EntryPackage,

    /// A subscription with unlimited entries.
    Subscription,
}

impl From<domain::contract::Kind> for Kind {
    fn from(kind: domain::contract::Kind) -> Self {
        use domain::contract::Kind as K;
        match kind {
            K::EntryPackage => Self::EntryPackage,
            K::Subscription => Self::Subscription,
        }
    }
}

impl From<Kind> for domain::contract::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::EntryPackage => Self::EntryPackage,
            Kind::Subscription => Self::Subscription,
        }
    }
}

/// Status of a `Contract`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ContractStatus")]
pub enum Status {
    /// The `Contract`'s validity range hasn't started yet.
    Pending,

    /// The `Contract` is active.
    Active,

    /// The `Contract`'s validity range has passed.
    Expired,

    /// The `Contract` is terminated.
    Terminated,
}

impl From<domain::contract::Status> for Status {
    fn from(status: domain::contract::Status) -> Self {
        use domain::contract::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Active => Self::Active,
            S::Expired => Self::Expired,
            S::Terminated => Self::Terminated,
        }
    }
}

/// What a `Contract` entitles the customer to book.
#[derive(Clone, Debug, From, GraphQLUnion)]
#[graphql(name = "ContractBinding", context = Context)]
pub enum Binding {
    /// Binding to a single `Resource`.
    Resource(ResourceBinding),

    /// Binding to a category of resources at a `Location`.
    Category(CategoryBinding),
}

impl From<&domain::contract::Binding> for Binding {
    fn from(binding: &domain::contract::Binding) -> Self {
        use domain::contract::Binding as B;
        match binding {
            B::Resource(id) => {
                #[expect(
                    unsafe_code,
                    reason = "`Binding` loaded from repository guarantees \
                              `Resource` existence"
                )]
                Self::Resource(ResourceBinding {
                    resource: unsafe { api::Resource::new_unchecked(*id) },
                })
            }
            B::Category { category, location } => {
                #[expect(
                    unsafe_code,
                    reason = "`Binding` loaded from repository guarantees \
                              `Location` existence"
                )]
                Self::Category(CategoryBinding {
                    category: category.clone().into(),
                    location: unsafe {
                        api::Location::new_unchecked(*location)
                    },
                })
            }
        }
    }
}

/// Binding of a `Contract` to a single `Resource`.
#[derive(Clone, Debug)]
pub struct ResourceBinding {
    /// Bound [`api::Resource`].
    resource: api::Resource,
}

/// Binding of a `Contract` to a single `Resource`.
#[graphql_object(name = "ContractResourceBinding", context = Context)]
impl ResourceBinding {
    /// The bound `Resource`.
    #[must_use]
    pub fn resource(&self) -> &api::Resource {
        &self.resource
    }
}

/// Binding of a `Contract` to a category of resources at a `Location`.
#[derive(Clone, Debug)]
pub struct CategoryBinding {
    /// Bound [`api::resource::Category`].
    category: api::resource::Category,

    /// [`api::Location`] the category is bound at.
    location: api::Location,
}

/// Binding of a `Contract` to a category of resources at a `Location`.
#[graphql_object(name = "ContractCategoryBinding", context = Context)]
impl CategoryBinding {
    /// The bound category.
    #[must_use]
    pub fn category(&self) -> &api::resource::Category {
        &self.category
    }

    /// The `Location` the category is bound at.
    #[must_use]
    pub fn location(&self) -> &api::Location {
        &self.location
    }
}

pub mod list {
    //! Definitions related to the [`Contract`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    #[cfg(doc)]
    use crate::api::Contract;
    use crate::{api::scalar, AsError, Context, Error};

    use super::{ContractValue, Id};

    /// Cursor for the `Contract` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::contract::list::Cursor)]
    #[graphql(
        name = "ContractListCursor",
        with = scalar::Via::<read::contract::list::Cursor>,
    )]
    pub struct Cursor(pub read::contract::list::Cursor);

    /// Edge in the [`Contract`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::contract::list::Edge);

    /// Edge in the `Contract` list.
    #[graphql_object(name = "ContractListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ContractListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ContractListEdge`.
        #[must_use]
        pub fn node(&self) -> ContractValue {
            let (id, kind) = self.0.node;

            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Contract` existence"
            )]
            unsafe {
                ContractValue::new_unchecked(id, kind)
            }
        }
    }

    /// Connection of the [`Contract`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::contract::list::Page`].
        page: read::contract::list::Page,

        /// Filter the page was selected with.
        filter: read::contract::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] over the page selected with the
        /// provided filter.
        #[must_use]
        pub fn new(
            page: read::contract::list::Page,
            filter: read::contract::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Contract` list.
    #[graphql_object(name = "ContractListConnection", context = Context)]
    impl Connection {
        /// Edges in this `ContractListConnection`.
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
        /// Underlying [`read::contract::list::PageInfo`].
        info: read::contract::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// Filter the page was selected with.
        filter: read::contract::list::Filter,
    }

    /// Information about a `ContractListConnection` page.
    #[graphql_object(name = "ContractListPageInfo", context = Context)]
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

        /// Total count of the matching `Contract`s.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::contracts::TotalCount::by(
                    self.filter.clone(),
                ))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
