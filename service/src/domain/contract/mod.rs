//! [`Contract`] definitions.

pub mod entry_package;
pub mod subscription;

use common::{define_kind, unit, Date, DateOf, DateTimeOf, Money};
#[cfg(doc)]
use common::{DateTime, Entries};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, location, resource, Resource};
#[cfg(doc)]
use crate::domain::{Booking, Location, Reservation};

pub use self::{entry_package::EntryPackage, subscription::Subscription};

/// Contract entitling a customer to book [`Resource`]s.
#[derive(Clone, Debug, From)]
pub enum Contract {
    #[doc(hidden)]
    EntryPackage(EntryPackage),
    #[doc(hidden)]
    Subscription(Subscription),
}

impl Contract {
    /// Returns ID of this [`Contract`].
    #[must_use]
    pub fn id(&self) -> Id {
        match self {
            Self::EntryPackage(c) => c.id,
            Self::Subscription(c) => c.id,
        }
    }

    /// Returns [`Kind`] of this [`Contract`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::EntryPackage(_) => Kind::EntryPackage,
            Self::Subscription(_) => Kind::Subscription,
        }
    }

    /// Returns ID of the customer holding this [`Contract`].
    #[must_use]
    pub fn customer_id(&self) -> customer::Id {
        match self {
            Self::EntryPackage(c) => c.customer_id,
            Self::Subscription(c) => c.customer_id,
        }
    }

    /// Returns [`Binding`] of this [`Contract`].
    #[must_use]
    pub fn binding(&self) -> &Binding {
        match self {
            Self::EntryPackage(c) => &c.binding,
            Self::Subscription(c) => &c.binding,
        }
    }

    /// Returns the first [`Date`] this [`Contract`] is valid on.
    #[must_use]
    pub fn starts_on(&self) -> StartDate {
        match self {
            Self::EntryPackage(c) => c.starts_on,
            Self::Subscription(c) => c.starts_on,
        }
    }

    /// Returns the last [`Date`] this [`Contract`] is valid on.
    #[must_use]
    pub fn ends_on(&self) -> EndDate {
        match self {
            Self::EntryPackage(c) => c.ends_on,
            Self::Subscription(c) => c.ends_on,
        }
    }

    /// Returns the price this [`Contract`] was sold for.
    #[must_use]
    pub fn price(&self) -> Money {
        match self {
            Self::EntryPackage(c) => c.price,
            Self::Subscription(c) => c.price,
        }
    }

    /// Returns [`DateTime`] when this [`Contract`] was created.
    #[must_use]
    pub fn created_at(&self) -> CreationDateTime {
        match self {
            Self::EntryPackage(c) => c.created_at,
            Self::Subscription(c) => c.created_at,
        }
    }

    /// Returns [`DateTime`] when this [`Contract`] was terminated, if it was.
    #[must_use]
    pub fn terminated_at(&self) -> Option<TerminationDateTime> {
        match self {
            Self::EntryPackage(c) => c.terminated_at,
            Self::Subscription(c) => c.terminated_at,
        }
    }

    /// Returns [`DateTime`] when this [`Contract`] was terminated, if it was.
    #[must_use]
    pub fn terminated_at_mut(&mut self) -> &mut Option<TerminationDateTime> {
        match self {
            Self::EntryPackage(c) => &mut c.terminated_at,
            Self::Subscription(c) => &mut c.terminated_at,
        }
    }

    /// Returns [`Status`] of this [`Contract`] as of today.
    #[must_use]
    pub fn status(&self) -> Status {
        use Status as S;

        if self.terminated_at().is_some() {
            return S::Terminated;
        }

        let today = Date::today();
        if today < self.starts_on().coerce() {
            return S::Pending;
        }
        if today > self.ends_on().coerce() {
            return S::Expired;
        }

        S::Active
    }

    /// Indicates whether this [`Contract`] is active on the given [`Date`]:
    /// the [`Date`] lies in its validity range and it's not terminated.
    #[must_use]
    pub fn is_active_on(&self, date: Date) -> bool {
        self.terminated_at().is_none()
            && self.starts_on().coerce() <= date
            && date <= self.ends_on().coerce()
    }

    /// Indicates whether this [`Contract`] entitles booking the given
    /// [`Resource`].
    #[must_use]
    pub fn applies_to(&self, resource: &Resource) -> bool {
        self.binding().applies_to(resource)
    }
}

/// ID of a [`Contract`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// What a [`Contract`] binds to: the [`Resource`]s it entitles booking.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Binding {
    /// One exact [`Resource`].
    Resource(resource::Id),

    /// Any [`Resource`] of the [`resource::Category`] at the [`Location`].
    Category {
        /// [`resource::Category`] of the entitled [`Resource`]s.
        category: resource::Category,

        /// ID of the [`Location`] hosting the entitled [`Resource`]s.
        location: location::Id,
    },
}

impl Binding {
    /// Returns [`BindingKind`] of this [`Binding`].
    #[must_use]
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Resource(_) => BindingKind::Resource,
            Self::Category { .. } => BindingKind::Category,
        }
    }

    /// Indicates whether this [`Binding`] entitles booking the given
    /// [`Resource`].
    #[must_use]
    pub fn applies_to(&self, resource: &Resource) -> bool {
        match self {
            Self::Resource(id) => *id == resource.id,
            Self::Category { category, location } => {
                *category == resource.category
                    && *location == resource.location_id
            }
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`Contract`]."]
    enum Kind {
        #[doc = "[`EntryPackage`] [`Contract`]."]
        EntryPackage = 1,

        #[doc = "[`Subscription`] [`Contract`]."]
        Subscription = 2,
    }
}

define_kind! {
    #[doc = "Kind of a [`Contract`]'s [`Binding`]."]
    enum BindingKind {
        #[doc = "[`Binding::Resource`] of a [`Contract`]."]
        Resource = 1,

        #[doc = "[`Binding::Category`] of a [`Contract`]."]
        Category = 2,
    }
}

/// Status of a [`Contract`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Status {
    /// The [`Contract`]'s validity range hasn't started yet.
    Pending = 1,

    /// The [`Contract`] is active.
    Active = 2,

    /// The [`Contract`]'s validity range has passed.
    Expired = 3,

    /// The [`Contract`] is terminated.
    Terminated = 4,
}

/// First [`Date`] a [`Contract`] is valid on.
pub type StartDate = DateOf<(Contract, unit::Start)>;

/// Last [`Date`] a [`Contract`] is valid on.
pub type EndDate = DateOf<(Contract, unit::End)>;

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] was terminated.
pub type TerminationDateTime = DateTimeOf<(Contract, unit::Termination)>;

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{Binding, Contract, EntryPackage};
    use crate::domain::{customer, location, resource};

    fn date(s: &str) -> Date {
        Date::from_iso8601(s).unwrap()
    }

    fn package() -> EntryPackage {
        EntryPackage {
            id: super::Id::new(),
            customer_id: customer::Id::new(),
            binding: Binding::Resource(resource::Id::new()),
            starts_on: date("2024-06-01").coerce(),
            ends_on: date("2024-06-30").coerce(),
            max_entries: "10".parse().unwrap(),
            entries_used: "0".parse().unwrap(),
            price: "100GBP".parse().unwrap(),
            created_at: common::DateTime::now().coerce(),
            terminated_at: None,
        }
    }

    #[test]
    fn active_within_validity_range_only() {
        let contract = Contract::from(package());

        assert!(contract.is_active_on(date("2024-06-01")));
        assert!(contract.is_active_on(date("2024-06-15")));
        assert!(contract.is_active_on(date("2024-06-30")));

        assert!(!contract.is_active_on(date("2024-05-31")));
        assert!(!contract.is_active_on(date("2024-07-01")));
    }

    #[test]
    fn terminated_is_never_active() {
        let mut contract = Contract::from(package());
        *contract.terminated_at_mut() =
            Some(common::DateTime::now().coerce());

        assert!(!contract.is_active_on(date("2024-06-15")));
    }

    #[test]
    fn binding_applies_to_matching_resources() {
        let location = location::Id::new();
        let resource = resource::Resource {
            id: resource::Id::new(),
            location_id: location,
            name: resource::Name::new("Desk A").unwrap(),
            category: resource::Category::new("desk").unwrap(),
            capacity: resource::Capacity::new(1).unwrap(),
            is_available: true,
            created_at: common::DateTime::now().coerce(),
            retired_at: None,
        };

        assert!(Binding::Resource(resource.id).applies_to(&resource));
        assert!(!Binding::Resource(resource::Id::new())
            .applies_to(&resource));

        assert!(Binding::Category {
            category: resource::Category::new("desk").unwrap(),
            location,
        }
        .applies_to(&resource));
        assert!(!Binding::Category {
            category: resource::Category::new("meeting-room").unwrap(),
            location,
        }
        .applies_to(&resource));
        assert!(!Binding::Category {
            category: resource::Category::new("desk").unwrap(),
            location: location::Id::new(),
        }
        .applies_to(&resource));
    }
}
