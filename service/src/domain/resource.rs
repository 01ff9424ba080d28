//! [`Resource`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Entries};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::location;
#[cfg(doc)]
use crate::domain::{Location, Reservation};

/// Bookable resource of a [`Location`], such as a desk or a meeting room.
#[derive(Clone, Debug)]
pub struct Resource {
    /// ID of this [`Resource`].
    pub id: Id,

    /// ID of the [`Location`] hosting this [`Resource`].
    pub location_id: location::Id,

    /// [`Name`] of this [`Resource`], unique within its [`Location`].
    pub name: Name,

    /// [`Category`] of this [`Resource`].
    pub category: Category,

    /// [`Capacity`] of this [`Resource`].
    pub capacity: Capacity,

    /// Indicator whether this [`Resource`] accepts new [`Reservation`]s.
    pub is_available: bool,

    /// [`DateTime`] when this [`Resource`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Resource`] was retired, if it was.
    pub retired_at: Option<RetirementDateTime>,
}

impl Resource {
    /// Indicates whether this [`Resource`] may receive new [`Reservation`]s.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.is_available && self.retired_at.is_none()
    }

    /// Retires this [`Resource`], making it unavailable for new
    /// [`Reservation`]s.
    ///
    /// Existing [`Reservation`]s are kept untouched.
    pub fn retire(&mut self, at: RetirementDateTime) {
        self.is_available = false;
        self.retired_at = Some(at);
    }
}

/// ID of a [`Resource`].
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

/// Name of a [`Resource`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Category of a [`Resource`], such as `desk` or `meeting-room`.
///
/// Categories are free-form: a [`Location`] decides itself how to classify
/// its [`Resource`]s.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `category` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(category: impl Into<String>) -> Self {
        Self(category.into())
    }

    /// Creates a new [`Category`] if the given `category` is valid.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Option<Self> {
        let category = category.into();
        Self::check(&category).then_some(Self(category))
    }

    /// Checks whether the given `category` is a valid [`Category`].
    fn check(category: impl AsRef<str>) -> bool {
        let category = category.as_ref();
        category.trim() == category
            && !category.is_empty()
            && category.len() <= 512
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

/// Capacity of a [`Resource`]: how many simultaneous full-day
/// [`Reservation`]s it holds.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Capacity(i32);

impl Capacity {
    /// Creates a new [`Capacity`] if the given `value` is positive.
    #[must_use]
    pub fn new(value: i32) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    /// Returns this [`Capacity`] as an [`Entries`] amount.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn as_entries(self) -> Entries {
        Entries::new(Decimal::from(self.0)).expect("whole number")
    }
}

/// [`DateTime`] when a [`Resource`] was created.
pub type CreationDateTime = DateTimeOf<(Resource, unit::Creation)>;

/// [`DateTime`] when a [`Resource`] was retired.
pub type RetirementDateTime = DateTimeOf<(Resource, unit::Retirement)>;
