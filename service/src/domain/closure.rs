//! [`Closure`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateOf, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh3;

#[cfg(doc)]
use crate::domain::Location;
use crate::domain::{location, resource, Resource};

/// Period when a [`Location`] or a single [`Resource`] is closed and accepts
/// no reservations.
#[derive(Clone, Debug)]
pub struct Closure {
    /// ID of this [`Closure`].
    pub id: Id,

    /// [`Fingerprint`] of this [`Closure`] used for deduplication.
    pub fingerprint: Fingerprint,

    /// [`Scope`] this [`Closure`] applies to.
    pub scope: Scope,

    /// First closed [`Date`], inclusive.
    pub starts_on: StartDate,

    /// Last closed [`Date`], inclusive.
    pub ends_on: EndDate,

    /// [`Reason`] of this [`Closure`].
    pub reason: Reason,

    /// [`DateTime`] when this [`Closure`] was created.
    pub created_at: CreationDateTime,
}

impl Closure {
    /// Indicates whether this [`Closure`] covers the given [`Date`].
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.starts_on.coerce() <= date && date <= self.ends_on.coerce()
    }

    /// Indicates whether this [`Closure`] applies to the given [`Resource`].
    #[must_use]
    pub fn applies_to(&self, resource: &Resource) -> bool {
        match self.scope {
            Scope::Location(id) => id == resource.location_id,
            Scope::Resource(id) => id == resource.id,
        }
    }
}

/// ID of a [`Closure`].
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

/// Fingerprint of a [`Closure`] used for deduplication.
///
/// Registering an identical [`Closure`] twice yields the same
/// [`Fingerprint`], making the registration idempotent.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Fingerprint(Uuid);

impl Fingerprint {
    /// Calculates a new [`Fingerprint`] for a [`Closure`].
    #[must_use]
    pub fn new(
        scope: Scope,
        starts_on: StartDate,
        ends_on: EndDate,
        reason: &Reason,
    ) -> Self {
        use std::hash::Hash as _;

        // WARNING: Avoid changing the order of the fields in the hasher,
        //          because it will be a breaking change requiring to migrate
        //          all existing fingerprints in the database to the new
        //          format.
        let mut hasher = xxh3::Xxh3Builder::new().build();
        scope.hash(&mut hasher);
        starts_on.hash(&mut hasher);
        ends_on.hash(&mut hasher);
        reason.hash(&mut hasher);

        Self(Uuid::from_u128(hasher.digest128()))
    }
}

/// Scope of a [`Closure`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scope {
    /// [`Closure`] of a whole [`Location`], blocking every [`Resource`] in
    /// it.
    Location(location::Id),

    /// [`Closure`] of a single [`Resource`].
    Resource(resource::Id),
}

impl Scope {
    /// Returns [`ScopeKind`] of this [`Scope`].
    #[must_use]
    pub fn kind(self) -> ScopeKind {
        match self {
            Self::Location(_) => ScopeKind::Location,
            Self::Resource(_) => ScopeKind::Resource,
        }
    }

    /// Returns the target ID of this [`Scope`].
    #[must_use]
    pub fn id(self) -> Uuid {
        match self {
            Self::Location(id) => id.into(),
            Self::Resource(id) => id.into(),
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`Closure`]'s [`Scope`]."]
    enum ScopeKind {
        #[doc = "[`Scope::Location`] of a [`Closure`]."]
        Location = 1,

        #[doc = "[`Scope::Resource`] of a [`Closure`]."]
        Resource = 2,
    }
}

/// Reason of a [`Closure`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `reason` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Creates a new [`Reason`] if the given `reason` is valid.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        Self::check(&reason).then_some(Self(reason))
    }

    /// Checks whether the given `reason` is a valid [`Reason`].
    fn check(reason: impl AsRef<str>) -> bool {
        let reason = reason.as_ref();
        reason.trim() == reason && !reason.is_empty() && reason.len() <= 512
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

/// First [`Date`] covered by a [`Closure`].
pub type StartDate = DateOf<(Closure, unit::Start)>;

/// Last [`Date`] covered by a [`Closure`].
pub type EndDate = DateOf<(Closure, unit::End)>;

/// [`DateTime`] when a [`Closure`] was created.
pub type CreationDateTime = DateTimeOf<(Closure, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{Fingerprint, Reason, Scope};
    use crate::domain::{location, resource};

    fn date(s: &str) -> Date {
        Date::from_iso8601(s).unwrap()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let scope = Scope::Location(location::Id::new());
        let starts_on = date("2024-12-24").coerce();
        let ends_on = date("2024-12-26").coerce();
        let reason = Reason::new("Christmas").unwrap();

        assert_eq!(
            Fingerprint::new(scope, starts_on, ends_on, &reason),
            Fingerprint::new(scope, starts_on, ends_on, &reason),
        );
    }

    #[test]
    fn fingerprint_distinguishes_fields() {
        let scope = Scope::Resource(resource::Id::new());
        let starts_on = date("2024-12-24").coerce();
        let ends_on = date("2024-12-26").coerce();
        let reason = Reason::new("Christmas").unwrap();

        let base = Fingerprint::new(scope, starts_on, ends_on, &reason);

        assert_ne!(
            base,
            Fingerprint::new(
                Scope::Resource(resource::Id::new()),
                starts_on,
                ends_on,
                &reason,
            ),
        );
        assert_ne!(
            base,
            Fingerprint::new(
                scope,
                starts_on,
                date("2024-12-27").coerce(),
                &reason,
            ),
        );
        assert_ne!(
            base,
            Fingerprint::new(
                scope,
                starts_on,
                ends_on,
                &Reason::new("Maintenance").unwrap(),
            ),
        );
    }
}
