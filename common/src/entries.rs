//! [`Entries`]-related definitions.

use std::{fmt, iter, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Amount of entries a contract grants or a reservation consumes.
///
/// Counted in halves: a full-day reservation weighs `1.0`, a half-day one
/// weighs `0.5`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Entries(Decimal);

impl Entries {
    /// No entries at all.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Weight of a half-day reservation.
    pub const HALF: Self = Self(Decimal::from_parts(5, 0, 0, false, 1));

    /// Weight of a full-day reservation.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Creates a new [`Entries`] by checking the provided value is
    /// non-negative and counted in halves.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        ((val % Self::HALF.0).is_zero() && !val.is_sign_negative())
            .then_some(Self(val))
    }

    /// Creates a new [`Entries`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be non-negative and counted in halves.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Adds the provided [`Entries`] to these ones.
    #[expect(clippy::missing_panics_doc, reason = "cannot overflow")]
    #[must_use]
    pub fn add(self, rhs: Self) -> Self {
        Self(self.0.checked_add(rhs.0).expect("`Entries` overflow"))
    }

    /// Subtracts the provided [`Entries`] from these ones, flooring the
    /// result at [`Entries::ZERO`].
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }

    /// Indicates whether these [`Entries`] cover the provided ones.
    #[must_use]
    pub fn covers(self, required: Self) -> bool {
        self.0 >= required.0
    }
}

impl fmt::Display for Entries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.to_i128().expect("integer"))
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Entries {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid entries value")
    }
}

impl iter::Sum for Entries {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::add)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative amount of entries counted in halves (`0.5` steps).
    #[graphql_scalar(with = Self, parse_token(String))]
    type Entries = super::Entries;

    impl Entries {
        fn to_output<S: ScalarValue>(e: &Entries) -> Value<S> {
            Value::scalar(e.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Entries` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Entries` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{iter, str::FromStr as _};

    use super::Entries;

    #[test]
    fn accepts_halves_only() {
        assert_eq!(Entries::from_str("0").unwrap(), Entries::ZERO);
        assert_eq!(Entries::from_str("0.5").unwrap(), Entries::HALF);
        assert_eq!(Entries::from_str("1").unwrap(), Entries::ONE);
        assert_eq!(
            Entries::from_str("1.0").unwrap(),
            Entries::ONE,
        );
        assert!(Entries::from_str("12.5").is_ok());

        assert!(Entries::from_str("-0.5").is_err());
        assert!(Entries::from_str("0.25").is_err());
        assert!(Entries::from_str("1.3").is_err());
        assert!(Entries::from_str("half").is_err());
    }

    #[test]
    fn adds_and_sums() {
        assert_eq!(Entries::HALF.add(Entries::HALF), Entries::ONE);
        assert_eq!(
            [Entries::ONE, Entries::HALF, Entries::HALF]
                .into_iter()
                .sum::<Entries>(),
            Entries::from_str("2").unwrap(),
        );
        assert_eq!(
            iter::empty::<Entries>().sum::<Entries>(),
            Entries::ZERO,
        );
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        assert_eq!(Entries::ONE.saturating_sub(Entries::HALF), Entries::HALF);
        assert_eq!(Entries::HALF.saturating_sub(Entries::HALF), Entries::ZERO);
        assert_eq!(Entries::HALF.saturating_sub(Entries::ONE), Entries::ZERO);
        assert_eq!(Entries::ZERO.saturating_sub(Entries::ONE), Entries::ZERO);
    }

    #[test]
    fn covers_compares_inclusively() {
        assert!(Entries::ONE.covers(Entries::ONE));
        assert!(Entries::ONE.covers(Entries::HALF));
        assert!(!Entries::HALF.covers(Entries::ONE));
        assert!(Entries::ZERO.covers(Entries::ZERO));
    }

    #[test]
    fn displays_without_trailing_zeros_for_integers() {
        assert_eq!(Entries::from_str("1.0").unwrap().to_string(), "1");
        assert_eq!(Entries::HALF.to_string(), "0.5");
        assert_eq!(Entries::from_str("10").unwrap().to_string(), "10");
    }
}
