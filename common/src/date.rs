//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    iter, marker::PhantomData,
};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{
    format_description::BorrowedFormatItem, macros::format_description,
};

/// [ISO 8601] format of a [`Date`] (`YYYY-MM-DD`).
///
/// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
const ISO8601: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Basic [ISO 8601] format of a [`Date`] (`YYYYMMDD`), as used by
/// [RFC 5545] `DATE` values.
///
/// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
/// [RFC 5545]: https://datatracker.ietf.org/doc/html/rfc5545#section-3.3.4
const ISO8601_BASIC: &[BorrowedFormatItem<'_>] =
    format_description!("[year][month][day]");

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date without a time-of-day or an offset.
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`Date`] representing the current day in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc().date(),
            _of: PhantomData,
        }
    }

    /// Creates a new [`Date`] from the provided [ISO 8601] string
    /// (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [ISO 8601] date.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    pub fn from_iso8601(input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            inner: time::Date::parse(input, ISO8601).map_err(ParseError)?,
            _of: PhantomData,
        })
    }

    /// Returns the [`Date`] as an [ISO 8601] string (`YYYY-MM-DD`).
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.inner.format(ISO8601).unwrap_or_else(|e| {
            panic!("cannot format `Date` as ISO 8601: {e}")
        })
    }

    /// Returns the [`Date`] as a basic [ISO 8601] string (`YYYYMMDD`), as
    /// used by [RFC 5545] `DATE` values.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    /// [RFC 5545]: https://datatracker.ietf.org/doc/html/rfc5545#section-3.3.4
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso8601_basic(&self) -> String {
        self.inner.format(ISO8601_BASIC).unwrap_or_else(|e| {
            panic!("cannot format `Date` as basic ISO 8601: {e}")
        })
    }

    /// Returns the [`time::Weekday`] of this [`Date`].
    #[must_use]
    pub fn weekday(&self) -> time::Weekday {
        self.inner.weekday()
    }

    /// Returns the weekday index of this [`Date`], where `0` is Sunday and
    /// `6` is Saturday.
    #[must_use]
    pub fn weekday_index(&self) -> u8 {
        self.inner.weekday().number_days_from_sunday()
    }

    /// Returns the [`Date`] following this one, if representable.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        Some(Self {
            inner: self.inner.next_day()?,
            _of: PhantomData,
        })
    }

    /// Returns an [`Iterator`] over all the [`Date`]s from this one through
    /// the `last` one, both inclusive.
    ///
    /// Yields nothing if the `last` [`Date`] precedes this one.
    pub fn through(self, last: Self) -> impl Iterator<Item = Self> {
        iter::successors(
            (self <= last).then_some(self),
            move |d| d.next().filter(|next| *next <= last),
        )
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Hash for DateOf<Of> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(date: time::Date) -> Self {
        Self {
            inner: date,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateOf<Of> {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Ok(time::Date::from_sql(ty, raw)?.into())
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateOf<Of> {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in an [ISO 8601] `YYYY-MM-DD` format.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = crate::Date;

    impl Date {
        fn to_output<S: ScalarValue>(date: &Date) -> Value<S> {
            Value::scalar(date.to_iso8601())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_iso8601(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    fn date(s: &str) -> Date {
        Date::from_iso8601(s).unwrap()
    }

    #[test]
    fn parses_and_formats_iso8601() {
        assert_eq!(date("2024-06-10").to_iso8601(), "2024-06-10");
        assert_eq!(date("2024-02-29").to_iso8601(), "2024-02-29");

        assert!(Date::from_iso8601("2024-13-01").is_err());
        assert!(Date::from_iso8601("2023-02-29").is_err());
        assert!(Date::from_iso8601("10.06.2024").is_err());
        assert!(Date::from_iso8601("").is_err());
    }

    #[test]
    fn formats_basic_iso8601() {
        assert_eq!(date("2024-06-10").to_iso8601_basic(), "20240610");
        assert_eq!(date("2024-02-29").to_iso8601_basic(), "20240229");
    }

    #[test]
    fn weekday_index_counts_from_sunday() {
        // 2024-06-09 is a Sunday.
        assert_eq!(date("2024-06-09").weekday_index(), 0);
        assert_eq!(date("2024-06-10").weekday_index(), 1);
        assert_eq!(date("2024-06-15").weekday_index(), 6);
    }

    #[test]
    fn through_yields_inclusive_range() {
        let days = date("2024-06-28")
            .through(date("2024-07-02"))
            .map(|d| d.to_iso8601())
            .collect::<Vec<_>>();
        assert_eq!(
            days,
            [
                "2024-06-28",
                "2024-06-29",
                "2024-06-30",
                "2024-07-01",
                "2024-07-02",
            ],
        );

        let single = date("2024-06-10")
            .through(date("2024-06-10"))
            .collect::<Vec<_>>();
        assert_eq!(single, [date("2024-06-10")]);

        assert_eq!(
            date("2024-06-10").through(date("2024-06-09")).count(),
            0,
        );
    }
}
