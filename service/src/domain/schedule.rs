//! [`OperatingSchedule`] definitions.

use common::{define_kind, Date};

use crate::domain::resource;
#[cfg(doc)]
use crate::domain::Resource;

/// Weekly operating rule of a [`Resource`]: whether it accepts reservations
/// on the given [`Weekday`].
///
/// At most one rule exists per ([`Resource`], [`Weekday`]) pair.
#[derive(Clone, Copy, Debug)]
pub struct OperatingSchedule {
    /// ID of the [`Resource`] this [`OperatingSchedule`] applies to.
    pub resource_id: resource::Id,

    /// [`Weekday`] this [`OperatingSchedule`] applies to.
    pub weekday: Weekday,

    /// Indicator whether the [`Resource`] is closed on the [`Weekday`].
    pub is_closed: bool,
}

define_kind! {
    #[doc = "Day of a week, stored as `0` (Sunday) through `6` (Saturday)."]
    enum Weekday {
        #[doc = "Sunday."]
        Sunday = 0,

        #[doc = "Monday."]
        Monday = 1,

        #[doc = "Tuesday."]
        Tuesday = 2,

        #[doc = "Wednesday."]
        Wednesday = 3,

        #[doc = "Thursday."]
        Thursday = 4,

        #[doc = "Friday."]
        Friday = 5,

        #[doc = "Saturday."]
        Saturday = 6,
    }
}

impl Weekday {
    /// Returns the [`Weekday`] the given [`Date`] falls on.
    #[must_use]
    pub fn of(date: Date) -> Self {
        match date.weekday_index() {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use super::Weekday;

    #[test]
    fn weekday_of_date() {
        // 2024-06-09 is a Sunday.
        let sunday = Date::from_iso8601("2024-06-09").unwrap();

        assert_eq!(Weekday::of(sunday), Weekday::Sunday);
        assert_eq!(Weekday::of(sunday.next().unwrap()), Weekday::Monday);
        assert_eq!(
            Weekday::of(Date::from_iso8601("2024-06-15").unwrap()),
            Weekday::Saturday,
        );
    }

    #[test]
    fn weekday_u8_matches_storage_convention() {
        assert_eq!(Weekday::Sunday.u8(), 0);
        assert_eq!(Weekday::Saturday.u8(), 6);
    }
}
