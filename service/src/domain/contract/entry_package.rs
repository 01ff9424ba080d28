//! [`EntryPackage`] [`Contract`] definition.

#[cfg(doc)]
use common::DateTime;
use common::{Entries, Money};

use super::{
    Binding, CreationDateTime, EndDate, Id, StartDate, TerminationDateTime,
};
use crate::domain::customer;
#[cfg(doc)]
use crate::domain::{Contract, Reservation, Resource};

/// A [`Contract`] granting a prepaid balance of [`Entries`] to spend on
/// single-day [`Reservation`]s.
#[derive(Clone, Debug)]
pub struct EntryPackage {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the customer holding this [`Contract`].
    pub customer_id: customer::Id,

    /// [`Binding`] of this [`Contract`].
    pub binding: Binding,

    /// First [`common::Date`] this [`Contract`] is valid on.
    pub starts_on: StartDate,

    /// Last [`common::Date`] this [`Contract`] is valid on.
    pub ends_on: EndDate,

    /// Total [`Entries`] this [`Contract`] grants.
    pub max_entries: Entries,

    /// [`Entries`] already consumed by confirmed [`Reservation`]s.
    ///
    /// Kept as a stored running total, updated in the same transaction as
    /// the [`Reservation`] it accounts for.
    pub entries_used: Entries,

    /// Price this [`Contract`] was sold for.
    pub price: Money,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was terminated, if it was.
    pub terminated_at: Option<TerminationDateTime>,
}

impl EntryPackage {
    /// Returns the [`Entries`] still available to spend.
    #[must_use]
    pub fn remaining(&self) -> Entries {
        self.max_entries.saturating_sub(self.entries_used)
    }

    /// Records a confirmed [`Reservation`]'s `weight` against this
    /// [`Contract`]'s balance.
    pub fn record_usage(&mut self, weight: Entries) {
        self.entries_used = self.entries_used.add(weight);
    }

    /// Restores a cancelled [`Reservation`]'s `weight` back to this
    /// [`Contract`]'s balance, flooring the used total at zero.
    pub fn restore(&mut self, weight: Entries) {
        self.entries_used = self.entries_used.saturating_sub(weight);
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Entries};

    use super::{Binding, EntryPackage, Id};
    use crate::domain::{customer, resource};

    fn package(max_entries: &str) -> EntryPackage {
        EntryPackage {
            id: Id::new(),
            customer_id: customer::Id::new(),
            binding: Binding::Resource(resource::Id::new()),
            starts_on: Date::from_iso8601("2024-06-01").unwrap().coerce(),
            ends_on: Date::from_iso8601("2024-06-30").unwrap().coerce(),
            max_entries: max_entries.parse().unwrap(),
            entries_used: Entries::ZERO,
            price: "100GBP".parse().unwrap(),
            created_at: DateTime::now().coerce(),
            terminated_at: None,
        }
    }

    #[test]
    fn usage_and_restore_round_trip() {
        let mut p = package("2");

        p.record_usage(Entries::ONE);
        p.record_usage(Entries::HALF);
        assert_eq!(p.remaining(), Entries::HALF);

        p.restore(Entries::ONE);
        assert_eq!(p.remaining(), "1.5".parse::<Entries>().unwrap());

        p.record_usage(Entries::ONE);
        assert_eq!(p.remaining(), Entries::HALF);
    }

    #[test]
    fn half_of_an_entry_cannot_cover_a_full_day() {
        let mut p = package("1");
        p.record_usage(Entries::HALF);

        assert!(!p.remaining().covers(Entries::ONE));
        assert!(p.remaining().covers(Entries::HALF));
    }

    #[test]
    fn restore_floors_used_total_at_zero() {
        let mut p = package("2");

        p.record_usage(Entries::HALF);
        p.restore(Entries::ONE);

        assert_eq!(p.entries_used, Entries::ZERO);
        assert_eq!(p.remaining(), "2".parse::<Entries>().unwrap());
    }
}
