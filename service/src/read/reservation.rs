//! [`Reservation`] read model definition.
//!
//! [`Reservation`]: crate::domain::Reservation

pub mod list {
    //! [`Reservation`]s list definitions.

    use std::ops::RangeInclusive;

    use common::{define_pagination, Date};
    use derive_more::{From, Into};

    use crate::domain::{contract, customer, reservation, resource};
    #[cfg(doc)]
    use crate::domain::Reservation;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = reservation::Id;

    /// Cursor pointing to a specific [`Reservation`] in a list.
    pub type Cursor = reservation::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the customer to list [`Reservation`]s of.
        pub customer: Option<customer::Id>,

        /// ID of the [`Resource`] to list [`Reservation`]s of.
        ///
        /// [`Resource`]: crate::domain::Resource
        pub resource: Option<resource::Id>,

        /// ID of the [`Contract`] to list [`Reservation`]s of.
        ///
        /// [`Contract`]: crate::domain::Contract
        pub contract: Option<contract::Id>,

        /// Inclusive range of [`Date`]s to keep [`Reservation`]s within.
        pub dates: Option<RangeInclusive<Date>>,

        /// [`reservation::Status`] to filter by.
        pub status: Option<reservation::Status>,
    }

    /// Total count of [`Reservation`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
