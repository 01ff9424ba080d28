//! [`Booking`] read model definition.
//!
//! [`Booking`]: crate::domain::Booking

pub mod list {
    //! [`Booking`]s list definitions.

    use std::ops::RangeInclusive;

    use common::{define_pagination, Date};
    use derive_more::{From, Into};

    use crate::domain::{booking, contract, customer, resource};
    #[cfg(doc)]
    use crate::domain::Booking;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = booking::Id;

    /// Cursor pointing to a specific [`Booking`] in a list.
    pub type Cursor = booking::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the customer to list [`Booking`]s of.
        pub customer: Option<customer::Id>,

        /// ID of the [`Resource`] to list [`Booking`]s of.
        ///
        /// [`Resource`]: crate::domain::Resource
        pub resource: Option<resource::Id>,

        /// ID of the [`Contract`] to list [`Booking`]s of.
        ///
        /// [`Contract`]: crate::domain::Contract
        pub contract: Option<contract::Id>,

        /// Inclusive range of [`Date`]s [`Booking`]s must overlap.
        pub dates: Option<RangeInclusive<Date>>,

        /// [`booking::Status`] to filter by.
        pub status: Option<booking::Status>,
    }

    /// Total count of [`Booking`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
