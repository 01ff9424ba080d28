//! [`Contract`] read model definition.
//!
//! [`Contract`]: crate::domain::Contract

pub mod list {
    //! [`Contract`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{contract, customer};
    #[cfg(doc)]
    use crate::domain::Contract;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = (contract::Id, contract::Kind);

    /// Cursor pointing to a specific [`Contract`] in a list.
    pub type Cursor = contract::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the customer to list [`Contract`]s of.
        pub customer: Option<customer::Id>,

        /// [`contract::Kind`] to filter by.
        pub kind: Option<contract::Kind>,
    }

    /// Total count of [`Contract`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
