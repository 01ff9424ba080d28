//! [`Location`] read model definition.
//!
//! [`Location`]: crate::domain::Location

pub mod list {
    //! [`Location`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::location;
    #[cfg(doc)]
    use crate::domain::Location;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = location::Id;

    /// Cursor pointing to a specific [`Location`] in a list.
    pub type Cursor = location::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`location::Name`] (or its part) to fuzzy search for.
        pub name: Option<location::Name>,
    }

    /// Total count of [`Location`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
