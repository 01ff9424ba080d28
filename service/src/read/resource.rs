//! [`Resource`] read model definition.
//!
//! [`Resource`]: crate::domain::Resource

pub mod list {
    //! [`Resource`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{location, resource};
    #[cfg(doc)]
    use crate::domain::Resource;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = resource::Id;

    /// Cursor pointing to a specific [`Resource`] in a list.
    pub type Cursor = resource::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Location`] to list [`Resource`]s of.
        ///
        /// [`Location`]: crate::domain::Location
        pub location: Option<location::Id>,

        /// [`resource::Category`] to list [`Resource`]s of.
        pub category: Option<resource::Category>,

        /// [`resource::Name`] (or its part) to fuzzy search for.
        pub name: Option<resource::Name>,

        /// Filter by bookability: `true` keeps available non-retired
        /// [`Resource`]s only, `false` the rest.
        pub bookable: Option<bool>,
    }

    /// Total count of [`Resource`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
