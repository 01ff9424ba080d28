//! [`Query`] collection related to the multiple [`Resource`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Resource, Query};

use super::DatabaseQuery;

/// Queries a list of [`Resource`]s.
pub type List = DatabaseQuery<
    By<read::resource::list::Page, read::resource::list::Selector>,
>;

/// Queries total count of [`Resource`]s.
pub type TotalCount = DatabaseQuery<By<read::resource::list::TotalCount, ()>>;
