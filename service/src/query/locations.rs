//! [`Query`] collection related to the multiple [`Location`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Location, Query};

use super::DatabaseQuery;

/// Queries a list of [`Location`]s.
pub type List = DatabaseQuery<
    By<read::location::list::Page, read::location::list::Selector>,
>;

/// Queries total count of [`Location`]s.
pub type TotalCount = DatabaseQuery<By<read::location::list::TotalCount, ()>>;
