//! [`Query`] collection related to a single [`Location`].

use common::operations::By;

use crate::domain::{location, Location};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Location`] by its [`location::Id`].
pub type ById = DatabaseQuery<By<Option<Location>, location::Id>>;
