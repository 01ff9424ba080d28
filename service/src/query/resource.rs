//! [`Query`] collection related to a single [`Resource`].

use common::operations::By;

use crate::domain::{resource, Resource};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Resource`] by its [`resource::Id`].
pub type ById = DatabaseQuery<By<Option<Resource>, resource::Id>>;
