//! [`Query`] collection related to the calendar [`Timeline`].

use common::operations::By;

use crate::read::calendar;
#[cfg(doc)]
use crate::{domain::Location, Query};

use super::DatabaseQuery;

/// Queries a [`calendar::Timeline`] of a [`Location`] over a period.
///
/// Resolves to [`None`] whenever the [`Location`] doesn't exist.
pub type Timeline =
    DatabaseQuery<By<Option<calendar::Timeline>, calendar::Selector>>;
