//! [`Query`] collection related to [`OperatingSchedule`]s.

use common::operations::By;

use crate::domain::{resource, schedule::OperatingSchedule};
#[cfg(doc)]
use crate::{domain::Resource, Query};

use super::DatabaseQuery;

/// Queries the weekly [`OperatingSchedule`] rules of a [`Resource`].
///
/// [`schedule::Weekday`]s without an explicit rule are absent from the
/// result and count as open.
///
/// [`schedule::Weekday`]: crate::domain::schedule::Weekday
pub type ByResource = DatabaseQuery<By<Vec<OperatingSchedule>, resource::Id>>;
