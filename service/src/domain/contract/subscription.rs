//! [`Subscription`] [`Contract`] definition.

#[cfg(doc)]
use common::DateTime;
use common::Money;

use super::{
    Binding, CreationDateTime, EndDate, Id, StartDate, TerminationDateTime,
};
use crate::domain::customer;
#[cfg(doc)]
use crate::domain::{Booking, Contract, Resource};

/// A [`Contract`] entitling date-range [`Booking`]s of a [`Resource`] for
/// its validity period.
///
/// Subscriptions carry no entry balance: a [`Booking`] under one is limited
/// by the [`Contract`]'s validity range only.
#[derive(Clone, Debug)]
pub struct Subscription {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the customer holding this [`Contract`].
    pub customer_id: customer::Id,

    /// [`Binding`] of this [`Contract`].
    pub binding: Binding,

    /// First [`common::Date`] this [`Contract`] is valid on.
    pub starts_on: StartDate,

    /// Last [`common::Date`] this [`Contract`] is valid on.
    pub ends_on: EndDate,

    /// Price this [`Contract`] was sold for.
    pub price: Money,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was terminated, if it was.
    pub terminated_at: Option<TerminationDateTime>,
}
