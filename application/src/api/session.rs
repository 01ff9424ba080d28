//! [`Session`]-related definitions.

use common::DateTime;
use derive_more::From;
use juniper::graphql_object;

use crate::{api, context, Context};

/// Authenticated customer session, echoed back to the client.
#[derive(Clone, Debug, From)]
pub struct Session(context::Session);

/// Authenticated customer session.
#[graphql_object(context = Context)]
impl Session {
    /// Identifier of the customer this `Session` belongs to.
    #[must_use]
    pub fn customer_id(&self) -> api::customer::Id {
        self.0.claims.customer_id.into()
    }

    /// Display name of the customer.
    #[must_use]
    pub fn name(&self) -> api::customer::Name {
        self.0.claims.name.clone().into()
    }

    /// Email address notifications are sent to.
    #[must_use]
    pub fn email(&self) -> api::customer::Email {
        self.0.claims.email.clone().into()
    }

    /// Role of the customer.
    #[must_use]
    pub fn role(&self) -> api::customer::Role {
        self.0.claims.role.into()
    }

    /// `DateTime` when this `Session` expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime {
        self.0.claims.expires_at.coerce()
    }
}
