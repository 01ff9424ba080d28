//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::DateTimeOf;
use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::domain::customer;

/// Customer session, carried as the claims of a bearer token issued by the
/// external identity provider.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the customer this [`Session`] belongs to.
    #[serde(rename = "sub")]
    pub customer_id: customer::Id,

    /// Display [`customer::Name`] of the customer.
    pub name: customer::Name,

    /// [`customer::Email`] notifications are sent to.
    pub email: customer::Email,

    /// [`customer::Role`] of the customer.
    pub role: customer::Role,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// Marker type indicating [`Session`] expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, Expiration)>;
