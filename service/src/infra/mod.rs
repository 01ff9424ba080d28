//! Infrastructure layer.

pub mod database;
pub mod smtp;

pub use self::{database::Database, smtp::Mailer};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
