//! Background [`Task`]s definitions.

mod background;
pub mod purge_retired_resources;

pub use common::Handler as Task;

pub use self::{
    background::Background, purge_retired_resources::PurgeRetiredResources,
};
