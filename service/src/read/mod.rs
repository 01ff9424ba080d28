//! Read entities definitions.

pub mod booking;
pub mod calendar;
pub mod contract;
pub mod location;
pub mod reservation;
pub mod resource;

pub use self::calendar::Timeline;
