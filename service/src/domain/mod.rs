//! Domain definitions.

pub mod availability;
pub mod booking;
pub mod closure;
pub mod contract;
pub mod customer;
pub mod location;
pub mod reservation;
pub mod resource;
pub mod schedule;

pub use self::{
    booking::Booking, closure::Closure, contract::Contract,
    location::Location, reservation::Reservation, resource::Resource,
    schedule::OperatingSchedule,
};
