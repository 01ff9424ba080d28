//! [`Command`] definition.

pub mod authorize_session;
pub mod cancel_booking;
pub mod cancel_reservation;
pub mod confirm_reservation;
pub mod create_booking;
pub mod create_closure;
pub mod create_contract;
pub mod create_location;
pub mod create_resource;
pub mod remove_closure;
pub mod retire_resource;
pub mod set_operating_schedule;
pub mod terminate_contract;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_session::AuthorizeSession, cancel_booking::CancelBooking,
    cancel_reservation::CancelReservation,
    confirm_reservation::ConfirmReservation, create_booking::CreateBooking,
    create_closure::CreateClosure, create_contract::CreateContract,
    create_location::CreateLocation, create_resource::CreateResource,
    remove_closure::RemoveClosure, retire_resource::RetireResource,
    set_operating_schedule::SetOperatingSchedule,
    terminate_contract::TerminateContract,
};
