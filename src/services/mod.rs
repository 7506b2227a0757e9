pub mod reservation;

pub use reservation::{ReservationError, ReservationService};
