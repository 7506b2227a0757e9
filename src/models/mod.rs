pub mod reservation;
pub mod seat;

pub use reservation::{Reservation, ReservationId};
pub use seat::{CoachLayout, GridSeat, ReservedSeat, SeatsData};
