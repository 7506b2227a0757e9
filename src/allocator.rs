//! Seat allocation policy.
//!
//! Seat numbers are derived from the available-seat counter, not from a scan
//! of free seats: a run counting down from the counter is handed out when the
//! counter has room left in its block of ten, otherwise seats are taken one
//! at a time counting down from the same starting point. Neither branch
//! consults `SeatPool::is_reserved`, so long-running pools can hand out a
//! number that is already taken.

use tracing::debug;

use crate::models::{Reservation, ReservationId};
use crate::pool::SeatPool;

/// Width of the block the contiguous check measures against.
pub const BLOCK_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("Invalid number of seats.")]
    InvalidCount,
    #[error("Maximum {limit} seats can be reserved at a time.")]
    ExceedsPerRequestLimit { limit: u32 },
    #[error("Not enough available seats.")]
    InsufficientSeats { requested: u32, available: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Contiguous,
    Scattered,
}

/// Checks a raw request against the pool. First failing rule wins.
pub fn validate(pool: &SeatPool, requested: i64) -> Result<u32, AllocationError> {
    if requested <= 0 {
        return Err(AllocationError::InvalidCount);
    }

    let limit = pool.layout().max_per_request();
    if requested > i64::from(limit) {
        return Err(AllocationError::ExceedsPerRequestLimit { limit });
    }

    // bounded by `limit` above
    let requested = requested as u32;
    let available = pool.available_count();
    if requested > available {
        return Err(AllocationError::InsufficientSeats { requested, available });
    }

    Ok(requested)
}

pub fn branch(start: u32, requested: u32) -> Branch {
    if start % BLOCK_SIZE >= requested {
        Branch::Contiguous
    } else {
        Branch::Scattered
    }
}

/// Seat numbers for `requested` seats when `start` seats are still available.
///
/// The scattered branch stops once the counter would reach zero, so it may
/// return fewer numbers than requested.
pub fn plan(start: u32, requested: u32) -> Vec<u32> {
    match branch(start, requested) {
        Branch::Contiguous => (0..requested).map(|i| start - i).collect(),
        Branch::Scattered => {
            let mut remaining = start;
            let mut seats = Vec::with_capacity(requested as usize);
            for i in 0..requested {
                if remaining == 0 {
                    break;
                }
                seats.push(start.saturating_sub(i).max(1));
                remaining -= 1;
            }
            seats
        }
    }
}

/// Validates the request, picks seats and records them under one reservation id.
///
/// Nothing is mutated when validation fails.
pub fn allocate(
    pool: &mut SeatPool,
    requested: i64,
    reservation_id: ReservationId,
) -> Result<Reservation, AllocationError> {
    let requested = validate(pool, requested)?;

    let start = pool.available_count();
    let seat_numbers = plan(start, requested);
    debug!(
        start,
        requested,
        branch = ?branch(start, requested),
        "planned seats {:?}",
        seat_numbers
    );

    for seat_number in &seat_numbers {
        pool.record(*seat_number, &reservation_id);
    }

    Ok(Reservation {
        reservation_id,
        seat_numbers,
    })
}
