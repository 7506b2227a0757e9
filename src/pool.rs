use std::collections::HashSet;

use crate::models::{CoachLayout, GridSeat, ReservationId, ReservedSeat, SeatsData};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PoolStateError {
    #[error("available seat count {available} exceeds coach size {total}")]
    AvailableExceedsTotal { available: u32, total: u32 },
    #[error("seat number {seat_number} is outside 1..={total}")]
    SeatOutOfRange { seat_number: u32, total: u32 },
    #[error("{available} available + {reserved} reserved does not add up to {total} seats")]
    CountMismatch { available: u32, reserved: usize, total: u32 },
}

/// Canonical seat state of the coach: layout plus every reserved seat record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatPool {
    layout: CoachLayout,
    data: SeatsData,
}

impl SeatPool {
    pub fn new(layout: CoachLayout) -> Self {
        Self {
            data: SeatsData::empty(&layout),
            layout,
        }
    }

    /// Rebuilds a pool from a persisted record, rejecting records that do not
    /// fit the layout.
    pub fn from_state(layout: CoachLayout, data: SeatsData) -> Result<Self, PoolStateError> {
        let total = layout.total_seats;
        if data.available_seats > total {
            return Err(PoolStateError::AvailableExceedsTotal {
                available: data.available_seats,
                total,
            });
        }
        if let Some(seat) = data
            .reserved_seats
            .iter()
            .find(|s| s.seat_number == 0 || s.seat_number > total)
        {
            return Err(PoolStateError::SeatOutOfRange {
                seat_number: seat.seat_number,
                total,
            });
        }
        if data.available_seats as usize + data.reserved_seats.len() != total as usize {
            return Err(PoolStateError::CountMismatch {
                available: data.available_seats,
                reserved: data.reserved_seats.len(),
                total,
            });
        }

        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> &CoachLayout {
        &self.layout
    }

    pub fn state(&self) -> &SeatsData {
        &self.data
    }

    pub fn reserved_seats(&self) -> &[ReservedSeat] {
        &self.data.reserved_seats
    }

    pub fn available_count(&self) -> u32 {
        self.data.available_seats
    }

    pub fn is_reserved(&self, seat_number: u32) -> bool {
        self.data
            .reserved_seats
            .iter()
            .any(|seat| seat.seat_number == seat_number)
    }

    /// Seats `1..=total_seats` in rows of `seats_per_row`; the last row may be short.
    pub fn snapshot_grid(&self) -> Vec<Vec<GridSeat>> {
        let reserved: HashSet<u32> = self
            .data
            .reserved_seats
            .iter()
            .map(|seat| seat.seat_number)
            .collect();

        let seats: Vec<GridSeat> = (1..=self.layout.total_seats)
            .map(|number| GridSeat {
                number,
                is_available: !reserved.contains(&number),
            })
            .collect();

        seats
            .chunks(self.layout.seats_per_row.max(1) as usize)
            .map(<[GridSeat]>::to_vec)
            .collect()
    }

    // Appends one record and takes one seat off the counter
    pub(crate) fn record(&mut self, seat_number: u32, reservation_id: &ReservationId) {
        self.data.reserved_seats.push(ReservedSeat {
            seat_number,
            reservation_id: reservation_id.clone(),
        });
        self.data.available_seats = self.data.available_seats.saturating_sub(1);
    }
}
