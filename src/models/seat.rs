use serde::{Deserialize, Serialize};

use super::ReservationId;

/// Fixed coach layout. `seats_per_row` groups seats for display and caps a
/// single request; it is not a partition the allocator respects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachLayout {
    pub total_seats: u32,
    pub seats_per_row: u32,
}

impl CoachLayout {
    pub const DEFAULT_TOTAL_SEATS: u32 = 80;
    pub const DEFAULT_SEATS_PER_ROW: u32 = 7;

    pub fn new(total_seats: u32, seats_per_row: u32) -> Self {
        Self { total_seats, seats_per_row }
    }

    /// Largest number of seats one request may ask for.
    pub fn max_per_request(&self) -> u32 {
        self.seats_per_row
    }
}

impl Default for CoachLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOTAL_SEATS, Self::DEFAULT_SEATS_PER_ROW)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedSeat {
    pub seat_number: u32,
    pub reservation_id: ReservationId,
}

// One cell of the seat grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSeat {
    pub number: u32,
    pub is_available: bool,
}

/// The durable record: served by `/api/available-seats` and written to the
/// data file as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatsData {
    pub available_seats: u32,
    #[serde(default)]
    pub reserved_seats: Vec<ReservedSeat>,
}

impl SeatsData {
    pub fn empty(layout: &CoachLayout) -> Self {
        Self {
            available_seats: layout.total_seats,
            reserved_seats: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seats_data_uses_camel_case_layout() {
        let data = SeatsData {
            available_seats: 79,
            reserved_seats: vec![ReservedSeat {
                seat_number: 80,
                reservation_id: ReservationId::from("0123456789"),
            }],
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "availableSeats": 79,
                "reservedSeats": [{"seatNumber": 80, "reservationId": "0123456789"}]
            })
        );
    }

    #[test]
    fn grid_seat_serializes_availability_flag() {
        let seat = GridSeat { number: 3, is_available: false };
        let json = serde_json::to_string(&seat).unwrap();
        assert_eq!(json, r#"{"number":3,"isAvailable":false}"#);
    }
}
