use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::sync::Arc;

use crate::models::Reservation;
use crate::services::ReservationError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/available-seats", get(get_available_seats))
        .route("/reserve-seats-data", get(get_seat_grid))
        .route("/reserve-seats", post(reserve_seats))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn message(status: StatusCode, text: impl Into<String>) -> (StatusCode, Json<MessageResponse>) {
    (status, Json(MessageResponse { message: text.into() }))
}

/* ---------- SEATS ---------- */

// GET /api/available-seats
async fn get_available_seats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.reservations.availability().await)
}

// GET /api/reserve-seats-data
async fn get_seat_grid(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.reservations.seat_grid().await)
}

/* ---------- RESERVATIONS ---------- */

// POST /api/reserve-seats
#[derive(Debug, Deserialize)]
struct ReserveSeatsRequest {
    // missing count is rejected as an invalid count
    #[serde(rename = "numSeats", default)]
    num_seats: Option<Number>,
}

// Any JSON number as a seat count: out-of-range integers saturate so they
// fail the per-request limit, fractional counts are invalid
fn requested_count(num_seats: Option<&Number>) -> i64 {
    let Some(n) = num_seats else { return 0 };
    if let Some(v) = n.as_i64() {
        return v;
    }
    if n.as_u64().is_some() {
        return i64::MAX;
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 => f as i64,
        _ => 0,
    }
}

async fn reserve_seats(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReserveSeatsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    let Json(req) = body.map_err(|rejection| {
        tracing::warn!("reserve_seats bad body: {}", rejection.body_text());
        message(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;
    let requested = requested_count(req.num_seats.as_ref());

    match state.reservations.reserve(requested).await {
        Ok(reservation) => Ok(message(
            StatusCode::OK,
            confirmation(requested, &reservation),
        )),
        Err(ReservationError::Allocation(e)) => Err(message(StatusCode::BAD_REQUEST, e.to_string())),
        Err(ReservationError::Storage(_)) => Err(message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save reservation.",
        )),
    }
}

fn confirmation(requested: i64, reservation: &Reservation) -> String {
    let seat_numbers = reservation
        .seat_numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} seat(s) reserved successfully. Reservation ID / PNR : {} and Seat number(s): {}",
        requested, reservation.reservation_id, seat_numbers
    )
}
