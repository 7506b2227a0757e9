use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::models::ReservationId;

const ID_MODULUS: u64 = 10_000_000_000;

/// Reservation ids taken from the wall clock in milliseconds, keeping the
/// last 10 digits. Ids never repeat within one process: a clock reading at
/// or behind the last issued value is bumped past it.
#[derive(Debug, Default)]
pub struct ReservationIds {
    last_millis: AtomicU64,
}

impl ReservationIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self) -> ReservationId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.next_at(now)
    }

    pub(crate) fn next_at(&self, now_millis: u64) -> ReservationId {
        let mut last = self.last_millis.load(Ordering::Relaxed);
        let issued = loop {
            let next = now_millis.max(last + 1);
            match self.last_millis.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break next,
                Err(current) => last = current,
            }
        };

        ReservationId::from(format!("{:010}", issued % ID_MODULUS))
    }
}
