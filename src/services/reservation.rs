use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::allocator::{self, AllocationError};
use crate::ledger::{Ledger, StorageError};
use crate::models::{CoachLayout, GridSeat, Reservation, SeatsData};
use crate::pool::SeatPool;

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("failed to save reservation: {0}")]
    Storage(#[from] StorageError),
}

/// Sole writer of the seat pool. Every reservation runs allocate + persist
/// under one lock, so requests are applied one at a time in arrival order.
pub struct ReservationService {
    pool: Mutex<SeatPool>,
    ledger: Ledger,
}

impl ReservationService {
    /// Loads the persisted pool (or a fresh one) for `layout`.
    pub async fn init(layout: CoachLayout, ledger: Ledger) -> Result<Self, StorageError> {
        let pool = ledger.load(layout).await?;
        Ok(Self {
            pool: Mutex::new(pool),
            ledger,
        })
    }

    pub async fn availability(&self) -> SeatsData {
        self.pool.lock().await.state().clone()
    }

    pub async fn seat_grid(&self) -> Vec<Vec<GridSeat>> {
        self.pool.lock().await.snapshot_grid()
    }

    pub async fn available_count(&self) -> u32 {
        self.pool.lock().await.available_count()
    }

    /// Reserves `requested` seats. The live pool only changes once the new
    /// state has been persisted.
    pub async fn reserve(&self, requested: i64) -> Result<Reservation, ReservationError> {
        let mut pool = self.pool.lock().await;

        let mut working = pool.clone();
        let reservation_id = self.ledger.generate_reservation_id();
        let reservation = allocator::allocate(&mut working, requested, reservation_id)
            .inspect_err(|e| warn!("Reservation of {} seat(s) rejected: {:?}", requested, e))?;

        if let Err(e) = self.ledger.persist(&working).await {
            error!(
                "Failed to persist reservation {}: {}",
                reservation.reservation_id, e
            );
            return Err(e.into());
        }

        *pool = working;
        info!(
            reservation_id = %reservation.reservation_id,
            available = pool.available_count(),
            "Reserved seats {:?}",
            reservation.seat_numbers
        );

        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryStore;
    use std::sync::Arc;

    async fn service_with(store: Arc<MemoryStore>) -> ReservationService {
        ReservationService::init(CoachLayout::default(), Ledger::new(store))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reserve_persists_and_updates_pool() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone()).await;

        let reservation = service.reserve(5).await.unwrap();

        assert_eq!(reservation.seat_numbers, vec![80, 79, 78, 77, 76]);
        assert_eq!(service.available_count().await, 75);
        let saved = store.snapshot().unwrap();
        assert_eq!(saved, service.availability().await);
        assert_eq!(saved.reserved_seats.len(), 5);
    }

    #[tokio::test]
    async fn rejected_request_changes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone()).await;

        let err = service.reserve(8).await.unwrap_err();

        assert!(matches!(
            err,
            ReservationError::Allocation(AllocationError::ExceedsPerRequestLimit { limit: 7 })
        ));
        assert_eq!(service.available_count().await, 80);
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn failed_save_is_not_reported_as_success() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone()).await;
        service.reserve(2).await.unwrap();
        let before = service.availability().await;

        store.set_fail_writes(true);
        let err = service.reserve(3).await.unwrap_err();

        assert!(matches!(err, ReservationError::Storage(_)));
        assert_eq!(service.availability().await, before);
        assert_eq!(store.snapshot(), Some(before));
    }

    #[tokio::test]
    async fn restart_resumes_from_saved_state() {
        let store = Arc::new(MemoryStore::new());
        service_with(store.clone()).await.reserve(3).await.unwrap();

        let restarted = service_with(store).await;
        assert_eq!(restarted.available_count().await, 77);
        let grid = restarted.seat_grid().await;
        let taken: Vec<u32> = grid
            .iter()
            .flatten()
            .filter(|seat| !seat.is_available)
            .map(|seat| seat.number)
            .collect();
        assert_eq!(taken, vec![78, 79, 80]);
    }

    #[tokio::test]
    async fn concurrent_requests_are_serialized() {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(service_with(store).await);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.reserve(2).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().reservation_id);
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 10);
        let state = service.availability().await;
        assert_eq!(state.available_seats, 60);
        assert_eq!(state.reserved_seats.len(), 20);
    }
}
