//! Reservation ledger: id generation and the durable seat record.

pub mod ids;
pub mod store;

use std::sync::Arc;
use tracing::info;

use crate::models::{CoachLayout, ReservationId};
use crate::pool::SeatPool;

pub use ids::ReservationIds;
pub use store::{JsonFileStore, MemoryStore, SeatStore, StorageError};

#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn SeatStore>,
    ids: Arc<ReservationIds>,
}

impl Ledger {
    pub fn new(store: Arc<dyn SeatStore>) -> Self {
        Self {
            store,
            ids: Arc::new(ReservationIds::new()),
        }
    }

    pub fn generate_reservation_id(&self) -> ReservationId {
        self.ids.generate()
    }

    /// Persisted pool, or an empty one when nothing has been saved yet.
    pub async fn load(&self, layout: CoachLayout) -> Result<SeatPool, StorageError> {
        match self.store.load().await? {
            Some(data) => {
                let pool = SeatPool::from_state(layout, data)?;
                info!(
                    "Restored seat pool: {} available, {} reserved",
                    pool.available_count(),
                    pool.reserved_seats().len()
                );
                Ok(pool)
            }
            None => Ok(SeatPool::new(layout)),
        }
    }

    pub async fn persist(&self, pool: &SeatPool) -> Result<(), StorageError> {
        self.store.persist(pool.state()).await
    }
}
