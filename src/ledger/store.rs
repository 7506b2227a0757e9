use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::models::SeatsData;
use crate::pool::PoolStateError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed seat record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seat record does not fit the coach: {0}")]
    Corrupt(#[from] PoolStateError),
    #[error("seat store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Durable home of the seat record. `persist` replaces the whole record.
#[async_trait]
pub trait SeatStore: Send + Sync {
    async fn load(&self) -> Result<Option<SeatsData>, StorageError>;

    async fn persist(&self, data: &SeatsData) -> Result<(), StorageError>;
}

/// Pretty-printed JSON file, rewritten in full on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SeatStore for JsonFileStore {
    async fn load(&self) -> Result<Option<SeatsData>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No seat record at {}, starting empty", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let data: SeatsData = serde_json::from_slice(&bytes)?;
        debug!(
            "Loaded seat record from {} ({} reserved)",
            self.path.display(),
            data.reserved_seats.len()
        );
        Ok(Some(data))
    }

    async fn persist(&self, data: &SeatsData) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::io(&self.path, e));
        }

        debug!("Saved seat record to {}", self.path.display());
        Ok(())
    }
}

/// In-process store for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<SeatsData>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: SeatsData) -> Self {
        Self {
            data: Mutex::new(Some(data)),
            fail_writes: Mutex::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    pub fn snapshot(&self) -> Option<SeatsData> {
        self.data.lock().ok().and_then(|data| data.clone())
    }
}

#[async_trait]
impl SeatStore for MemoryStore {
    async fn load(&self) -> Result<Option<SeatsData>, StorageError> {
        self.data
            .lock()
            .map(|data| data.clone())
            .map_err(|_| StorageError::Unavailable("memory store poisoned".to_string()))
    }

    async fn persist(&self, data: &SeatsData) -> Result<(), StorageError> {
        let failing = self.fail_writes.lock().map(|flag| *flag).unwrap_or(true);
        if failing {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }

        let mut slot = self
            .data
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".to_string()))?;
        *slot = Some(data.clone());
        Ok(())
    }
}
