//! Classification History Storage
//!
//! Append-only log of `(status, timestamp, farm_id)` records behind the
//! [`HistoryStore`] trait so backends can be swapped without touching the
//! projection engine:
//! - `SledHistoryStore`: durable, one sled tree per farm
//! - `InMemoryHistoryStore`: process-local, for tests and throwaway runs

mod memory;
mod sled_store;

pub use memory::InMemoryHistoryStore;
pub use sled_store::SledHistoryStore;

use chrono::{DateTime, Utc};

use crate::types::{HistoryRecord, StatusLabel};

/// Trait for pluggable history backends
///
/// Implementations must be thread-safe (Send + Sync) for shared access
/// across request handlers. Records are never mutated or deleted.
pub trait HistoryStore: Send + Sync {
    /// Append a record. Durable before returning, so a following read
    /// observes it.
    fn append(&self, record: &HistoryRecord) -> Result<(), PersistenceError>;

    /// Labels of the latest `limit` records for a farm, most recent first
    fn recent(&self, farm_id: &str, limit: usize) -> Result<Vec<StatusLabel>, PersistenceError>;

    /// Records for a farm with `start <= timestamp < end`, oldest first
    fn in_range(
        &self,
        farm_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoryRecord>, PersistenceError>;

    /// Total records across all farms
    fn count(&self) -> Result<usize, PersistenceError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sled::Error> for PersistenceError {
    fn from(err: sled::Error) -> Self {
        PersistenceError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}
