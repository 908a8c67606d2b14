use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::{HistoryStore, PersistenceError};
use crate::types::{HistoryRecord, StatusLabel};

/// In-memory history for tests and throwaway deployments
///
/// Thread-safe via `RwLock`. Not durable: data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    farms: RwLock<HashMap<String, Vec<HistoryRecord>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), PersistenceError> {
        let mut farms = self
            .farms
            .write()
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;

        let log = farms.entry(record.farm_id.clone()).or_default();
        // Keep chronological order; equal timestamps stay in append order.
        let at = log.partition_point(|r| r.timestamp <= record.timestamp);
        log.insert(at, record.clone());
        Ok(())
    }

    fn recent(&self, farm_id: &str, limit: usize) -> Result<Vec<StatusLabel>, PersistenceError> {
        let farms = self
            .farms
            .read()
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;

        Ok(farms
            .get(farm_id)
            .map(|log| log.iter().rev().take(limit).map(|r| r.status.clone()).collect())
            .unwrap_or_default())
    }

    fn in_range(
        &self,
        farm_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let farms = self
            .farms
            .read()
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;

        Ok(farms
            .get(farm_id)
            .map(|log| {
                log.iter()
                    .filter(|r| r.timestamp >= start && r.timestamp < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn count(&self) -> Result<usize, PersistenceError> {
        let farms = self
            .farms
            .read()
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;
        Ok(farms.values().map(Vec::len).sum())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}
