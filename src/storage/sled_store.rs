//! Durable history backend on sled.
//!
//! Layout: one tree per farm named `farm/<farm_id>`.
//! Key: 12-byte order-preserving timestamp (UTC seconds with the sign bit
//! flipped, then sub-second nanos, both big-endian) followed by an 8-byte
//! sled-generated id, so records sort chronologically over the whole
//! `DateTime<Utc>` range and same-instant appends never overwrite each other.
//! Value: JSON-serialized `HistoryRecord`. An undecodable value fails the read.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use super::{HistoryStore, PersistenceError};
use crate::types::{HistoryRecord, StatusLabel};

const TREE_PREFIX: &str = "farm/";

#[derive(Clone)]
pub struct SledHistoryStore {
    db: sled::Db,
}

impl SledHistoryStore {
    /// Open or create the history database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;
        info!(path = %path_ref.display(), "History store opened");
        Ok(Self { db })
    }

    /// Throwaway database removed on drop
    pub fn open_temp() -> Result<Self, PersistenceError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Farm ids with at least one record
    pub fn farms(&self) -> Vec<String> {
        self.db
            .tree_names()
            .iter()
            .filter_map(|name| name.strip_prefix(TREE_PREFIX.as_bytes()))
            .map(|id| String::from_utf8_lossy(id).into_owned())
            .collect()
    }

    fn tree_name(farm_id: &str) -> String {
        format!("{TREE_PREFIX}{farm_id}")
    }

    /// Existing tree for a farm. Reads must not create empty trees.
    fn existing_tree(&self, farm_id: &str) -> Result<Option<sled::Tree>, PersistenceError> {
        let name = Self::tree_name(farm_id);
        let exists = self
            .db
            .tree_names()
            .iter()
            .any(|n| n.as_ref() == name.as_bytes());
        if exists {
            Ok(Some(self.db.open_tree(name)?))
        } else {
            Ok(None)
        }
    }

    fn decode(farm_id: &str, value: &[u8]) -> Result<HistoryRecord, PersistenceError> {
        serde_json::from_slice(value).map_err(|e| {
            PersistenceError::Serialization(format!("farm {farm_id}: undecodable record: {e}"))
        })
    }
}

/// Order-preserving 12-byte encoding of a UTC instant.
fn timestamp_key(ts: DateTime<Utc>) -> [u8; 12] {
    let secs = (ts.timestamp() as u64) ^ (1 << 63);
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&secs.to_be_bytes());
    key[8..].copy_from_slice(&ts.timestamp_subsec_nanos().to_be_bytes());
    key
}

fn record_key(ts: DateTime<Utc>, id: u64) -> [u8; 20] {
    let mut key = [0u8; 20];
    key[..12].copy_from_slice(&timestamp_key(ts));
    key[12..].copy_from_slice(&id.to_be_bytes());
    key
}

impl HistoryStore for SledHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), PersistenceError> {
        let tree = self.db.open_tree(Self::tree_name(&record.farm_id))?;
        let key = record_key(record.timestamp, self.db.generate_id()?);
        let value = serde_json::to_vec(record)?;

        tree.insert(key, value)?;
        tree.flush()?;
        Ok(())
    }

    fn recent(&self, farm_id: &str, limit: usize) -> Result<Vec<StatusLabel>, PersistenceError> {
        let Some(tree) = self.existing_tree(farm_id)? else {
            return Ok(Vec::new());
        };

        let mut labels = Vec::with_capacity(limit.min(64));
        for item in tree.iter().rev() {
            if labels.len() >= limit {
                break;
            }
            let (_key, value) = item?;
            labels.push(Self::decode(farm_id, &value)?.status);
        }
        Ok(labels)
    }

    fn in_range(
        &self,
        farm_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoryRecord>, PersistenceError> {
        if start >= end {
            return Ok(Vec::new());
        }
        let Some(tree) = self.existing_tree(farm_id)? else {
            return Ok(Vec::new());
        };

        let lower = record_key(start, 0);
        let upper = record_key(end, 0);

        let mut records = Vec::new();
        for item in tree.range(lower..upper) {
            let (_key, value) = item?;
            records.push(Self::decode(farm_id, &value)?);
        }
        Ok(records)
    }

    fn count(&self) -> Result<usize, PersistenceError> {
        let mut total = 0;
        for farm_id in self.farms() {
            total += self.db.open_tree(Self::tree_name(&farm_id))?.len();
        }
        Ok(total)
    }

    fn backend_name(&self) -> &'static str {
        "Sled"
    }
}
