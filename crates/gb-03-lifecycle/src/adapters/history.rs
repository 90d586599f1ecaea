//! History persistence adapters.
//!
//! Only the sanitized vanish history crosses a process restart. Live
//! instances are never written anywhere: auto-vanish-on-restart is
//! implicit and mandatory.

use std::path::PathBuf;

use parking_lot::Mutex;
use shared_types::HistoryRecord;

use crate::errors::HistoryStoreError;

/// Persistence for the bounded vanish history.
pub trait HistoryStore: Send + Sync {
    /// Appends one record.
    fn append(&self, record: &HistoryRecord) -> Result<(), HistoryStoreError>;

    /// Loads all persisted records, oldest first.
    fn load(&self) -> Result<Vec<HistoryRecord>, HistoryStoreError>;
}

/// No-op store for deployments that do not persist history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHistoryStore;

impl HistoryStore for NullHistoryStore {
    fn append(&self, _record: &HistoryRecord) -> Result<(), HistoryStoreError> {
        Ok(())
    }

    fn load(&self) -> Result<Vec<HistoryRecord>, HistoryStoreError> {
        Ok(Vec::new())
    }
}

/// JSON-file-backed history store.
///
/// The whole bounded history is small (at most `capacity` records of
/// header metadata), so each append rewrites the file; the internal
/// mutex keeps concurrent appends from interleaving writes.
pub struct JsonFileHistoryStore {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    /// Creates a store writing to `path`, retaining at most `capacity`
    /// records.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    fn read_records(&self) -> Result<Vec<HistoryRecord>, HistoryStoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes =
            std::fs::read(&self.path).map_err(|e| HistoryStoreError::Io(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| HistoryStoreError::Serialization(e.to_string()))
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), HistoryStoreError> {
        let _guard = self.write_lock.lock();

        let mut records = self.read_records()?;
        records.push(record.clone());
        if records.len() > self.capacity {
            let excess = records.len() - self.capacity;
            records.drain(..excess);
        }

        let json = serde_json::to_vec_pretty(&records)
            .map_err(|e| HistoryStoreError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| HistoryStoreError::Io(e.to_string()))
    }

    fn load(&self) -> Result<Vec<HistoryRecord>, HistoryStoreError> {
        let _guard = self.write_lock.lock();
        self.read_records()
    }
}
