//! Whole-collection persistence for fleet records.
//!
//! The entire collection is one JSON array under one key. Every write replaces
//! it; there is no merging and no versioning of the payload.

use tracing::{debug, warn};

use crate::error::Result;
use crate::record::FleetRecord;
use crate::storage::KeyValueStore;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "fleets_v1";

/// Loads, saves and clears the fleet collection in a [`KeyValueStore`].
#[derive(Debug)]
pub struct FleetRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> FleetRepository<S> {
    /// Create a repository over `store` using [`DEFAULT_STORAGE_KEY`].
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Create a repository over `store` using a custom key.
    #[must_use]
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted collection.
    ///
    /// A missing key yields an empty collection. So does a payload that is not
    /// a JSON array of fleet records; the corruption is logged and otherwise
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backing store cannot be read.
    pub fn load(&self) -> Result<Vec<FleetRecord>> {
        let Some(payload) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<FleetRecord>>(&payload) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    "Ignoring unreadable fleet payload under key {}: {}",
                    self.key, e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the persisted collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&mut self, records: &[FleetRecord]) -> Result<()> {
        let payload = serde_json::to_string(records)?;
        self.store.set(&self.key, &payload)?;
        debug!("Saved {} fleet records under key {}", records.len(), self.key);
        Ok(())
    }

    /// Remove the persisted collection entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn clear(&mut self) -> Result<()> {
        let existed = self.store.remove(&self.key)?;
        debug!("Cleared key {} (present: {})", self.key, existed);
        Ok(())
    }

    /// Number of persisted records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    pub fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};

    fn record(id: &str, category: &str, available: bool) -> FleetRecord {
        FleetRecord {
            id: id.to_string(),
            reg_no: format!("REG-{id}"),
            category: category.to_string(),
            driver: "Asha".to_string(),
            is_available: available,
            image: String::new(),
        }
    }

    fn repo_with_payload(payload: &str) -> FleetRepository<MemoryStore> {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, payload).unwrap();
        FleetRepository::new(store)
    }

    #[test]
    fn test_load_absent_is_empty() {
        let repo = FleetRepository::new(MemoryStore::new());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut repo = FleetRepository::new(MemoryStore::new());
        let records = vec![
            record("f_1", "Truck", true),
            record("f_2", "Bus", false),
            record("f_3", "Truck", false),
        ];
        repo.save(&records).unwrap();
        assert_eq!(repo.load().unwrap(), records);
    }

    #[test]
    fn test_save_overwrites_whole_payload() {
        let mut repo = FleetRepository::new(MemoryStore::new());
        repo.save(&[record("f_1", "Truck", true), record("f_2", "Van", true)])
            .unwrap();
        repo.save(&[record("f_9", "Bus", false)]).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "f_9");
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let mut repo = FleetRepository::new(MemoryStore::new());
        repo.save(&[record("f_1", "Truck", true)]).unwrap();
        repo.clear().unwrap();
        assert!(repo.load().unwrap().is_empty());
        assert!(repo.store().is_empty());
    }

    #[test]
    fn test_clear_when_absent_is_ok() {
        let mut repo = FleetRepository::new(MemoryStore::new());
        assert!(repo.clear().is_ok());
    }

    #[test]
    fn test_malformed_payload_is_empty() {
        assert!(repo_with_payload("{not json").load().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shape_payload_is_empty() {
        assert!(repo_with_payload(r#"{"id":"f_1"}"#).load().unwrap().is_empty());
        assert!(repo_with_payload("42").load().unwrap().is_empty());
        assert!(repo_with_payload(r#"[{"id":"f_1"}]"#).load().unwrap().is_empty());
    }

    #[test]
    fn test_persisted_field_names() {
        let mut repo = FleetRepository::new(MemoryStore::new());
        repo.save(&[record("f_1", "Truck", true)]).unwrap();

        let raw = repo.store().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let obj = value[0].as_object().unwrap();
        for field in ["id", "regNo", "category", "driver", "isAvailable", "image"] {
            assert!(obj.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn test_custom_key() {
        let mut repo = FleetRepository::with_key(MemoryStore::new(), "depot_a");
        repo.save(&[record("f_1", "Truck", true)]).unwrap();
        assert_eq!(repo.key(), "depot_a");
        assert!(repo.store().get("depot_a").unwrap().is_some());
        assert!(repo.store().get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_count() {
        let mut repo = FleetRepository::new(SqliteStore::open_in_memory().unwrap());
        assert_eq!(repo.count().unwrap(), 0);
        repo.save(&[record("f_1", "Truck", true), record("f_2", "Bus", true)])
            .unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_sqlite_round_trip() {
        let mut repo = FleetRepository::new(SqliteStore::open_in_memory().unwrap());
        let records = vec![record("f_1", "Truck", true), record("f_2", "Bus", false)];
        repo.save(&records).unwrap();
        assert_eq!(repo.load().unwrap(), records);
    }
}
