//! # Registry Store
//!
//! Key-value sink that receives the serialized record on each successful
//! submission.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::StoreResult;
use crate::schema::RegistrationRecord;

/// Key under which the last registration is stored
pub const DEFAULT_STORAGE_KEY: &str = "equestrianRegistry";

/// File name used by `FileStore` inside its directory
pub const REGISTRY_FILE: &str = "registry.json";

/// Key-value storage for serialized records
pub trait RegistryStore {
    /// Write a value, replacing any previous one
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Read a value
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
}

/// Serialize a record to JSON and store it under `key`
pub fn save_record<S: RegistryStore + ?Sized>(
    store: &mut S,
    key: &str,
    record: &RegistrationRecord,
) -> StoreResult<()> {
    let json = serde_json::to_string(record)?;
    store.set_item(key, &json)
}

/// Read a record back from `key`
pub fn load_record<S: RegistryStore + ?Sized>(
    store: &S,
    key: &str,
) -> StoreResult<Option<RegistrationRecord>> {
    match store.get_item(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_item` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl RegistryStore for MemoryStore {
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }
}

/// Store backed by a single JSON object file in a directory.
///
/// The whole file is rewritten on each write through a temporary file and
/// a rename, so a crash leaves either the old or the new contents.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(REGISTRY_FILE)
    }

    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        let path = self.path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl RegistryStore for FileStore {
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());

        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!("{}.tmp", REGISTRY_FILE));
        fs::write(&tmp, serde_json::to_vec_pretty(&items)?)?;
        fs::rename(&tmp, self.path())?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record() -> RegistrationRecord {
        RegistrationRecord {
            first_name: "Rarity-Belle".into(),
            last_name: "Élégance-Saphir".into(),
            email: "rarity@carousel.com".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            city: "Canterlot".into(),
            postal_code: "69008".into(),
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        save_record(&mut store, DEFAULT_STORAGE_KEY, &record()).unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(load_record(&store, DEFAULT_STORAGE_KEY).unwrap(), Some(record()));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(load_record(&store, "nothing").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path().join("registry"));
        save_record(&mut store, DEFAULT_STORAGE_KEY, &record()).unwrap();

        let reopened = FileStore::new(tmp.path().join("registry"));
        assert_eq!(load_record(&reopened, DEFAULT_STORAGE_KEY).unwrap(), Some(record()));
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path());
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();
        store.set_item("a", "3").unwrap();
        assert_eq!(store.get_item("a").unwrap(), Some("3".to_string()));
        assert_eq!(store.get_item("b").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(REGISTRY_FILE), "not json").unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.get_item("a").is_err());
    }
}
