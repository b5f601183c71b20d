//! On-device key/value storage
//!
//! A namespaced string store in the shape of a browser's local storage: one
//! value per key, read whole, written whole.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

/// Durable string storage addressed by key
pub trait KeyValueStorage: Send {
    /// Read a value; `Ok(None)` when the key was never written
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace a value
    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// One file per key under a directory
///
/// Writes land in a uniquely named temporary file in the same directory,
/// flushed to disk and then persisted over the target, so a reader sees
/// either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_stem))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-process storage, gone when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("never-created"));
        assert_eq!(storage.get_item("flavormap:localSpots").unwrap(), None);
    }

    #[test]
    fn test_file_storage_roundtrip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("ls"));

        storage.set_item("flavormap:localSpots", "[1]").unwrap();
        storage.set_item("flavormap:localSpots", "[1,2]").unwrap();

        assert_eq!(
            storage.get_item("flavormap:localSpots").unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[test]
    fn test_file_storage_key_maps_to_safe_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set_item("flavormap:localSpots", "[]").unwrap();

        assert!(dir.path().join("flavormap_localSpots.json").is_file());
        // No temporary file left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_storage_does_not_depend_on_fixed_temp_name() {
        let dir = tempfile::tempdir().unwrap();
        // Something already occupying a predictable temp path
        fs::create_dir(dir.path().join("flavormap_localSpots.json.tmp")).unwrap();

        let mut storage = FileStorage::new(dir.path());
        storage.set_item("flavormap:localSpots", "[7]").unwrap();

        assert_eq!(
            storage.get_item("flavormap:localSpots").unwrap().as_deref(),
            Some("[7]")
        );
    }

    #[test]
    fn test_two_writers_on_one_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = FileStorage::new(dir.path());
        let mut second = FileStorage::new(dir.path());

        first.set_item("flavormap:localSpots", "[1]").unwrap();
        second.set_item("flavormap:localSpots", "[1,2]").unwrap();
        first.set_item("flavormap:localSpots", "[1,2,3]").unwrap();

        assert_eq!(
            second.get_item("flavormap:localSpots").unwrap().as_deref(),
            Some("[1,2,3]")
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_storage_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the storage directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();

        let mut storage = FileStorage::new(&blocker);
        assert!(storage.set_item("k", "v").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
