use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::error::StorageError;

/// Whole-file JSON persistence: one named collection per file, read and
/// overwritten wholesale. No locking; two processes writing the same file
/// is last-writer-wins, which is acceptable for a single-user tool.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Make sure the data directory and the backing file exist, seeding an
    /// empty collection when the file is absent.
    pub fn init(&self, name: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_err(name, e))?;
        let path = self.dir.join(name);
        if !path.exists() {
            fs::write(&path, "[]").map_err(|e| io_err(name, e))?;
        }
        Ok(())
    }

    /// An absent or empty file reads as an empty collection; a file that
    /// exists but does not parse is a `Malformed` error, fatal to the
    /// calling operation.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StorageError> {
        let path = self.dir.join(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(name, e)),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| StorageError::Malformed { name: name.to_string(), source: e })
    }

    /// Overwrite the full collection. Written to a temp file in the same
    /// directory first, then renamed over the target, so a crash mid-write
    /// cannot leave a half-written file behind.
    pub fn save<T: Serialize>(&self, name: &str, records: &[T]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_err(name, e))?;
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::Malformed { name: name.to_string(), source: e })?;
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, json).map_err(|e| io_err(name, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_err(name, e))?;
        tracing::debug!(collection = name, records = records.len(), "saved");
        Ok(())
    }
}

fn io_err(name: &str, source: std::io::Error) -> StorageError {
    StorageError::Io { name: name.to_string(), source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;

    fn scratch_store() -> JsonStore {
        let dir = std::env::temp_dir().join(format!("todo-cli-store-{}", uuid::Uuid::new_v4()));
        JsonStore::new(dir)
    }

    #[test]
    fn absent_file_loads_empty() {
        let store = scratch_store();
        let users: Vec<User> = store.load("users.json").unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn round_trip_preserves_records_and_order() {
        let store = scratch_store();
        let users = vec![
            User { username: "alice".into(), password: "pw1".into() },
            User { username: "bob".into(), password: "pw2".into() },
            User { username: "carol".into(), password: "pw3".into() },
        ];
        store.save("users.json", &users).unwrap();
        let loaded: Vec<User> = store.load("users.json").unwrap();
        assert_eq!(loaded, users);
    }

    #[test]
    fn malformed_file_is_a_storage_error() {
        let store = scratch_store();
        store.init("users.json").unwrap();
        std::fs::write(store.dir.join("users.json"), "{ not json").unwrap();
        let err = store.load::<User>("users.json").unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn init_seeds_an_empty_collection() {
        let store = scratch_store();
        store.init("todos.json").unwrap();
        assert_eq!(std::fs::read_to_string(store.dir.join("todos.json")).unwrap(), "[]");
    }
}
