use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use super::KeyValueStore;

/// Durable key/value store: one JSON file holding every key, rewritten in
/// full on each write.
///
/// This mirrors the single-user storage it stands in for: last writer wins,
/// no cross-process locking. Write failures are logged and otherwise ignored,
/// the in-memory view stays authoritative for the session.
pub struct FileKv {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileKv {
    /// Opens the store at `path`, loading any existing image. A missing or
    /// unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        match serde_json::to_string_pretty(entries) {
            Ok(image) => {
                if let Err(err) = fs::write(&self.path, image) {
                    warn!("failed to persist {}: {err}", self.path.display());
                }
            }
            Err(err) => warn!("failed to serialize store image: {err}"),
        }
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock();
        entries.remove(key);
        self.persist(&entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let kv = FileKv::open(&path);
        kv.set("greeting", "hello");
        drop(kv);

        let reopened = FileKv::open(&path);
        assert_eq!(reopened.get("greeting").as_deref(), Some("hello"));
    }

    #[test]
    fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let kv = FileKv::open(&path);
        kv.set("key", "value");
        kv.remove("key");
        drop(kv);

        let reopened = FileKv::open(&path);
        assert_eq!(reopened.get("key"), None);
    }

    #[test]
    fn corrupt_image_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let kv = FileKv::open(&path);
        assert_eq!(kv.get("anything"), None);
    }
}
