use parking_lot::Mutex;
use std::collections::HashMap;

use super::KeyValueStore;

/// Volatile key/value store. Backs tests and throwaway sessions.
pub struct InMemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}
