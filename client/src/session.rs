//! In-memory session store.
//!
//! Values are kept as JSON strings so anything `Serialize` can be stored and
//! read back as a different (compatible) type. The store is owned by the
//! caller and handed to whoever needs it; nothing here is global.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Well-known keys used by the front end.
pub mod keys {
    pub const LAST_JOB: &str = "last_job";
    pub const DATASET: &str = "dataset";
    pub const WINDOW_LENGTH: &str = "window_length";
}

/// Key/value store of JSON-serialized values.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    data: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(value)?;
        self.data.insert(key.to_string(), json);
        Ok(())
    }

    /// Read `key` back. Missing keys and values that no longer decode as `T`
    /// both yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.data.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Session value '{}' does not decode: {}", key, e);
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) {
        self.data.remove(key);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, JobId, WindowLength};

    #[test]
    fn test_set_get_typed_values() {
        let mut store = SessionStore::new();
        store.set(keys::LAST_JOB, &JobId::new("abc").unwrap()).unwrap();
        store.set(keys::DATASET, &Dataset::Ethz).unwrap();
        store.set(keys::WINDOW_LENGTH, &WindowLength::new(10).unwrap()).unwrap();

        assert_eq!(store.get::<JobId>(keys::LAST_JOB).unwrap().as_str(), "abc");
        assert_eq!(store.get::<Dataset>(keys::DATASET), Some(Dataset::Ethz));
        assert_eq!(store.get::<u32>(keys::WINDOW_LENGTH), Some(10));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_missing_and_mismatched() {
        let mut store = SessionStore::new();
        assert_eq!(store.get::<String>("nope"), None);

        store.set("n", &42).unwrap();
        assert_eq!(store.get::<Dataset>("n"), None);
        // A stored window length outside the accepted range is rejected on read
        store.set("w", &5000u32).unwrap();
        assert_eq!(store.get::<WindowLength>("w"), None);
        // So is a blank job id
        store.set(keys::LAST_JOB, &"   ").unwrap();
        assert_eq!(store.get::<JobId>(keys::LAST_JOB), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = SessionStore::new();
        store.set("a", &1).unwrap();
        store.set("b", &2).unwrap();

        store.remove("a");
        store.remove("a");
        assert!(!store.contains("a"));
        assert!(store.contains("b"));

        store.clear();
        assert!(store.is_empty());
    }
}
