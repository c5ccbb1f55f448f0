//! In-memory option store for tests and ephemeral hosts.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::OptionStore;
use crate::error::StoreResult;

/// Option store backed by a mutexed map. Contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for MemoryStore {
    fn read(&self, name: &str) -> StoreResult<Option<Value>> {
        let records = self.records.lock().unwrap();
        Ok(records.get(name).cloned())
    }

    fn write(&self, name: &str, value: &Value) -> StoreResult<bool> {
        let mut records = self.records.lock().unwrap();
        if records.get(name) == Some(value) {
            return Ok(false);
        }
        records.insert(name.to_string(), value.clone());
        Ok(true)
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        let mut records = self.records.lock().unwrap();
        Ok(records.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn behaves_like_a_store() {
        let store = MemoryStore::new();
        assert!(store.read("x").unwrap().is_none());
        assert!(store.write("x", &json!({"a": 1})).unwrap());
        assert!(!store.write("x", &json!({"a": 1})).unwrap());
        assert_eq!(store.read("x").unwrap(), Some(json!({"a": 1})));
        assert!(store.delete("x").unwrap());
        assert!(!store.delete("x").unwrap());
    }
}
