use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::BookingError;

use super::{Result, SnapshotStore};

/// In-process store for tests and scripted sessions.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut slots) = store.slots.write() {
            slots.insert(key.to_string(), value.to_string());
        }
        store
    }

    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> BookingError {
    BookingError::Storage("snapshot store lock poisoned".into())
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.read().map_err(|_| poisoned())?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let store = MemorySnapshotStore::new();
        store.set("draft", "{}").unwrap();
        store.set("draft", r#"{"fullName":"Ana"}"#).unwrap();
        assert_eq!(store.get("draft").unwrap().as_deref(), Some(r#"{"fullName":"Ana"}"#));
        store.remove("draft").unwrap();
        store.remove("draft").unwrap();
        assert!(store.is_empty());
    }
}
