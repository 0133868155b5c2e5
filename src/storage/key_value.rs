use std::{collections::HashMap, sync::RwLock};

/// Byte storage keyed by string. The event store writes its whole collection
/// under a single key on every mutation.
pub trait KeyValueStorage: Send + Sync {
    fn store(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()>;
    fn load(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;
}

#[derive(Default)]
pub struct InMemoryKeyValueStorage {
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        if let Ok(mut store) = storage.store.write() {
            store.insert(key.into(), bytes.into());
        }
        storage
    }
}

impl KeyValueStorage for InMemoryKeyValueStorage {
    fn store(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let mut store = self
            .store
            .write()
            .map_err(|_| anyhow::anyhow!("In-memory storage lock poisoned"))?;
        store.insert(key.to_string(), bytes.to_vec());
        log::debug!("Stored {} bytes under {key}", bytes.len());
        Ok(())
    }

    fn load(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let store = self
            .store
            .read()
            .map_err(|_| anyhow::anyhow!("In-memory storage lock poisoned"))?;
        Ok(store.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_loads_as_none() {
        let storage = InMemoryKeyValueStorage::new();

        assert!(storage.load("SavedEvents").unwrap().is_none());
    }

    #[test]
    fn store_overwrites_previous_value() {
        let storage = InMemoryKeyValueStorage::with_entry("k", b"old".to_vec());

        storage.store("k", b"new").unwrap();

        assert_eq!(storage.load("k").unwrap().as_deref(), Some(&b"new"[..]));
    }
}
