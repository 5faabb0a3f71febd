use std::collections::HashMap;
use std::sync::Arc;

use super::{Error, LocalStorage};

/// Process-local storage. Clones share the same entries, so a test can keep a
/// handle and inspect what a store persisted.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    map: Arc<tokio::sync::Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(key.into(), value.into());
        Self {
            map: Arc::new(tokio::sync::Mutex::new(map)),
        }
    }
}

impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        self.map.lock().await.insert(key.into(), value.into());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), Error> {
        self.map.lock().await.remove(key);
        Ok(())
    }
}
