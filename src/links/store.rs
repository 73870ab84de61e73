use std::sync::Arc;

use tracing::{debug, error, trace};

use super::models::LinkRecord;
use crate::errors::{Result, ShortstatError};
use crate::storage::{KeySpace, KvStore};

/// CRUD for link records stored as JSON under `url:<code>`
#[derive(Clone)]
pub struct LinkStore {
    store: Arc<dyn KvStore>,
    keys: KeySpace,
}

impl LinkStore {
    pub fn new(store: Arc<dyn KvStore>, keys: KeySpace) -> Self {
        Self { store, keys }
    }

    /// `Ok(None)` means no such code; errors mean the store failed or the
    /// stored value is unreadable
    pub async fn get(&self, code: &str) -> Result<Option<LinkRecord>> {
        let key = self.keys.link_key(code);
        let Some(data) = self.store.get(&key).await? else {
            trace!("No record for code '{}'", code);
            return Ok(None);
        };

        serde_json::from_str(&data).map(Some).map_err(|e| {
            error!("Failed to deserialize LinkRecord for '{}': {}", code, e);
            ShortstatError::corrupt_record(format!("Record for '{}' is unreadable: {}", code, e))
        })
    }

    pub async fn put(&self, record: &LinkRecord) -> Result<()> {
        let data = serde_json::to_string(record)
            .map_err(|e| ShortstatError::store(format!("Failed to serialize record: {}", e)))?;
        self.store
            .set(&self.keys.link_key(&record.code), &data)
            .await?;
        debug!("Stored record for '{}'", record.code);
        Ok(())
    }

    /// Returns whether a record was removed
    pub async fn delete(&self, code: &str) -> Result<bool> {
        self.store.del(&self.keys.link_key(code)).await
    }

    pub async fn exists(&self, code: &str) -> Result<bool> {
        self.store.exists(&self.keys.link_key(code)).await
    }
}
