//! Key-value store abstraction
//!
//! Everything above this module talks to an injected `Arc<dyn KvStore>`;
//! the composition root decides whether that is Redis or the in-process
//! memory backend.

mod glob;
pub mod keys;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::StoreConfig;
use crate::errors::{Result, ShortstatError};

pub use self::keys::{Bucket, BucketPattern, Category, CounterKey, KeySpace, Series};
pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// The subset of Redis semantics the shortener relies on
#[async_trait]
pub trait KvStore: Send + Sync {
    /// `GET`; an absent key is `Ok(None)`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// `SET`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// `EXISTS`
    async fn exists(&self, key: &str) -> Result<bool>;

    /// `DEL`, returns whether a key was removed
    async fn del(&self, key: &str) -> Result<bool>;

    /// `INCR` every key once, sent as a single pipelined round trip.
    ///
    /// Increments are independently atomic but not transactional as a group.
    async fn incr_batch(&self, keys: &[String]) -> Result<()>;

    /// `KEYS pattern` (glob syntax)
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// `MGET`, one slot per requested key
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Counter value as read back from the store
///
/// Counters spring into existence on their first `INCR`, so a missing key
/// is the normal state for a bucket nobody has hit yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Present(i64),
    Absent,
}

impl Count {
    /// Interpret a raw `GET`/`MGET` slot; malformed values read as `Absent`
    pub fn from_raw(key: &str, raw: Option<&str>) -> Self {
        match raw {
            None => Count::Absent,
            Some(text) => match text.trim().parse::<i64>() {
                Ok(n) => Count::Present(n),
                Err(_) => {
                    warn!("Ignoring malformed counter value {:?} at key '{}'", text, key);
                    Count::Absent
                }
            },
        }
    }

    pub fn value(self) -> i64 {
        match self {
            Count::Present(n) => n,
            Count::Absent => 0,
        }
    }
}

/// Build the store named by the configuration
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
    match config.backend.to_lowercase().as_str() {
        "redis" => Ok(Arc::new(RedisStore::new(config)?)),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(ShortstatError::config(format!(
            "Unknown store backend: {}",
            other
        ))),
    }
}
