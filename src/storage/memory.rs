//! 进程内键值存储
//!
//! 与 Redis 语义保持一致：不存在的计数器视为 0，INCR 非整数值时报错，
//! KEYS 使用 glob 匹配。适用于测试和单机试用。

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use super::KvStore;
use super::glob::glob_match;
use crate::errors::{Result, ShortstatError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn incr_one(&self, key: &str) -> Result<i64> {
        // Entry 持有分片写锁，保证单键自增原子
        match self.data.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let current: i64 = occupied.get().parse().map_err(|_| {
                    ShortstatError::store(format!(
                        "ERR value is not an integer or out of range (key '{}')",
                        key
                    ))
                })?;
                let next = current.checked_add(1).ok_or_else(|| {
                    ShortstatError::store("ERR increment or decrement would overflow")
                })?;
                occupied.insert(next.to_string());
                Ok(next)
            }
            Entry::Vacant(vacant) => {
                vacant.insert("1".to_string());
                Ok(1)
            }
        }
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }

    async fn del(&self, key: &str) -> Result<bool> {
        Ok(self.data.remove(key).is_some())
    }

    async fn incr_batch(&self, keys: &[String]) -> Result<()> {
        // 与 pipeline 相同：前面的自增不会因后面的失败而回滚
        let mut first_error = None;
        for key in keys {
            if let Err(e) = self.incr_one(key) {
                first_error.get_or_insert(e);
            }
        }
        trace!("MemoryStore: incremented {} keys", keys.len());
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut matched: Vec<String> = self
            .data
            .iter()
            .filter(|entry| glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        matched.sort();
        Ok(matched)
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        Ok(keys
            .iter()
            .map(|k| self.data.get(k).map(|v| v.value().clone()))
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_incr_creates_and_counts() {
        let store = MemoryStore::new();
        let keys = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        store.incr_batch(&keys).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_incr_on_text_value_fails_without_rollback() {
        let store = MemoryStore::new();
        store.set("text", "hello").await.unwrap();
        let keys = vec!["ok".to_string(), "text".to_string(), "later".to_string()];
        assert!(store.incr_batch(&keys).await.is_err());
        assert_eq!(store.get("ok").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("later").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("text").await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_incr_at_max_fails_and_keeps_value() {
        let store = MemoryStore::new();
        let max = i64::MAX.to_string();
        store.set("full", &max).await.unwrap();

        let err = store.incr_batch(&["full".to_string()]).await.unwrap_err();
        assert!(matches!(err, ShortstatError::Store(_)));
        // 溢出时原值保持不变
        assert_eq!(store.get("full").await.unwrap(), Some(max));
    }

    #[tokio::test]
    async fn test_keys_and_mget() {
        let store = MemoryStore::new();
        store.set("p:day:2024-03-01", "4").await.unwrap();
        store.set("p:day:2024-03-02", "5").await.unwrap();
        store.set("p:day:2024-04-01", "6").await.unwrap();

        let found = store.keys("p:day:2024-03-*").await.unwrap();
        assert_eq!(found, vec!["p:day:2024-03-01", "p:day:2024-03-02"]);

        let values = store
            .mget(&["p:day:2024-03-02".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(values, vec![Some("5".to_string()), None]);
    }

    #[tokio::test]
    async fn test_exists_and_del() {
        let store = MemoryStore::new();
        assert!(!store.exists("k").await.unwrap());
        store.set("k", "v").await.unwrap();
        assert!(store.exists("k").await.unwrap());
        assert!(store.del("k").await.unwrap());
        assert!(!store.del("k").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_atomic() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    store.incr_batch(&["hot".to_string()]).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.get("hot").await.unwrap().as_deref(), Some("800"));
    }
}
