use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use super::KvStore;
use crate::config::StoreConfig;
use crate::errors::{Result, ShortstatError};

/// Redis-backed store
///
/// Every operation takes its own handle to a shared multiplexed connection;
/// the handle is dropped when the operation returns, on success or error.
pub struct RedisStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    connect_timeout: Duration,
}

impl RedisStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            ShortstatError::config(format!("Invalid Redis URL '{}': {}", config.url, e))
        })?;

        debug!(
            "RedisStore created for {} (connect timeout {}s)",
            config.url, config.connect_timeout_secs
        );

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    /// Round-trip a `PING`, used at startup to fail fast
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        let reply = self.check(result, "PING").await?;
        debug!("Redis connection test successful: {}", reply);
        Ok(())
    }

    /// 获取或建立持久连接
    async fn connection(&self) -> Result<MultiplexedConnection> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            ShortstatError::store(format!(
                "Timed out connecting to Redis after {:?}",
                self.connect_timeout
            ))
        })??;

        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    async fn check<T>(&self, result: RedisResult<T>, op: &str) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("Redis {} failed: {}", op, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let result: RedisResult<Option<String>> = conn.get(key).await;
        trace!("GET {}", key);
        self.check(result, "GET").await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: RedisResult<()> = conn.set(key, value).await;
        trace!("SET {}", key);
        self.check(result, "SET").await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let result: RedisResult<bool> = conn.exists(key).await;
        self.check(result, "EXISTS").await
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let result: RedisResult<i64> = conn.del(key).await;
        let removed = self.check(result, "DEL").await?;
        Ok(removed > 0)
    }

    async fn incr_batch(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;

        let mut pipe = redis::pipe();
        for key in keys {
            pipe.incr(key, 1).ignore();
        }
        let result: RedisResult<()> = pipe.query_async(&mut conn).await;
        trace!("Pipelined {} INCRs", keys.len());
        self.check(result, "INCR pipeline").await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;
        let result: RedisResult<Vec<String>> = conn.keys(pattern).await;
        self.check(result, "KEYS").await
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection().await?;
        let result: RedisResult<Vec<Option<String>>> =
            redis::cmd("MGET").arg(keys).query_async(&mut conn).await;
        self.check(result, "MGET").await
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
