//! Behaviour when the store is unreachable
//!
//! Read and write paths surface `Store` errors; hit recording absorbs them.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shortstat::analytics::{Granularity, VisitorContext};
use shortstat::clock::{Calendar, CalendarZone, FixedClock};
use shortstat::config::StaticConfig;
use shortstat::errors::{Result, ShortstatError};
use shortstat::services::Shortener;
use shortstat::storage::{Category, KvStore};

/// 所有操作都失败，并记录 INCR 批次调用次数
#[derive(Default)]
struct FailingStore {
    incr_calls: AtomicUsize,
}

fn unreachable() -> ShortstatError {
    ShortstatError::store("Connection refused")
}

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(unreachable())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(unreachable())
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Err(unreachable())
    }

    async fn del(&self, _key: &str) -> Result<bool> {
        Err(unreachable())
    }

    async fn incr_batch(&self, _keys: &[String]) -> Result<()> {
        self.incr_calls.fetch_add(1, Ordering::SeqCst);
        Err(unreachable())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
        Err(unreachable())
    }

    async fn mget(&self, _keys: &[String]) -> Result<Vec<Option<String>>> {
        Err(unreachable())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

fn shortener(store: Arc<FailingStore>) -> Shortener {
    let instant = Utc.with_ymd_and_hms(2024, 3, 5, 7, 18, 0).unwrap();
    let calendar = Calendar::new(Arc::new(FixedClock(instant)), CalendarZone::Utc);
    Shortener::from_config(store, &StaticConfig::default(), calendar)
}

#[tokio::test]
async fn test_record_hit_absorbs_store_errors() {
    let store = Arc::new(FailingStore::default());
    let shortener = shortener(store.clone());

    let handle = shortener.record_hit("abc12", VisitorContext::default().with_country("AR"));
    // 任务本身正常结束，错误只写日志
    assert!(handle.await.is_ok());
    assert_eq!(store.incr_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_link_surfaces_store_error() {
    let shortener = shortener(Arc::new(FailingStore::default()));
    assert!(matches!(
        shortener.create_link("example.com").await,
        Err(ShortstatError::Store(_))
    ));
}

#[tokio::test]
async fn test_validation_runs_before_store() {
    let shortener = shortener(Arc::new(FailingStore::default()));
    assert!(matches!(
        shortener.create_link("").await,
        Err(ShortstatError::EmptyInput(_))
    ));
}

#[tokio::test]
async fn test_lookup_surfaces_store_error() {
    let shortener = shortener(Arc::new(FailingStore::default()));
    let err = shortener.lookup_link("abc12").await.unwrap_err();
    assert!(matches!(err, ShortstatError::Store(_)));
    assert!(!err.is_user_error());
}

#[tokio::test]
async fn test_stats_surface_store_error() {
    let shortener = shortener(Arc::new(FailingStore::default()));

    assert!(matches!(
        shortener.total_hits("abc12").await,
        Err(ShortstatError::Store(_))
    ));
    assert!(matches!(
        shortener.series_stats_for("abc12", Granularity::Day).await,
        Err(ShortstatError::Store(_))
    ));
    assert!(matches!(
        shortener.category_stats("abc12", Category::Os).await,
        Err(ShortstatError::Store(_))
    ));
}

#[tokio::test]
async fn test_granularity_checked_before_store() {
    let shortener = shortener(Arc::new(FailingStore::default()));
    assert!(matches!(
        shortener.series_stats("abc12", "fortnight").await,
        Err(ShortstatError::InvalidGranularity(_))
    ));
}
