//! Link service tests
//!
//! Creation, lookup and deletion of link records against the in-memory store.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use shortstat::clock::{Calendar, CalendarZone, FixedClock};
use shortstat::errors::ShortstatError;
use shortstat::links::{ByteSource, CodeGenerator, LinkService, LinkStore, encode_code};
use shortstat::storage::{KeySpace, KvStore, MemoryStore};

/// 按脚本依次返回字节，用完后返回全 0
struct ScriptedBytes {
    script: Mutex<VecDeque<Vec<u8>>>,
}

impl ScriptedBytes {
    fn new(script: Vec<Vec<u8>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

impl ByteSource for ScriptedBytes {
    fn fill(&self, buf: &mut [u8]) {
        let next = self.script.lock().unwrap().pop_front().unwrap_or_default();
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = next.get(i).copied().unwrap_or(0);
        }
    }
}

fn calendar() -> Calendar {
    let instant = Utc.with_ymd_and_hms(2024, 3, 5, 7, 18, 0).unwrap();
    Calendar::new(Arc::new(FixedClock(instant)), CalendarZone::Utc)
}

fn service_with(
    store: Arc<MemoryStore>,
    generator: CodeGenerator,
    restrict_domain: Option<&str>,
) -> LinkService {
    let links = LinkStore::new(store, KeySpace::new("test:"));
    LinkService::new(
        links,
        generator,
        restrict_domain.map(str::to_string),
        calendar(),
    )
}

fn service(store: Arc<MemoryStore>) -> LinkService {
    service_with(store, CodeGenerator::new(5, 64), None)
}

#[tokio::test]
async fn test_create_link_prepends_scheme() {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());

    let record = service.create_link("example.com/page").await.unwrap();
    assert_eq!(record.destination, "http://example.com/page");
    assert_eq!(record.code.len(), 5);
    assert!(record.code.bytes().all(|b| b.is_ascii_alphanumeric()));
    assert_eq!(
        record.created_at,
        Utc.with_ymd_and_hms(2024, 3, 5, 7, 18, 0).unwrap()
    );

    let key = format!("test:url:{}", record.code);
    assert!(store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_create_link_keeps_https() {
    let service = service(Arc::new(MemoryStore::new()));
    let record = service
        .create_link("  https://docs.example.org/a?b=c  ")
        .await
        .unwrap();
    assert_eq!(record.destination, "https://docs.example.org/a?b=c");
}

#[tokio::test]
async fn test_create_link_validation_errors() {
    let service = service(Arc::new(MemoryStore::new()));

    assert!(matches!(
        service.create_link("").await,
        Err(ShortstatError::EmptyInput(_))
    ));
    assert!(matches!(
        service.create_link("   ").await,
        Err(ShortstatError::EmptyInput(_))
    ));
    assert!(matches!(
        service.create_link("localhost/path").await,
        Err(ShortstatError::InvalidUrl(_))
    ));
    assert!(matches!(
        service.create_link("ftp://files.example.com/x").await,
        Err(ShortstatError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn test_domain_restriction() {
    let service = service_with(
        Arc::new(MemoryStore::new()),
        CodeGenerator::new(5, 64),
        Some("example.com"),
    );

    assert!(service.create_link("example.com/a").await.is_ok());
    assert!(service.create_link("https://blog.example.com/b").await.is_ok());

    assert!(matches!(
        service.create_link("ftp://host.other.org").await,
        Err(ShortstatError::DomainNotAllowed(_))
    ));
    assert!(matches!(
        service.create_link("notexample.com").await,
        Err(ShortstatError::DomainNotAllowed(_))
    ));
    // 没有点的主机名先被判为无效 URL
    assert!(matches!(
        service.create_link("ftp://x").await,
        Err(ShortstatError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn test_collision_redraws_code() {
    let store = Arc::new(MemoryStore::new());
    let taken = [1u8, 2, 3, 4, 5];
    let fresh = [10u8, 11, 12, 13, 14];

    let source = Arc::new(ScriptedBytes::new(vec![
        taken.to_vec(),
        taken.to_vec(),
        fresh.to_vec(),
    ]));
    let generator = CodeGenerator::with_source(5, 8, source);
    let service = service_with(store.clone(), generator, None);

    // 预先占用第一个候选码
    let taken_code = encode_code(&taken);
    store
        .set(&format!("test:url:{}", taken_code), "{}")
        .await
        .unwrap();

    let fresh_code = encode_code(&fresh);
    let key = format!("test:url:{}", fresh_code);
    assert!(!store.exists(&key).await.unwrap());

    let record = service.create_link("example.com").await.unwrap();
    assert_eq!(record.code, fresh_code);
    assert!(store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_exhausted_keyspace() {
    let store = Arc::new(MemoryStore::new());
    // 脚本为空时始终生成 "000"
    let generator = CodeGenerator::with_source(3, 4, Arc::new(ScriptedBytes::new(vec![])));
    let service = service_with(store.clone(), generator, None);

    let first = service.create_link("example.com").await.unwrap();
    assert_eq!(first.code, "000");

    assert!(matches!(
        service.create_link("example.org").await,
        Err(ShortstatError::ExhaustedKeyspace(_))
    ));
}

#[tokio::test]
async fn test_sequential_creates_are_unique() {
    let service = service(Arc::new(MemoryStore::new()));
    let mut codes = std::collections::HashSet::new();
    for i in 0..50 {
        let record = service
            .create_link(&format!("example.com/{}", i))
            .await
            .unwrap();
        assert!(codes.insert(record.code));
    }
}

#[tokio::test]
async fn test_lookup_is_idempotent() {
    let service = service(Arc::new(MemoryStore::new()));
    let created = service.create_link("example.com/page").await.unwrap();

    let first = service.lookup_link(&created.code).await.unwrap();
    let second = service.lookup_link(&created.code).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Some(created));
}

#[tokio::test]
async fn test_lookup_missing_is_none() {
    let service = service(Arc::new(MemoryStore::new()));
    assert_eq!(service.lookup_link("nope1").await.unwrap(), None);
}

#[tokio::test]
async fn test_corrupt_record_fails_read() {
    let store = Arc::new(MemoryStore::new());
    store.set("test:url:bad01", "not json").await.unwrap();

    let service = service(store);
    assert!(matches!(
        service.lookup_link("bad01").await,
        Err(ShortstatError::CorruptRecord(_))
    ));
}

#[tokio::test]
async fn test_delete_link() {
    let service = service(Arc::new(MemoryStore::new()));
    let created = service.create_link("example.com").await.unwrap();

    assert!(service.delete_link(&created.code).await.unwrap());
    assert_eq!(service.lookup_link(&created.code).await.unwrap(), None);
    assert!(!service.delete_link(&created.code).await.unwrap());
}
