//! Shortener facade
//!
//! The operations an outer surface (HTTP handler, CLI) calls. Holds the
//! link service, the hit recorder and the stats reader over one shared
//! store handle.

use std::str::FromStr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::instrument;

use crate::analytics::{Granularity, HitRecorder, Stat, StatsService, VisitorContext};
use crate::clock::Calendar;
use crate::config::StaticConfig;
use crate::errors::{Result, ShortstatError};
use crate::links::{LinkRecord, LinkService, LinkSummary};
use crate::storage::{Category, KeySpace, KvStore};

pub struct Shortener {
    links: LinkService,
    recorder: Arc<HitRecorder>,
    stats: StatsService,
}

impl Shortener {
    pub fn new(links: LinkService, recorder: HitRecorder, stats: StatsService) -> Self {
        Self {
            links,
            recorder: Arc::new(recorder),
            stats,
        }
    }

    pub fn from_config(store: Arc<dyn KvStore>, config: &StaticConfig, calendar: Calendar) -> Self {
        let keys = KeySpace::new(config.store.key_prefix.clone());

        let links = LinkService::from_config(
            Arc::clone(&store),
            keys.clone(),
            &config.links,
            calendar.clone(),
        );
        let recorder = HitRecorder::new(
            Arc::clone(&store),
            keys.clone(),
            calendar.clone(),
            config.stats.minute_bucket,
        );
        let stats = StatsService::new(
            store,
            keys,
            calendar,
            config.stats.minute_bucket,
            config.stats.all_time_years,
        );

        Self::new(links, recorder, stats)
    }

    pub async fn create_link(&self, raw: &str) -> Result<LinkRecord> {
        self.links.create_link(raw).await
    }

    /// `Ok(None)` when no record exists for `code`
    pub async fn lookup_link(&self, code: &str) -> Result<Option<LinkRecord>> {
        self.links.lookup_link(code).await
    }

    pub async fn delete_link(&self, code: &str) -> Result<bool> {
        self.links.delete_link(code).await
    }

    /// Count a redirect without making the caller wait for it.
    ///
    /// The handle is only useful to tests and to a shutdown path that wants to
    /// drain pending writes; errors never come back through it.
    pub fn record_hit(&self, code: &str, visitor: VisitorContext) -> JoinHandle<()> {
        self.recorder.record_detached(code.to_string(), visitor)
    }

    pub async fn total_hits(&self, code: &str) -> Result<i64> {
        self.stats.total_hits(code).await
    }

    pub async fn series_stats(&self, code: &str, granularity: &str) -> Result<Vec<Stat>> {
        self.stats.series_str(code, granularity).await
    }

    pub async fn series_stats_for(
        &self,
        code: &str,
        granularity: Granularity,
    ) -> Result<Vec<Stat>> {
        self.stats.series(code, granularity).await
    }

    /// Time series of hits from one category value, e.g. country `AR`
    pub async fn category_series_stats(
        &self,
        code: &str,
        category: Category,
        value: &str,
        granularity: &str,
    ) -> Result<Vec<Stat>> {
        let granularity = Granularity::parse(granularity)?;
        self.stats
            .category_series(code, category, value, granularity)
            .await
    }

    pub async fn category_stats(&self, code: &str, category: Category) -> Result<Vec<Stat>> {
        self.stats.top_category(code, category).await
    }

    /// Record plus all-time hits, `None` for an unknown code
    #[instrument(skip(self))]
    pub async fn summary(&self, code: &str) -> Result<Option<LinkSummary>> {
        let Some(record) = self.links.lookup_link(code).await? else {
            return Ok(None);
        };
        let total_hits = self.stats.total_hits(code).await?;
        Ok(Some(LinkSummary { record, total_hits }))
    }
}

/// Parse a category name (`country`, `browser`, `os`, or their plural
/// namespace form)
pub fn parse_category(value: &str) -> Result<Category> {
    Category::from_str(value.trim())
        .map_err(|_| ShortstatError::invalid_category(format!("Unknown category: {}", value)))
}
