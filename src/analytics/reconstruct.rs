//! 统计重建
//!
//! 按粒度枚举期望的子桶，KEYS 扫描 + MGET 两次往返取回计数，
//! 再按时间顺序补零输出。单个计数器损坏只会让该桶读作 0。

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use super::period::{Granularity, Period};
use crate::clock::Calendar;
use crate::errors::Result;
use crate::storage::{Bucket, Category, Count, KeySpace, KvStore, Series};

/// One labelled value in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub name: String,
    pub value: i64,
}

impl Stat {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

pub struct StatsService {
    store: Arc<dyn KvStore>,
    keys: KeySpace,
    calendar: Calendar,
    minute_width: u32,
    all_time_years: i32,
}

impl StatsService {
    pub fn new(
        store: Arc<dyn KvStore>,
        keys: KeySpace,
        calendar: Calendar,
        minute_width: u32,
        all_time_years: i32,
    ) -> Self {
        Self {
            store,
            keys,
            calendar,
            minute_width: minute_width.clamp(1, 60),
            all_time_years,
        }
    }

    pub async fn total_hits(&self, code: &str) -> Result<i64> {
        let key = self.keys.counter_key(code, &Series::Hits, &Bucket::Total);
        let raw = self.store.get(&key).await?;
        Ok(Count::from_raw(&key, raw.as_deref()).value())
    }

    /// Hit series for `code` over the period around now
    pub async fn series(&self, code: &str, granularity: Granularity) -> Result<Vec<Stat>> {
        self.reconstruct(code, &Series::Hits, granularity).await
    }

    /// Same as [`StatsService::series`] with the granularity given by name
    pub async fn series_str(&self, code: &str, granularity: &str) -> Result<Vec<Stat>> {
        let granularity = Granularity::parse(granularity)?;
        self.series(code, granularity).await
    }

    /// Time series restricted to one category value, e.g. hits from `AR`
    pub async fn category_series(
        &self,
        code: &str,
        category: Category,
        value: &str,
        granularity: Granularity,
    ) -> Result<Vec<Stat>> {
        let series = Series::Category(category, value.to_string());
        self.reconstruct(code, &series, granularity).await
    }

    /// All-time leaderboard of a category, highest count first.
    ///
    /// Ties keep the order the store returned the keys in.
    #[instrument(skip(self))]
    pub async fn top_category(&self, code: &str, category: Category) -> Result<Vec<Stat>> {
        let pattern = self.keys.category_totals_pattern(code, category);
        let keys = self.store.keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let values = self.store.mget(&keys).await?;

        let mut stats: Vec<Stat> = keys
            .iter()
            .zip(values.iter())
            .filter_map(|(key, raw)| {
                let parsed = self.keys.parse_counter_key(key)?;
                if parsed.code != code || parsed.bucket != Bucket::Total {
                    return None;
                }
                match parsed.series {
                    Series::Category(c, value) if c == category => {
                        Some(Stat::new(value, Count::from_raw(key, raw.as_deref()).value()))
                    }
                    _ => None,
                }
            })
            .collect();

        stats.sort_by(|a, b| b.value.cmp(&a.value));
        debug!(
            "top_category: {} {} values for '{}'",
            stats.len(),
            category,
            code
        );
        Ok(stats)
    }

    #[instrument(skip(self, series))]
    async fn reconstruct(
        &self,
        code: &str,
        series: &Series,
        granularity: Granularity,
    ) -> Result<Vec<Stat>> {
        let period = Period::around(
            granularity,
            self.calendar.now(),
            self.minute_width,
            self.all_time_years,
        );

        let mut keys = Vec::new();
        for pattern in &period.patterns {
            let glob = self.keys.scan_pattern(code, series, pattern);
            trace!("reconstruct: scanning '{}'", glob);
            keys.extend(self.store.keys(&glob).await?);
        }

        let mut counts: HashMap<Bucket, i64> = HashMap::with_capacity(keys.len());
        if !keys.is_empty() {
            let values = self.store.mget(&keys).await?;
            for (key, raw) in keys.iter().zip(values.iter()) {
                let Some(parsed) = self.keys.parse_counter_key(key) else {
                    continue;
                };
                if parsed.code != code || &parsed.series != series {
                    continue;
                }
                counts.insert(parsed.bucket, Count::from_raw(key, raw.as_deref()).value());
            }
        }

        Ok(period
            .buckets
            .iter()
            .map(|bucket| {
                Stat::new(
                    period.label(bucket),
                    counts.get(bucket).copied().unwrap_or(0),
                )
            })
            .collect())
    }
}
