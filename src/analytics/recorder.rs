//! 点击计数器
//!
//! 每次跳转对一组覆盖不同时间粒度的计数器各 INCR 一次，
//! 所有 INCR 通过一次 pipeline 发送。失败只记录日志，不影响跳转。

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use super::visitor::VisitorContext;
use crate::clock::Calendar;
use crate::errors::Result;
use crate::storage::{Bucket, KeySpace, KvStore, Series};

pub struct HitRecorder {
    store: Arc<dyn KvStore>,
    keys: KeySpace,
    calendar: Calendar,
    minute_width: u32,
}

impl HitRecorder {
    pub fn new(
        store: Arc<dyn KvStore>,
        keys: KeySpace,
        calendar: Calendar,
        minute_width: u32,
    ) -> Self {
        Self {
            store,
            keys,
            calendar,
            minute_width: minute_width.clamp(1, 60),
        }
    }

    /// Every counter key one hit at `at` increments
    pub fn plan(&self, code: &str, visitor: &VisitorContext, at: NaiveDateTime) -> Vec<String> {
        let buckets = Bucket::hierarchy(at, self.minute_width);

        let mut series = vec![Series::Hits];
        series.extend(visitor.category_series());

        series
            .iter()
            .flat_map(|s| buckets.iter().map(move |b| self.keys.counter_key(code, s, b)))
            .collect()
    }

    /// Increment all counters for one hit and wait for the pipeline flush.
    ///
    /// Returns the number of counters sent. Nothing is rolled back when the
    /// flush fails part way.
    #[instrument(skip(self, visitor))]
    pub async fn record(&self, code: &str, visitor: &VisitorContext) -> Result<usize> {
        let keys = self.plan(code, visitor, self.calendar.now());
        self.store.incr_batch(&keys).await?;
        debug!("Recorded hit for '{}' ({} counters)", code, keys.len());
        Ok(keys.len())
    }

    /// Fire-and-forget variant; failures are logged and dropped
    pub fn record_detached(self: &Arc<Self>, code: String, visitor: VisitorContext) -> JoinHandle<()> {
        let recorder = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = recorder.record(&code, &visitor).await {
                error!("Failed to record hit for '{}': {}", code, e);
            }
        })
    }
}
