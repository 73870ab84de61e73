//! Link management service
//!
//! Validation, code allocation and persistence for link records.

use std::sync::Arc;

use tracing::{info, instrument};

use super::code::CodeGenerator;
use super::models::LinkRecord;
use super::normalize::normalize_destination;
use super::store::LinkStore;
use crate::clock::Calendar;
use crate::config::LinksConfig;
use crate::errors::Result;
use crate::storage::{KeySpace, KvStore};

pub struct LinkService {
    links: LinkStore,
    generator: CodeGenerator,
    restrict_domain: Option<String>,
    calendar: Calendar,
}

impl LinkService {
    pub fn new(
        links: LinkStore,
        generator: CodeGenerator,
        restrict_domain: Option<String>,
        calendar: Calendar,
    ) -> Self {
        Self {
            links,
            generator,
            restrict_domain,
            calendar,
        }
    }

    pub fn from_config(
        store: Arc<dyn KvStore>,
        keys: KeySpace,
        config: &LinksConfig,
        calendar: Calendar,
    ) -> Self {
        Self::new(
            LinkStore::new(store, keys),
            CodeGenerator::new(config.code_length, config.max_code_attempts),
            config.restrict_domain.clone(),
            calendar,
        )
    }

    /// Validate `raw`, allocate a fresh code and persist the record
    #[instrument(skip(self))]
    pub async fn create_link(&self, raw: &str) -> Result<LinkRecord> {
        let destination = normalize_destination(raw, self.restrict_domain.as_deref())?;
        let code = self.generator.allocate(&self.links).await?;

        let record = LinkRecord {
            code,
            destination: destination.to_string(),
            created_at: self.calendar.instant(),
        };
        self.links.put(&record).await?;

        info!(
            "LinkService: created link '{}' -> '{}'",
            record.code, record.destination
        );
        Ok(record)
    }

    pub async fn lookup_link(&self, code: &str) -> Result<Option<LinkRecord>> {
        self.links.get(code).await
    }

    /// Remove the record; counters are left in place
    #[instrument(skip(self))]
    pub async fn delete_link(&self, code: &str) -> Result<bool> {
        let removed = self.links.delete(code).await?;
        if removed {
            info!("LinkService: deleted '{}'", code);
        }
        Ok(removed)
    }
}
