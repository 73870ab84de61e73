use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code and where it points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub code: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
}

/// A link together with its all-time hit count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSummary {
    pub record: LinkRecord,
    pub total_hits: i64,
}
