//! 配置值验证模块

use super::{LinksConfig, StatsConfig, StoreConfig};
use crate::errors::{Result, ShortstatError};

/// Longest short code we are willing to generate
pub const MAX_CODE_LENGTH: usize = 32;

pub fn validate_store(store: &StoreConfig) -> Result<()> {
    match store.backend.to_lowercase().as_str() {
        "redis" | "memory" => {}
        other => {
            return Err(ShortstatError::config(format!(
                "Unknown store backend: '{}'. Valid: redis, memory",
                other
            )));
        }
    }

    if store.key_prefix.contains(char::is_whitespace) {
        return Err(ShortstatError::config(
            "store.key_prefix must not contain whitespace",
        ));
    }

    Ok(())
}

pub fn validate_links(links: &LinksConfig) -> Result<()> {
    if links.code_length == 0 || links.code_length > MAX_CODE_LENGTH {
        return Err(ShortstatError::config(format!(
            "links.code_length must be between 1 and {}, got {}",
            MAX_CODE_LENGTH, links.code_length
        )));
    }

    if links.max_code_attempts == 0 {
        return Err(ShortstatError::config(
            "links.max_code_attempts must be at least 1",
        ));
    }

    Ok(())
}

pub fn validate_stats(stats: &StatsConfig) -> Result<()> {
    let width = stats.minute_bucket;
    if width == 0 || width > 60 || 60 % width != 0 {
        return Err(ShortstatError::config(format!(
            "stats.minute_bucket must divide 60 evenly, got {}",
            width
        )));
    }

    if stats.all_time_years < 0 {
        return Err(ShortstatError::config(
            "stats.all_time_years must not be negative",
        ));
    }

    match stats.timezone.to_lowercase().as_str() {
        "local" | "utc" => Ok(()),
        other => Err(ShortstatError::config(format!(
            "Unknown timezone: '{}'. Valid: local, utc",
            other
        ))),
    }
}
