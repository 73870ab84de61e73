use std::sync::Arc;

use super::StaticConfig;
use crate::errors::Result;

/// Load and validate the configuration
///
/// Reads `path` (default "config.toml") layered under `SHORTSTAT__*`
/// environment variables. Components take their settings from the
/// returned value explicitly.
///
/// # Examples
/// ```no_run
/// use shortstat::config::init_config;
/// let config = init_config(None).unwrap();
/// assert!(config.links.code_length > 0);
/// ```
pub fn init_config(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    StaticConfig::load(path).map(Arc::new)
}
