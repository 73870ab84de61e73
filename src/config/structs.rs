use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortstatError};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - store: 键值存储连接配置
/// - links: 短码生成配置
/// - stats: 统计分桶配置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SHORTSTAT，分隔符：__
    /// 示例：SHORTSTAT__LINKS__CODE_LENGTH=7
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SHORTSTAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        Ok(config)
    }

    /// 校验配置组合是否合法
    pub fn validate(&self) -> Result<()> {
        super::validators::validate_store(&self.store)?;
        super::validators::validate_links(&self.links)?;
        super::validators::validate_stats(&self.stats)?;
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShortstatError::config(format!("Failed to render config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 键值存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `redis` or `memory`
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 短码生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Only destinations on this domain (or its subdomains) are accepted
    #[serde(default)]
    pub restrict_domain: Option<String>,
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: u32,
}

/// 统计分桶配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Width of the minute bucket, in minutes
    #[serde(default = "default_minute_bucket")]
    pub minute_bucket: u32,
    /// How many past years the `all` series covers
    #[serde(default = "default_all_time_years")]
    pub all_time_years: i32,
    /// `local` or `utc`
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_store_backend() -> String {
    "redis".to_string()
}

fn default_store_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_key_prefix() -> String {
    "shortstat:".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_code_length() -> usize {
    5
}

fn default_max_code_attempts() -> u32 {
    64
}

fn default_minute_bucket() -> u32 {
    5
}

fn default_all_time_years() -> i32 {
    10
}

fn default_timezone() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            url: default_store_url(),
            key_prefix: default_key_prefix(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            restrict_domain: None,
            max_code_attempts: default_max_code_attempts(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            minute_bucket: default_minute_bucket(),
            all_time_years: default_all_time_years(),
            timezone: default_timezone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StaticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.links.code_length, 5);
        assert_eq!(config.stats.minute_bucket, 5);
        assert_eq!(config.store.key_prefix, "shortstat:");
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[links]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.stats.all_time_years, 10);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortstat.toml");
        std::fs::write(
            &path,
            "[links]\ncode_length = 7\nrestrict_domain = \"example.com\"\n\n[stats]\nminute_bucket = 15\n",
        )
        .unwrap();

        let config = StaticConfig::load(path.to_str()).unwrap();
        assert_eq!(config.links.code_length, 7);
        assert_eq!(config.links.restrict_domain.as_deref(), Some("example.com"));
        assert_eq!(config.stats.minute_bucket, 15);
        assert_eq!(config.store.backend, "redis");
    }

    #[test]
    fn test_load_rejects_invalid_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[stats]\nminute_bucket = 7\n").unwrap();

        let err = StaticConfig::load(path.to_str()).unwrap_err();
        assert!(matches!(err, ShortstatError::Config(_)));
    }
}
