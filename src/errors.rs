use std::fmt;

/// 统一错误类型
///
/// 输入校验类错误（EmptyInput / InvalidUrl / DomainNotAllowed / InvalidGranularity /
/// InvalidCategory）可由调用方修正；Store 表示存储不可达；CorruptRecord 表示数据损坏。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortstatError {
    EmptyInput(String),
    InvalidUrl(String),
    DomainNotAllowed(String),
    NotFound(String),
    InvalidGranularity(String),
    InvalidCategory(String),
    Store(String),
    CorruptRecord(String),
    ExhaustedKeyspace(String),
    Config(String),
}

impl ShortstatError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortstatError::EmptyInput(_) => "E001",
            ShortstatError::InvalidUrl(_) => "E002",
            ShortstatError::DomainNotAllowed(_) => "E003",
            ShortstatError::NotFound(_) => "E004",
            ShortstatError::InvalidGranularity(_) => "E005",
            ShortstatError::InvalidCategory(_) => "E006",
            ShortstatError::Store(_) => "E007",
            ShortstatError::CorruptRecord(_) => "E008",
            ShortstatError::ExhaustedKeyspace(_) => "E009",
            ShortstatError::Config(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortstatError::EmptyInput(_) => "Empty Input",
            ShortstatError::InvalidUrl(_) => "Invalid URL",
            ShortstatError::DomainNotAllowed(_) => "Domain Not Allowed",
            ShortstatError::NotFound(_) => "Resource Not Found",
            ShortstatError::InvalidGranularity(_) => "Invalid Granularity",
            ShortstatError::InvalidCategory(_) => "Invalid Category",
            ShortstatError::Store(_) => "Store Error",
            ShortstatError::CorruptRecord(_) => "Corrupt Record",
            ShortstatError::ExhaustedKeyspace(_) => "Exhausted Keyspace",
            ShortstatError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortstatError::EmptyInput(msg)
            | ShortstatError::InvalidUrl(msg)
            | ShortstatError::DomainNotAllowed(msg)
            | ShortstatError::NotFound(msg)
            | ShortstatError::InvalidGranularity(msg)
            | ShortstatError::InvalidCategory(msg)
            | ShortstatError::Store(msg)
            | ShortstatError::CorruptRecord(msg)
            | ShortstatError::ExhaustedKeyspace(msg)
            | ShortstatError::Config(msg) => msg,
        }
    }

    /// Whether the caller can fix this by changing its input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ShortstatError::EmptyInput(_)
                | ShortstatError::InvalidUrl(_)
                | ShortstatError::DomainNotAllowed(_)
                | ShortstatError::InvalidGranularity(_)
                | ShortstatError::InvalidCategory(_)
        )
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortstatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortstatError {}

// 便捷的构造函数
impl ShortstatError {
    pub fn empty_input<T: Into<String>>(msg: T) -> Self {
        ShortstatError::EmptyInput(msg.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ShortstatError::InvalidUrl(msg.into())
    }

    pub fn domain_not_allowed<T: Into<String>>(msg: T) -> Self {
        ShortstatError::DomainNotAllowed(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortstatError::NotFound(msg.into())
    }

    pub fn invalid_granularity<T: Into<String>>(msg: T) -> Self {
        ShortstatError::InvalidGranularity(msg.into())
    }

    pub fn invalid_category<T: Into<String>>(msg: T) -> Self {
        ShortstatError::InvalidCategory(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        ShortstatError::Store(msg.into())
    }

    pub fn corrupt_record<T: Into<String>>(msg: T) -> Self {
        ShortstatError::CorruptRecord(msg.into())
    }

    pub fn exhausted_keyspace<T: Into<String>>(msg: T) -> Self {
        ShortstatError::ExhaustedKeyspace(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortstatError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<redis::RedisError> for ShortstatError {
    fn from(err: redis::RedisError) -> Self {
        ShortstatError::Store(err.to_string())
    }
}

impl From<std::io::Error> for ShortstatError {
    fn from(err: std::io::Error) -> Self {
        ShortstatError::Config(err.to_string())
    }
}

impl From<config::ConfigError> for ShortstatError {
    fn from(err: config::ConfigError) -> Self {
        ShortstatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ShortstatError {
    fn from(err: serde_json::Error) -> Self {
        ShortstatError::CorruptRecord(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortstatError>;
