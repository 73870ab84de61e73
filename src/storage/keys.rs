//! Key grammar
//!
//! The single place that knows how keys look on the wire:
//!
//! ```text
//! <prefix>url:<code>                                  -> serialized LinkRecord
//! <prefix>stats:<code>:hits:<bucket>                  -> integer counter
//! <prefix>stats:<code>:<namespace>:<bucket>:<value>   -> per-category counter
//!
//! bucket := total | year:Y | month:Y-MM | day:Y-MM-DD
//!         | hour:Y-MM-DD HH | minute:Y-MM-DD HH:MM
//! ```
//!
//! Readers use [`KeySpace::parse_counter_key`] to turn scan results back into
//! typed buckets instead of slicing strings per report.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Dimension a hit can be sliced by
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[strum(to_string = "country", serialize = "countries")]
    Country,
    #[strum(to_string = "browser", serialize = "browsers")]
    Browser,
    #[strum(to_string = "os")]
    Os,
}

impl Category {
    /// Key namespace segment
    pub fn namespace(self) -> &'static str {
        match self {
            Category::Country => "countries",
            Category::Browser => "browsers",
            Category::Os => "os",
        }
    }

    fn from_namespace(ns: &str) -> Option<Self> {
        match ns {
            "countries" => Some(Category::Country),
            "browsers" => Some(Category::Browser),
            "os" => Some(Category::Os),
            _ => None,
        }
    }
}

/// Which family of counters a key belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Series {
    /// Unconditional hit counters
    Hits,
    /// Counters for one category value, e.g. `(Country, "AR")`
    Category(Category, String),
}

/// One counter's time window
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bucket {
    Total,
    Year(i32),
    Month { year: i32, month: u32 },
    Day(NaiveDate),
    Hour { date: NaiveDate, hour: u32 },
    Minute { date: NaiveDate, hour: u32, minute: u32 },
}

impl Bucket {
    /// Every bucket an instant falls into, coarsest first.
    ///
    /// `minute_width` must divide 60; the minute bucket is the start of the
    /// `minute_width`-wide slot containing `at`.
    pub fn hierarchy(at: NaiveDateTime, minute_width: u32) -> [Bucket; 6] {
        let date = at.date();
        let hour = at.hour();
        let minute = (at.minute() / minute_width) * minute_width;
        [
            Bucket::Total,
            Bucket::Year(date.year()),
            Bucket::Month {
                year: date.year(),
                month: date.month(),
            },
            Bucket::Day(date),
            Bucket::Hour { date, hour },
            Bucket::Minute { date, hour, minute },
        ]
    }

    fn kind(&self) -> &'static str {
        match self {
            Bucket::Total => "total",
            Bucket::Year(_) => "year",
            Bucket::Month { .. } => "month",
            Bucket::Day(_) => "day",
            Bucket::Hour { .. } => "hour",
            Bucket::Minute { .. } => "minute",
        }
    }

    /// Parse the `kind:payload` form written by `Display`
    pub fn decode(text: &str) -> Option<Bucket> {
        if text == "total" {
            return Some(Bucket::Total);
        }
        let (kind, payload) = text.split_once(':')?;
        Self::decode_parts(kind, payload)
    }

    fn decode_parts(kind: &str, payload: &str) -> Option<Bucket> {
        match kind {
            "year" => payload.parse().ok().map(Bucket::Year),
            "month" => {
                let (year, month) = payload.split_once('-')?;
                let year = year.parse().ok()?;
                let month = parse_two_digits(month)?;
                (1..=12).contains(&month).then_some(Bucket::Month { year, month })
            }
            "day" => parse_date(payload).map(Bucket::Day),
            "hour" => {
                let (date, hour) = payload.split_once(' ')?;
                let hour = parse_two_digits(hour).filter(|h| *h < 24)?;
                Some(Bucket::Hour {
                    date: parse_date(date)?,
                    hour,
                })
            }
            "minute" => {
                let (date, clock) = payload.split_once(' ')?;
                let (hour, minute) = clock.split_once(':')?;
                let hour = parse_two_digits(hour).filter(|h| *h < 24)?;
                let minute = parse_two_digits(minute).filter(|m| *m < 60)?;
                Some(Bucket::Minute {
                    date: parse_date(date)?,
                    hour,
                    minute,
                })
            }
            _ => None,
        }
    }

    /// How many `:` separators the payload of this kind contains
    fn payload_colons(kind: &str) -> Option<usize> {
        match kind {
            "year" | "month" | "day" | "hour" => Some(0),
            "minute" => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Total => write!(f, "total"),
            Bucket::Year(year) => write!(f, "year:{}", year),
            Bucket::Month { year, month } => write!(f, "month:{}-{:02}", year, month),
            Bucket::Day(date) => write!(f, "day:{}", date.format("%Y-%m-%d")),
            Bucket::Hour { date, hour } => {
                write!(f, "hour:{} {:02}", date.format("%Y-%m-%d"), hour)
            }
            Bucket::Minute { date, hour, minute } => write!(
                f,
                "minute:{} {:02}:{:02}",
                date.format("%Y-%m-%d"),
                hour,
                minute
            ),
        }
    }
}

/// A glob selecting every child bucket of one containing period
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketPattern {
    MinutesOfHour { date: NaiveDate, hour: u32 },
    HoursOfDay(NaiveDate),
    DaysOfMonth { year: i32, month: u32 },
    MonthsOfYear(i32),
    Years,
}

impl BucketPattern {
    fn glob(&self) -> String {
        match self {
            BucketPattern::MinutesOfHour { date, hour } => {
                format!("minute:{} {:02}:*", date.format("%Y-%m-%d"), hour)
            }
            BucketPattern::HoursOfDay(date) => format!("hour:{} *", date.format("%Y-%m-%d")),
            BucketPattern::DaysOfMonth { year, month } => format!("day:{}-{:02}-*", year, month),
            BucketPattern::MonthsOfYear(year) => format!("month:{}-*", year),
            BucketPattern::Years => "year:*".to_string(),
        }
    }
}

/// A counter key split back into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterKey {
    pub code: String,
    pub series: Series,
    pub bucket: Bucket,
}

/// Key builder/parser bound to a namespace prefix
#[derive(Debug, Clone)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn link_key(&self, code: &str) -> String {
        format!("{}url:{}", self.prefix, code)
    }

    pub fn counter_key(&self, code: &str, series: &Series, bucket: &Bucket) -> String {
        match series {
            Series::Hits => format!("{}stats:{}:hits:{}", self.prefix, code, bucket),
            Series::Category(category, value) => format!(
                "{}stats:{}:{}:{}:{}",
                self.prefix,
                code,
                category.namespace(),
                bucket,
                value
            ),
        }
    }

    /// Glob over the child buckets of one period for one series
    pub fn scan_pattern(&self, code: &str, series: &Series, pattern: &BucketPattern) -> String {
        let base = format!(
            "{}stats:{}:",
            escape_glob(&self.prefix),
            escape_glob(code)
        );
        match series {
            Series::Hits => format!("{}hits:{}", base, pattern.glob()),
            Series::Category(category, value) => format!(
                "{}{}:{}:{}",
                base,
                category.namespace(),
                pattern.glob(),
                escape_glob(value)
            ),
        }
    }

    /// Glob over the all-time totals of every value of a category
    pub fn category_totals_pattern(&self, code: &str, category: Category) -> String {
        format!(
            "{}stats:{}:{}:total:*",
            escape_glob(&self.prefix),
            escape_glob(code),
            category.namespace()
        )
    }

    /// Inverse of [`KeySpace::counter_key`]; `None` for anything else
    pub fn parse_counter_key(&self, key: &str) -> Option<CounterKey> {
        let rest = key.strip_prefix(self.prefix.as_str())?;
        let rest = rest.strip_prefix("stats:")?;
        let (code, rest) = rest.split_once(':')?;
        let (namespace, rest) = rest.split_once(':')?;

        if namespace == "hits" {
            return Some(CounterKey {
                code: code.to_string(),
                series: Series::Hits,
                bucket: Bucket::decode(rest)?,
            });
        }

        let category = Category::from_namespace(namespace)?;
        let (kind, after) = rest.split_once(':')?;
        let (bucket, value) = if kind == "total" {
            (Bucket::Total, after)
        } else {
            let colons = Bucket::payload_colons(kind)?;
            let split = nth_colon(after, colons)?;
            let bucket = Bucket::decode_parts(kind, &after[..split])?;
            (bucket, &after[split + 1..])
        };

        if value.is_empty() {
            return None;
        }

        Some(CounterKey {
            code: code.to_string(),
            series: Series::Category(category, value.to_string()),
            bucket,
        })
    }
}

/// Byte offset of the `n`th (zero-based) colon in `text`
fn nth_colon(text: &str, n: usize) -> Option<usize> {
    text.match_indices(':').nth(n).map(|(idx, _)| idx)
}

fn parse_two_digits(text: &str) -> Option<u32> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Escape glob metacharacters so `text` only matches itself
pub fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
