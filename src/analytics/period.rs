//! Report periods
//!
//! A granularity names a containing period around "now" (this hour, this
//! day, ...) and the child buckets a report lists inside it. Everything is
//! derived with calendar arithmetic, so month lengths, leap years and weeks
//! that straddle a month boundary come out right.

use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::errors::{Result, ShortstatError};
use crate::storage::{Bucket, BucketPattern};

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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Granularity {
    /// Minute buckets of the current hour
    Hour,
    /// Hours of the current day
    Day,
    /// Monday to Sunday of the current week
    Week,
    /// Days of the current month
    Month,
    /// Months of the current year
    Year,
    /// A trailing window of years
    All,
}

impl Granularity {
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(value.trim()).map_err(|_| {
            ShortstatError::invalid_granularity(format!("Invalid stat requested: {}", value))
        })
    }
}

/// The child buckets of one period and the globs that find them
#[derive(Debug, Clone)]
pub struct Period {
    pub granularity: Granularity,
    /// Scan patterns covering every bucket in `buckets`
    pub patterns: Vec<BucketPattern>,
    /// Expected buckets in chronological order
    pub buckets: Vec<Bucket>,
}

impl Period {
    pub fn around(
        granularity: Granularity,
        now: NaiveDateTime,
        minute_width: u32,
        all_time_years: i32,
    ) -> Self {
        let today = now.date();
        let (patterns, buckets) = match granularity {
            Granularity::Hour => {
                let hour = now.hour();
                let width = minute_width.clamp(1, 60) as usize;
                let buckets: Vec<Bucket> = (0..60)
                    .step_by(width)
                    .map(|minute| Bucket::Minute {
                        date: today,
                        hour,
                        minute,
                    })
                    .collect();
                (
                    vec![BucketPattern::MinutesOfHour { date: today, hour }],
                    buckets,
                )
            }
            Granularity::Day => (
                vec![BucketPattern::HoursOfDay(today)],
                (0..24)
                    .map(|hour| Bucket::Hour { date: today, hour })
                    .collect(),
            ),
            Granularity::Week => {
                let monday =
                    today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                let days: Vec<NaiveDate> = monday.iter_days().take(7).collect();

                let mut patterns: Vec<BucketPattern> = Vec::with_capacity(2);
                for day in &days {
                    let pattern = BucketPattern::DaysOfMonth {
                        year: day.year(),
                        month: day.month(),
                    };
                    if !patterns.contains(&pattern) {
                        patterns.push(pattern);
                    }
                }

                (patterns, days.into_iter().map(Bucket::Day).collect())
            }
            Granularity::Month => {
                let (year, month) = (today.year(), today.month());
                let buckets: Vec<Bucket> = today
                    .with_day(1)
                    .map(|first| {
                        first
                            .iter_days()
                            .take_while(|d| d.month() == month)
                            .map(Bucket::Day)
                            .collect()
                    })
                    .unwrap_or_default();
                (vec![BucketPattern::DaysOfMonth { year, month }], buckets)
            }
            Granularity::Year => {
                let year = today.year();
                (
                    vec![BucketPattern::MonthsOfYear(year)],
                    (1..=12)
                        .map(|month| Bucket::Month { year, month })
                        .collect(),
                )
            }
            Granularity::All => {
                let year = today.year();
                (
                    vec![BucketPattern::Years],
                    (year - all_time_years.max(0)..=year)
                        .map(Bucket::Year)
                        .collect(),
                )
            }
        };

        Self {
            granularity,
            patterns,
            buckets,
        }
    }

    /// Display label for a bucket, falling back to its raw encoding
    pub fn label(&self, bucket: &Bucket) -> String {
        format_label(self.granularity, bucket).unwrap_or_else(|| bucket.to_string())
    }
}

fn format_label(granularity: Granularity, bucket: &Bucket) -> Option<String> {
    match (granularity, bucket) {
        (Granularity::Hour, Bucket::Minute { hour, minute, .. }) => {
            Some(format!("{:02}:{:02}", hour, minute))
        }
        (Granularity::Day, Bucket::Hour { hour, .. }) => Some(format!("{:02}:00", hour)),
        (Granularity::Week, Bucket::Day(date)) => Some(date.format("%A %Y-%m-%d").to_string()),
        (Granularity::Month, Bucket::Day(date)) => Some(date.format("%B %-d").to_string()),
        (Granularity::Year, Bucket::Month { year, month }) => NaiveDate::from_ymd_opt(*year, *month, 1)
            .map(|first| first.format("%B %Y").to_string()),
        (Granularity::All, Bucket::Year(year)) => Some(year.to_string()),
        _ => None,
    }
}
