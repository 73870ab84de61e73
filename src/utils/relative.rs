use chrono::{DateTime, Utc};

const HOURS_PER_DAY: i64 = 24;
const HOURS_PER_MONTH: i64 = 30 * HOURS_PER_DAY;
const HOURS_PER_YEAR: i64 = 365 * HOURS_PER_DAY;

/// 将创建时间渲染为 "3 days ago" 这类相对描述
///
/// 月按 30 天、年按 365 天计；未来时间按绝对差值处理。
pub fn relative_time(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - created).abs();
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    match hours {
        h if h >= HOURS_PER_YEAR => "Over an year ago".to_string(),
        h if h > HOURS_PER_MONTH => format!("{} months ago", h / HOURS_PER_MONTH),
        HOURS_PER_MONTH => "a month ago".to_string(),
        h if h > HOURS_PER_DAY => format!("{} days ago", h / HOURS_PER_DAY),
        HOURS_PER_DAY => "yesterday".to_string(),
        h if h >= 2 => format!("{} hours ago", h),
        1 if minutes > 60 => "over an hour ago".to_string(),
        1 => "an hour ago".to_string(),
        _ => match minutes {
            m if m >= 2 => format!("{} minutes ago", m),
            1 => "a minute ago".to_string(),
            _ => "just now".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ago(d: Duration) -> String {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        relative_time(now - d, now)
    }

    #[test]
    fn test_minutes() {
        assert_eq!(ago(Duration::seconds(30)), "just now");
        assert_eq!(ago(Duration::seconds(90)), "a minute ago");
        assert_eq!(ago(Duration::minutes(2)), "2 minutes ago");
        assert_eq!(ago(Duration::minutes(59)), "59 minutes ago");
    }

    #[test]
    fn test_hours() {
        assert_eq!(ago(Duration::minutes(60)), "an hour ago");
        assert_eq!(ago(Duration::minutes(95)), "over an hour ago");
        assert_eq!(ago(Duration::hours(2)), "2 hours ago");
        assert_eq!(ago(Duration::hours(23)), "23 hours ago");
    }

    #[test]
    fn test_days_and_beyond() {
        assert_eq!(ago(Duration::hours(24)), "yesterday");
        assert_eq!(ago(Duration::hours(25)), "1 days ago");
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(30)), "a month ago");
        assert_eq!(ago(Duration::days(65)), "2 months ago");
        assert_eq!(ago(Duration::days(365)), "Over an year ago");
    }

    #[test]
    fn test_future_uses_absolute_difference() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now + Duration::hours(3), now), "3 hours ago");
    }
}
