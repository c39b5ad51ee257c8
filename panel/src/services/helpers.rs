//! Shared helper functions
//!
//! Common utilities used across services and commands.

use chrono::{DateTime, Utc};

/// Human readable distance from `then` to `now`, e.g. "5 minutes ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 0 {
        return "in the future".to_string();
    }

    let (value, unit) = match secs {
        0..=44 => return "a few seconds ago".to_string(),
        45..=3_599 => ((secs + 30) / 60, "minute"),
        3_600..=86_399 => ((secs + 1_800) / 3_600, "hour"),
        _ => ((secs + 43_200) / 86_400, "day"),
    };

    let value = value.max(1);
    if value == 1 {
        let article = if unit == "hour" { "an" } else { "a" };
        format!("{} {} ago", article, unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "a few seconds ago");
        assert_eq!(relative_time(now - Duration::seconds(60), now), "a minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2 days ago");
        assert_eq!(relative_time(now + Duration::minutes(1), now), "in the future");
    }
}
