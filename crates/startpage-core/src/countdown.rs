//! Countdown widget arithmetic.

use chrono::{DateTime, NaiveDateTime, TimeZone};

/// Time left until a target, split for display. All zero once the target
/// has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownRemaining {
    pub fn until<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> Self {
        let total = target.clone().signed_duration_since(now.clone()).num_seconds();
        if total <= 0 {
            return Self::default();
        }
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }

    pub fn is_finished(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse the stored countdown target. Accepts RFC 3339 or the date-time
/// picker's `YYYY-MM-DDTHH:MM[:SS]`, which is read as local to `tz`.
pub fn parse_target<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(tz));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_splits_remaining_time() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let target = now + Duration::seconds(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        assert_eq!(
            CountdownRemaining::until(&target, &now),
            CountdownRemaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
    }

    #[test]
    fn test_past_target_is_zero() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let target = now - Duration::seconds(10);
        assert!(CountdownRemaining::until(&target, &now).is_finished());
        assert!(CountdownRemaining::until(&now, &now).is_finished());
    }

    #[test]
    fn test_parse_target() {
        let expected = Utc.with_ymd_and_hms(2030, 6, 1, 8, 30, 0).unwrap();
        assert_eq!(parse_target("2030-06-01T08:30", &Utc), Some(expected));
        assert_eq!(parse_target("2030-06-01T10:30:00+02:00", &Utc), Some(expected));
        assert_eq!(parse_target("soon", &Utc), None);
    }
}
