//! Send-window evaluation.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::config::{OvernightPolicy, Schedule};

/// Schedule evaluation errors.
///
/// A broken schedule is a configuration error and is surfaced on the
/// request it would have gated, never treated as an always-open or
/// always-closed window.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid timezone '{timezone}'")]
    InvalidTimezone { timezone: String },

    #[error("invalid time '{value}', expected HH:MM:SS")]
    InvalidTime { value: String },
}

/// Check whether `now` falls inside the send window.
///
/// A disabled schedule is always open. Bounds are inclusive at both ends.
/// An inverted window (`end < start`) is empty under
/// [`OvernightPolicy::SameDay`] and spans midnight under
/// [`OvernightPolicy::Wrap`].
pub fn is_open_at(schedule: &Schedule, now: DateTime<Utc>) -> Result<bool, ScheduleError> {
    if !schedule.enabled {
        return Ok(true);
    }

    let tz: Tz = schedule
        .timezone
        .parse()
        .map_err(|_| ScheduleError::InvalidTimezone {
            timezone: schedule.timezone.clone(),
        })?;

    let start = parse_time(&schedule.start_time)?;
    let end = parse_time(&schedule.end_time)?;
    let local = now.with_timezone(&tz).time();

    let open = if start <= end {
        local >= start && local <= end
    } else {
        match schedule.overnight {
            OvernightPolicy::SameDay => false,
            OvernightPolicy::Wrap => local >= start || local <= end,
        }
    };

    Ok(open)
}

/// Check whether the window is open right now.
pub fn is_open(schedule: &Schedule) -> Result<bool, ScheduleError> {
    is_open_at(schedule, Utc::now())
}

fn parse_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").map_err(|_| ScheduleError::InvalidTime {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn schedule(start: &str, end: &str, tz: &str, overnight: OvernightPolicy) -> Schedule {
        Schedule {
            enabled: true,
            start_time: start.to_string(),
            end_time: end.to_string(),
            timezone: tz.to_string(),
            overnight,
        }
    }

    /// 10:30 UTC on a fixed date
    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, min, 0).unwrap()
    }

    #[test]
    fn test_disabled_schedule_is_open() {
        let mut s = schedule("09:00:00", "17:00:00", "UTC", OvernightPolicy::SameDay);
        s.enabled = false;
        assert!(is_open_at(&s, at(3, 0)).unwrap());
    }

    #[test]
    fn test_inside_window() {
        let s = schedule("09:00:00", "17:00:00", "UTC", OvernightPolicy::SameDay);
        assert!(is_open_at(&s, at(12, 0)).unwrap());
    }

    #[test]
    fn test_outside_window() {
        let s = schedule("09:00:00", "17:00:00", "UTC", OvernightPolicy::SameDay);
        assert!(!is_open_at(&s, at(8, 59)).unwrap());
        assert!(!is_open_at(&s, at(17, 1)).unwrap());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let s = schedule("09:00:00", "17:00:00", "UTC", OvernightPolicy::SameDay);
        assert!(is_open_at(&s, at(9, 0)).unwrap());
        assert!(is_open_at(&s, at(17, 0)).unwrap());
    }

    #[test]
    fn test_window_respects_timezone() {
        // 09:00-17:00 in Ho Chi Minh City (UTC+7): 12:00 UTC is 19:00 local
        let s = schedule(
            "09:00:00",
            "17:00:00",
            "Asia/Ho_Chi_Minh",
            OvernightPolicy::SameDay,
        );
        assert!(!is_open_at(&s, at(12, 0)).unwrap());
        assert!(is_open_at(&s, at(3, 0)).unwrap());
    }

    #[test]
    fn test_inverted_window_same_day_is_empty() {
        let s = schedule("22:00:00", "06:00:00", "UTC", OvernightPolicy::SameDay);
        assert!(!is_open_at(&s, at(23, 0)).unwrap());
        assert!(!is_open_at(&s, at(3, 0)).unwrap());
        assert!(!is_open_at(&s, at(12, 0)).unwrap());
    }

    #[test]
    fn test_inverted_window_wraps_midnight() {
        let s = schedule("22:00:00", "06:00:00", "UTC", OvernightPolicy::Wrap);
        assert!(is_open_at(&s, at(23, 0)).unwrap());
        assert!(is_open_at(&s, at(3, 0)).unwrap());
        assert!(!is_open_at(&s, at(12, 0)).unwrap());
    }

    #[test]
    fn test_invalid_timezone_is_an_error() {
        let s = schedule("09:00:00", "17:00:00", "Mars/Olympus", OvernightPolicy::SameDay);
        let err = is_open_at(&s, at(12, 0)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTimezone { .. }));
    }

    #[test]
    fn test_invalid_time_is_an_error() {
        let s = schedule("9am", "17:00:00", "UTC", OvernightPolicy::SameDay);
        let err = is_open_at(&s, at(12, 0)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTime { .. }));
    }
}
