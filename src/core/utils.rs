// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::core::record::DEFAULT_TIME_FORMAT;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0));
    d.as_millis() as u64
}

/// Formats an elapsed span as `HH:MM:SS`.
///
/// Hours keep counting past 99 (`"123:00:00"`). With `wrap_hours` set the
/// hour field is taken modulo 24, which matches logs written by the old
/// editor extension.
pub fn format_elapsed(ms: u64, wrap_hours: bool) -> String {
    let seconds = (ms / MS_PER_SECOND) % 60;
    let minutes = (ms / MS_PER_MINUTE) % 60;
    let mut hours = ms / MS_PER_HOUR;
    if wrap_hours {
        hours %= 24;
    }

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Renders an epoch-millisecond timestamp in the local time zone.
pub fn format_local(ms: u64, fmt: &str) -> String {
    format_in(&Local, ms, fmt)
}

pub fn format_in<Tz>(tz: &Tz, ms: u64, fmt: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let local = DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .unwrap_or_default()
        .with_timezone(tz);

    let mut out = String::new();
    if write!(out, "{}", local.format(fmt)).is_ok() {
        return out;
    }

    // Unusable format strings fall back to the default layout.
    out.clear();
    let _ = write!(out, "{}", local.format(DEFAULT_TIME_FORMAT));
    out
}

/// `true` when every specifier in `fmt` is one chrono understands.
pub fn is_valid_time_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hour_one_minute_one_second() {
        assert_eq!(format_elapsed(3_661_000, false), "01:01:01");
    }

    #[test]
    fn zero_is_all_zeroes() {
        assert_eq!(format_elapsed(0, false), "00:00:00");
        assert_eq!(format_elapsed(999, false), "00:00:00");
    }

    #[test]
    fn below_one_day_matches_modular_decomposition() {
        for ms in (0..24 * MS_PER_HOUR).step_by(7_777_777) {
            let s = format_elapsed(ms, false);
            let parts: Vec<u64> = s.split(':').map(|p| p.parse().unwrap()).collect();

            assert_eq!(parts.len(), 3, "{s}");
            assert!(s.split(':').all(|p| p.len() == 2), "{s}");
            assert_eq!(parts[0], ms / MS_PER_HOUR);
            assert_eq!(parts[1], (ms / MS_PER_MINUTE) % 60);
            assert_eq!(parts[2], (ms / MS_PER_SECOND) % 60);

            // Both modes agree inside a single day.
            assert_eq!(s, format_elapsed(ms, true));
        }
    }

    #[test]
    fn hours_are_unbounded_unless_wrapping() {
        let ms = 25 * MS_PER_HOUR + 2 * MS_PER_MINUTE + 3 * MS_PER_SECOND;
        assert_eq!(format_elapsed(ms, false), "25:02:03");
        assert_eq!(format_elapsed(ms, true), "01:02:03");
        assert_eq!(format_elapsed(123 * MS_PER_HOUR, false), "123:00:00");
    }

    #[test]
    fn timestamps_render_in_the_given_zone() {
        // 2024-03-01 12:34:56.789 UTC
        let ms = 1_709_296_496_789;
        assert_eq!(format_in(&Utc, ms, "%Y-%m-%d %H:%M:%S"), "2024-03-01 12:34:56");

        let plus_two = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_in(&plus_two, ms, "%H:%M"), "14:34");
    }

    #[test]
    fn unknown_specifier_falls_back_to_default_layout() {
        let ms = 1_709_296_496_789;
        assert_eq!(format_in(&Utc, ms, "%Q"), "2024-03-01 12:34:56");
    }

    #[test]
    fn time_format_validation() {
        assert!(is_valid_time_format(DEFAULT_TIME_FORMAT));
        assert!(is_valid_time_format("%d/%m/%Y %H:%M"));
        assert!(!is_valid_time_format("%Q"));
        assert!(!is_valid_time_format("%Y-%"));
    }
}
