//! Display format for message timestamps.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// `DD:MM:YYYY HH:MM:SS`, 24-hour clock, zero-padded.
pub const TIMESTAMP_FORMAT: &str = "%d:%m:%Y %H:%M:%S";

/// Format `time` in its own offset. Callers pass `Local::now()`.
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// True if `value` has exactly the shape produced by [`format_timestamp`].
pub fn is_valid_timestamp(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 19 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        2 | 5 | 13 | 16 => *b == b':',
        10 => *b == b' ',
        _ => b.is_ascii_digit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Local, Utc};

    #[test]
    fn test_zero_padding() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(&t), "05:03:2024 07:08:09");
    }

    #[test]
    fn test_twenty_four_hour_clock() {
        let t = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(format_timestamp(&t), "31:12:1999 23:59:58");
    }

    #[test]
    fn test_no_zone_conversion() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let t = offset.with_ymd_and_hms(2025, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(format_timestamp(&t), "01:01:2025 00:30:00");
    }

    #[test]
    fn test_four_digit_year() {
        let t = Utc.with_ymd_and_hms(987, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&t), "15:06:0987 12:00:00");
    }

    #[test]
    fn test_shape_check() {
        assert!(is_valid_timestamp(&format_timestamp(&Local::now())));
        assert!(is_valid_timestamp("01:02:2024 03:04:05"));
        assert!(!is_valid_timestamp("2024-02-01 03:04:05"));
        assert!(!is_valid_timestamp("1:02:2024 03:04:05"));
        assert!(!is_valid_timestamp(""));
    }
}
