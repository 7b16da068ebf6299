//! Opening-hours evaluation.
//!
//! Windows are closed intervals: the opening and the closing instant both
//! count as open. When `open > close` the window wraps past midnight, so a
//! `22:00:00`–`06:00:00` provider is open at `23:00` and at `02:00`.
//!
//! A window with `open == close` is not special-cased: the normal-case formula
//! applies and the provider is open only at that exact second.

use crate::error::{Result, ServeZoneError};
use chrono::{NaiveTime, Timelike};

/// Format accepted by [`parse_time_of_day`].
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// Whether `instant` falls within the window from `open` to `close`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use servezone::compute::hours::is_open;
///
/// let t = |h, m, s| NaiveTime::from_hms_opt(h, m, s).unwrap();
///
/// assert!(is_open(t(14, 0, 0), t(23, 0, 0), t(14, 0, 0)));
/// assert!(!is_open(t(14, 0, 0), t(23, 0, 0), t(23, 0, 1)));
///
/// // Overnight window
/// assert!(is_open(t(22, 0, 0), t(6, 0, 0), t(2, 0, 0)));
/// assert!(!is_open(t(22, 0, 0), t(6, 0, 0), t(21, 59, 59)));
/// ```
#[inline]
pub fn is_open(open: NaiveTime, close: NaiveTime, instant: NaiveTime) -> bool {
    if open <= close {
        open <= instant && instant <= close
    } else {
        instant >= open || instant <= close
    }
}

/// Parse an `HH:MM:SS` time of day.
///
/// This is the boundary where malformed hours are rejected; everything past
/// it works with parsed [`NaiveTime`] values.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_OF_DAY_FORMAT).map_err(|source| {
        ServeZoneError::InvalidTime {
            value: value.to_string(),
            source,
        }
    })
}

/// Minutes elapsed since midnight, discarding seconds.
#[inline]
pub fn minute_of_day(instant: NaiveTime) -> u16 {
    (instant.hour() * 60 + instant.minute()) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> NaiveTime {
        parse_time_of_day(value).unwrap()
    }

    #[test]
    fn test_daytime_window() {
        assert!(is_open(t("14:00:00"), t("23:00:00"), t("15:00:00")));
        assert!(is_open(t("14:00:00"), t("23:00:00"), t("22:59:59")));
        assert!(!is_open(t("14:00:00"), t("23:00:00"), t("13:59:59")));
        assert!(!is_open(t("14:00:00"), t("23:00:00"), t("23:00:01")));
    }

    #[test]
    fn test_boundaries_are_open() {
        for (open, close) in [("14:00:00", "23:00:00"), ("22:00:00", "06:00:00")] {
            assert!(is_open(t(open), t(close), t(open)), "{open}-{close} at open");
            assert!(is_open(t(open), t(close), t(close)), "{open}-{close} at close");
        }
    }

    #[test]
    fn test_overnight_window() {
        let (open, close) = (t("22:00:00"), t("06:00:00"));
        assert!(is_open(open, close, t("23:00:00")));
        assert!(is_open(open, close, t("02:00:00")));
        assert!(is_open(open, close, t("00:00:00")));
        assert!(!is_open(open, close, t("21:59:59")));
        assert!(!is_open(open, close, t("06:00:01")));
        assert!(!is_open(open, close, t("12:00:00")));
    }

    #[test]
    fn test_equal_open_and_close() {
        let noon = t("12:00:00");
        assert!(is_open(noon, noon, noon));
        assert!(!is_open(noon, noon, t("12:00:01")));
        assert!(!is_open(noon, noon, t("11:59:59")));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "12:00", "24:00:00", "12:60:00", "noon", "12-00-00"] {
            let err = parse_time_of_day(bad).unwrap_err();
            assert!(matches!(err, ServeZoneError::InvalidTime { .. }), "{bad}");
        }
    }

    #[test]
    fn test_minute_of_day_truncates_seconds() {
        assert_eq!(minute_of_day(t("00:00:00")), 0);
        assert_eq!(minute_of_day(t("15:00:59")), 900);
        assert_eq!(minute_of_day(t("23:59:59")), 1439);
    }
}
