//! Source of "now" for queries that do not carry an explicit instant.
//!
//! The engine never reads the wall clock directly: indexes hold a [`Clock`]
//! handle and consult it only when a query passes `None` as its instant.
//! Tests install a [`FixedClock`] to keep results deterministic.

use chrono::NaiveTime;

pub trait Clock: Send + Sync {
    /// Current local time of day.
    fn time_of_day(&self) -> NaiveTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn time_of_day(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// Always reports the same time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveTime);

impl FixedClock {
    pub fn at(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }
}

impl Clock for FixedClock {
    fn time_of_day(&self) -> NaiveTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::at(15, 0, 0).unwrap();
        assert_eq!(clock.time_of_day(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(FixedClock::at(24, 0, 0).is_none());
    }
}
