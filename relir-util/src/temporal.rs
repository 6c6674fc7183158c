use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub const NANOS_PER_DAY: u64 = 86_400 * NANOS_PER_SECOND;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("{0} nanoseconds is not within a single day")]
    TimeOfDayOutOfRange(u64),
    #[error("invalid time components {hour:02}:{minute:02}:{second:02}.{nanos:09}")]
    InvalidComponents {
        hour: u32,
        minute: u32,
        second: u32,
        nanos: u32,
    },
}

/// A calendar date as a signed day offset from 1970-01-01.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    days_since_epoch: i64,
}

impl Date {
    pub const EPOCH: Date = Date::new(0);

    pub const fn new(days_since_epoch: i64) -> Self {
        Self { days_since_epoch }
    }

    pub const fn days_since_epoch(&self) -> i64 {
        self.days_since_epoch
    }
}

/// Nanoseconds elapsed since midnight, always below [`NANOS_PER_DAY`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TimeOfDay {
    nanos: u64,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { nanos: 0 };

    pub fn new(nanos_since_midnight: u64) -> Result<Self, TemporalError> {
        if nanos_since_midnight >= NANOS_PER_DAY {
            return Err(TemporalError::TimeOfDayOutOfRange(nanos_since_midnight));
        }
        Ok(Self {
            nanos: nanos_since_midnight,
        })
    }

    pub fn from_hms_nano(
        hour: u32,
        minute: u32,
        second: u32,
        nanos: u32,
    ) -> Result<Self, TemporalError> {
        if hour >= 24 || minute >= 60 || second >= 60 || u64::from(nanos) >= NANOS_PER_SECOND {
            return Err(TemporalError::InvalidComponents {
                hour,
                minute,
                second,
                nanos,
            });
        }
        let seconds = u64::from(hour) * 3600 + u64::from(minute) * 60 + u64::from(second);
        Self::new(seconds * NANOS_PER_SECOND + u64::from(nanos))
    }

    pub const fn nanos_since_midnight(&self) -> u64 {
        self.nanos
    }

    pub const fn hour(&self) -> u32 {
        (self.nanos / NANOS_PER_SECOND / 3600) as u32
    }

    pub const fn minute(&self) -> u32 {
        (self.nanos / NANOS_PER_SECOND / 60 % 60) as u32
    }

    pub const fn second(&self) -> u32 {
        (self.nanos / NANOS_PER_SECOND % 60) as u32
    }

    pub const fn subsecond_nanos(&self) -> u32 {
        (self.nanos % NANOS_PER_SECOND) as u32
    }
}

impl TryFrom<u64> for TimeOfDay {
    type Error = TemporalError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeOfDay> for u64 {
    fn from(value: TimeOfDay) -> Self {
        value.nanos
    }
}

/// A date paired with a time of day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: Date,
    pub time_of_day: TimeOfDay,
}

impl TimePoint {
    pub const fn new(date: Date, time_of_day: TimeOfDay) -> Self {
        Self { date, time_of_day }
    }
}

/// A calendar interval. Every component is an independent signed offset, so
/// `1 month - 3 days` is representable and nothing is normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatetimeInterval {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub subsecond_nanos: i32,
}

impl DatetimeInterval {
    pub const fn from_date_parts(year: i32, month: i32, day: i32) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            subsecond_nanos: 0,
        }
    }

    pub const fn with_time_parts(
        mut self,
        hour: i32,
        minute: i32,
        second: i32,
        subsecond_nanos: i32,
    ) -> Self {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self.subsecond_nanos = subsecond_nanos;
        self
    }

    pub const fn is_zero(&self) -> bool {
        self.year == 0
            && self.month == 0
            && self.day == 0
            && self.hour == 0
            && self.minute == 0
            && self.second == 0
            && self.subsecond_nanos == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn time_of_day_components() {
        let time = TimeOfDay::from_hms_nano(23, 59, 58, 123_456_789).unwrap();
        assert_eq!(time.hour(), 23);
        assert_eq!(time.minute(), 59);
        assert_eq!(time.second(), 58);
        assert_eq!(time.subsecond_nanos(), 123_456_789);
    }

    #[test]
    fn time_of_day_bounds() {
        assert!(TimeOfDay::new(NANOS_PER_DAY - 1).is_ok());
        assert_eq!(
            TimeOfDay::new(NANOS_PER_DAY),
            Err(TemporalError::TimeOfDayOutOfRange(NANOS_PER_DAY))
        );
        assert!(TimeOfDay::from_hms_nano(24, 0, 0, 0).is_err());
        assert!(TimeOfDay::from_hms_nano(0, 0, 0, 1_000_000_000).is_err());
    }

    #[test]
    fn time_of_day_serde_rejects_overflow() {
        let json = NANOS_PER_DAY.to_string();
        assert!(serde_json::from_str::<TimeOfDay>(&json).is_err());
        let time: TimeOfDay = serde_json::from_str("42").unwrap();
        assert_eq!(time.nanos_since_midnight(), 42);
    }

    #[test]
    fn interval_builder() {
        let interval = DatetimeInterval::from_date_parts(1, -2, 3)
            .with_time_parts(-4, 5, -6, 7);
        assert_eq!(interval.month, -2);
        assert_eq!(interval.subsecond_nanos, 7);
        assert!(!interval.is_zero());
        assert!(DatetimeInterval::default().is_zero());
    }
}
