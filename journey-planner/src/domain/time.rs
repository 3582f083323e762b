//! Time handling for scheduled services.
//!
//! Timetables express stop times as a time of day, but a trip can run
//! past midnight, so every instant the planner reasons about carries its
//! date as well. `TransitTime` pairs the two; ordering and arithmetic go
//! through the combined datetime.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A date-aware scheduled time.
///
/// Two stop calls at "00:10" may be a day apart; comparing `TransitTime`
/// values always accounts for the date.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::TransitTime;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// let time = TransitTime::parse_hhmm("08:15", date).unwrap();
/// assert_eq!(time.to_string(), "08:15");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitTime {
    date: NaiveDate,
    time: NaiveTime,
}

impl TransitTime {
    /// Create a transit time from date and time components.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Parse a time from "HH:MM" format with a given service date.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_planner::domain::TransitTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    ///
    /// assert!(TransitTime::parse_hhmm("00:00", date).is_ok());
    /// assert!(TransitTime::parse_hhmm("23:59", date).is_ok());
    ///
    /// assert!(TransitTime::parse_hhmm("0800", date).is_err());
    /// assert!(TransitTime::parse_hhmm("24:00", date).is_err());
    /// ```
    pub fn parse_hhmm(s: &str, date: NaiveDate) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time"))?;

        Ok(Self { date, time })
    }

    /// Returns the date component.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time component.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Converts to a NaiveDateTime.
    pub fn to_datetime(&self) -> chrono::NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Add a duration, advancing the date across midnight as needed.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let dt = self.to_datetime().checked_add_signed(duration)?;
        Some(Self {
            date: dt.date(),
            time: dt.time(),
        })
    }

    /// Subtract a duration from this time.
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        let dt = self.to_datetime().checked_sub_signed(duration)?;
        Some(Self {
            date: dt.date(),
            time: dt.time(),
        })
    }

    /// Returns the duration between two times.
    ///
    /// Negative if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.to_datetime()
            .signed_duration_since(other.to_datetime())
    }
}

impl Add<Duration> for TransitTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs).expect("time overflow")
    }
}

impl Ord for TransitTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

impl PartialOrd for TransitTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TransitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransitTime({} {:02}:{:02})",
            self.date,
            self.hour(),
            self.minute()
        )
    }
}

impl fmt::Display for TransitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl serde::Serialize for TransitTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!(
            "{}T{:02}:{:02}",
            self.date,
            self.hour(),
            self.minute()
        ))
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// A half-open-in-spirit, inclusive time interval `[start, end]`.
///
/// Used both for the query's departure window and for bounding graph
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: TransitTime,
    end: TransitTime,
}

impl TimeWindow {
    /// Create a window, validating `start <= end`.
    pub fn new(start: TransitTime, end: TransitTime) -> Result<Self, TimeError> {
        if start > end {
            return Err(TimeError::new("window start after end"));
        }
        Ok(Self { start, end })
    }

    /// Returns the window start.
    pub fn start(&self) -> TransitTime {
        self.start
    }

    /// Returns the window end.
    pub fn end(&self) -> TransitTime {
        self.end
    }

    /// Returns true if `t` lies within the window (inclusive).
    pub fn contains(&self, t: TransitTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// Returns a window with the same start and the end pushed out by
    /// `extra`.
    pub fn extended(&self, extra: Duration) -> Self {
        Self {
            start: self.start,
            end: self.end + extra,
        }
    }

    /// Returns the window length.
    pub fn length(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }
}
