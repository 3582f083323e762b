//! Service calendars.
//!
//! A service runs on a weekly pattern within a validity date range, with
//! explicit per-date exceptions layered on top. Exceptions always win:
//! an added date runs even outside the pattern or range, a removed date
//! never runs.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use super::ServiceId;

/// Which weekdays a service operates, packed into a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayPattern {
    bits: u8,
}

impl WeekdayPattern {
    /// No active weekdays.
    pub fn none() -> Self {
        Self { bits: 0 }
    }

    /// All seven weekdays active.
    pub fn every_day() -> Self {
        Self { bits: 0x7f }
    }

    /// Monday through Friday.
    pub fn weekdays() -> Self {
        Self::from_days(&[
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ])
    }

    /// Build a pattern from a list of days.
    pub fn from_days(days: &[Weekday]) -> Self {
        let mut pattern = Self::none();
        for &day in days {
            pattern.set(day);
        }
        pattern
    }

    /// Mark a weekday as active.
    pub fn set(&mut self, day: Weekday) {
        self.bits |= 1 << day.num_days_from_monday();
    }

    /// Mark a weekday as inactive.
    pub fn unset(&mut self, day: Weekday) {
        self.bits &= !(1 << day.num_days_from_monday());
    }

    /// Returns true if the weekday is active.
    pub fn contains(&self, day: Weekday) -> bool {
        (self.bits & (1 << day.num_days_from_monday())) != 0
    }

    /// Returns true if no weekday is active.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::fmt::Debug for WeekdayPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const LETTERS: [char; 7] = ['M', 'T', 'W', 'T', 'F', 'S', 'S'];
        write!(f, "WeekdayPattern(")?;
        for (i, letter) in LETTERS.iter().enumerate() {
            if self.bits & (1 << i) != 0 {
                write!(f, "{}", letter)?;
            } else {
                write!(f, "-")?;
            }
        }
        write!(f, ")")
    }
}

/// The operating calendar of a service.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::{ServiceCalendar, WeekdayPattern};
/// use chrono::NaiveDate;
///
/// let calendar = ServiceCalendar::new(
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
///     WeekdayPattern::weekdays(),
/// );
///
/// // 2025-06-02 is a Monday
/// assert!(calendar.runs_on(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()));
/// // 2025-06-07 is a Saturday
/// assert!(!calendar.runs_on(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCalendar {
    /// First date of the validity range
    pub start_date: NaiveDate,
    /// Last date of the validity range (inclusive)
    pub end_date: NaiveDate,
    /// Weekly operating pattern
    pub weekdays: WeekdayPattern,
    /// Dates the service runs regardless of pattern and range
    pub added_dates: BTreeSet<NaiveDate>,
    /// Dates the service does not run despite pattern and range
    pub removed_dates: BTreeSet<NaiveDate>,
}

impl ServiceCalendar {
    /// Create a calendar with no exception dates.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, weekdays: WeekdayPattern) -> Self {
        Self {
            start_date,
            end_date,
            weekdays,
            added_dates: BTreeSet::new(),
            removed_dates: BTreeSet::new(),
        }
    }

    /// Add an exception date on which the service runs.
    pub fn with_added(mut self, date: NaiveDate) -> Self {
        self.added_dates.insert(date);
        self
    }

    /// Add an exception date on which the service does not run.
    pub fn with_removed(mut self, date: NaiveDate) -> Self {
        self.removed_dates.insert(date);
        self
    }

    /// Returns true if the validity range is well formed (start <= end).
    pub fn has_valid_range(&self) -> bool {
        self.start_date <= self.end_date
    }

    /// Returns true if the service operates on the given date.
    ///
    /// Added dates override everything; removed dates override the weekly
    /// rule; otherwise the date must fall inside the validity range on an
    /// active weekday.
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        if self.added_dates.contains(&date) {
            return true;
        }
        if self.removed_dates.contains(&date) {
            return false;
        }
        if date < self.start_date || date > self.end_date {
            return false;
        }
        self.weekdays.contains(date.weekday())
    }
}

/// A named scheduling pattern with its operating calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Service identifier
    pub id: ServiceId,
    /// Operating calendar
    pub calendar: ServiceCalendar,
}

impl Service {
    /// Create a service.
    pub fn new(id: ServiceId, calendar: ServiceCalendar) -> Self {
        Self { id, calendar }
    }
}
