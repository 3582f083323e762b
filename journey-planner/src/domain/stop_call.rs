//! Stop call types.
//!
//! A `StopCall` is a trip's scheduled visit to a station. A `CallIndex`
//! is an unambiguous position within a trip's calling pattern, needed
//! because a trip can visit the same station more than once (loops,
//! turnbacks).

use serde::Serialize;

use super::{DomainError, StationId, TransitTime};

/// Index of a stop call within a trip's calling pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CallIndex(pub usize);

impl CallIndex {
    /// Returns the next index.
    pub fn next(self) -> Self {
        CallIndex(self.0 + 1)
    }

    /// Returns the previous index, if any.
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(CallIndex)
    }
}

impl std::fmt::Display for CallIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for CallIndex {
    fn from(value: usize) -> Self {
        CallIndex(value)
    }
}

impl From<CallIndex> for usize {
    fn from(value: CallIndex) -> Self {
        value.0
    }
}

/// A scheduled visit of a trip to a station.
///
/// Departure must not precede arrival; the gap between them is the dwell
/// at the platform. At an origin the arrival equals the departure, at a
/// terminus the departure equals the arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopCall {
    /// Station visited
    pub station: StationId,
    /// Position in the timetable source's stop sequence
    pub sequence: u32,
    /// Scheduled arrival time
    pub arrival: TransitTime,
    /// Scheduled departure time
    pub departure: TransitTime,
    /// Platform used, if known
    pub platform: Option<String>,
}

impl StopCall {
    /// Create a stop call, validating `departure >= arrival`.
    pub fn new(
        station: StationId,
        sequence: u32,
        arrival: TransitTime,
        departure: TransitTime,
    ) -> Result<Self, DomainError> {
        if departure < arrival {
            return Err(DomainError::DepartureBeforeArrival { station });
        }
        Ok(Self {
            station,
            sequence,
            arrival,
            departure,
            platform: None,
        })
    }

    /// Attach a platform name.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Returns the dwell between arrival and departure.
    pub fn dwell(&self) -> chrono::Duration {
        self.departure.signed_duration_since(self.arrival)
    }
}
