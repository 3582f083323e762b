//! Query-level error taxonomy.
//!
//! The closed set of failures a journey query can surface. Callers match
//! these exhaustively; none is retried internally, and a query that finds
//! no feasible journey is an empty result, not an error.

use chrono::NaiveDate;

use crate::domain::{ServiceId, StationId, TripId};

/// Errors surfaced by the planning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// The query references a station id absent from the snapshot.
    #[error("unknown station: {0}")]
    UnknownStation(StationId),

    /// A service calendar is malformed.
    #[error("invalid calendar for service {service} (query date {date}): {reason}")]
    InvalidCalendarData {
        /// Service whose calendar is malformed
        service: ServiceId,
        /// Date being scoped when the calendar was rejected
        date: NaiveDate,
        /// What is wrong with the calendar
        reason: &'static str,
    },

    /// A trip's stop calls violate time monotonicity.
    #[error("graph build failure for trip {trip}: {reason}")]
    GraphBuildFailure {
        /// Trip whose stop calls are inconsistent
        trip: TripId,
        /// Which invariant failed
        reason: &'static str,
    },
}
