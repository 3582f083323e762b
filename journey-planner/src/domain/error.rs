//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from the query-level errors
//! surfaced by the planner.

use super::StationId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Identifier string is empty
    #[error("empty {0} id")]
    EmptyId(&'static str),

    /// Stop call with departure before arrival
    #[error("stop call at {station}: departure before arrival")]
    DepartureBeforeArrival { station: StationId },

    /// Trip with fewer than two stop calls
    #[error("trip must have at least two stop calls")]
    TooFewCalls,

    /// Trip stop calls out of sequence order
    #[error("trip stop calls must have strictly increasing sequence numbers")]
    CallsOutOfSequence,

    /// Ride leg alighting at or before its boarding call
    #[error("ride leg: {0}")]
    InvalidRide(&'static str),

    /// Transfer leg with negative wait
    #[error("transfer wait must be non-negative")]
    NegativeWait,

    /// Walk leg between a station and itself, or with negative duration
    #[error("walk leg: {0}")]
    InvalidWalk(&'static str),

    /// Consecutive journey legs do not share a station
    #[error("legs at {0} and {1} do not connect")]
    LegsNotConnected(StationId, StationId),

    /// Journey leg departing before the previous leg has finished
    #[error("leg at {station} departs before the preceding leg completes")]
    LegDepartsTooEarly { station: StationId },

    /// Journey with no legs, or starting/ending with a non-ride leg
    #[error("journey must start and end with a ride leg")]
    MalformedJourney,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyId("station");
        assert_eq!(err.to_string(), "empty station id");

        let err = DomainError::TooFewCalls;
        assert_eq!(err.to_string(), "trip must have at least two stop calls");

        let a = StationId::new("alpha").unwrap();
        let b = StationId::new("beta").unwrap();
        let err = DomainError::LegsNotConnected(a, b);
        assert_eq!(err.to_string(), "legs at alpha and beta do not connect");
    }
}
