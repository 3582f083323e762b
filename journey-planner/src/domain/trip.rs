//! Trip records.
//!
//! A `Trip` is one concrete scheduled vehicle run: an ordered sequence of
//! stop calls belonging to a service. Construction checks the structural
//! invariants (at least two calls, strictly increasing sequence numbers);
//! time monotonicity along the run is re-checked by the graph builder,
//! which owns that failure mode.

use super::{CallIndex, DomainError, ServiceId, StationId, StopCall, TripId};

/// One scheduled vehicle run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    id: TripId,
    service: ServiceId,
    calls: Vec<StopCall>,
}

impl Trip {
    /// Create a trip from ordered stop calls.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are fewer than two calls or the sequence
    /// numbers are not strictly increasing.
    pub fn new(id: TripId, service: ServiceId, calls: Vec<StopCall>) -> Result<Self, DomainError> {
        if calls.len() < 2 {
            return Err(DomainError::TooFewCalls);
        }
        for window in calls.windows(2) {
            if window[1].sequence <= window[0].sequence {
                return Err(DomainError::CallsOutOfSequence);
            }
        }
        Ok(Self { id, service, calls })
    }

    /// Returns the trip id.
    pub fn id(&self) -> &TripId {
        &self.id
    }

    /// Returns the owning service id.
    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    /// Returns all stop calls in order.
    pub fn calls(&self) -> &[StopCall] {
        &self.calls
    }

    /// Returns the stop call at the given index, if in bounds.
    pub fn call(&self, idx: CallIndex) -> Option<&StopCall> {
        self.calls.get(idx.0)
    }

    /// Returns the number of stop calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Always false: a trip has at least two calls.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Find the first call at a station at or after the given index.
    ///
    /// Returns both the index and the call so that a trip visiting the
    /// same station twice can be addressed unambiguously.
    pub fn find_call(&self, station: &StationId, after: CallIndex) -> Option<(CallIndex, &StopCall)> {
        self.calls
            .iter()
            .enumerate()
            .skip(after.0)
            .find(|(_, call)| &call.station == station)
            .map(|(i, call)| (CallIndex(i), call))
    }

    /// Does this trip call at the given station at or after the index?
    pub fn calls_at(&self, station: &StationId, after: CallIndex) -> bool {
        self.find_call(station, after).is_some()
    }

    /// Returns the first stop call (origin).
    pub fn origin(&self) -> &StopCall {
        &self.calls[0]
    }

    /// Returns the last stop call (terminus).
    pub fn terminus(&self) -> &StopCall {
        &self.calls[self.calls.len() - 1]
    }

    /// Returns true if scheduled times never step backwards along the run.
    ///
    /// Checks both `departure >= arrival` within each call and
    /// `arrival[i+1] >= departure[i]` between consecutive calls.
    pub fn times_are_monotone(&self) -> bool {
        for call in &self.calls {
            if call.departure < call.arrival {
                return false;
            }
        }
        self.calls
            .windows(2)
            .all(|w| w[1].arrival >= w[0].departure)
    }
}
