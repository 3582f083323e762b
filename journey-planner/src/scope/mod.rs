//! Per-date scoping of services and trips.
//!
//! Before a graph can be built for a travel date, the timetable is
//! narrowed to the services whose calendar is active on that date and the
//! trips those services own. The scoped set is a small immutable value,
//! created fresh per date and shared behind `Arc` via a bounded cache so
//! concurrent queries for the same date do the work once.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache;
use tracing::debug;

use crate::domain::{ServiceId, TripId};
use crate::error::PlannerError;
use crate::timetable::Timetable;

/// The services and trips valid for one travel date.
///
/// Ordered sets keep everything built from the scope deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesAndTrips {
    date: NaiveDate,
    services: BTreeSet<ServiceId>,
    trips: BTreeSet<TripId>,
}

impl ServicesAndTrips {
    /// Returns the date this scope was computed for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the active service ids.
    pub fn services(&self) -> &BTreeSet<ServiceId> {
        &self.services
    }

    /// Returns the included trip ids.
    pub fn trips(&self) -> &BTreeSet<TripId> {
        &self.trips
    }

    /// Returns true if the service is active on this scope's date.
    pub fn contains_service(&self, id: &ServiceId) -> bool {
        self.services.contains(id)
    }

    /// Returns true if the trip runs on this scope's date.
    pub fn contains_trip(&self, id: &TripId) -> bool {
        self.trips.contains(id)
    }

    /// Returns true if nothing runs on this scope's date.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Compute the set of services and trips valid on `date`.
///
/// A service is active iff its weekly pattern marks the weekday, the date
/// lies within its validity range and the date is not a removed
/// exception; an added exception overrides all of that. A trip is
/// included iff its owning service is active.
///
/// # Errors
///
/// `InvalidCalendarData` if any service's validity range has its start
/// after its end. The whole scope fails: a malformed calendar means the
/// snapshot cannot be trusted for this date.
pub fn scope_for_date(
    timetable: &Timetable,
    date: NaiveDate,
) -> Result<ServicesAndTrips, PlannerError> {
    let mut services = BTreeSet::new();

    for service in timetable.services() {
        if !service.calendar.has_valid_range() {
            return Err(PlannerError::InvalidCalendarData {
                service: service.id.clone(),
                date,
                reason: "start date after end date",
            });
        }
        if service.calendar.runs_on(date) {
            services.insert(service.id.clone());
        }
    }

    let mut trips = BTreeSet::new();
    for trip in timetable.trips() {
        if services.contains(trip.service()) {
            trips.insert(trip.id().clone());
        }
    }

    debug!(
        date = %date,
        services = services.len(),
        trips = trips.len(),
        "scoped timetable for date"
    );

    Ok(ServicesAndTrips {
        date,
        services,
        trips,
    })
}

/// Configuration for the per-date scope cache.
#[derive(Debug, Clone)]
pub struct ScopeCacheConfig {
    /// TTL for cached scopes.
    pub ttl: Duration,

    /// Maximum number of dates cached at once.
    pub max_capacity: u64,
}

impl Default for ScopeCacheConfig {
    fn default() -> Self {
        Self {
            // A scope only changes when the snapshot does, and snapshot
            // replacement discards the cache with it; the TTL just bounds
            // staleness for very long-lived snapshots.
            ttl: Duration::from_secs(6 * 60 * 60),
            max_capacity: 64,
        }
    }
}

/// Bounded cache of per-date scopes.
pub struct ScopeCache {
    scopes: Cache<NaiveDate, Arc<ServicesAndTrips>>,
}

impl ScopeCache {
    /// Create a cache with the given configuration.
    pub fn new(config: &ScopeCacheConfig) -> Self {
        let scopes = Cache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { scopes }
    }

    /// Get the scope for a date, computing and caching it on a miss.
    ///
    /// Concurrent callers for the same date share one computation.
    pub fn get_or_compute(
        &self,
        timetable: &Timetable,
        date: NaiveDate,
    ) -> Result<Arc<ServicesAndTrips>, PlannerError> {
        self.scopes
            .try_get_with(date, || scope_for_date(timetable, date).map(Arc::new))
            .map_err(|e: Arc<PlannerError>| (*e).clone())
    }

    /// Returns the number of cached dates.
    pub fn entry_count(&self) -> u64 {
        self.scopes.entry_count()
    }

    /// Drop all cached scopes.
    pub fn invalidate_all(&self) {
        self.scopes.invalidate_all();
    }
}
