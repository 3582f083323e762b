//! Timetable snapshot tables.
//!
//! Stations, services and trips live in flat id-keyed tables; everything
//! downstream (graph edges, journey legs) references entities by id, so
//! there are no ownership cycles between records. A `Timetable` is an
//! immutable snapshot lent to the query pipeline; the pipeline never
//! mutates it.

use std::collections::HashMap;

use crate::domain::{Service, ServiceId, Station, StationId, Trip, TripId};

/// An immutable snapshot of the scheduled network.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    stations: HashMap<StationId, Station>,
    services: HashMap<ServiceId, Service>,
    trips: HashMap<TripId, Trip>,
}

impl Timetable {
    /// Assemble a snapshot from validated records.
    ///
    /// The data-import layer guarantees ids are unique; on duplicates the
    /// last record wins.
    pub fn new(stations: Vec<Station>, services: Vec<Service>, trips: Vec<Trip>) -> Self {
        Self {
            stations: stations.into_iter().map(|s| (s.id.clone(), s)).collect(),
            services: services.into_iter().map(|s| (s.id.clone(), s)).collect(),
            trips: trips.into_iter().map(|t| (t.id().clone(), t)).collect(),
        }
    }

    /// Look up a station by id.
    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Look up a service by id.
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.get(id)
    }

    /// Look up a trip by id.
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.get(id)
    }

    /// Returns true if the station table contains the id.
    pub fn contains_station(&self, id: &StationId) -> bool {
        self.stations.contains_key(id)
    }

    /// Iterate all stations (arbitrary order).
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Iterate all services (arbitrary order).
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    /// Iterate all trips (arbitrary order).
    pub fn trips(&self) -> impl Iterator<Item = &Trip> {
        self.trips.values()
    }

    /// Returns the number of stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Returns the number of services.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Returns the number of trips.
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}
