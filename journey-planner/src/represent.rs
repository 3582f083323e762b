//! Output representation.
//!
//! The final shape handed to callers: the ranked journeys plus every
//! station any of them touches. Serialization format is the caller's
//! business; the types only derive `Serialize`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Journey, Station, StationId};
use crate::timetable::Timetable;

/// Ordered journeys and the stations they reference.
#[derive(Debug, Clone, Serialize)]
pub struct JourneyPlan {
    journeys: Vec<Journey>,
    stations: Vec<Station>,
}

impl JourneyPlan {
    /// Returns the journeys, best-first.
    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    /// Returns the referenced stations, sorted by id.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Returns true if no journey was found.
    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }

    /// Returns the number of journeys.
    pub fn journey_count(&self) -> usize {
        self.journeys.len()
    }
}

/// Package journeys into the output representation.
///
/// The station set is the union of every station referenced by any leg
/// of any journey (endpoints, interchanges and walk endpoints alike),
/// resolved against the snapshot's station table. Pure transformation,
/// no failure modes.
pub fn assemble(journeys: Vec<Journey>, timetable: &Timetable) -> JourneyPlan {
    let mut stations: BTreeMap<StationId, Station> = BTreeMap::new();

    for journey in &journeys {
        for id in journey.stations() {
            if !stations.contains_key(&id)
                && let Some(station) = timetable.station(&id)
            {
                stations.insert(id, station.clone());
            }
        }
    }

    JourneyPlan {
        journeys,
        stations: stations.into_values().collect(),
    }
}
