//! Walkable connections between stations.
//!
//! Some stations are close enough to walk between, enabling interchanges
//! that do not appear in the scheduled network. Pairs can be listed
//! explicitly or derived from station locations within a distance
//! threshold.

use std::collections::HashMap;

use chrono::Duration;
use geo::HaversineDistance;

use crate::domain::{Station, StationId};

/// Default walking speed used when deriving durations from distance.
const DEFAULT_WALK_SPEED_M_PER_MIN: f64 = 80.0;

/// A collection of walkable station pairs.
///
/// Connections are symmetric: walking A to B takes as long as B to A.
#[derive(Debug, Clone, Default)]
pub struct WalkableConnections {
    /// Walk duration in minutes, stored in both directions.
    connections: HashMap<(StationId, StationId), i64>,
}

impl WalkableConnections {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive walkable pairs from station locations.
    ///
    /// Every pair of distinct stations within `max_distance_m` of each
    /// other becomes walkable, with the duration computed from the
    /// haversine distance at a nominal walking speed and rounded up to a
    /// whole minute.
    pub fn from_station_locations<'a>(
        stations: impl IntoIterator<Item = &'a Station>,
        max_distance_m: f64,
    ) -> Self {
        let mut ordered: Vec<&Station> = stations.into_iter().collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let mut walkable = Self::new();
        for (i, a) in ordered.iter().enumerate() {
            for b in &ordered[i + 1..] {
                let distance = a.location.haversine_distance(&b.location);
                if distance <= max_distance_m {
                    let minutes = (distance / DEFAULT_WALK_SPEED_M_PER_MIN).ceil() as i64;
                    walkable.add(a.id.clone(), b.id.clone(), minutes.max(1));
                }
            }
        }
        walkable
    }

    /// Add a walkable connection between two stations.
    ///
    /// Stored symmetrically (both A→B and B→A). Adding a station to
    /// itself is ignored.
    pub fn add(&mut self, from: StationId, to: StationId, duration_minutes: i64) {
        if from == to {
            return;
        }
        self.connections
            .insert((from.clone(), to.clone()), duration_minutes);
        self.connections.insert((to, from), duration_minutes);
    }

    /// Get the walk duration between two stations, if walkable.
    pub fn get(&self, from: &StationId, to: &StationId) -> Option<Duration> {
        self.connections
            .get(&(from.clone(), to.clone()))
            .map(|mins| Duration::minutes(*mins))
    }

    /// Check if two stations are walkable.
    pub fn is_walkable(&self, from: &StationId, to: &StationId) -> bool {
        self.connections.contains_key(&(from.clone(), to.clone()))
    }

    /// Get all stations walkable from a given station, ordered by id.
    pub fn walkable_from(&self, from: &StationId) -> Vec<(StationId, Duration)> {
        let mut out: Vec<(StationId, Duration)> = self
            .connections
            .iter()
            .filter(|((f, _), _)| f == from)
            .map(|((_, t), mins)| (t.clone(), Duration::minutes(*mins)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Returns the number of walkable pairs (A→B and B→A count once).
    pub fn len(&self) -> usize {
        self.connections.len() / 2
    }

    /// Returns true if there are no walkable connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
