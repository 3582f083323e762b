//! Station records.

use std::collections::BTreeSet;

use geo::Point;
use serde::Serialize;

use super::StationId;

/// A station in the network.
///
/// Immutable after load. The location is a lon/lat point; platforms are
/// the set of platform names known for the station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Station identifier
    pub id: StationId,
    /// Display name
    pub name: String,
    /// Location as (lon, lat)
    #[serde(serialize_with = "serialize_point")]
    pub location: Point<f64>,
    /// Platform names at this station
    pub platforms: BTreeSet<String>,
}

impl Station {
    /// Create a station with no platforms.
    pub fn new(id: StationId, name: impl Into<String>, location: Point<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            platforms: BTreeSet::new(),
        }
    }

    /// Add a platform name, returning self for chained construction.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platforms.insert(platform.into());
        self
    }

    /// Returns true if the station lists the given platform.
    pub fn has_platform(&self, platform: &str) -> bool {
        self.platforms.contains(platform)
    }
}

fn serialize_point<S: serde::Serializer>(p: &Point<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq([p.x(), p.y()])
}
