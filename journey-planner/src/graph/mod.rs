//! Time-expanded representation of the scoped network.
//!
//! Every node is one station-time event (a trip departing from or
//! arriving at a station), so a traversal that only ever follows edges
//! forward in time is automatically time-respecting. The graph is built
//! per query window and discarded with it; it never outlives the
//! snapshot it was built from.

mod builder;

pub use builder::GraphBuilder;

use std::collections::HashMap;

use chrono::Duration;

use crate::domain::{CallIndex, StationId, TimeWindow, TransitTime, TripId};

/// Default minimum interchange time when a station has no override.
const DEFAULT_INTERCHANGE_MINS: i64 = 5;

/// Index of a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Whether an event is a boarding or an alighting opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A trip departs from a station; boarding happens here.
    Departure,
    /// A trip arrives at a station; alighting happens here.
    Arrival,
}

/// One station-time event of a scoped trip.
#[derive(Debug, Clone)]
pub struct EventNode {
    /// Station the event happens at
    pub station: StationId,
    /// Scheduled time of the event
    pub time: TransitTime,
    /// Boarding or alighting
    pub kind: EventKind,
    /// Trip the event belongs to
    pub trip: TripId,
    /// Position of the event's stop call within the trip
    pub call: CallIndex,
}

/// Kind of a graph edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    /// Travelling on (or staying aboard) a trip.
    Ride {
        /// Trip being ridden
        trip: TripId,
    },
    /// Waiting within a station between an alighting and a boarding.
    Transfer,
    /// Walking to a nearby station.
    Walk {
        /// Nominal walking time, exclusive of any wait at the far end
        duration: Duration,
    },
}

/// A directed, forward-in-time edge.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Target node
    pub to: NodeId,
    /// What traversing the edge means
    pub kind: EdgeKind,
}

/// Minimum interchange times, per station with a global default.
#[derive(Debug, Clone)]
pub struct InterchangeRules {
    default_mins: i64,
    per_station: HashMap<StationId, i64>,
}

impl InterchangeRules {
    /// Create rules with the given global default in minutes.
    pub fn new(default_mins: i64) -> Self {
        Self {
            default_mins,
            per_station: HashMap::new(),
        }
    }

    /// Override the minimum interchange time for one station.
    pub fn with_station(mut self, station: StationId, mins: i64) -> Self {
        self.per_station.insert(station, mins);
        self
    }

    /// Returns the minimum interchange time at a station.
    pub fn min_interchange(&self, station: &StationId) -> Duration {
        Duration::minutes(
            self.per_station
                .get(station)
                .copied()
                .unwrap_or(self.default_mins),
        )
    }
}

impl Default for InterchangeRules {
    fn default() -> Self {
        Self::new(DEFAULT_INTERCHANGE_MINS)
    }
}

/// The time-expanded graph for one query window.
#[derive(Debug)]
pub struct TimeExpandedGraph {
    nodes: Vec<EventNode>,
    out_edges: Vec<Vec<Edge>>,
    /// Departure nodes per station, sorted by (time, node id).
    departures_by_station: HashMap<StationId, Vec<NodeId>>,
    window: TimeWindow,
}

impl TimeExpandedGraph {
    pub(crate) fn new(
        nodes: Vec<EventNode>,
        out_edges: Vec<Vec<Edge>>,
        departures_by_station: HashMap<StationId, Vec<NodeId>>,
        window: TimeWindow,
    ) -> Self {
        debug_assert_eq!(nodes.len(), out_edges.len());
        Self {
            nodes,
            out_edges,
            departures_by_station,
            window,
        }
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: NodeId) -> &EventNode {
        &self.nodes[id.0]
    }

    /// Returns all nodes.
    pub fn nodes(&self) -> &[EventNode] {
        &self.nodes
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.out_edges.iter().map(Vec::len).sum()
    }

    /// Returns the outgoing edges of a node.
    pub fn out_edges(&self, id: NodeId) -> &[Edge] {
        &self.out_edges[id.0]
    }

    /// Returns the departure nodes at a station, sorted by time.
    pub fn departures_at(&self, station: &StationId) -> &[NodeId] {
        self.departures_by_station
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the window the graph was built for (before lookahead).
    pub fn window(&self) -> TimeWindow {
        self.window
    }
}
