//! Multi-criteria journey search.
//!
//! A label-setting search over the time-expanded graph. Labels are
//! expanded strictly in increasing event-time order and only forward
//! edges exist, so the first labels to reach an event are never improved
//! upon later in the time dimension; the change and walk dimensions are
//! kept as Pareto frontiers instead of a single best value.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

use chrono::Duration;
use tracing::{debug, trace};

use crate::domain::{
    Journey, Leg, RideLeg, StationId, TimeWindow, TransferLeg, TransitTime, TripId, WalkLeg,
};
use crate::error::PlannerError;
use crate::graph::{EdgeKind, EventKind, NodeId, TimeExpandedGraph};
use crate::timetable::Timetable;

use super::config::SearchConfig;
use super::rank::{deduplicate, rank_journeys, remove_dominated};

/// How many expansions between wall-clock deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Request for a journey search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Origin station.
    pub origin: StationId,

    /// Destination station.
    pub destination: StationId,

    /// Window within which the journey must depart.
    pub departure_window: TimeWindow,

    /// Per-request change bound; falls back to the config's.
    pub max_changes: Option<usize>,

    /// Per-request duration bound; falls back to the config's.
    pub max_duration: Option<Duration>,

    /// Wall-clock budget. On expiry the engine stops expanding and
    /// returns journeys from the frontier computed so far.
    pub deadline: Option<Instant>,
}

impl SearchRequest {
    /// Create a request with the config-default bounds and no deadline.
    pub fn new(origin: StationId, destination: StationId, departure_window: TimeWindow) -> Self {
        Self {
            origin,
            destination,
            departure_window,
            max_changes: None,
            max_duration: None,
            deadline: None,
        }
    }
}

/// Result of a journey search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Found journeys, ranked best-first. Empty when no path exists.
    pub journeys: Vec<Journey>,

    /// Number of event labels expanded.
    pub events_expanded: usize,

    /// True if the deadline expired before the search space was
    /// exhausted; the journeys are then the frontier found so far.
    pub truncated: bool,
}

/// A partial itinerary ending at one event node.
#[derive(Debug, Clone)]
struct Label {
    node: NodeId,
    time: TransitTime,
    changes: usize,
    walks: usize,
    /// Trip of the most recent ride edge; None until first boarding.
    last_trip: Option<TripId>,
    /// Departure time of the first ride; None until first boarding.
    boarded: Option<TransitTime>,
    parent: Option<usize>,
    /// Edge kind that produced this label; None for seed labels.
    via: Option<EdgeKind>,
}

/// Heap entry ordering labels by (time, changes, walks), then insertion
/// order for determinism.
#[derive(PartialEq, Eq)]
struct HeapEntry {
    time: TransitTime,
    changes: usize,
    walks: usize,
    label: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.time, self.changes, self.walks, self.label).cmp(&(
            other.time,
            other.changes,
            other.walks,
            other.label,
        ))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Does frontier label `e` make candidate `c` redundant at the same node?
///
/// Same node means same time, so what matters is changes, walks, the
/// boarded trip, and when the itinerary first departed. A label on a
/// different trip may save the candidate one change on its next
/// boarding, so cross-trip dominance needs a one change margin; a label
/// that has not boarded yet never pays a change on its first ride. A
/// label that departed earlier never dominates a later-departing one:
/// the later departure has more duration headroom and is the better
/// answer for the same arrival.
fn label_dominates(e: &Label, c: &Label) -> bool {
    let changes_ok = if e.last_trip == c.last_trip || e.last_trip.is_none() {
        e.changes <= c.changes
    } else {
        e.changes + 1 <= c.changes
    };
    let departed_ok = match (e.boarded, c.boarded) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(e_dep), Some(c_dep)) => e_dep >= c_dep,
    };
    changes_ok && departed_ok && e.walks <= c.walks
}

/// Mutable search state: label arena, per-node frontiers, work heap.
struct SearchState {
    labels: Vec<Label>,
    alive: Vec<bool>,
    frontier: HashMap<NodeId, Vec<usize>>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    destination_labels: Vec<usize>,
}

impl SearchState {
    fn new() -> Self {
        Self {
            labels: Vec::new(),
            alive: Vec::new(),
            frontier: HashMap::new(),
            heap: BinaryHeap::new(),
            destination_labels: Vec::new(),
        }
    }

    /// Insert a label unless its node's frontier already dominates it;
    /// evicts frontier entries the new label dominates.
    fn try_insert(&mut self, candidate: Label, is_destination: bool) {
        let entries = self.frontier.entry(candidate.node).or_default();

        if entries
            .iter()
            .any(|&i| label_dominates(&self.labels[i], &candidate))
        {
            return;
        }

        entries.retain(|&i| {
            if label_dominates(&candidate, &self.labels[i]) {
                self.alive[i] = false;
                false
            } else {
                true
            }
        });

        let idx = self.labels.len();
        entries.push(idx);
        self.heap.push(Reverse(HeapEntry {
            time: candidate.time,
            changes: candidate.changes,
            walks: candidate.walks,
            label: idx,
        }));
        if is_destination {
            self.destination_labels.push(idx);
        }
        self.labels.push(candidate);
        self.alive.push(true);
    }
}

/// The journey search engine for one graph and snapshot.
pub struct SearchEngine<'a> {
    graph: &'a TimeExpandedGraph,
    timetable: &'a Timetable,
    config: &'a SearchConfig,
}

impl<'a> SearchEngine<'a> {
    /// Create an engine over a built graph.
    pub fn new(
        graph: &'a TimeExpandedGraph,
        timetable: &'a Timetable,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            graph,
            timetable,
            config,
        }
    }

    /// Search for journeys from origin to destination.
    ///
    /// Returns the non-dominated journeys ordered by the configured
    /// ranking policy. Finding nothing is an empty result, not an error.
    ///
    /// # Errors
    ///
    /// `UnknownStation` if the origin or destination id is absent from
    /// the snapshot's station table.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, PlannerError> {
        for station in [&request.origin, &request.destination] {
            if !self.timetable.contains_station(station) {
                return Err(PlannerError::UnknownStation(station.clone()));
            }
        }

        let max_changes = request.max_changes.unwrap_or(self.config.max_changes);
        let max_duration = request.max_duration.unwrap_or(self.config.max_journey());

        let mut state = SearchState::new();
        let mut events_expanded = 0usize;
        let mut truncated = false;

        // Seed one label per boarding opportunity at the origin within
        // the departure window.
        for &dep in self.graph.departures_at(&request.origin) {
            let node = self.graph.node(dep);
            if request.departure_window.contains(node.time) {
                state.try_insert(
                    Label {
                        node: dep,
                        time: node.time,
                        changes: 0,
                        walks: 0,
                        last_trip: None,
                        boarded: None,
                        parent: None,
                        via: None,
                    },
                    false,
                );
            }
        }

        while let Some(Reverse(entry)) = state.heap.pop() {
            if let Some(deadline) = request.deadline
                && events_expanded % DEADLINE_CHECK_INTERVAL == 0
                && Instant::now() >= deadline
            {
                truncated = true;
                break;
            }

            let idx = entry.label;
            if !state.alive[idx] {
                continue;
            }
            events_expanded += 1;

            let label = state.labels[idx].clone();
            let node = self.graph.node(label.node);

            trace!(
                station = %node.station,
                time = %label.time,
                changes = label.changes,
                walks = label.walks,
                "expanding label"
            );

            // Arriving is the end of the road for this label; anything
            // continuing through the destination cannot help reach it.
            if node.kind == EventKind::Arrival && node.station == request.destination {
                continue;
            }

            for edge in self.graph.out_edges(label.node) {
                let target = self.graph.node(edge.to);

                let (changes, walks, last_trip, boarded) = match &edge.kind {
                    EdgeKind::Ride { trip } => {
                        let changes = match &label.last_trip {
                            Some(previous) if previous != trip => label.changes + 1,
                            _ => label.changes,
                        };
                        let boarded = label.boarded.or(Some(node.time));
                        (changes, label.walks, Some(trip.clone()), boarded)
                    }
                    EdgeKind::Transfer => (
                        label.changes,
                        label.walks,
                        label.last_trip.clone(),
                        label.boarded,
                    ),
                    EdgeKind::Walk { .. } => (
                        label.changes,
                        label.walks + 1,
                        label.last_trip.clone(),
                        label.boarded,
                    ),
                };

                if changes > max_changes {
                    continue;
                }
                if let Some(first_departure) = boarded
                    && target.time.signed_duration_since(first_departure) > max_duration
                {
                    continue;
                }

                let is_destination =
                    target.kind == EventKind::Arrival && target.station == request.destination;

                state.try_insert(
                    Label {
                        node: edge.to,
                        time: target.time,
                        changes,
                        walks,
                        last_trip,
                        boarded,
                        parent: Some(idx),
                        via: Some(edge.kind.clone()),
                    },
                    is_destination,
                );
            }
        }

        let journeys: Vec<Journey> = state
            .destination_labels
            .iter()
            .filter(|&&i| state.alive[i])
            .filter_map(|&i| self.reconstruct(i, &state.labels))
            .collect();

        let journeys = remove_dominated(journeys);
        let journeys = deduplicate(journeys);
        let mut journeys = rank_journeys(journeys, &self.config.ranking);
        journeys.truncate(self.config.max_results);

        debug!(
            journeys = journeys.len(),
            events_expanded, truncated, "journey search complete"
        );

        Ok(SearchOutcome {
            journeys,
            events_expanded,
            truncated,
        })
    }

    /// Rebuild the journey behind a destination label.
    ///
    /// Consecutive ride edges of one trip (including dwell continuations)
    /// collapse into a single ride leg; a walk edge becomes a walk leg
    /// plus a transfer leg for any residual wait at the far end.
    fn reconstruct(&self, destination_label: usize, labels: &[Label]) -> Option<Journey> {
        let mut chain = Vec::new();
        let mut cursor = Some(destination_label);
        while let Some(i) = cursor {
            chain.push(i);
            cursor = labels[i].parent;
        }
        chain.reverse();

        let mut legs: Vec<Leg> = Vec::new();
        let mut i = 1;
        while i < chain.len() {
            let via = labels[chain[i]].via.as_ref()?;
            match via {
                EdgeKind::Ride { trip } => {
                    let mut j = i;
                    while j + 1 < chain.len()
                        && matches!(
                            &labels[chain[j + 1]].via,
                            Some(EdgeKind::Ride { trip: t }) if t == trip
                        )
                    {
                        j += 1;
                    }

                    let board_node = self.graph.node(labels[chain[i - 1]].node);
                    let alight_node = self.graph.node(labels[chain[j]].node);
                    let trip_record = self.timetable.trip(trip)?;
                    let board = trip_record.call(board_node.call)?.clone();
                    let alight = trip_record.call(alight_node.call)?.clone();
                    legs.push(Leg::Ride(RideLeg::new(trip.clone(), board, alight).ok()?));
                    i = j + 1;
                }
                EdgeKind::Transfer => {
                    let wait = labels[chain[i]]
                        .time
                        .signed_duration_since(labels[chain[i - 1]].time);
                    let station = self.graph.node(labels[chain[i]].node).station.clone();
                    legs.push(Leg::Transfer(TransferLeg::new(station, wait).ok()?));
                    i += 1;
                }
                EdgeKind::Walk { duration } => {
                    let from = self.graph.node(labels[chain[i - 1]].node).station.clone();
                    let to = self.graph.node(labels[chain[i]].node).station.clone();
                    legs.push(Leg::Walk(WalkLeg::new(from, to.clone(), *duration).ok()?));

                    let residual = labels[chain[i]]
                        .time
                        .signed_duration_since(labels[chain[i - 1]].time + *duration);
                    if residual > Duration::zero() {
                        legs.push(Leg::Transfer(TransferLeg::new(to, residual).ok()?));
                    }
                    i += 1;
                }
            }
        }

        Journey::new(legs).ok()
    }
}
