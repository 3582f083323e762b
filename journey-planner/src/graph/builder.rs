//! Graph construction.
//!
//! Builds the time-expanded graph for one query window: events of the
//! scoped trips inside the window (plus a lookahead so journeys departing
//! near the window end can still complete), connected by ride, transfer
//! and walk edges. Construction is deterministic: trips are visited in id
//! order and per-station event lists are sorted.

use std::collections::HashMap;

use chrono::Duration;
use tracing::debug;

use crate::domain::{CallIndex, StationId, TimeWindow};
use crate::error::PlannerError;
use crate::scope::ServicesAndTrips;
use crate::timetable::Timetable;
use crate::walkable::WalkableConnections;

use super::{Edge, EdgeKind, EventKind, EventNode, InterchangeRules, NodeId, TimeExpandedGraph};

/// Default lookahead past the window end, in minutes.
const DEFAULT_LOOKAHEAD_MINS: i64 = 120;

/// Builds time-expanded graphs for query windows.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    rules: InterchangeRules,
    lookahead: Duration,
}

impl GraphBuilder {
    /// Create a builder with the given interchange rules and the default
    /// lookahead horizon.
    pub fn new(rules: InterchangeRules) -> Self {
        Self {
            rules,
            lookahead: Duration::minutes(DEFAULT_LOOKAHEAD_MINS),
        }
    }

    /// Override the lookahead horizon.
    pub fn with_lookahead(mut self, lookahead: Duration) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Build the graph for one window.
    ///
    /// Only events inside `[window.start, window.end + lookahead]` become
    /// nodes, keeping graph size proportional to the query rather than
    /// the whole timetable.
    ///
    /// # Errors
    ///
    /// `GraphBuildFailure` if a scoped trip's stop call times step
    /// backwards. Upstream validation should make this impossible, but
    /// the builder depends on monotonicity, so it re-checks.
    pub fn build(
        &self,
        timetable: &Timetable,
        scoped: &ServicesAndTrips,
        walkable: &WalkableConnections,
        window: TimeWindow,
    ) -> Result<TimeExpandedGraph, PlannerError> {
        let horizon = window.extended(self.lookahead);

        let mut nodes: Vec<EventNode> = Vec::new();
        let mut out_edges: Vec<Vec<Edge>> = Vec::new();

        fn push_node(
            nodes: &mut Vec<EventNode>,
            out_edges: &mut Vec<Vec<Edge>>,
            node: EventNode,
        ) -> NodeId {
            nodes.push(node);
            out_edges.push(Vec::new());
            NodeId(nodes.len() - 1)
        }

        // Trip events and ride edges. BTreeSet iteration gives id order.
        for trip_id in scoped.trips() {
            let Some(trip) = timetable.trip(trip_id) else {
                continue;
            };

            if !trip.times_are_monotone() {
                return Err(PlannerError::GraphBuildFailure {
                    trip: trip_id.clone(),
                    reason: "stop call times step backwards",
                });
            }

            let len = trip.len();
            let mut departure_nodes: Vec<Option<NodeId>> = vec![None; len];
            let mut arrival_nodes: Vec<Option<NodeId>> = vec![None; len];

            for (i, call) in trip.calls().iter().enumerate() {
                // Boarding is possible everywhere except the terminus,
                // alighting everywhere except the origin.
                if i + 1 < len && horizon.contains(call.departure) {
                    departure_nodes[i] = Some(push_node(
                        &mut nodes,
                        &mut out_edges,
                        EventNode {
                            station: call.station.clone(),
                            time: call.departure,
                            kind: EventKind::Departure,
                            trip: trip_id.clone(),
                            call: CallIndex(i),
                        },
                    ));
                }
                if i > 0 && horizon.contains(call.arrival) {
                    arrival_nodes[i] = Some(push_node(
                        &mut nodes,
                        &mut out_edges,
                        EventNode {
                            station: call.station.clone(),
                            time: call.arrival,
                            kind: EventKind::Arrival,
                            trip: trip_id.clone(),
                            call: CallIndex(i),
                        },
                    ));
                }
            }

            for i in 0..len - 1 {
                if let (Some(dep), Some(arr)) = (departure_nodes[i], arrival_nodes[i + 1]) {
                    out_edges[dep.0].push(Edge {
                        to: arr,
                        kind: EdgeKind::Ride {
                            trip: trip_id.clone(),
                        },
                    });
                }
            }

            // Same-trip continuation: staying aboard through a stop is a
            // ride, never a transfer.
            for i in 1..len - 1 {
                if let (Some(arr), Some(dep)) = (arrival_nodes[i], departure_nodes[i]) {
                    out_edges[arr.0].push(Edge {
                        to: dep,
                        kind: EdgeKind::Ride {
                            trip: trip_id.clone(),
                        },
                    });
                }
            }
        }

        // Departure nodes per station, sorted by (time, id).
        let mut departures_by_station: HashMap<StationId, Vec<NodeId>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if node.kind == EventKind::Departure {
                departures_by_station
                    .entry(node.station.clone())
                    .or_default()
                    .push(NodeId(i));
            }
        }
        for list in departures_by_station.values_mut() {
            list.sort_by_key(|id| (nodes[id.0].time, *id));
        }

        // Transfer and walk edges out of each arrival node.
        let mut transfer_edges = 0usize;
        let mut walk_edges = 0usize;
        for i in 0..nodes.len() {
            if nodes[i].kind != EventKind::Arrival {
                continue;
            }
            let station = nodes[i].station.clone();
            let arrival_time = nodes[i].time;

            // Interchange within the station.
            let earliest_board = arrival_time + self.rules.min_interchange(&station);
            if let Some(departures) = departures_by_station.get(&station) {
                for &dep in eligible_departures(&nodes, departures, earliest_board) {
                    if nodes[dep.0].trip == nodes[i].trip && nodes[dep.0].call == nodes[i].call {
                        // The same call's own departure is the dwell
                        // continuation, already a ride edge.
                        continue;
                    }
                    out_edges[i].push(Edge {
                        to: dep,
                        kind: EdgeKind::Transfer,
                    });
                    transfer_edges += 1;
                }
            }

            // Walks to nearby stations.
            for (neighbour, walk_time) in walkable.walkable_from(&station) {
                let earliest_board = arrival_time + walk_time;
                if let Some(departures) = departures_by_station.get(&neighbour) {
                    for &dep in eligible_departures(&nodes, departures, earliest_board) {
                        out_edges[i].push(Edge {
                            to: dep,
                            kind: EdgeKind::Walk {
                                duration: walk_time,
                            },
                        });
                        walk_edges += 1;
                    }
                }
            }
        }

        let graph = TimeExpandedGraph::new(nodes, out_edges, departures_by_station, window);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            transfer_edges,
            walk_edges,
            "built time-expanded graph"
        );

        Ok(graph)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(InterchangeRules::default())
    }
}

/// Departure nodes at or after `earliest`, assuming `departures` is
/// sorted by time.
fn eligible_departures<'a>(
    nodes: &[EventNode],
    departures: &'a [NodeId],
    earliest: crate::domain::TransitTime,
) -> &'a [NodeId] {
    let from = departures.partition_point(|id| nodes[id.0].time < earliest);
    &departures[from..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Service, ServiceCalendar, ServiceId, StopCall, TransitTime, Trip, TripId, WeekdayPattern,
    };
    use crate::scope::scope_for_date;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn time(s: &str) -> TransitTime {
        TransitTime::parse_hhmm(s, date()).unwrap()
    }

    fn station_id(s: &str) -> StationId {
        StationId::new(s).unwrap()
    }

    fn daily_service(id: &str) -> Service {
        Service::new(
            ServiceId::new(id).unwrap(),
            ServiceCalendar::new(
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
                WeekdayPattern::every_day(),
            ),
        )
    }

    fn trip(id: &str, service: &str, calls: &[(&str, &str, &str)]) -> Trip {
        let calls = calls
            .iter()
            .enumerate()
            .map(|(i, (station, arr, dep))| {
                StopCall::new(station_id(station), i as u32 + 1, time(arr), time(dep)).unwrap()
            })
            .collect();
        Trip::new(
            TripId::new(id).unwrap(),
            ServiceId::new(service).unwrap(),
            calls,
        )
        .unwrap()
    }

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(time(start), time(end)).unwrap()
    }

    fn build(
        timetable: &Timetable,
        walkable: &WalkableConnections,
        w: TimeWindow,
    ) -> TimeExpandedGraph {
        let scoped = scope_for_date(timetable, date()).unwrap();
        GraphBuilder::default()
            .build(timetable, &scoped, walkable, w)
            .unwrap()
    }

    #[test]
    fn single_trip_nodes_and_ride_edges() {
        let timetable = Timetable::new(
            vec![],
            vec![daily_service("s1")],
            vec![trip(
                "t1",
                "s1",
                &[
                    ("a", "08:00", "08:00"),
                    ("b", "08:20", "08:22"),
                    ("c", "08:40", "08:40"),
                ],
            )],
        );

        let graph = build(&timetable, &WalkableConnections::new(), window("07:00", "09:00"));

        // Departures at a and b, arrivals at b and c
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.departures_at(&station_id("a")).len(), 1);
        assert_eq!(graph.departures_at(&station_id("b")).len(), 1);
        assert!(graph.departures_at(&station_id("c")).is_empty());

        // Two ride edges plus the dwell continuation at b
        let ride_edges: usize = (0..graph.node_count())
            .flat_map(|i| graph.out_edges(NodeId(i)))
            .filter(|e| matches!(e.kind, EdgeKind::Ride { .. }))
            .count();
        assert_eq!(ride_edges, 3);
    }

    #[test]
    fn events_outside_horizon_are_excluded() {
        let timetable = Timetable::new(
            vec![],
            vec![daily_service("s1")],
            vec![
                trip("early", "s1", &[("a", "06:00", "06:00"), ("b", "06:30", "06:30")]),
                trip("late", "s1", &[("a", "23:00", "23:00"), ("b", "23:30", "23:30")]),
                trip("inside", "s1", &[("a", "08:00", "08:00"), ("b", "08:30", "08:30")]),
            ],
        );

        let graph = build(&timetable, &WalkableConnections::new(), window("07:00", "09:00"));

        // Only the in-window trip contributes events
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.departures_at(&station_id("a")).len(), 1);
    }

    #[test]
    fn transfer_edge_respects_interchange_minimum() {
        let timetable = Timetable::new(
            vec![],
            vec![daily_service("s1")],
            vec![
                trip("t1", "s1", &[("a", "08:00", "08:00"), ("b", "08:15", "08:15")]),
                // Departs b too soon after t1 arrives (3 min < 5 min default)
                trip("tight", "s1", &[("b", "08:18", "08:18"), ("c", "08:40", "08:40")]),
                // Departs with a comfortable gap
                trip("ok", "s1", &[("b", "08:25", "08:25"), ("c", "08:50", "08:50")]),
            ],
        );

        let graph = build(&timetable, &WalkableConnections::new(), window("07:00", "09:00"));

        // Find t1's arrival node at b
        let arrival = (0..graph.node_count())
            .map(NodeId)
            .find(|&id| {
                let node = graph.node(id);
                node.kind == EventKind::Arrival && node.station == station_id("b")
            })
            .unwrap();

        let transfer_targets: Vec<&TripId> = graph
            .out_edges(arrival)
            .iter()
            .filter(|e| e.kind == EdgeKind::Transfer)
            .map(|e| &graph.node(e.to).trip)
            .collect();

        let ok_id = TripId::new("ok").unwrap();
        assert_eq!(transfer_targets, vec![&ok_id]);
    }

    #[test]
    fn walk_edges_connect_nearby_stations() {
        let timetable = Timetable::new(
            vec![],
            vec![daily_service("s1")],
            vec![
                trip("t1", "s1", &[("a", "08:00", "08:00"), ("b", "08:15", "08:15")]),
                trip("t2", "s1", &[("c", "08:30", "08:30"), ("d", "08:50", "08:50")]),
            ],
        );

        let mut walkable = WalkableConnections::new();
        walkable.add(station_id("b"), station_id("c"), 10);

        let graph = build(&timetable, &walkable, window("07:00", "09:00"));

        let arrival_at_b = (0..graph.node_count())
            .map(NodeId)
            .find(|&id| {
                let node = graph.node(id);
                node.kind == EventKind::Arrival && node.station == station_id("b")
            })
            .unwrap();

        let walk_edge = graph
            .out_edges(arrival_at_b)
            .iter()
            .find(|e| matches!(e.kind, EdgeKind::Walk { .. }))
            .unwrap();
        assert_eq!(graph.node(walk_edge.to).station, station_id("c"));
    }

    #[test]
    fn walk_edge_needs_time_to_walk() {
        let timetable = Timetable::new(
            vec![],
            vec![daily_service("s1")],
            vec![
                trip("t1", "s1", &[("a", "08:00", "08:00"), ("b", "08:15", "08:15")]),
                // Departs c before the walk from b can complete
                trip("t2", "s1", &[("c", "08:20", "08:20"), ("d", "08:40", "08:40")]),
            ],
        );

        let mut walkable = WalkableConnections::new();
        walkable.add(station_id("b"), station_id("c"), 10);

        let graph = build(&timetable, &walkable, window("07:00", "09:00"));

        let walk_edges: usize = (0..graph.node_count())
            .flat_map(|i| graph.out_edges(NodeId(i)))
            .filter(|e| matches!(e.kind, EdgeKind::Walk { .. }))
            .count();
        assert_eq!(walk_edges, 0);
    }

    #[test]
    fn non_monotone_trip_fails_build() {
        let timetable = Timetable::new(
            vec![],
            vec![daily_service("s1")],
            vec![trip(
                "broken",
                "s1",
                &[("a", "08:00", "08:00"), ("b", "07:30", "07:30")],
            )],
        );

        let scoped = scope_for_date(&timetable, date()).unwrap();
        let result = GraphBuilder::default().build(
            &timetable,
            &scoped,
            &WalkableConnections::new(),
            window("07:00", "09:00"),
        );

        assert!(matches!(
            result,
            Err(PlannerError::GraphBuildFailure { trip, .. })
                if trip == TripId::new("broken").unwrap()
        ));
    }

    #[test]
    fn deterministic_construction() {
        let timetable = Timetable::new(
            vec![],
            vec![daily_service("s1")],
            vec![
                trip("t1", "s1", &[("a", "08:00", "08:00"), ("b", "08:20", "08:20")]),
                trip("t2", "s1", &[("b", "08:30", "08:30"), ("c", "08:50", "08:50")]),
            ],
        );

        let g1 = build(&timetable, &WalkableConnections::new(), window("07:00", "09:00"));
        let g2 = build(&timetable, &WalkableConnections::new(), window("07:00", "09:00"));

        assert_eq!(g1.node_count(), g2.node_count());
        assert_eq!(g1.edge_count(), g2.edge_count());
        for i in 0..g1.node_count() {
            let (a, b) = (g1.node(NodeId(i)), g2.node(NodeId(i)));
            assert_eq!(a.station, b.station);
            assert_eq!(a.time, b.time);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.trip, b.trip);
        }
    }
}
