//! Journey planning pipeline.
//!
//! The `Planner` wires the per-date scope filter, the graph builder and
//! the search engine into the public query interface: scope the
//! timetable for the travel date, build a time-expanded graph for the
//! departure window, search it, and assemble the output representation.

mod config;
mod rank;
mod search;


pub use config::SearchConfig;
pub use rank::{RankCriterion, RankingPolicy, deduplicate, rank_journeys, remove_dominated};
pub use search::{SearchEngine, SearchOutcome, SearchRequest};

use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

use crate::domain::{StationId, TimeWindow, TransitTime};
use crate::error::PlannerError;
use crate::graph::{GraphBuilder, InterchangeRules};
use crate::represent::{JourneyPlan, assemble};
use crate::scope::{ScopeCache, ScopeCacheConfig};
use crate::timetable::Timetable;
use crate::walkable::WalkableConnections;

/// A journey query.
#[derive(Debug, Clone)]
pub struct JourneyQuery {
    /// Origin station.
    pub origin: StationId,

    /// Destination station.
    pub destination: StationId,

    /// Travel date the timetable is scoped to.
    pub date: NaiveDate,

    /// Start of the departure window, as a time of day on `date`.
    pub window_start: NaiveTime,

    /// End of the departure window. An end before the start is taken to
    /// cross midnight into the following day.
    pub window_end: NaiveTime,

    /// Per-query change bound; falls back to the config's.
    pub max_changes: Option<usize>,

    /// Per-query duration bound; falls back to the config's.
    pub max_duration: Option<Duration>,

    /// Wall-clock budget for the search stage.
    pub deadline: Option<Instant>,
}

impl JourneyQuery {
    /// Create a query with the config-default bounds and no deadline.
    pub fn new(
        origin: StationId,
        destination: StationId,
        date: NaiveDate,
        window_start: NaiveTime,
        window_end: NaiveTime,
    ) -> Self {
        Self {
            origin,
            destination,
            date,
            window_start,
            window_end,
            max_changes: None,
            max_duration: None,
            deadline: None,
        }
    }

    /// The departure window anchored to the travel date.
    fn resolved_window(&self) -> TimeWindow {
        let start = TransitTime::new(self.date, self.window_start);
        let mut end = TransitTime::new(self.date, self.window_end);
        if end < start {
            end = end + Duration::days(1);
        }
        TimeWindow::new(start, end).expect("window end adjusted to follow start")
    }
}

/// The planning pipeline over one timetable snapshot.
///
/// A `Planner` is immutable once constructed; concurrent queries share
/// it freely. Replacing the snapshot means constructing a new `Planner`
/// (see `snapshot::SnapshotStore`).
pub struct Planner {
    timetable: Arc<Timetable>,
    walkable: WalkableConnections,
    builder: GraphBuilder,
    config: SearchConfig,
    scope_cache: ScopeCache,
}

impl Planner {
    /// Create a planner over a snapshot.
    pub fn new(
        timetable: Arc<Timetable>,
        walkable: WalkableConnections,
        interchange: InterchangeRules,
        config: SearchConfig,
    ) -> Self {
        let builder = GraphBuilder::new(interchange).with_lookahead(config.lookahead());
        Self {
            timetable,
            walkable,
            builder,
            config,
            scope_cache: ScopeCache::new(&ScopeCacheConfig::default()),
        }
    }

    /// Returns the snapshot this planner serves.
    pub fn timetable(&self) -> &Arc<Timetable> {
        &self.timetable
    }

    /// Returns the search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find journeys for a query.
    ///
    /// Runs scope → build → search → assemble. An empty plan means no
    /// feasible journey exists in the window; callers wanting more can
    /// retry with a wider window or relaxed bounds, the planner itself
    /// never widens anything.
    ///
    /// # Errors
    ///
    /// - `UnknownStation` if the origin or destination is not in the
    ///   snapshot.
    /// - `InvalidCalendarData` if scoping hits a malformed calendar.
    /// - `GraphBuildFailure` if a scoped trip's times are inconsistent.
    pub fn find_journeys(&self, query: &JourneyQuery) -> Result<JourneyPlan, PlannerError> {
        for station in [&query.origin, &query.destination] {
            if !self.timetable.contains_station(station) {
                return Err(PlannerError::UnknownStation(station.clone()));
            }
        }

        let window = query.resolved_window();
        let scoped = self
            .scope_cache
            .get_or_compute(&self.timetable, query.date)?;
        let graph = self
            .builder
            .build(&self.timetable, &scoped, &self.walkable, window)?;

        let engine = SearchEngine::new(&graph, &self.timetable, &self.config);
        let request = SearchRequest {
            origin: query.origin.clone(),
            destination: query.destination.clone(),
            departure_window: window,
            max_changes: query.max_changes,
            max_duration: query.max_duration,
            deadline: query.deadline,
        };
        let outcome = engine.search(&request)?;

        debug!(
            origin = %query.origin,
            destination = %query.destination,
            date = %query.date,
            journeys = outcome.journeys.len(),
            truncated = outcome.truncated,
            "query complete"
        );

        Ok(assemble(outcome.journeys, &self.timetable))
    }
}
