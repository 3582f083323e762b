//! Search configuration for the journey planner.

use chrono::Duration;

use super::rank::RankingPolicy;

/// Configuration parameters for journey search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of vehicle changes allowed.
    pub max_changes: usize,

    /// Maximum number of journeys to return.
    pub max_results: usize,

    /// Maximum total journey time (minutes), measured from the first
    /// departure. Longer candidates are pruned during search.
    pub max_journey_mins: i64,

    /// How far past the window end graph construction looks (minutes),
    /// so journeys departing near the window end can still complete.
    pub lookahead_mins: i64,

    /// How returned journeys are ordered.
    pub ranking: RankingPolicy,
}

impl SearchConfig {
    /// Returns the maximum journey time as a Duration.
    pub fn max_journey(&self) -> Duration {
        Duration::minutes(self.max_journey_mins)
    }

    /// Returns the lookahead horizon as a Duration.
    pub fn lookahead(&self) -> Duration {
        Duration::minutes(self.lookahead_mins)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_changes: 3,
            max_results: 10,
            max_journey_mins: 360, // 6 hours
            lookahead_mins: 120,   // 2 hours
            ranking: RankingPolicy::default(),
        }
    }
}
