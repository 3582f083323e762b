//! Journey ranking and dominance filtering.
//!
//! The ranking order among arrival time, change count and walk count is a
//! policy choice, not a law of nature, so it is a configurable
//! permutation rather than a hardcoded comparison.

use std::cmp::Ordering;

use crate::domain::Journey;

/// One ranking criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankCriterion {
    /// Earlier final arrival is better.
    EarliestArrival,
    /// Fewer vehicle changes is better.
    FewestChanges,
    /// Fewer walk legs is better.
    FewestWalks,
}

impl RankCriterion {
    fn compare(self, a: &Journey, b: &Journey) -> Ordering {
        match self {
            RankCriterion::EarliestArrival => a.arrival_time().cmp(&b.arrival_time()),
            RankCriterion::FewestChanges => a.change_count().cmp(&b.change_count()),
            RankCriterion::FewestWalks => a.walk_count().cmp(&b.walk_count()),
        }
    }
}

/// A permutation of the three ranking criteria.
///
/// The default order is (earliest arrival, fewest changes, fewest walks).
/// Ties after all three criteria are broken by later departure (shorter
/// journey wins) to keep the ordering total and deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingPolicy {
    order: [RankCriterion; 3],
}

impl RankingPolicy {
    /// Create a policy from a criteria order.
    ///
    /// Returns `None` unless the order is a permutation of all three
    /// criteria.
    pub fn new(order: [RankCriterion; 3]) -> Option<Self> {
        let mut seen = [false; 3];
        for criterion in order {
            let slot = match criterion {
                RankCriterion::EarliestArrival => 0,
                RankCriterion::FewestChanges => 1,
                RankCriterion::FewestWalks => 2,
            };
            if seen[slot] {
                return None;
            }
            seen[slot] = true;
        }
        Some(Self { order })
    }

    /// Returns the criteria in ranking order.
    pub fn order(&self) -> &[RankCriterion; 3] {
        &self.order
    }

    /// Compare two journeys under this policy.
    pub fn compare(&self, a: &Journey, b: &Journey) -> Ordering {
        for criterion in self.order {
            let ord = criterion.compare(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        // Later departure with the same arrival means less time en route.
        b.departure_time().cmp(&a.departure_time())
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            order: [
                RankCriterion::EarliestArrival,
                RankCriterion::FewestChanges,
                RankCriterion::FewestWalks,
            ],
        }
    }
}

/// Sort journeys best-first under the given policy.
pub fn rank_journeys(mut journeys: Vec<Journey>, policy: &RankingPolicy) -> Vec<Journey> {
    journeys.sort_by(|a, b| policy.compare(a, b));
    journeys
}

/// Remove dominated journeys.
///
/// A journey is dominated if another journey departs no earlier,
/// arrives no later, and has no more changes or walks, strictly better
/// in at least one dimension. Departure time counts so that a
/// later-departing journey with a later arrival survives alongside an
/// earlier one: within a departure window both are useful answers.
pub fn remove_dominated(journeys: Vec<Journey>) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    fn dominates(a: &Journey, b: &Journey) -> bool {
        a.departure_time() >= b.departure_time()
            && a.arrival_time() <= b.arrival_time()
            && a.change_count() <= b.change_count()
            && a.walk_count() <= b.walk_count()
            && (a.departure_time() > b.departure_time()
                || a.arrival_time() < b.arrival_time()
                || a.change_count() < b.change_count()
                || a.walk_count() < b.walk_count())
    }

    let mut result: Vec<Journey> = Vec::with_capacity(journeys.len());

    for journey in journeys {
        if result.iter().any(|kept| dominates(kept, &journey)) {
            continue;
        }
        result.retain(|kept| !dominates(&journey, kept));
        result.push(journey);
    }

    result
}

/// Deduplicate journeys that are effectively identical.
///
/// Two journeys are duplicates if they share departure time, arrival
/// time, change count and walk count; the first in the incoming order is
/// kept.
pub fn deduplicate(journeys: Vec<Journey>) -> Vec<Journey> {
    let mut seen: Vec<(crate::domain::TransitTime, crate::domain::TransitTime, usize, usize)> =
        Vec::new();
    let mut result = Vec::with_capacity(journeys.len());

    for journey in journeys {
        let key = (
            journey.departure_time(),
            journey.arrival_time(),
            journey.change_count(),
            journey.walk_count(),
        );
        if !seen.contains(&key) {
            seen.push(key);
            result.push(journey);
        }
    }

    result
}
