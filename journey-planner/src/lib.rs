//! Journey planning over scheduled public-transport timetables.
//!
//! Given validated station, service and trip records, the planner
//! answers: "how do I get from here to there on this date?" A query
//! scopes the timetable to the travel date, builds a time-expanded graph
//! for the departure window, runs a multi-criteria search over it, and
//! returns the non-dominated journeys with the stations they touch.

pub mod domain;
pub mod error;
pub mod graph;
pub mod planner;
pub mod represent;
pub mod scope;
pub mod snapshot;
pub mod timetable;
pub mod walkable;
