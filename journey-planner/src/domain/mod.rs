//! Domain types for the journey planner.
//!
//! This module contains the core domain model for validated timetable
//! data: identifiers, stations, service calendars, trips and their stop
//! calls, and the journey/leg output types. Invariants are enforced at
//! construction time, so code that receives these types can trust them.

mod calendar;
mod error;
mod id;
mod journey;
mod station;
mod stop_call;
mod time;
mod trip;

pub use calendar::{Service, ServiceCalendar, WeekdayPattern};
pub use error::DomainError;
pub use id::{ServiceId, StationId, TripId};
pub use journey::{Journey, Leg, RideLeg, TransferLeg, WalkLeg};
pub use station::Station;
pub use stop_call::{CallIndex, StopCall};
pub use time::{TimeError, TimeWindow, TransitTime};
pub use trip::Trip;
