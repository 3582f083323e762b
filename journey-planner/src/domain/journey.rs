//! Journey types.
//!
//! A `Journey` is a computed itinerary from origin to destination,
//! composed of ordered legs. A leg is one of a closed set of variants
//! (a ride on a trip, a transfer wait within a station, or a walk
//! between nearby stations), so search and assembly code can match all
//! leg kinds exhaustively.

use chrono::Duration;
use serde::Serialize;

use super::{DomainError, StationId, StopCall, TransitTime, TripId};

fn serialize_duration_secs<S: serde::Serializer>(
    d: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(d.num_seconds())
}

/// A ride on one trip from a boarding call to an alighting call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RideLeg {
    /// Trip ridden
    pub trip: TripId,
    /// Boarding stop call
    pub board: StopCall,
    /// Alighting stop call
    pub alight: StopCall,
}

impl RideLeg {
    /// Create a ride leg, validating that it travels forward in time.
    pub fn new(trip: TripId, board: StopCall, alight: StopCall) -> Result<Self, DomainError> {
        if alight.arrival < board.departure {
            return Err(DomainError::InvalidRide("alighting before boarding"));
        }
        Ok(Self {
            trip,
            board,
            alight,
        })
    }

    /// Returns the boarding station.
    pub fn departure_station(&self) -> &StationId {
        &self.board.station
    }

    /// Returns the alighting station.
    pub fn arrival_station(&self) -> &StationId {
        &self.alight.station
    }

    /// Returns the scheduled departure time.
    pub fn departure_time(&self) -> TransitTime {
        self.board.departure
    }

    /// Returns the scheduled arrival time.
    pub fn arrival_time(&self) -> TransitTime {
        self.alight.arrival
    }

    /// Returns the ride duration.
    pub fn duration(&self) -> Duration {
        self.arrival_time().signed_duration_since(self.departure_time())
    }
}

/// A wait within a station between alighting and the next boarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferLeg {
    /// Station the transfer happens at
    pub station: StationId,
    /// Waiting time
    #[serde(serialize_with = "serialize_duration_secs")]
    pub wait: Duration,
}

impl TransferLeg {
    /// Create a transfer leg, validating a non-negative wait.
    pub fn new(station: StationId, wait: Duration) -> Result<Self, DomainError> {
        if wait < Duration::zero() {
            return Err(DomainError::NegativeWait);
        }
        Ok(Self { station, wait })
    }
}

/// A walk between two distinct nearby stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkLeg {
    /// Station walked from
    pub from: StationId,
    /// Station walked to
    pub to: StationId,
    /// Walking time
    #[serde(serialize_with = "serialize_duration_secs")]
    pub duration: Duration,
}

impl WalkLeg {
    /// Create a walk leg, validating distinct endpoints and a
    /// non-negative duration.
    pub fn new(from: StationId, to: StationId, duration: Duration) -> Result<Self, DomainError> {
        if from == to {
            return Err(DomainError::InvalidWalk("walk endpoints must differ"));
        }
        if duration < Duration::zero() {
            return Err(DomainError::InvalidWalk("negative walk duration"));
        }
        Ok(Self { from, to, duration })
    }
}

/// One continuous segment of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Leg {
    /// Riding a trip between two of its stop calls
    Ride(RideLeg),
    /// Waiting at a station between vehicles
    Transfer(TransferLeg),
    /// Walking between nearby stations
    Walk(WalkLeg),
}

impl Leg {
    /// Returns the station this leg starts at.
    pub fn origin(&self) -> &StationId {
        match self {
            Leg::Ride(ride) => ride.departure_station(),
            Leg::Transfer(transfer) => &transfer.station,
            Leg::Walk(walk) => &walk.from,
        }
    }

    /// Returns the station this leg ends at.
    pub fn destination(&self) -> &StationId {
        match self {
            Leg::Ride(ride) => ride.arrival_station(),
            Leg::Transfer(transfer) => &transfer.station,
            Leg::Walk(walk) => &walk.to,
        }
    }

    /// Returns the ride if this is a ride leg.
    pub fn as_ride(&self) -> Option<&RideLeg> {
        match self {
            Leg::Ride(ride) => Some(ride),
            _ => None,
        }
    }

    /// Returns the walk if this is a walk leg.
    pub fn as_walk(&self) -> Option<&WalkLeg> {
        match self {
            Leg::Walk(walk) => Some(walk),
            _ => None,
        }
    }

    /// Returns true if this is a ride leg.
    pub fn is_ride(&self) -> bool {
        matches!(self, Leg::Ride(_))
    }
}

/// A complete itinerary from origin to destination.
///
/// # Invariants
///
/// - Starts and ends with a ride leg
/// - Consecutive legs share a station (the previous leg's destination is
///   the next leg's origin)
/// - No leg departs before the preceding legs have completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    legs: Vec<Leg>,
}

impl Journey {
    /// Construct a journey from legs, validating the chaining invariants.
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        let (Some(Leg::Ride(_)), Some(Leg::Ride(_))) = (legs.first(), legs.last()) else {
            return Err(DomainError::MalformedJourney);
        };

        // Walk the legs forward, tracking where and when we are.
        let mut at: Option<(StationId, TransitTime)> = None;
        for leg in &legs {
            if let Some((station, _)) = &at
                && station != leg.origin()
            {
                return Err(DomainError::LegsNotConnected(
                    station.clone(),
                    leg.origin().clone(),
                ));
            }
            at = Some(match (leg, at) {
                (Leg::Ride(ride), current) => {
                    if let Some((_, time)) = current
                        && ride.departure_time() < time
                    {
                        return Err(DomainError::LegDepartsTooEarly {
                            station: ride.departure_station().clone(),
                        });
                    }
                    (ride.arrival_station().clone(), ride.arrival_time())
                }
                (Leg::Transfer(transfer), Some((station, time))) => {
                    (station, time + transfer.wait)
                }
                (Leg::Walk(walk), Some((_, time))) => (walk.to.clone(), time + walk.duration),
                // First leg is a ride, so transfer/walk always have a predecessor
                (_, None) => unreachable!("journey starts with a ride leg"),
            });
        }

        Ok(Self { legs })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns all ride legs in order.
    pub fn rides(&self) -> impl Iterator<Item = &RideLeg> {
        self.legs.iter().filter_map(Leg::as_ride)
    }

    /// Returns the departure time of the first ride.
    pub fn departure_time(&self) -> TransitTime {
        match &self.legs[0] {
            Leg::Ride(ride) => ride.departure_time(),
            _ => unreachable!("journey starts with a ride leg"),
        }
    }

    /// Returns the arrival time of the last ride.
    pub fn arrival_time(&self) -> TransitTime {
        match &self.legs[self.legs.len() - 1] {
            Leg::Ride(ride) => ride.arrival_time(),
            _ => unreachable!("journey ends with a ride leg"),
        }
    }

    /// Returns the origin station.
    pub fn origin(&self) -> &StationId {
        self.legs[0].origin()
    }

    /// Returns the destination station.
    pub fn destination(&self) -> &StationId {
        self.legs[self.legs.len() - 1].destination()
    }

    /// Returns the total duration from first departure to last arrival.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time().signed_duration_since(self.departure_time())
    }

    /// Returns the number of ride legs.
    pub fn ride_count(&self) -> usize {
        self.legs.iter().filter(|l| l.is_ride()).count()
    }

    /// Returns the number of vehicle changes (rides minus one).
    pub fn change_count(&self) -> usize {
        self.ride_count().saturating_sub(1)
    }

    /// Returns the number of walk legs.
    pub fn walk_count(&self) -> usize {
        self.legs
            .iter()
            .filter(|l| matches!(l, Leg::Walk(_)))
            .count()
    }

    /// Returns every station the journey touches, in order, without
    /// consecutive duplicates.
    pub fn stations(&self) -> Vec<StationId> {
        let mut out: Vec<StationId> = Vec::with_capacity(self.legs.len() + 1);
        out.push(self.legs[0].origin().clone());
        for leg in &self.legs {
            let dest = leg.destination();
            if out.last() != Some(dest) {
                out.push(dest.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn trip_id(s: &str) -> TripId {
        TripId::new(s).unwrap()
    }

    fn call(station: &str, seq: u32, arr: &str, dep: &str) -> StopCall {
        StopCall::new(station_id(station), seq, time(arr), time(dep)).unwrap()
    }

    fn ride(trip: &str, board: StopCall, alight: StopCall) -> Leg {
        Leg::Ride(RideLeg::new(trip_id(trip), board, alight).unwrap())
    }

    #[test]
    fn ride_leg_validation() {
        let board = call("alpha", 1, "10:00", "10:00");
        let alight = call("beta", 2, "10:30", "10:32");
        let leg = RideLeg::new(trip_id("t1"), board.clone(), alight).unwrap();

        assert_eq!(leg.departure_time(), time("10:00"));
        assert_eq!(leg.arrival_time(), time("10:30"));
        assert_eq!(leg.duration(), Duration::minutes(30));

        // Travelling backwards in time is rejected
        let early = call("beta", 2, "09:30", "09:32");
        assert!(RideLeg::new(trip_id("t1"), board, early).is_err());
    }

    #[test]
    fn transfer_leg_validation() {
        assert!(TransferLeg::new(station_id("a"), Duration::minutes(5)).is_ok());
        assert!(TransferLeg::new(station_id("a"), Duration::zero()).is_ok());
        assert!(TransferLeg::new(station_id("a"), Duration::minutes(-1)).is_err());
    }

    #[test]
    fn walk_leg_validation() {
        assert!(WalkLeg::new(station_id("a"), station_id("b"), Duration::minutes(5)).is_ok());
        assert!(WalkLeg::new(station_id("a"), station_id("a"), Duration::minutes(5)).is_err());
        assert!(WalkLeg::new(station_id("a"), station_id("b"), Duration::minutes(-5)).is_err());
    }

    #[test]
    fn single_ride_journey() {
        let journey = Journey::new(vec![ride(
            "t1",
            call("alpha", 1, "08:00", "08:00"),
            call("beta", 2, "08:20", "08:20"),
        )])
        .unwrap();

        assert_eq!(journey.departure_time(), time("08:00"));
        assert_eq!(journey.arrival_time(), time("08:20"));
        assert_eq!(journey.change_count(), 0);
        assert_eq!(journey.walk_count(), 0);
        assert_eq!(journey.total_duration(), Duration::minutes(20));
        assert_eq!(
            journey.stations(),
            vec![station_id("alpha"), station_id("beta")]
        );
    }

    #[test]
    fn journey_with_transfer() {
        let journey = Journey::new(vec![
            ride(
                "t1",
                call("alpha", 1, "08:00", "08:00"),
                call("beta", 2, "08:15", "08:15"),
            ),
            Leg::Transfer(TransferLeg::new(station_id("beta"), Duration::minutes(5)).unwrap()),
            ride(
                "t2",
                call("beta", 1, "08:20", "08:20"),
                call("gamma", 2, "08:30", "08:30"),
            ),
        ])
        .unwrap();

        assert_eq!(journey.change_count(), 1);
        assert_eq!(journey.ride_count(), 2);
        assert_eq!(journey.arrival_time(), time("08:30"));
        assert_eq!(
            journey.stations(),
            vec![station_id("alpha"), station_id("beta"), station_id("gamma")]
        );
    }

    #[test]
    fn journey_with_walk() {
        let journey = Journey::new(vec![
            ride(
                "t1",
                call("alpha", 1, "08:00", "08:00"),
                call("beta", 2, "08:15", "08:15"),
            ),
            Leg::Walk(WalkLeg::new(station_id("beta"), station_id("gamma"), Duration::minutes(7)).unwrap()),
            ride(
                "t2",
                call("gamma", 1, "08:30", "08:30"),
                call("delta", 2, "08:50", "08:50"),
            ),
        ])
        .unwrap();

        assert_eq!(journey.walk_count(), 1);
        assert_eq!(journey.change_count(), 1);
    }

    #[test]
    fn empty_journey_rejected() {
        assert_eq!(
            Journey::new(vec![]).unwrap_err(),
            DomainError::MalformedJourney
        );
    }

    #[test]
    fn journey_must_end_with_ride() {
        let result = Journey::new(vec![
            ride(
                "t1",
                call("alpha", 1, "08:00", "08:00"),
                call("beta", 2, "08:15", "08:15"),
            ),
            Leg::Transfer(TransferLeg::new(station_id("beta"), Duration::minutes(5)).unwrap()),
        ]);
        assert_eq!(result.unwrap_err(), DomainError::MalformedJourney);
    }

    #[test]
    fn disconnected_legs_rejected() {
        let result = Journey::new(vec![
            ride(
                "t1",
                call("alpha", 1, "08:00", "08:00"),
                call("beta", 2, "08:15", "08:15"),
            ),
            ride(
                "t2",
                call("gamma", 1, "08:30", "08:30"),
                call("delta", 2, "08:50", "08:50"),
            ),
        ]);
        assert!(matches!(result, Err(DomainError::LegsNotConnected(_, _))));
    }

    #[test]
    fn time_travel_between_rides_rejected() {
        let result = Journey::new(vec![
            ride(
                "t1",
                call("alpha", 1, "08:00", "08:00"),
                call("beta", 2, "08:15", "08:15"),
            ),
            ride(
                "t2",
                call("beta", 1, "08:10", "08:10"),
                call("gamma", 2, "08:30", "08:30"),
            ),
        ]);
        assert!(matches!(
            result,
            Err(DomainError::LegDepartsTooEarly { .. })
        ));
    }

    #[test]
    fn ride_after_transfer_must_wait_out_the_transfer() {
        // Transfer of 10 minutes ends at 08:25, but the next ride leaves
        // at 08:20.
        let result = Journey::new(vec![
            ride(
                "t1",
                call("alpha", 1, "08:00", "08:00"),
                call("beta", 2, "08:15", "08:15"),
            ),
            Leg::Transfer(TransferLeg::new(station_id("beta"), Duration::minutes(10)).unwrap()),
            ride(
                "t2",
                call("beta", 1, "08:20", "08:20"),
                call("gamma", 2, "08:40", "08:40"),
            ),
        ]);
        assert!(matches!(
            result,
            Err(DomainError::LegDepartsTooEarly { .. })
        ));
    }
}
