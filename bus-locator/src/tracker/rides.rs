//! Grouping position records into rides.

use std::collections::HashMap;

use crate::domain::{Ride, RideId, VehiclePosition, VehicleRef};
use crate::stride::PositionRecord;

/// Group loose position records by ride, newest ride first.
///
/// Within each ride, positions end up sorted oldest first (a [`Ride`]
/// invariant). Rides are ordered by their latest sample, descending, so the
/// first ride is the one most recently heard from.
pub fn group_into_rides(records: Vec<PositionRecord>) -> Vec<Ride> {
    let mut by_ride: HashMap<RideId, (Option<VehicleRef>, Vec<VehiclePosition>)> = HashMap::new();

    for record in records {
        let entry = by_ride.entry(record.ride_id).or_default();
        if entry.0.is_none() {
            entry.0 = record.vehicle_ref;
        }
        entry.1.push(record.position);
    }

    let mut rides: Vec<Ride> = by_ride
        .into_iter()
        .filter_map(|(id, (vehicle_ref, positions))| Ride::new(id, vehicle_ref, positions).ok())
        .collect();

    rides.sort_by_key(|ride| std::cmp::Reverse(ride.latest().recorded_at));

    rides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use chrono::{TimeZone, Utc};

    fn record(ride: &str, minute: u32) -> PositionRecord {
        PositionRecord {
            ride_id: RideId::new(ride),
            vehicle_ref: Some(VehicleRef::new(format!("V-{ride}"))),
            position: VehiclePosition::new(
                GeoPoint::new(32.09, 34.78).unwrap(),
                Utc.with_ymd_and_hms(2025, 2, 19, 9, minute, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn groups_by_ride_id() {
        let rides = group_into_rides(vec![
            record("R1", 0),
            record("R2", 5),
            record("R1", 10),
            record("R2", 15),
            record("R1", 20),
        ]);

        assert_eq!(rides.len(), 2);
        let r1 = rides.iter().find(|r| r.id().as_str() == "R1").unwrap();
        assert_eq!(r1.positions().len(), 3);
        assert_eq!(r1.vehicle_ref().unwrap().as_str(), "V-R1");
    }

    #[test]
    fn newest_ride_first() {
        let rides = group_into_rides(vec![record("old", 0), record("new", 30), record("mid", 15)]);

        let order: Vec<&str> = rides.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(group_into_rides(vec![]).is_empty());
    }
}
