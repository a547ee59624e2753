//! Piecewise-linear time interpolation over vehicle waypoints.
//!
//! Both operations walk the waypoints in order and stop at the first
//! malformed segment (a non-finite coordinate or time, or time going
//! backwards), so a corrupt tail never poisons the prefix before it.

use crate::haversine::Haversine;
use crate::model::{VehicleTrip, Waypoint};
use crate::traits::DistanceMetric;

/// Meters driven by `trip` up to query time `t`, using great-circle distance.
pub fn distance_traveled(trip: &VehicleTrip, t: f64) -> f64 {
    distance_traveled_with(trip, t, &Haversine::default())
}

/// Meters driven by `trip` up to query time `t` under `metric`.
pub fn distance_traveled_with<M: DistanceMetric>(trip: &VehicleTrip, t: f64, metric: &M) -> f64 {
    let mut total = 0.0;

    for pair in trip.waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if is_malformed(&from, &to) {
            tracing::debug!(vehicle = %trip.vehicle_id, "stopping distance at malformed segment");
            break;
        }

        let (t1, t2) = (from.timestamp, to.timestamp);
        if t2 <= t {
            // Zero-duration jumps carry no distance.
            if t2 > t1 {
                total += metric.meters_between(from.position, to.position);
            }
        } else if t1 < t {
            let fraction = ((t - t1) / (t2 - t1)).clamp(0.0, 1.0);
            total += metric.meters_between(from.position, to.position) * fraction;
            break;
        } else {
            break;
        }
    }

    total
}

/// Vehicle position at `t`, clamped to the first and last usable waypoints.
///
/// `None` for a trip without a usable first waypoint.
pub fn position_at(trip: &VehicleTrip, t: f64) -> Option<(f64, f64)> {
    let first = trip.waypoints.first().filter(|w| w.is_finite())?;
    if t <= first.timestamp {
        return Some(first.position);
    }

    let mut last_good = first.position;
    for pair in trip.waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if is_malformed(&from, &to) {
            break;
        }
        if t < to.timestamp {
            let fraction = ((t - from.timestamp) / (to.timestamp - from.timestamp)).clamp(0.0, 1.0);
            return Some(lerp(from.position, to.position, fraction));
        }
        last_good = to.position;
    }

    Some(last_good)
}

fn is_malformed(from: &Waypoint, to: &Waypoint) -> bool {
    !from.is_finite() || !to.is_finite() || to.timestamp < from.timestamp
}

fn lerp(a: (f64, f64), b: (f64, f64), fraction: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * fraction, a.1 + (b.1 - a.1) * fraction)
}
