//! Haversine great-circle distance.
//!
//! Ignores the road network; trajectories are already densified upstream, so
//! straight segments between waypoints are a close enough approximation.

use crate::traits::DistanceMetric;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance metric on a spherical Earth.
#[derive(Debug, Clone, Copy)]
pub struct Haversine {
    /// Sphere radius in meters.
    pub radius_m: f64,
}

impl Default for Haversine {
    fn default() -> Self {
        Self {
            radius_m: EARTH_RADIUS_M,
        }
    }
}

impl Haversine {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }
}

impl DistanceMetric for Haversine {
    fn meters_between(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        self.radius_m * central_angle(from, to)
    }
}

/// Haversine distance in meters between two `(longitude, latitude)` points.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    EARTH_RADIUS_M * central_angle(from, to)
}

/// Angle in radians subtended at the center of the sphere.
fn central_angle(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lng1, lat1) = from;
    let (lng2, lat2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points.
    2.0 * a.min(1.0).sqrt().asin()
}
