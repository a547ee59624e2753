//! Core seams of the replay engine.
//!
//! Kept minimal: the engine consumes the canonical model directly, and only
//! the geometry is pluggable.

/// Measures the distance in meters between two `(longitude, latitude)` points.
///
/// Implementations must be pure: the same inputs always give the same output,
/// so replayed metrics stay reproducible.
pub trait DistanceMetric {
    fn meters_between(&self, from: (f64, f64), to: (f64, f64)) -> f64;
}

impl<M: DistanceMetric + ?Sized> DistanceMetric for &M {
    fn meters_between(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        (**self).meters_between(from, to)
    }
}
