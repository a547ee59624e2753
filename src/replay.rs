//! The replay facade handed to a rendering loop.
//!
//! Holds the normalized dataset and options only; the clock belongs to the
//! caller, which passes the query time on every call.

use serde::Serialize;
use serde_json::Value;

use crate::classify::{Classification, classify_all};
use crate::markers::{Marker, project_markers};
use crate::metrics::{Metrics, aggregate, metrics_series};
use crate::model::Dataset;
use crate::normalize::normalize_dataset;
use crate::options::ReplayOptions;
use crate::trajectory::position_at;

/// Interpolated position of one vehicle trip at a query time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePosition {
    pub vehicle_id: String,
    pub position: (f64, f64),
}

#[derive(Debug, Clone, Default)]
pub struct Replay {
    dataset: Dataset,
    options: ReplayOptions,
}

impl Replay {
    pub fn new(dataset: Dataset, options: ReplayOptions) -> Self {
        Self { dataset, options }
    }

    /// Normalize raw passenger and trip payloads.
    pub fn from_json(passengers: &Value, trips: &Value, options: ReplayOptions) -> Self {
        let dataset = normalize_dataset(passengers, trips, &options);
        Self::new(dataset, options)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &ReplayOptions {
        &self.options
    }

    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.dataset.time_range()
    }

    pub fn classify_all(&self, t: f64) -> Vec<Classification> {
        classify_all(&self.dataset.requests, t, &self.options)
    }

    pub fn markers(&self, t: f64) -> Vec<Marker> {
        project_markers(&self.dataset.requests, t, &self.options)
    }

    pub fn metrics(&self, t: f64) -> Metrics {
        aggregate(&self.dataset, t, &self.options)
    }

    pub fn metrics_series(&self, times: &[f64]) -> Vec<Metrics> {
        metrics_series(&self.dataset, times, &self.options)
    }

    pub fn vehicle_positions(&self, t: f64) -> Vec<VehiclePosition> {
        self.dataset
            .trips
            .iter()
            .filter_map(|trip| {
                position_at(trip, t).map(|position| VehiclePosition {
                    vehicle_id: trip.vehicle_id.clone(),
                    position,
                })
            })
            .collect()
    }
}
