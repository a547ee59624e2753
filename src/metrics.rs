//! Fleet-level statistics at a query time.
//!
//! Every call folds the whole log from scratch, so the query time may move
//! backwards between calls.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::classify::{RequestState, classify};
use crate::model::Dataset;
use crate::options::ReplayOptions;
use crate::trajectory::distance_traveled;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Query time these figures describe.
    pub time: f64,
    pub pool_count: usize,
    /// Assigned plus both retry states.
    pub assigned_count: usize,
    pub onboard_count: usize,
    pub done_count: usize,
    /// Failed or expired, whether still fading or already gone.
    pub failed_count: usize,
    /// Requests with a request time at or before the query time.
    pub released_count: usize,
    /// Percent of released requests accepted as of the query time.
    pub service_rate_now: u32,
    /// Percent of all requests ever accepted, independent of the query time.
    pub service_rate_total: u32,
    pub avg_wait_seconds: f64,
    /// Onboard passengers per known vehicle.
    pub per_vehicle_load: BTreeMap<String, usize>,
    /// Mean load over vehicles carrying anyone.
    pub avg_occupancy: f64,
    /// Mean distance driven per known vehicle.
    pub avg_distance_km: f64,
    /// Mean load/capacity over vehicles carrying anyone, as a percentage.
    pub fleet_utilization_percent: u32,
    pub vehicle_count: usize,
}

/// Aggregate the dataset at query time `t`.
pub fn aggregate(dataset: &Dataset, t: f64, options: &ReplayOptions) -> Metrics {
    let mut metrics = Metrics {
        time: t,
        ..Metrics::default()
    };

    let vehicle_ids = dataset.vehicle_ids();
    metrics.per_vehicle_load = vehicle_ids.iter().map(|id| (id.to_string(), 0)).collect();
    metrics.vehicle_count = vehicle_ids.len();

    let mut accepted_released = 0;
    let mut wait_total = 0.0;
    let mut wait_count = 0usize;

    for request in &dataset.requests {
        let classification = classify(request, t, options);
        match classification.state {
            RequestState::Pool => metrics.pool_count += 1,
            RequestState::Failed => metrics.failed_count += 1,
            state if state.is_assigned() => metrics.assigned_count += 1,
            _ => {}
        }

        if request.is_released_by(t) {
            metrics.released_count += 1;
            if classification.accepted {
                accepted_released += 1;
            }
        }

        if request.is_done_at(t) {
            metrics.done_count += 1;
        }
        if request.is_onboard_at(t) {
            metrics.onboard_count += 1;
            if let Some(load) = request
                .vehicle_id
                .as_deref()
                .and_then(|id| metrics.per_vehicle_load.get_mut(id))
            {
                *load += 1;
            }
        }

        if let (Some(requested), Some(picked)) = (request.request_time, request.pickup_time) {
            if picked <= t {
                wait_total += (picked - requested).max(0.0);
                wait_count += 1;
            }
        }
    }

    metrics.service_rate_now = percent(accepted_released, metrics.released_count);
    metrics.service_rate_total = service_rate_total(dataset);
    metrics.avg_wait_seconds = mean(wait_total, wait_count);

    let loads: Vec<usize> = metrics
        .per_vehicle_load
        .values()
        .copied()
        .filter(|&load| load > 0)
        .collect();
    metrics.avg_occupancy = mean(loads.iter().sum::<usize>() as f64, loads.len());
    if options.vehicle_capacity > 0 {
        let capacity = f64::from(options.vehicle_capacity);
        let ratio_total: f64 = loads.iter().map(|&load| load as f64 / capacity).sum();
        metrics.fleet_utilization_percent = (mean(ratio_total, loads.len()) * 100.0).round() as u32;
    }

    let meters_total: f64 = vehicle_ids
        .iter()
        .map(|id| {
            dataset
                .trips_for(id)
                .map(|trip| distance_traveled(trip, t))
                .sum::<f64>()
        })
        .sum();
    metrics.avg_distance_km = mean(meters_total / 1000.0, vehicle_ids.len());

    tracing::trace!(
        t,
        pool = metrics.pool_count,
        assigned = metrics.assigned_count,
        onboard = metrics.onboard_count,
        done = metrics.done_count,
        "aggregated metrics"
    );

    metrics
}

/// Aggregate at each of `times`, in parallel; results follow input order.
pub fn metrics_series(dataset: &Dataset, times: &[f64], options: &ReplayOptions) -> Vec<Metrics> {
    times
        .par_iter()
        .map(|&t| aggregate(dataset, t, options))
        .collect()
}

/// Acceptance rate over every request that is ever released.
pub fn service_rate_total(dataset: &Dataset) -> u32 {
    let released: Vec<_> = dataset
        .requests
        .iter()
        .filter(|r| r.request_time.is_some())
        .collect();
    let accepted = released
        .iter()
        .filter(|r| r.ever_accepted_by(f64::INFINITY))
        .count();
    percent(accepted, released.len())
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}
