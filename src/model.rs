//! Canonical, load-time-immutable data model.
//!
//! Everything downstream of the normalizer consumes these types only. An unset
//! simulation time is `None`; `0.0` is a real instant.

use std::collections::BTreeSet;

use serde::Serialize;

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Accepted,
    Rejected,
    Timeout,
    Cancelled,
    Failed,
    Other,
}

impl AttemptResult {
    /// Fold a free-form result label, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "accept" | "accepted" | "assign" | "assigned" | "approve" | "approved" => {
                AttemptResult::Accepted
            }
            "reject" | "rejected" => AttemptResult::Rejected,
            "timeout" | "timed_out" | "expired" => AttemptResult::Timeout,
            "cancel" | "cancelled" | "canceled" => AttemptResult::Cancelled,
            "fail" | "failed" | "failure" => AttemptResult::Failed,
            _ => AttemptResult::Other,
        }
    }

    /// Results that end a request when the attempt budget is spent.
    pub fn is_terminal_negative(self) -> bool {
        matches!(
            self,
            AttemptResult::Timeout
                | AttemptResult::Rejected
                | AttemptResult::Cancelled
                | AttemptResult::Failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentAttempt {
    pub timestamp: f64,
    pub end_timestamp: Option<f64>,
    pub attempt_number: Option<u32>,
    pub result: AttemptResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerRequest {
    pub id: String,
    /// `(longitude, latitude)`.
    pub pickup_position: Option<(f64, f64)>,
    pub request_time: Option<f64>,
    pub assign_time: Option<f64>,
    pub pickup_time: Option<f64>,
    pub dropoff_time: Option<f64>,
    pub max_wait_seconds: f64,
    /// Effective attempt budget (the record's value or the default).
    pub max_attempts: u32,
    /// The record's own `max_attempts` field, if it had one.
    pub configured_attempts: Option<u32>,
    /// Ascending by `timestamp`.
    pub attempt_history: Vec<AssignmentAttempt>,
    pub vehicle_id: Option<String>,
}

impl PassengerRequest {
    /// Instant the request gives up waiting without an acceptance.
    pub fn expiry_time(&self) -> Option<f64> {
        self.request_time.map(|t| t + self.max_wait_seconds)
    }

    pub fn is_released_by(&self, t: f64) -> bool {
        self.request_time.is_some_and(|req| req <= t)
    }

    /// Whether the request was matched to a vehicle as of `t`.
    ///
    /// Timestamp fields count once set; history entries only from their start.
    pub fn ever_accepted_by(&self, t: f64) -> bool {
        self.assign_time.is_some()
            || self.pickup_time.is_some()
            || self.dropoff_time.is_some()
            || self.attempts_by(t).iter().any(|a| a.result == AttemptResult::Accepted)
    }

    /// Whether a vehicle assignment is visible at `t`.
    pub fn assigned_by(&self, t: f64) -> bool {
        self.assign_time.is_some_and(|asg| asg <= t)
            || self.attempts_by(t).iter().any(|a| a.result == AttemptResult::Accepted)
    }

    pub fn is_onboard_at(&self, t: f64) -> bool {
        match self.pickup_time {
            Some(pick) if pick <= t => self.dropoff_time.is_none_or(|drop| t < drop),
            _ => false,
        }
    }

    pub fn is_done_at(&self, t: f64) -> bool {
        self.dropoff_time.is_some_and(|drop| drop <= t)
    }

    /// History entries that started at or before `t`.
    pub fn attempts_by(&self, t: f64) -> &[AssignmentAttempt] {
        let end = self.attempt_history.partition_point(|a| a.timestamp <= t);
        &self.attempt_history[..end]
    }

    pub fn last_attempt_by(&self, t: f64) -> Option<&AssignmentAttempt> {
        self.attempts_by(t).last()
    }

    fn known_times(&self) -> impl Iterator<Item = f64> + '_ {
        [
            self.request_time,
            self.assign_time,
            self.pickup_time,
            self.dropoff_time,
        ]
        .into_iter()
        .flatten()
        .chain(
            self.attempt_history
                .iter()
                .flat_map(|a| std::iter::once(a.timestamp).chain(a.end_timestamp)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    /// `(longitude, latitude)`; may be non-finite in malformed input.
    pub position: (f64, f64),
    pub timestamp: f64,
}

impl Waypoint {
    pub fn is_finite(&self) -> bool {
        self.position.0.is_finite() && self.position.1.is_finite() && self.timestamp.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleTrip {
    pub vehicle_id: String,
    pub waypoints: Vec<Waypoint>,
}

/// The normalized scenario: every request and every vehicle trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub requests: Vec<PassengerRequest>,
    pub trips: Vec<VehicleTrip>,
}

impl Dataset {
    pub fn new(requests: Vec<PassengerRequest>, trips: Vec<VehicleTrip>) -> Self {
        Self { requests, trips }
    }

    /// Every vehicle named by a trip or by a request assignment, sorted.
    pub fn vehicle_ids(&self) -> BTreeSet<&str> {
        self.trips
            .iter()
            .map(|trip| trip.vehicle_id.as_str())
            .chain(self.requests.iter().filter_map(|r| r.vehicle_id.as_deref()))
            .collect()
    }

    /// Trips recorded for one vehicle, in input order.
    pub fn trips_for<'a>(&'a self, vehicle_id: &'a str) -> impl Iterator<Item = &'a VehicleTrip> {
        self.trips.iter().filter(move |trip| trip.vehicle_id == vehicle_id)
    }

    /// Earliest and latest finite time anywhere in the log, for slider bounds.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let request_times = self.requests.iter().flat_map(|r| r.known_times());
        let trip_times = self
            .trips
            .iter()
            .flat_map(|trip| trip.waypoints.iter().map(|w| w.timestamp));

        request_times
            .chain(trip_times)
            .filter(|t| t.is_finite())
            .fold(None, |range, t| match range {
                None => Some((t, t)),
                Some((lo, hi)) => Some((f64::min(lo, t), f64::max(hi, t))),
            })
    }
}
