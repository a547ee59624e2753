//! Per-request state as a pure function of the query time.
//!
//! Rules are evaluated in priority order and the first match wins:
//! not yet requested, failed after exhausting attempts, expired, done or
//! onboard (hidden), retry colors, assigned, and finally the waiting pool.

use serde::Serialize;

use crate::model::PassengerRequest;
use crate::options::{AttemptsDoneMode, ReplayOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Not requested yet (or never, when the request time is unset).
    Pending,
    /// Waiting for a first assignment.
    Pool,
    Assigned,
    /// Waiting on a second attempt.
    Retry1,
    /// Waiting on a final attempt.
    Retry2,
    /// Gave up: attempts exhausted or max wait exceeded.
    Failed,
    Onboard,
    Done,
}

impl RequestState {
    pub fn label(self) -> &'static str {
        match self {
            RequestState::Pending => "pending",
            RequestState::Pool => "pool",
            RequestState::Assigned => "assigned",
            RequestState::Retry1 => "retry1",
            RequestState::Retry2 => "retry2",
            RequestState::Failed => "failed",
            RequestState::Onboard => "onboard",
            RequestState::Done => "done",
        }
    }

    /// States counted as assigned in the fleet metrics.
    pub fn is_assigned(self) -> bool {
        matches!(
            self,
            RequestState::Assigned | RequestState::Retry1 | RequestState::Retry2
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub visible: bool,
    pub state: RequestState,
    /// Pickup `(longitude, latitude)`, if the record had one.
    pub position: Option<(f64, f64)>,
    /// Marker opacity in `[0, 1]`; below 1 only while a failed marker fades.
    pub fade_alpha: f64,
    /// Whether the request was matched to a vehicle as of the query time.
    pub accepted: bool,
}

/// Classify one request at query time `t`.
pub fn classify(request: &PassengerRequest, t: f64, options: &ReplayOptions) -> Classification {
    let accepted = request.ever_accepted_by(t);
    let shown = |state: RequestState, fade_alpha: f64| Classification {
        visible: fade_alpha > 0.0,
        state,
        position: request.pickup_position,
        fade_alpha,
        accepted,
    };

    let Some(request_time) = request.request_time else {
        return shown(RequestState::Pending, 0.0);
    };
    if t < request_time {
        return shown(RequestState::Pending, 0.0);
    }

    let attempts_done = attempts_done(request, t, options);

    if !accepted {
        let exhausted = attempts_done.is_some_and(|done| done >= request.max_attempts);
        let last = request.last_attempt_by(t);
        let ended_badly = last.is_some_and(|a| a.result.is_terminal_negative());

        if exhausted && (ended_badly || request.max_attempts == 0) {
            let t_fail = last
                .map(|a| a.end_timestamp.unwrap_or(a.timestamp))
                .or_else(|| request.expiry_time())
                .unwrap_or(t);
            return shown(RequestState::Failed, fade_alpha(t, t_fail, options.fade_window_seconds));
        }

        if let Some(expiry) = request.expiry_time() {
            if t >= expiry {
                return shown(RequestState::Failed, fade_alpha(t, expiry, options.fade_window_seconds));
            }
        }
    }

    if request.is_done_at(t) {
        return shown(RequestState::Done, 0.0);
    }
    if request.is_onboard_at(t) {
        return shown(RequestState::Onboard, 0.0);
    }

    match attempts_done {
        Some(done) if done >= 3 => return shown(RequestState::Retry2, 1.0),
        Some(2) => return shown(RequestState::Retry1, 1.0),
        _ => {}
    }

    if request.assigned_by(t) {
        return shown(RequestState::Assigned, 1.0);
    }

    shown(RequestState::Pool, 1.0)
}

/// Classify every request, in dataset order.
pub fn classify_all(requests: &[PassengerRequest], t: f64, options: &ReplayOptions) -> Vec<Classification> {
    requests.iter().map(|request| classify(request, t, options)).collect()
}

/// `None` when the record gives nothing to count against its budget.
fn attempts_done(request: &PassengerRequest, t: f64, options: &ReplayOptions) -> Option<u32> {
    match options.attempts_done {
        AttemptsDoneMode::Configured => request.configured_attempts,
        AttemptsDoneMode::Observed => {
            Some(u32::try_from(request.attempts_by(t).len()).unwrap_or(u32::MAX))
        }
    }
}

/// Linear fade from 1 at `t_fail` to 0 at `t_fail + window`.
pub fn fade_alpha(t: f64, t_fail: f64, window: f64) -> f64 {
    if window <= 0.0 {
        return if t < t_fail { 1.0 } else { 0.0 };
    }
    (1.0 - (t - t_fail) / window).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssignmentAttempt, AttemptResult};

    fn request(request_time: f64) -> PassengerRequest {
        PassengerRequest {
            id: "r1".to_string(),
            pickup_position: Some((127.1, 37.5)),
            request_time: Some(request_time),
            assign_time: None,
            pickup_time: None,
            dropoff_time: None,
            max_wait_seconds: 600.0,
            max_attempts: 3,
            configured_attempts: None,
            attempt_history: Vec::new(),
            vehicle_id: None,
        }
    }

    fn attempt(timestamp: f64, end: Option<f64>, result: AttemptResult) -> AssignmentAttempt {
        AssignmentAttempt {
            timestamp,
            end_timestamp: end,
            attempt_number: None,
            result,
        }
    }

    fn state_at(r: &PassengerRequest, t: f64) -> (bool, RequestState) {
        let c = classify(r, t, &ReplayOptions::default());
        (c.visible, c.state)
    }

    #[test]
    fn test_unset_request_time_never_visible() {
        let mut r = request(0.0);
        r.request_time = None;
        for t in [-1.0, 0.0, 1e9] {
            assert_eq!(state_at(&r, t), (false, RequestState::Pending));
        }
    }

    #[test]
    fn test_pool_then_expiry_fade() {
        let r = request(100.0);
        assert_eq!(state_at(&r, 99.0), (false, RequestState::Pending));
        assert_eq!(state_at(&r, 100.0), (true, RequestState::Pool));
        assert_eq!(state_at(&r, 699.0), (true, RequestState::Pool));

        let at_expiry = classify(&r, 700.0, &ReplayOptions::default());
        assert!(at_expiry.visible);
        assert_eq!(at_expiry.state, RequestState::Failed);
        assert_eq!(at_expiry.fade_alpha, 1.0);

        let halfway = classify(&r, 701.0, &ReplayOptions::default());
        assert!((halfway.fade_alpha - 0.5).abs() < 1e-12);

        assert_eq!(state_at(&r, 702.0), (false, RequestState::Failed));
    }

    #[test]
    fn test_exhausted_attempts_fail_from_attempt_end() {
        let mut r = request(100.0);
        r.configured_attempts = Some(2);
        r.max_attempts = 2;
        r.attempt_history = vec![
            attempt(100.0, Some(160.0), AttemptResult::Rejected),
            attempt(220.0, Some(280.0), AttemptResult::Timeout),
        ];

        // End of the last attempt is still ahead: alpha is capped at 1.
        let during = classify(&r, 250.0, &ReplayOptions::default());
        assert_eq!(during.state, RequestState::Failed);
        assert_eq!(during.fade_alpha, 1.0);

        let fading = classify(&r, 281.0, &ReplayOptions::default());
        assert!((fading.fade_alpha - 0.5).abs() < 1e-12);
        assert_eq!(state_at(&r, 282.0), (false, RequestState::Failed));
    }

    #[test]
    fn test_exhausted_attempts_use_start_without_end() {
        let mut r = request(100.0);
        r.configured_attempts = Some(1);
        r.max_attempts = 1;
        r.attempt_history = vec![attempt(130.0, None, AttemptResult::Cancelled)];

        // Before the attempt starts there is no last attempt to end on.
        assert_eq!(state_at(&r, 120.0), (true, RequestState::Pool));
        assert_eq!(state_at(&r, 131.0).1, RequestState::Failed);
        assert_eq!(state_at(&r, 132.0), (false, RequestState::Failed));
    }

    #[test]
    fn test_zero_attempt_budget_fails_immediately() {
        let mut r = request(100.0);
        r.configured_attempts = Some(0);
        r.max_attempts = 0;
        let c = classify(&r, 100.0, &ReplayOptions::default());
        assert!(c.visible);
        assert_eq!(c.state, RequestState::Failed);
        assert_eq!(c.fade_alpha, 1.0);
        assert_eq!(state_at(&r, 702.0), (false, RequestState::Failed));
    }

    #[test]
    fn test_accepted_request_never_fails() {
        let mut r = request(100.0);
        r.attempt_history = vec![attempt(150.0, None, AttemptResult::Accepted)];
        assert_eq!(state_at(&r, 150.0), (true, RequestState::Assigned));
        assert_eq!(state_at(&r, 5000.0), (true, RequestState::Assigned));
    }

    #[test]
    fn test_assign_time_drives_assigned() {
        let mut r = request(100.0);
        r.assign_time = Some(200.0);
        // Accepted from load time, so it never expires; assigned only from t_asg.
        assert_eq!(state_at(&r, 150.0), (true, RequestState::Pool));
        assert_eq!(state_at(&r, 200.0), (true, RequestState::Assigned));
        assert_eq!(state_at(&r, 900.0), (true, RequestState::Assigned));
    }

    #[test]
    fn test_onboard_and_done_hidden() {
        let mut r = request(0.0);
        r.pickup_time = Some(50.0);
        r.dropoff_time = Some(200.0);
        assert_eq!(state_at(&r, 25.0), (true, RequestState::Pool));
        assert_eq!(state_at(&r, 100.0), (false, RequestState::Onboard));
        assert_eq!(state_at(&r, 250.0), (false, RequestState::Done));
    }

    #[test]
    fn test_retry_colors_follow_configured_budget() {
        let mut r = request(100.0);
        r.configured_attempts = Some(2);
        r.max_attempts = 2;
        assert_eq!(state_at(&r, 100.0), (true, RequestState::Retry1));

        r.configured_attempts = Some(3);
        r.max_attempts = 3;
        assert_eq!(state_at(&r, 100.0), (true, RequestState::Retry2));

        // Retry color wins over an assignment.
        r.assign_time = Some(100.0);
        assert_eq!(state_at(&r, 100.0), (true, RequestState::Retry2));
    }

    #[test]
    fn test_observed_mode_counts_live_attempts() {
        let options = ReplayOptions {
            attempts_done: AttemptsDoneMode::Observed,
            ..ReplayOptions::default()
        };
        let mut r = request(100.0);
        r.attempt_history = vec![
            attempt(100.0, None, AttemptResult::Rejected),
            attempt(160.0, None, AttemptResult::Rejected),
            attempt(220.0, None, AttemptResult::Timeout),
        ];

        assert_eq!(classify(&r, 120.0, &options).state, RequestState::Pool);
        assert_eq!(classify(&r, 160.0, &options).state, RequestState::Retry1);
        let failed = classify(&r, 221.0, &options);
        assert_eq!(failed.state, RequestState::Failed);
        assert!((failed.fade_alpha - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fade_alpha_edges() {
        assert_eq!(fade_alpha(10.0, 10.0, 2.0), 1.0);
        assert_eq!(fade_alpha(12.0, 10.0, 2.0), 0.0);
        assert_eq!(fade_alpha(50.0, 10.0, 2.0), 0.0);
        assert_eq!(fade_alpha(5.0, 10.0, 2.0), 1.0);
        assert_eq!(fade_alpha(10.0, 10.0, 0.0), 0.0);
        assert_eq!(fade_alpha(9.0, 10.0, 0.0), 1.0);
    }

    #[test]
    fn test_state_labels_match_serde() {
        for state in [RequestState::Pool, RequestState::Retry1, RequestState::Onboard] {
            let json = serde_json::to_string(&state).expect("state serializes");
            assert_eq!(json, format!("\"{}\"", state.label()));
        }
    }
}
