//! Replay configuration.

use serde::Deserialize;

/// How the classifier counts "attempts done" for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptsDoneMode {
    /// Attempts done is the record's own `max_attempts` field, regardless of
    /// how many attempts happened by `t`. Records without the field never
    /// reach the retry colors or the attempt-exhaustion failure rule.
    #[default]
    Configured,
    /// Attempts done is the number of history entries at or before `t`.
    Observed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplayOptions {
    /// Max wait applied to records that carry none.
    pub default_max_wait_seconds: f64,
    /// Max attempts applied to records that carry none.
    pub default_max_attempts: u32,
    /// Length of the linear fade of failed markers, in simulation seconds.
    pub fade_window_seconds: f64,
    /// Seats per vehicle, for fleet utilization.
    pub vehicle_capacity: u32,
    pub attempts_done: AttemptsDoneMode,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            default_max_wait_seconds: 600.0,
            default_max_attempts: 3,
            fade_window_seconds: 2.0,
            vehicle_capacity: 5,
            attempts_done: AttemptsDoneMode::Configured,
        }
    }
}
