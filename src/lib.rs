//! drt-replay core
//!
//! Replays a precomputed demand-responsive-transport simulation log: request
//! states and fleet metrics as pure functions of a caller-supplied query time.

pub mod traits;
pub mod time;
pub mod haversine;
pub mod model;
pub mod options;
pub mod normalize;
pub mod classify;
pub mod trajectory;
pub mod metrics;
pub mod markers;
pub mod replay;
pub mod loader;

pub use classify::{Classification, RequestState, classify};
pub use markers::{Marker, project_markers};
pub use metrics::{Metrics, aggregate, metrics_series};
pub use model::{AssignmentAttempt, AttemptResult, Dataset, PassengerRequest, VehicleTrip, Waypoint};
pub use options::{AttemptsDoneMode, ReplayOptions};
pub use replay::{Replay, VehiclePosition};
pub use trajectory::distance_traveled;
