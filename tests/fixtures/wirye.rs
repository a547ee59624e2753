//! Raw passenger and trip payloads for a three-vehicle morning window.
//!
//! Timeline (seconds since midnight, 07:00 = 25200):
//! - `p1` requested 25200, assigned 25260, onboard v1 25500..26100
//! - `p2` requested 25230, rejected once, accepted 25350, onboard v1 25600..26400
//! - `p3` requested 25300, never served, expires at 25900
//! - `p4` requested 25400, onboard v2 from 25700, no dropoff recorded
//! - `p5` has an unparseable request time
//! - `p6` requested 26000 with a budget of two attempts, never served
//! - `v3` is idle and has no waypoints

use serde_json::{Value, json};

pub const T0: f64 = 25200.0;

pub fn passengers() -> Value {
    json!([
        {
            "req_id": "p1",
            "t_req": 25200,
            "t_asg": 25260,
            "veh_id": "v1",
            "path": [[127.140, 37.470], [127.150, 37.480]],
            "timestamp": [25500, 26100],
            "attempts": [{ "t": 25260, "attempt": 1, "result": "assigned" }]
        },
        {
            "req_id": "p2",
            "request_time": "25230",
            "t_pick": 25600,
            "t_drop": 26400,
            "veh_id": "v1",
            "pickup": [127.142, 37.472],
            "attempts": [
                { "ts": 25350, "attempt": 2, "result": "ACCEPTED" },
                { "ts": 25290, "attempt": 1, "result": "reject" }
            ]
        },
        {
            "req_id": "p3",
            "t_req": 25300,
            "o_lon": 127.138,
            "o_lat": 37.468
        },
        {
            "req_id": "p4",
            "t_req": 25400,
            "t_pick": 25700,
            "vehicle_id": "v2",
            "pickup": [127.130, 37.460]
        },
        {
            "req_id": "p5",
            "t_req": "unknown",
            "pickup": [127.145, 37.475]
        },
        {
            "req_id": "p6",
            "t_req": 26000,
            "max_attempts": 2,
            "pickup": [127.148, 37.477]
        }
    ])
}

pub fn trips() -> Value {
    json!([
        {
            "vehicle_id": "v1",
            "path": [[127.140, 37.470], [127.142, 37.472], [127.150, 37.480], [127.150, 37.480]],
            "timestamp": [25200, 25500, 26100, 26400]
        },
        {
            "vehicle_id": "v2",
            "path": [[127.130, 37.460], [127.135, 37.465]],
            "timestamp": [25400, 25700]
        },
        {
            "vehicle_id": "v3",
            "path": [],
            "timestamp": []
        }
    ])
}

/// Query times from `from` to `to` inclusive, every `step` seconds.
pub fn sweep(from: f64, to: f64, step: f64) -> Vec<f64> {
    let count = ((to - from) / step).floor() as usize;
    (0..=count).map(|i| from + step * i as f64).collect()
}
