//! Raw JSON payloads to the canonical model.
//!
//! This is the only place that knows about field aliases. Malformed input is
//! never an error: fields fall back to unset/empty. Entries that are not
//! records at all (scalars, nulls) are dropped rather than invented.

use serde_json::Value;

use crate::model::{AssignmentAttempt, AttemptResult, Dataset, PassengerRequest, VehicleTrip, Waypoint};
use crate::options::ReplayOptions;
use crate::time::parse_time;

const ID_KEYS: &[&str] = &["id", "req_id", "request_id", "pax_id"];
const POSITION_KEYS: &[&str] = &["pickup", "pickup_position", "position", "origin"];
const COORD_PAIRS: &[(&str, &str)] = &[("o_lon", "o_lat"), ("pickup_lon", "pickup_lat"), ("lon", "lat")];
const REQUEST_TIME_KEYS: &[&str] = &["t_req", "request_time", "t_request"];
const ASSIGN_TIME_KEYS: &[&str] = &["t_asg", "assign_time", "t_assign"];
const PICKUP_TIME_KEYS: &[&str] = &["t_pick", "pickup_time"];
const DROPOFF_TIME_KEYS: &[&str] = &["t_drop", "dropoff_time"];
const MAX_WAIT_KEYS: &[&str] = &["max_wait", "max_wait_sec", "max_wait_seconds"];
const HISTORY_KEYS: &[&str] = &["attempts", "attempt_history", "history"];
const VEHICLE_KEYS: &[&str] = &["vehicle_id", "veh_id", "vehicleId", "vehicle"];

const ATTEMPT_START_KEYS: &[&str] = &["t", "ts", "time", "timestamp", "start_ts"];
const ATTEMPT_END_KEYS: &[&str] = &["end_ts", "t_end", "end"];
const ATTEMPT_NUMBER_KEYS: &[&str] = &["attempt", "attempt_no", "n"];
const ATTEMPT_RESULT_KEYS: &[&str] = &["result", "status", "outcome", "type"];

const TRIP_TIME_KEYS: &[&str] = &["timestamp", "timestamps"];

/// Normalize both payloads into a dataset.
pub fn normalize_dataset(passengers: &Value, trips: &Value, options: &ReplayOptions) -> Dataset {
    Dataset::new(normalize_requests(passengers, options), normalize_trips(trips))
}

/// Normalize a passenger payload: an array of records, or an object keyed by id.
pub fn normalize_requests(raw: &Value, options: &ReplayOptions) -> Vec<PassengerRequest> {
    records(raw, "passenger", true)
        .into_iter()
        .map(|(fallback_id, record)| normalize_request(record, fallback_id, options))
        .collect()
}

pub fn normalize_request(raw: &Value, fallback_id: String, options: &ReplayOptions) -> PassengerRequest {
    let configured_attempts = field(raw, &["max_attempts"]).and_then(count);

    PassengerRequest {
        id: field(raw, ID_KEYS).and_then(id_string).unwrap_or(fallback_id),
        pickup_position: pickup_position(raw),
        request_time: time_field(raw, REQUEST_TIME_KEYS),
        assign_time: time_field(raw, ASSIGN_TIME_KEYS),
        pickup_time: time_field(raw, PICKUP_TIME_KEYS).or_else(|| indexed_time(raw, 0)),
        dropoff_time: time_field(raw, DROPOFF_TIME_KEYS).or_else(|| indexed_time(raw, 1)),
        max_wait_seconds: field(raw, MAX_WAIT_KEYS)
            .and_then(number)
            .unwrap_or(options.default_max_wait_seconds),
        max_attempts: configured_attempts.unwrap_or(options.default_max_attempts),
        configured_attempts,
        attempt_history: field(raw, HISTORY_KEYS)
            .map(normalize_attempts)
            .unwrap_or_default(),
        vehicle_id: field(raw, VEHICLE_KEYS).and_then(id_string),
    }
}

/// Parse an attempt history, dropping entries without a usable start time.
///
/// The result is sorted ascending by start; ties keep their input order.
pub fn normalize_attempts(raw: &Value) -> Vec<AssignmentAttempt> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    let mut attempts: Vec<AssignmentAttempt> = entries.iter().filter_map(normalize_attempt).collect();
    let dropped = entries.len() - attempts.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped attempts with unparseable timestamps");
    }

    attempts.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    attempts
}

fn normalize_attempt(raw: &Value) -> Option<AssignmentAttempt> {
    Some(AssignmentAttempt {
        timestamp: time_field(raw, ATTEMPT_START_KEYS)?,
        end_timestamp: time_field(raw, ATTEMPT_END_KEYS),
        attempt_number: field(raw, ATTEMPT_NUMBER_KEYS).and_then(count),
        result: field(raw, ATTEMPT_RESULT_KEYS)
            .and_then(Value::as_str)
            .map(AttemptResult::from_label)
            .unwrap_or(AttemptResult::Other),
    })
}

/// Normalize a vehicle-trip payload: an array of `{ vehicle_id, path, timestamp }`
/// records. Entries with neither a `path` nor a timestamp array are skipped.
pub fn normalize_trips(raw: &Value) -> Vec<VehicleTrip> {
    records(raw, "trip", false)
        .into_iter()
        .filter(|(_, record)| is_trip_record(record))
        .map(|(fallback_id, record)| normalize_trip(record, fallback_id))
        .collect()
}

fn is_trip_record(raw: &Value) -> bool {
    let has_array = |keys: &[&str]| field(raw, keys).is_some_and(Value::is_array);
    let keep = has_array(&["path"]) || has_array(TRIP_TIME_KEYS);
    if !keep {
        tracing::debug!("skipping trip entry without path or timestamps");
    }
    keep
}

pub fn normalize_trip(raw: &Value, fallback_id: String) -> VehicleTrip {
    let path = field(raw, &["path"]).and_then(Value::as_array);
    let times = field(raw, TRIP_TIME_KEYS).and_then(Value::as_array);

    let waypoints = match (path, times) {
        (Some(path), Some(times)) => {
            if path.len() != times.len() {
                tracing::debug!(
                    path = path.len(),
                    timestamps = times.len(),
                    "trip arrays differ in length, truncating"
                );
            }
            path.iter()
                .zip(times)
                .map(|(point, time)| Waypoint {
                    position: coordinate(point).unwrap_or((f64::NAN, f64::NAN)),
                    timestamp: parse_time(time).unwrap_or(f64::NAN),
                })
                .collect()
        }
        _ => Vec::new(),
    };

    VehicleTrip {
        vehicle_id: field(raw, VEHICLE_KEYS).and_then(id_string).unwrap_or(fallback_id),
        waypoints,
    }
}

/// Object records of a payload with a fallback id each: array position, or
/// object key when `keyed` payloads are accepted. Non-object entries are dropped.
fn records<'a>(raw: &'a Value, kind: &str, keyed: bool) -> Vec<(String, &'a Value)> {
    let entries: Vec<(String, &Value)> = match raw {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, record)| (format!("#{}", index), record))
            .collect(),
        Value::Object(map) if keyed => map.iter().map(|(key, record)| (key.clone(), record)).collect(),
        other => {
            if !other.is_null() {
                tracing::debug!(kind, "payload is not a list of records, treating as empty");
            }
            return Vec::new();
        }
    };

    let total = entries.len();
    let records: Vec<(String, &Value)> = entries.into_iter().filter(|(_, record)| record.is_object()).collect();
    if records.len() < total {
        tracing::debug!(kind, dropped = total - records.len(), "dropped entries that are not records");
    }
    records
}

/// First alias present with a non-null value.
fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = raw.as_object()?;
    keys.iter().filter_map(|key| map.get(*key)).find(|value| !value.is_null())
}

/// First alias that parses as a time.
fn time_field(raw: &Value, keys: &[&str]) -> Option<f64> {
    let map = raw.as_object()?;
    keys.iter().filter_map(|key| map.get(*key)).find_map(parse_time)
}

/// `timestamp[i]` of the `{ path, timestamp: [t_pick, t_drop] }` record shape.
fn indexed_time(raw: &Value, index: usize) -> Option<f64> {
    field(raw, &["timestamp"])?.as_array()?.get(index).and_then(parse_time)
}

fn pickup_position(raw: &Value) -> Option<(f64, f64)> {
    let map = raw.as_object()?;
    if let Some(point) = POSITION_KEYS.iter().filter_map(|key| map.get(*key)).find_map(coordinate) {
        return Some(point);
    }
    for &(lon_key, lat_key) in COORD_PAIRS {
        let lon = field(raw, &[lon_key]).and_then(number);
        let lat = field(raw, &[lat_key]).and_then(number);
        if let (Some(lon), Some(lat)) = (lon, lat) {
            return Some((lon, lat));
        }
    }
    field(raw, &["path"])?.as_array()?.first().and_then(coordinate)
}

/// `[lon, lat, ...]` with both components finite.
fn coordinate(raw: &Value) -> Option<(f64, f64)> {
    let items = raw.as_array()?;
    let lon = number(items.first()?)?;
    let lat = number(items.get(1)?)?;
    Some((lon, lat))
}

/// A finite number, from a JSON number or a numeric string.
fn number(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// A non-negative whole count.
fn count(raw: &Value) -> Option<u32> {
    let value = number(raw)?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

fn id_string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
