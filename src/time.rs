//! Scalar simulation-time parsing and formatting.
//!
//! Times are seconds since an arbitrary simulation epoch. An unset time is
//! `None`, never `0.0`.

use serde_json::Value;

/// Parse a JSON scalar into simulation seconds.
///
/// Accepts numbers, numeric strings, and `HH:MM` / `HH:MM:SS` clock strings
/// (seconds since midnight). Everything else is unset.
pub fn parse_time(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_time_str(s)?,
        _ => return None,
    };
    seconds.is_finite().then_some(seconds)
}

fn parse_time_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(seconds) = s.parse::<f64>() {
        return Some(seconds);
    }
    parse_clock(s)
}

fn parse_clock(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let hours: u32 = parts[0].trim().parse().ok()?;
    let minutes: u32 = parts[1].trim().parse().ok()?;
    let seconds: f64 = match parts.get(2) {
        Some(sec) => sec.trim().parse().ok()?,
        None => 0.0,
    };
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    Some(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
}

/// Render simulation seconds as `HH:MM:SS` for the time-slider label.
pub fn format_hms(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--:--".to_string();
    }
    let total = seconds.floor() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
