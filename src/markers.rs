//! Renderable request markers.

use serde::Serialize;

use crate::classify::{Classification, RequestState, classify};
use crate::model::PassengerRequest;
use crate::options::ReplayOptions;

/// One point for the request layer of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    /// `(longitude, latitude)`.
    pub position: (f64, f64),
    pub state: RequestState,
    pub fade_alpha: f64,
}

/// Markers for every visible request with a finite position, in dataset order.
pub fn project_markers(requests: &[PassengerRequest], t: f64, options: &ReplayOptions) -> Vec<Marker> {
    requests
        .iter()
        .filter_map(|request| marker_for(request, &classify(request, t, options)))
        .collect()
}

pub fn marker_for(request: &PassengerRequest, classification: &Classification) -> Option<Marker> {
    if !classification.visible {
        return None;
    }
    let position = classification
        .position
        .filter(|(lon, lat)| lon.is_finite() && lat.is_finite())?;

    Some(Marker {
        id: request.id.clone(),
        position,
        state: classification.state,
        fade_alpha: classification.fade_alpha,
    })
}
