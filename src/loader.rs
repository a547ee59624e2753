//! Reading scenario payloads from disk.
//!
//! Scenarios are stored as a `trip_<label>.json` / `pax_icon_<label>.json`
//! pair in one directory. Only file access can fail; payload shape problems
//! are absorbed by the normalizer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::model::Dataset;
use crate::normalize::normalize_dataset;
use crate::options::ReplayOptions;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse a JSON file.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    read_as(path)
}

/// Read replay options from a JSON file; missing keys keep their defaults.
pub fn load_options(path: &Path) -> Result<ReplayOptions, LoadError> {
    read_as(path)
}

fn read_as<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFiles {
    pub trips: PathBuf,
    pub passengers: PathBuf,
}

impl ScenarioFiles {
    pub fn for_label(dir: impl AsRef<Path>, label: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            trips: dir.join(format!("trip_{}.json", label)),
            passengers: dir.join(format!("pax_icon_{}.json", label)),
        }
    }

    /// Load and normalize both files.
    pub fn load(&self, options: &ReplayOptions) -> Result<Dataset, LoadError> {
        let trips = load_json(&self.trips)?;
        let passengers = load_json(&self.passengers)?;
        let dataset = normalize_dataset(&passengers, &trips, options);

        tracing::info!(
            requests = dataset.requests.len(),
            trips = dataset.trips.len(),
            passengers = %self.passengers.display(),
            "loaded scenario"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_file_names() {
        let files = ScenarioFiles::for_label("data/out", "40");
        assert_eq!(files.trips, Path::new("data/out/trip_40.json"));
        assert_eq!(files.passengers, Path::new("data/out/pax_icon_40.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_json(Path::new("/nonexistent/drt-replay/trip_x.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("trip_x.json"));
    }
}
