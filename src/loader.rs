//! Loading discovery output and configuration from JSON files.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::discovery::DiscoveredApi;
use crate::error::LoadError;

/// Load and deserialize a JSON file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::ReadError` if it can't be read,
/// or `LoadError::InvalidJson` if it doesn't deserialize into `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the endpoints and models reported by discovery.
///
/// Accepts either a full `{"endpoints": [...], "models": {...}}` document or a
/// bare array of endpoints.
pub fn load_discovered_api(path: &Path) -> Result<DiscoveredApi, LoadError> {
    let value: serde_json::Value = load_json(path)?;
    let parsed = if value.is_array() {
        serde_json::from_value(value).map(|endpoints| DiscoveredApi {
            endpoints,
            ..Default::default()
        })
    } else {
        serde_json::from_value(value)
    };
    parsed.map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}
