use serde::de::DeserializeOwned;
use thiserror::Error;

/// A typed decoding failure, located by its JSON path (`.` for the root).
#[derive(Debug, Error)]
#[error("at path {path} → {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

fn located<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> PathError {
    PathError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    }
}

/// Deserialize JSON text with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(located)
}

/// Deserialize a single YAML document with JSON-path context in error messages.
pub fn from_yaml_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = serde_yaml::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(located)
}
