//! Loading and saving generation parameters as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::noise_field::GenerationParameters;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a parameter file. Missing fields fall back to [`GenerationParameters::default`].
pub fn load_parameters(path: impl AsRef<Path>) -> Result<GenerationParameters, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let params = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?params, "loaded generation parameters");
    Ok(params)
}

/// Write `params` as pretty-printed JSON.
pub fn save_parameters(path: impl AsRef<Path>, params: &GenerationParameters) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(params).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
