//! Utility functions for error handling
//!
//! File checks used when resolving on-disk artifacts. Each helper maps the
//! failure onto the matching [`RiskError`] variant so load failures name the
//! artifact that was missing or unreadable.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ArtifactKind, Result, RiskError};

/// Check that a directory exists
pub fn validate_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(RiskError::MissingArtifact {
            kind: ArtifactKind::Directory,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Check that a regular file exists
pub fn validate_file(path: &Path, kind: ArtifactKind) -> Result<()> {
    if !path.is_file() {
        return Err(RiskError::MissingArtifact {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Read a file to string with the path attached to any IO error
pub fn safe_read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| RiskError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a JSON artifact
///
/// # Arguments
/// * `path` - Location of the artifact
/// * `kind` - Which artifact is being read (for error context)
pub fn read_json<T: DeserializeOwned>(path: &Path, kind: ArtifactKind) -> Result<T> {
    let content = safe_read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| RiskError::Deserialize {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
