//! Error handling for the risk predictor.

pub mod util;

use std::fmt;
use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;

/// The kind of artifact a loading error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Per-disease artifact directory
    Directory,
    /// Serialized classifier
    Model,
    /// Serialized fitted transformer
    Preprocessor,
    /// JSON list of expected column names
    Columns,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "Model directory"),
            Self::Model => write!(f, "Model file"),
            Self::Preprocessor => write!(f, "Preprocessor file"),
            Self::Columns => write!(f, "Columns file"),
        }
    }
}

/// Specialized error type for artifact loading and inference
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// A required artifact is not on disk
    #[error("{kind} not found: {}", path.display())]
    MissingArtifact { kind: ArtifactKind, path: PathBuf },

    /// Error opening or reading a file
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An artifact exists but could not be deserialized
    #[error("Failed to parse {kind} {}: {source}", path.display())]
    Deserialize {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An artifact deserialized but is internally inconsistent
    #[error("Malformed artifacts for {disease}: {reason}")]
    MalformedArtifact { disease: String, reason: String },

    /// Disease name outside the supported set
    #[error("Unknown disease: {0}")]
    UnknownDisease(String),

    /// Arrow error while building or reading a feature batch
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// The fitted transformer rejected its input
    #[error("Transform error: {0}")]
    Transform(String),

    /// Feature width does not match what a fitted artifact was built for
    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The classifier failed or produced an unusable output
    #[error("Inference error: {0}")]
    Inference(String),
}

impl RiskError {
    /// Create a malformed-artifact error for a disease
    pub fn malformed(disease: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            disease: disease.into(),
            reason: reason.into(),
        }
    }

    /// Create a transform error
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }
}

/// Result type for risk predictor operations
pub type Result<T> = std::result::Result<T, RiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_message() {
        let err = RiskError::MissingArtifact {
            kind: ArtifactKind::Columns,
            path: PathBuf::from("models/cad/cad_columns.json"),
        };
        assert_eq!(
            err.to_string(),
            "Columns file not found: models/cad/cad_columns.json"
        );
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = RiskError::ShapeMismatch {
            expected: 12,
            actual: 11,
        };
        assert_eq!(err.to_string(), "Shape mismatch: expected 12 features, got 11");
    }
}
