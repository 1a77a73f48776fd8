//! Configuration for `RiskPredictor`.

use std::path::PathBuf;

use crate::registry::Disease;

/// Default directory holding one sub-directory of artifacts per disease
pub const DEFAULT_ARTIFACT_DIR: &str = "models";

/// Configuration for the `RiskPredictor`
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Base path holding `<disease>/<disease>_{model,preprocessor,columns}.json`
    pub artifact_dir: PathBuf,
    /// Diseases to load, in dispatch order
    pub diseases: Vec<Disease>,
    /// Log synthesized and dropped columns for every aligned vector
    pub log_alignment: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            diseases: Disease::ALL.to_vec(),
            log_alignment: true,
        }
    }
}

impl PredictorConfig {
    /// Default configuration reading artifacts from `artifact_dir`
    #[must_use]
    pub fn with_artifact_dir(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            ..Default::default()
        }
    }
}
