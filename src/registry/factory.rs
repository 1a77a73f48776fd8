//! Factory functions for loading one disease's artifacts
//!
//! Artifacts live under a fixed directory convention:
//!
//! ```text
//! <base>/<disease>/<disease>_model.json
//! <base>/<disease>/<disease>_preprocessor.json
//! <base>/<disease>/<disease>_columns.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::util::{read_json, validate_directory, validate_file};
use crate::error::{ArtifactKind, Result, RiskError};
use crate::model::{DenseNetwork, FittedPreprocessor, NetworkSpec, PreprocessorSpec};
use crate::registry::{Disease, ModelAsset};

/// Paths of the three artifacts for one disease
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub directory: PathBuf,
    pub model: PathBuf,
    pub preprocessor: PathBuf,
    pub columns: PathBuf,
}

impl ArtifactPaths {
    /// Resolve the artifact paths for `disease` under `base_path`
    #[must_use]
    pub fn resolve(base_path: &Path, disease: Disease) -> Self {
        let name = disease.as_str();
        let directory = base_path.join(name);
        Self {
            model: directory.join(format!("{name}_model.json")),
            preprocessor: directory.join(format!("{name}_preprocessor.json")),
            columns: directory.join(format!("{name}_columns.json")),
            directory,
        }
    }

    /// Check that the directory and all three files exist
    pub fn validate(&self) -> Result<()> {
        validate_directory(&self.directory)?;
        validate_file(&self.model, ArtifactKind::Model)?;
        validate_file(&self.preprocessor, ArtifactKind::Preprocessor)?;
        validate_file(&self.columns, ArtifactKind::Columns)
    }
}

/// Load and cross-check the artifacts of one disease
pub fn load_asset(base_path: &Path, disease: Disease) -> Result<ModelAsset> {
    let paths = ArtifactPaths::resolve(base_path, disease);
    paths.validate()?;

    let network_spec: NetworkSpec = read_json(&paths.model, ArtifactKind::Model)?;
    let preprocessor_spec: PreprocessorSpec =
        read_json(&paths.preprocessor, ArtifactKind::Preprocessor)?;
    let columns: Vec<String> = read_json(&paths.columns, ArtifactKind::Columns)?;

    let network = DenseNetwork::new(network_spec)
        .map_err(|reason| RiskError::malformed(disease.as_str(), format!("model: {reason}")))?;
    let preprocessor = FittedPreprocessor::new(preprocessor_spec).map_err(|reason| {
        RiskError::malformed(disease.as_str(), format!("preprocessor: {reason}"))
    })?;

    check_widths(disease, &preprocessor, &network, &columns)?;

    ModelAsset::new(disease, Arc::new(network), Arc::new(preprocessor), columns)
}

/// Cross-artifact shape checks
fn check_widths(
    disease: Disease,
    preprocessor: &FittedPreprocessor,
    network: &DenseNetwork,
    columns: &[String],
) -> Result<()> {
    if let Some(width) = preprocessor.positional_width() {
        if width != columns.len() {
            return Err(RiskError::malformed(
                disease.as_str(),
                format!(
                    "preprocessor scales {width} columns, column list has {}",
                    columns.len()
                ),
            ));
        }
    }

    if let Some(column) = preprocessor
        .referenced_columns()
        .find(|column| !columns.iter().any(|c| c == column))
    {
        return Err(RiskError::malformed(
            disease.as_str(),
            format!("preprocessor column '{column}' missing from the column list"),
        ));
    }

    if preprocessor.output_width() != network.input_width() {
        return Err(RiskError::malformed(
            disease.as_str(),
            format!(
                "preprocessor produces {} features, model expects {}",
                preprocessor.output_width(),
                network.input_width()
            ),
        ));
    }
    Ok(())
}
