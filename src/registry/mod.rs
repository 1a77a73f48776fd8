//! Disease model registry
//!
//! This module owns the per-disease inference artifacts. Each supported
//! disease is served by a [`ModelAsset`]: a fitted transformer, a fitted
//! classifier and the ordered list of columns the transformer was fit on.
//!
//! Supported diseases:
//! - `stroke`
//! - `heart_failure`
//! - `hypertension`
//! - `heart_attack`
//! - `cad` (coronary artery disease)
//!
//! A [`ModelRegistry`] is built once, is immutable afterwards and loads
//! atomically: if any one disease's artifacts are missing or malformed, no
//! registry is produced.

pub mod factory;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::model::{Classifier, Transformer};
use crate::utils::logging::{log_load_failure, log_load_success, log_operation_start};

/// A disease with its own trained model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    Stroke,
    HeartFailure,
    Hypertension,
    HeartAttack,
    Cad,
}

impl Disease {
    /// Every supported disease, in load order
    pub const ALL: [Disease; 5] = [
        Disease::Stroke,
        Disease::HeartFailure,
        Disease::Hypertension,
        Disease::HeartAttack,
        Disease::Cad,
    ];

    /// Wire name, also used for the artifact directory
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Disease::Stroke => "stroke",
            Disease::HeartFailure => "heart_failure",
            Disease::Hypertension => "hypertension",
            Disease::HeartAttack => "heart_attack",
            Disease::Cad => "cad",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Disease {
    type Err = RiskError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "stroke" => Ok(Disease::Stroke),
            "heart_failure" => Ok(Disease::HeartFailure),
            "hypertension" => Ok(Disease::Hypertension),
            "heart_attack" => Ok(Disease::HeartAttack),
            "cad" => Ok(Disease::Cad),
            _ => Err(RiskError::UnknownDisease(name.to_string())),
        }
    }
}

/// The immutable inference artifacts for one disease
#[derive(Clone)]
pub struct ModelAsset {
    disease: Disease,
    classifier: Arc<dyn Classifier>,
    transformer: Arc<dyn Transformer>,
    columns: Vec<String>,
}

impl fmt::Debug for ModelAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelAsset")
            .field("disease", &self.disease)
            .field("columns", &self.columns)
            .field("column_groups", &self.transformer.column_groups())
            .finish_non_exhaustive()
    }
}

impl ModelAsset {
    /// Assemble an asset from fitted artifacts
    ///
    /// The column list must be non-empty and free of duplicates, and every
    /// column the transformer groups must appear in it.
    pub fn new(
        disease: Disease,
        classifier: Arc<dyn Classifier>,
        transformer: Arc<dyn Transformer>,
        columns: Vec<String>,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(RiskError::malformed(disease.as_str(), "column list is empty"));
        }
        if let Some(duplicate) = columns.iter().duplicates().next() {
            return Err(RiskError::malformed(
                disease.as_str(),
                format!("column '{duplicate}' is listed twice"),
            ));
        }
        if let Some(groups) = transformer.column_groups() {
            if let Some(unknown) = groups
                .all_columns()
                .find(|column| !columns.iter().any(|c| c == column))
            {
                return Err(RiskError::malformed(
                    disease.as_str(),
                    format!("transformer expects column '{unknown}' missing from the column list"),
                ));
            }
        }

        Ok(Self {
            disease,
            classifier,
            transformer,
            columns,
        })
    }

    /// The same asset served by a different classifier
    #[must_use]
    pub fn with_classifier(&self, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn disease(&self) -> Disease {
        self.disease
    }

    /// Expected columns, in the order the transformer was fit on
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn transformer(&self) -> &dyn Transformer {
        self.transformer.as_ref()
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

/// Loaded assets for a fixed set of diseases
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    assets: Vec<ModelAsset>,
}

impl ModelRegistry {
    /// Load every disease's artifacts from `base_path`
    ///
    /// Stops at the first disease that fails; the error names it.
    pub fn load(base_path: &Path, diseases: &[Disease]) -> Result<Self> {
        log_operation_start("Loading disease models from", base_path);

        let mut assets = Vec::with_capacity(diseases.len());
        for disease in diseases.iter().copied().unique() {
            match factory::load_asset(base_path, disease) {
                Ok(asset) => {
                    log_load_success(disease.as_str(), asset.columns().len());
                    assets.push(asset);
                }
                Err(err) => {
                    log_load_failure(disease.as_str(), &err);
                    return Err(err);
                }
            }
        }

        log::info!("Loaded {} disease models", assets.len());
        Ok(Self { assets })
    }

    /// Build a registry from assets assembled elsewhere
    ///
    /// Later assets for an already present disease are ignored.
    #[must_use]
    pub fn from_assets(assets: impl IntoIterator<Item = ModelAsset>) -> Self {
        Self {
            assets: assets.into_iter().unique_by(ModelAsset::disease).collect(),
        }
    }

    /// Asset for a disease
    #[must_use]
    pub fn get(&self, disease: Disease) -> Option<&ModelAsset> {
        self.assets.iter().find(|asset| asset.disease == disease)
    }

    /// Assets in load order
    pub fn iter(&self) -> impl Iterator<Item = &ModelAsset> {
        self.assets.iter()
    }

    /// Loaded diseases, in load order
    pub fn diseases(&self) -> impl Iterator<Item = Disease> + '_ {
        self.assets.iter().map(ModelAsset::disease)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
