//! Inference dispatch
//!
//! [`RiskPredictor`] runs every loaded disease through
//! normalize → align → transform → predict → bucket. Each disease runs in
//! isolation: a failure becomes an error entry for that disease and the
//! others still produce scores, including when a model panics. The registry is loaded once and shared
//! read-only; "not loaded" is an explicit [`RegistryState`].

pub mod report;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use serde_json::{Map, Value};

use crate::align::align_with_report;
use crate::config::PredictorConfig;
use crate::normalize::{CanonicalRecord, normalize_merged};
use crate::registry::{ModelAsset, ModelRegistry};

pub use report::{
    DiseaseOutcome, HIGH_RISK_THRESHOLD, MODERATE_RISK_THRESHOLD, PredictionReport, RiskLevel,
    probability_to_score,
};

/// Error returned for every request while the registry is unavailable
pub const MODELS_NOT_LOADED: &str =
    "Models not loaded. Ensure the model artifact directory exists and is correct.";

/// Error returned when the payload is not a JSON object
pub const INVALID_REQUEST: &str = "Invalid input format (expected JSON object)";

/// Whether the model registry could be loaded
#[derive(Debug, Clone)]
pub enum RegistryState {
    Loaded(Arc<ModelRegistry>),
    /// Loading failed; holds the reason
    Unavailable(String),
}

/// Multi-disease risk predictor
#[derive(Debug, Clone)]
pub struct RiskPredictor {
    state: RegistryState,
    log_alignment: bool,
}

impl RiskPredictor {
    /// Load the registry described by `config`
    ///
    /// Never fails: a load error leaves the predictor unavailable, and every
    /// request then gets a single top-level error.
    #[must_use]
    pub fn new(config: &PredictorConfig) -> Self {
        let state = match ModelRegistry::load(&config.artifact_dir, &config.diseases) {
            Ok(registry) => RegistryState::Loaded(Arc::new(registry)),
            Err(err) => {
                log::error!("Model registry unavailable: {err}");
                RegistryState::Unavailable(err.to_string())
            }
        };

        Self {
            state,
            log_alignment: config.log_alignment,
        }
    }

    /// Predictor over a registry built elsewhere
    #[must_use]
    pub fn with_registry(registry: Arc<ModelRegistry>) -> Self {
        Self {
            state: RegistryState::Loaded(registry),
            log_alignment: PredictorConfig::default().log_alignment,
        }
    }

    /// Enable or disable per-disease alignment logging
    #[must_use]
    pub fn log_alignment(mut self, enabled: bool) -> Self {
        self.log_alignment = enabled;
        self
    }

    #[must_use]
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self.state, RegistryState::Loaded(_))
    }

    /// The loaded registry, if any
    #[must_use]
    pub fn registry(&self) -> Option<&ModelRegistry> {
        match &self.state {
            RegistryState::Loaded(registry) => Some(registry),
            RegistryState::Unavailable(_) => None,
        }
    }

    /// Score a request for every loaded disease
    ///
    /// Availability is checked first, then the payload shape.
    #[must_use]
    pub fn predict_all(&self, payload: &Value) -> PredictionReport {
        let RegistryState::Loaded(registry) = &self.state else {
            return PredictionReport::Unavailable {
                error: MODELS_NOT_LOADED.to_string(),
            };
        };
        let Some(raw) = payload.as_object() else {
            log::warn!("Rejected request: payload is not a JSON object");
            return PredictionReport::InvalidRequest {
                error: INVALID_REQUEST.to_string(),
            };
        };

        self.predict_record(registry, raw)
    }

    fn predict_record(
        &self,
        registry: &ModelRegistry,
        raw: &Map<String, Value>,
    ) -> PredictionReport {
        let merged = CanonicalRecord::overlay(raw);
        log::debug!(
            "Merged input: {} fields, {} supplied by the caller",
            merged.len(),
            merged.names().filter(|name| merged.is_supplied(name)).count()
        );

        let predictions = registry
            .iter()
            .map(|asset| {
                let scored = panic::catch_unwind(AssertUnwindSafe(|| self.score(&merged, asset)))
                    .unwrap_or_else(|payload| {
                        Err(anyhow!(
                            "Model for {} panicked: {}",
                            asset.disease(),
                            panic_message(payload.as_ref())
                        ))
                    });
                let outcome = match scored {
                    Ok(score) => DiseaseOutcome::scored(score),
                    Err(err) => {
                        log::error!("Prediction failed for {}: {err:#}", asset.disease());
                        DiseaseOutcome::Failed {
                            error: format!("{err:#}"),
                        }
                    }
                };
                (asset.disease(), outcome)
            })
            .collect();

        PredictionReport::Predictions { predictions }
    }

    /// Run one disease's pipeline
    fn score(&self, merged: &CanonicalRecord, asset: &ModelAsset) -> anyhow::Result<f64> {
        let disease = asset.disease();
        let record = normalize_merged(merged, disease);

        let (vector, report) = align_with_report(&record, asset);
        if self.log_alignment {
            report.log();
        }

        let batch = vector
            .to_record_batch()
            .with_context(|| format!("Failed to align features for {disease}"))?;
        let features = asset
            .transformer()
            .transform(&batch)
            .with_context(|| format!("Failed to transform features for {disease}"))?;
        let probabilities = asset
            .classifier()
            .predict(&features)
            .with_context(|| format!("Failed to predict {disease}"))?;

        let probability = probabilities
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Model for {disease} returned no output"))?;
        log::debug!("[{disease}] Raw model output: {probability}");
        if probability.is_nan() {
            bail!("Model for {disease} returned NaN");
        }

        Ok(probability_to_score(probability))
    }
}

/// Text of a caught panic payload
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
