//! Prediction results and risk bucketing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::Disease;

/// Scores strictly above this are high risk
pub const HIGH_RISK_THRESHOLD: f64 = 70.0;

/// Scores strictly above this (and not high) are moderate risk
pub const MODERATE_RISK_THRESHOLD: f64 = 50.0;

/// Fixed risk bucket derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Bucket a score in `[0, 100]`
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score > MODERATE_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Clamp a probability to `[0, 1]`, scale to a percentage and round to two
/// decimals
#[must_use]
pub fn probability_to_score(probability: f64) -> f64 {
    (probability.clamp(0.0, 1.0) * 10_000.0).round() / 100.0
}

/// Result for one disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiseaseOutcome {
    Scored { score: f64, risk: RiskLevel },
    Failed { error: String },
}

impl DiseaseOutcome {
    /// Outcome for a score, with its risk bucket
    #[must_use]
    pub fn scored(score: f64) -> Self {
        DiseaseOutcome::Scored {
            score,
            risk: RiskLevel::from_score(score),
        }
    }

    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self {
            DiseaseOutcome::Scored { score, .. } => Some(*score),
            DiseaseOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn risk(&self) -> Option<RiskLevel> {
        match self {
            DiseaseOutcome::Scored { risk, .. } => Some(*risk),
            DiseaseOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            DiseaseOutcome::Failed { error } => Some(error),
            DiseaseOutcome::Scored { .. } => None,
        }
    }
}

/// Aggregated answer to one prediction request
///
/// Serializes as `{"predictions": {...}}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionReport {
    /// One outcome per loaded disease
    Predictions {
        predictions: BTreeMap<Disease, DiseaseOutcome>,
    },
    /// The registry failed to load; nothing was attempted
    Unavailable { error: String },
    /// The payload was not a JSON object
    InvalidRequest { error: String },
}

impl PredictionReport {
    /// Per-disease outcomes, unless the request failed as a whole
    #[must_use]
    pub fn predictions(&self) -> Option<&BTreeMap<Disease, DiseaseOutcome>> {
        match self {
            PredictionReport::Predictions { predictions } => Some(predictions),
            _ => None,
        }
    }

    /// Outcome for one disease
    #[must_use]
    pub fn get(&self, disease: Disease) -> Option<&DiseaseOutcome> {
        self.predictions()?.get(&disease)
    }

    /// Top-level error, if the request failed as a whole
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            PredictionReport::Unavailable { error }
            | PredictionReport::InvalidRequest { error } => Some(error),
            PredictionReport::Predictions { .. } => None,
        }
    }

    /// Render the report in its wire shape
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
