//! Multi-disease cardiovascular risk prediction.
//!
//! Reconciles a partial, loosely named patient record into one correctly
//! ordered feature vector per disease model, runs the fitted artifacts and
//! buckets the resulting probabilities into risk levels.

pub mod align;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod predict;
pub mod registry;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::PredictorConfig;
pub use error::{ArtifactKind, Result, RiskError};
pub use predict::{DiseaseOutcome, PredictionReport, RegistryState, RiskLevel, RiskPredictor};
pub use registry::{Disease, ModelAsset, ModelRegistry};

// Pipeline stages
pub use align::{AlignedFeatureVector, AlignmentReport, Feature, GroupPolicy, align};
pub use normalize::{CanonicalRecord, normalize};
pub use schema::{FieldType, FieldValue, master_schema};

// Fitted artifacts
pub use model::{Classifier, ColumnGroups, DenseNetwork, FittedPreprocessor, Transformer};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Utility functions
pub use utils::init_logging;
