//! Fitted inference artifacts.
//!
//! The predictor treats trained artifacts as opaque capabilities: a
//! [`Transformer`] turning an aligned feature batch into a numeric matrix and
//! a [`Classifier`] turning that matrix into probabilities. The concrete
//! implementations here deserialize the artifacts produced by the training
//! pipelines; tests and alternative runtimes can plug in their own.

pub mod network;
pub mod transformer;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::Result;

pub use network::{Activation, DenseNetwork, Layer, NetworkSpec};
pub use transformer::{
    FittedPreprocessor, OneHotEncoder, PreprocessorSpec, StandardScaler, Step, TransformerEntry,
};

/// Column groups recorded by a fitted transformer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnGroups {
    /// Columns scaled as numbers
    pub numeric: FxHashSet<String>,
    /// Columns encoded as categories
    pub categorical: FxHashSet<String>,
    /// Columns passed through unchanged (numeric)
    pub passthrough: FxHashSet<String>,
}

impl ColumnGroups {
    /// Whether `column` is declared categorical
    #[must_use]
    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.contains(column)
    }

    /// Every column named by any group
    pub fn all_columns(&self) -> impl Iterator<Item = &str> {
        self.numeric
            .iter()
            .chain(&self.categorical)
            .chain(&self.passthrough)
            .map(String::as_str)
    }
}

/// A fitted preprocessing step
///
/// Implementations must be safe to call concurrently from several requests.
pub trait Transformer: Send + Sync {
    /// Transform a batch of aligned rows into a numeric matrix (one row out
    /// per row in)
    fn transform(&self, batch: &RecordBatch) -> Result<Vec<Vec<f64>>>;

    /// Numeric/categorical grouping, when the transformer records one
    fn column_groups(&self) -> Option<&ColumnGroups> {
        None
    }
}

/// A fitted binary classifier
///
/// Implementations must be safe to call concurrently from several requests.
pub trait Classifier: Send + Sync {
    /// Positive-class probability for every row of `features`
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;
}
