//! Column alignment
//!
//! Produces, for one disease, a single-row feature vector holding exactly the
//! columns the disease's transformer was fit on, in the same order and with
//! the type each column's group requires. The order is the central contract
//! here: the classifier reads the transformed output by position, so a
//! transposed column yields a wrong score rather than an error.

use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::model::ColumnGroups;
use crate::normalize::CanonicalRecord;
use crate::registry::{Disease, ModelAsset};
use crate::schema::adapt::{to_categorical, to_numeric};
use crate::utils::logging::summarize_names;

/// Placeholder for a categorical column missing from the record
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Placeholder for a numeric column missing from the record
pub const MISSING_NUMERIC: f64 = 0.0;

/// How numeric and categorical columns were told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPolicy {
    /// The transformer recorded its column groups
    Recorded,
    /// No groups were recorded; every column is numeric
    NumericByDefault,
}

/// One aligned value
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Numeric(f64),
    Categorical(String),
}

impl Feature {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Feature::Numeric(n) => Some(*n),
            Feature::Categorical(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Feature::Categorical(s) => Some(s),
            Feature::Numeric(_) => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Numeric(n) => write!(f, "{n}"),
            Feature::Categorical(s) => write!(f, "{s}"),
        }
    }
}

/// A single row matching a model asset's column list
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFeatureVector {
    columns: Vec<String>,
    values: Vec<Feature>,
}

impl AlignedFeatureVector {
    /// Column names, in model order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values, in model order
    #[must_use]
    pub fn values(&self) -> &[Feature] {
        &self.values
    }

    /// Value of a column
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Feature> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Iterate over `(column, value)` pairs in model order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Feature)> {
        self.columns.iter().map(String::as_str).zip(&self.values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the row as a one-row Arrow batch
    ///
    /// Numeric columns become `Float64`, categorical ones `Utf8`, in model
    /// order.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = self
            .iter()
            .map(|(name, value)| match value {
                Feature::Numeric(n) => (
                    Field::new(name, DataType::Float64, false),
                    Arc::new(Float64Array::from(vec![*n])) as ArrayRef,
                ),
                Feature::Categorical(s) => (
                    Field::new(name, DataType::Utf8, false),
                    Arc::new(StringArray::from(vec![s.as_str()])) as ArrayRef,
                ),
            })
            .unzip();

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}

/// What alignment had to invent or discard
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentReport {
    pub disease: Disease,
    pub policy: GroupPolicy,
    /// Expected columns missing from the record, filled with placeholders
    pub synthesized: Vec<String>,
    /// Record fields the model does not use
    pub dropped: Vec<String>,
}

impl AlignmentReport {
    /// Log the report at debug level
    pub fn log(&self) {
        log::debug!(
            "[{}] Aligned with {:?}: synthesized {} column(s) [{}], dropped {} field(s) [{}]",
            self.disease,
            self.policy,
            self.synthesized.len(),
            summarize_names(&self.synthesized),
            self.dropped.len(),
            summarize_names(&self.dropped),
        );
    }
}

/// Align a normalized record to a model asset
#[must_use]
pub fn align(record: &CanonicalRecord, asset: &ModelAsset) -> AlignedFeatureVector {
    align_with_report(record, asset).0
}

/// Align a normalized record and report what was synthesized or dropped
#[must_use]
pub fn align_with_report(
    record: &CanonicalRecord,
    asset: &ModelAsset,
) -> (AlignedFeatureVector, AlignmentReport) {
    let groups = asset.transformer().column_groups();
    let policy = match groups {
        Some(_) => GroupPolicy::Recorded,
        None => GroupPolicy::NumericByDefault,
    };

    let mut synthesized = Vec::new();
    let values = asset
        .columns()
        .iter()
        .map(|column| {
            let categorical = groups.is_some_and(|g: &ColumnGroups| g.is_categorical(column));
            match (record.get(column), categorical) {
                (Some(value), true) => Feature::Categorical(to_categorical(value)),
                (Some(value), false) => Feature::Numeric(to_numeric(value)),
                (None, true) => {
                    synthesized.push(column.clone());
                    Feature::Categorical(UNKNOWN_CATEGORY.to_string())
                }
                (None, false) => {
                    synthesized.push(column.clone());
                    Feature::Numeric(MISSING_NUMERIC)
                }
            }
        })
        .collect();

    let dropped = record
        .names()
        .filter(|name| !asset.columns().iter().any(|c| c == name))
        .map(str::to_string)
        .collect();

    let vector = AlignedFeatureVector {
        columns: asset.columns().to_vec(),
        values,
    };
    let report = AlignmentReport {
        disease: asset.disease(),
        policy,
        synthesized,
        dropped,
    };
    (vector, report)
}
