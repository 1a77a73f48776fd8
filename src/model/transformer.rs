//! Fitted preprocessing pipelines
//!
//! Two artifact shapes are supported:
//!
//! - a column transformer: an ordered list of named steps, each applied to
//!   its own columns (standard scaling, one-hot encoding or passthrough),
//!   with the outputs concatenated in step order;
//! - a bare standard scaler applied positionally to every input column.
//!
//! Only the column transformer records column groups.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::model::{ColumnGroups, Transformer};

/// Serialized form of a fitted preprocessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreprocessorSpec {
    /// Named steps applied to disjoint column sets
    ColumnTransformer { transformers: Vec<TransformerEntry> },
    /// Positional scaling of every column
    StandardScaler(StandardScaler),
}

/// One step of a column transformer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerEntry {
    pub name: String,
    pub columns: Vec<String>,
    pub step: Step,
}

/// Fitted transformation applied by a column transformer entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    StandardScaler(StandardScaler),
    OneHot(OneHotEncoder),
    Passthrough,
}

/// Per-column `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn validate(&self, expected: usize) -> std::result::Result<(), String> {
        if self.mean.len() != expected || self.scale.len() != expected {
            return Err(format!(
                "standard scaler fitted on {}/{} values for {expected} columns",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("standard scaler mean is not finite".to_string());
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("standard scaler scale must be finite and non-zero".to_string());
        }
        Ok(())
    }

    fn apply(&self, index: usize, value: f64) -> f64 {
        (value - self.mean[index]) / self.scale[index]
    }
}

/// One indicator per known category; unknown categories encode as all zeros
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub drop_first: bool,
}

impl OneHotEncoder {
    fn validate(&self, expected: usize) -> std::result::Result<(), String> {
        if self.categories.len() != expected {
            return Err(format!(
                "one-hot encoder fitted on {} columns, step declares {expected}",
                self.categories.len()
            ));
        }
        if self.categories.iter().any(Vec::is_empty) {
            return Err("one-hot encoder has a column without categories".to_string());
        }
        Ok(())
    }

    fn width(&self, index: usize) -> usize {
        self.categories[index].len() - usize::from(self.drop_first)
    }

    fn encode(&self, index: usize, label: &str, out: &mut Vec<f64>) {
        let skip = usize::from(self.drop_first);
        out.extend(
            self.categories[index]
                .iter()
                .skip(skip)
                .map(|category| if category == label { 1.0 } else { 0.0 }),
        );
    }
}

impl Step {
    fn output_width(&self, columns: usize) -> usize {
        match self {
            Self::OneHot(encoder) => (0..columns).map(|i| encoder.width(i)).sum(),
            Self::StandardScaler(_) | Self::Passthrough => columns,
        }
    }
}

/// A validated preprocessor ready for inference
#[derive(Debug, Clone)]
pub struct FittedPreprocessor {
    spec: PreprocessorSpec,
    groups: Option<ColumnGroups>,
    output_width: usize,
}

impl FittedPreprocessor {
    /// Validate a deserialized preprocessor
    ///
    /// Returns a description of the first inconsistency found.
    pub fn new(spec: PreprocessorSpec) -> std::result::Result<Self, String> {
        let (groups, output_width) = match &spec {
            PreprocessorSpec::ColumnTransformer { transformers } => {
                if transformers.is_empty() {
                    return Err("column transformer has no steps".to_string());
                }
                let mut width = 0;
                for entry in transformers {
                    let checked = match &entry.step {
                        Step::StandardScaler(scaler) => scaler.validate(entry.columns.len()),
                        Step::OneHot(encoder) => encoder.validate(entry.columns.len()),
                        Step::Passthrough => Ok(()),
                    };
                    checked.map_err(|reason| format!("step '{}': {reason}", entry.name))?;
                    width += entry.step.output_width(entry.columns.len());
                }
                let columns = transformers.iter().flat_map(|entry| &entry.columns);
                if let Some(duplicate) = columns.duplicates().next() {
                    return Err(format!("column '{duplicate}' is claimed by two steps"));
                }
                (Some(derive_groups(transformers)), width)
            }
            PreprocessorSpec::StandardScaler(scaler) => {
                if scaler.mean.is_empty() {
                    return Err("standard scaler has no columns".to_string());
                }
                scaler.validate(scaler.mean.len())?;
                (None, scaler.mean.len())
            }
        };

        Ok(Self {
            spec,
            groups,
            output_width,
        })
    }

    /// Number of values produced per row
    #[must_use]
    pub fn output_width(&self) -> usize {
        self.output_width
    }

    /// Number of input columns consumed positionally, for bare scalers
    #[must_use]
    pub fn positional_width(&self) -> Option<usize> {
        match &self.spec {
            PreprocessorSpec::StandardScaler(scaler) => Some(scaler.mean.len()),
            PreprocessorSpec::ColumnTransformer { .. } => None,
        }
    }

    /// Columns referenced by name, in step order
    pub fn referenced_columns(&self) -> impl Iterator<Item = &str> {
        let transformers = match &self.spec {
            PreprocessorSpec::ColumnTransformer { transformers } => transformers.as_slice(),
            PreprocessorSpec::StandardScaler(_) => &[],
        };
        transformers
            .iter()
            .flat_map(|entry| entry.columns.iter().map(String::as_str))
    }
}

/// Group columns by step name, falling back to the step's own kind
fn derive_groups(transformers: &[TransformerEntry]) -> ColumnGroups {
    let mut groups = ColumnGroups::default();
    for entry in transformers {
        let target = match (entry.name.as_str(), &entry.step) {
            ("num", _) => &mut groups.numeric,
            ("cat", _) => &mut groups.categorical,
            ("pass" | "passthrough" | "remainder", _) => &mut groups.passthrough,
            (_, Step::StandardScaler(_)) => &mut groups.numeric,
            (_, Step::OneHot(_)) => &mut groups.categorical,
            (_, Step::Passthrough) => &mut groups.passthrough,
        };
        target.extend(entry.columns.iter().cloned());
    }
    groups
}

fn lookup<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| RiskError::transform(format!("Missing column '{name}'")))
}

fn numeric_values(name: &str, array: &ArrayRef) -> Result<Vec<f64>> {
    let array = cast(array, &DataType::Float64)?;
    let values = array.as_primitive::<Float64Type>();
    if values.null_count() > 0 {
        return Err(RiskError::transform(format!(
            "Column '{name}' holds non-numeric values"
        )));
    }
    Ok(values.values().to_vec())
}

fn string_values(name: &str, array: &ArrayRef) -> Result<Vec<String>> {
    let array = cast(array, &DataType::Utf8)?;
    array
        .as_string::<i32>()
        .iter()
        .map(|value| {
            value
                .map(str::to_string)
                .ok_or_else(|| RiskError::transform(format!("Column '{name}' holds null values")))
        })
        .collect()
}

impl Transformer for FittedPreprocessor {
    fn transform(&self, batch: &RecordBatch) -> Result<Vec<Vec<f64>>> {
        let mut rows = vec![Vec::with_capacity(self.output_width); batch.num_rows()];

        match &self.spec {
            PreprocessorSpec::ColumnTransformer { transformers } => {
                for entry in transformers {
                    for (index, name) in entry.columns.iter().enumerate() {
                        let column = lookup(batch, name)?;
                        match &entry.step {
                            Step::StandardScaler(scaler) => {
                                let values = numeric_values(name, column)?;
                                for (row, value) in rows.iter_mut().zip(values) {
                                    row.push(scaler.apply(index, value));
                                }
                            }
                            Step::OneHot(encoder) => {
                                let labels = string_values(name, column)?;
                                for (row, label) in rows.iter_mut().zip(&labels) {
                                    encoder.encode(index, label, row);
                                }
                            }
                            Step::Passthrough => {
                                let values = numeric_values(name, column)?;
                                for (row, value) in rows.iter_mut().zip(values) {
                                    row.push(value);
                                }
                            }
                        }
                    }
                }
            }
            PreprocessorSpec::StandardScaler(scaler) => {
                if batch.num_columns() != scaler.mean.len() {
                    return Err(RiskError::ShapeMismatch {
                        expected: scaler.mean.len(),
                        actual: batch.num_columns(),
                    });
                }
                for (index, (field, column)) in
                    batch.schema_ref().fields().iter().zip(batch.columns()).enumerate()
                {
                    let values = numeric_values(field.name(), column)?;
                    for (row, value) in rows.iter_mut().zip(values) {
                        row.push(scaler.apply(index, value));
                    }
                }
            }
        }

        Ok(rows)
    }

    fn column_groups(&self) -> Option<&ColumnGroups> {
        self.groups.as_ref()
    }
}
