//! Field definition for the canonical schema
//!
//! This module defines the core field definition structures that centralize
//! every clinical field the predictor recognizes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents the type class of a canonical field after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Numeric value (vitals, labs, encoded flags)
    Numeric,
    /// Categorical value kept as a string (e.g. chest pain type)
    Categorical,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Numeric => write!(f, "Numeric"),
            FieldType::Categorical => write!(f, "Categorical"),
        }
    }
}

/// How the normalizer re-encodes a field's raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Value is kept as supplied
    #[default]
    None,
    /// Sex/gender strings to 1 (male) or 0
    Sex,
    /// Yes/no-like strings to 1 or 0
    YesNo,
}

/// A scalar value held by a canonical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl FieldValue {
    /// Convert a JSON scalar into a field value
    ///
    /// Booleans become 1/0. `null`, arrays and objects are not scalars and
    /// yield `None`, which leaves the field's default in place.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Bool(b) => Some(FieldValue::Number(if *b { 1.0 } else { 0.0 })),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Convert back into a JSON value
    ///
    /// Non-finite numbers have no JSON representation and become `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
        }
    }

    /// The numeric payload, if this is a number
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// A canonical field definition
///
/// Single source of truth for a field's name, type class, default and
/// coercion rule.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Canonical name of the field
    pub name: String,
    /// Type class after normalization
    pub field_type: FieldType,
    /// Default used when the field is absent from a request
    pub default: FieldValue,
    /// Re-encoding applied by the normalizer
    pub coercion: Coercion,
}

impl FieldDefinition {
    /// Create a new field definition
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        default: impl Into<FieldValue>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: default.into(),
            coercion: Coercion::None,
        }
    }

    /// Set the coercion rule for this field
    #[must_use]
    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    /// Whether the field is categorical after normalization
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        self.field_type == FieldType::Categorical
    }
}
