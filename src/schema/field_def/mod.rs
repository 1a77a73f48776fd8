//! Canonical field definitions
//!
//! This module provides the building blocks of the canonical schema: field
//! type classes, coercion rules, scalar values and the declaration macro.

pub mod field;
mod macros;

pub use field::{Coercion, FieldDefinition, FieldType, FieldValue};
