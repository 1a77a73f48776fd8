//! Canonical schema for patient records.
//!
//! The schema is the contract the rest of the crate validates against: which
//! fields exist, their type class, their defaults, how their raw values are
//! re-encoded, and how each disease's training-time names map onto them.

pub mod adapt;
pub mod canonical;
pub mod field_def;
pub mod field_mapping;

pub use canonical::{MasterSchema, master_schema};
pub use field_def::{Coercion, FieldDefinition, FieldType, FieldValue};
pub use field_mapping::{DiseaseProfile, SEX_FIELDS, is_recognized_alias, profile};
