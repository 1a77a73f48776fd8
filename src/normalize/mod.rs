//! Field normalization
//!
//! Turns a loosely specified patient record into the canonical record a
//! disease's pipeline expects. Rules run in a fixed precedence:
//!
//! 1. overlay onto the master defaults (unknown keys dropped)
//! 2. the disease's rename table (an alias never clobbers a supplied value)
//! 3. sex/gender unification and binary encoding
//! 4. yes/no encoding of flag fields
//! 5. the disease's extra rules (additional flags, dropped fields)
//!
//! Normalization is total: malformed values degrade to defaults.

pub mod record;

use serde_json::{Map, Value};

use crate::registry::Disease;
use crate::schema::adapt::{coerce, coerce_yes_no};
use crate::schema::{Coercion, DiseaseProfile, FieldValue, SEX_FIELDS, master_schema, profile};

pub use record::CanonicalRecord;

/// Normalize a raw request for one disease
#[must_use]
pub fn normalize(raw: &Map<String, Value>, disease: Disease) -> CanonicalRecord {
    normalize_merged(&CanonicalRecord::overlay(raw), disease)
}

/// Apply a disease's rules to a record already overlaid onto the defaults
#[must_use]
pub fn normalize_merged(merged: &CanonicalRecord, disease: Disease) -> CanonicalRecord {
    let rules = profile(disease);
    let mut record = merged.clone();

    apply_renames(&mut record, rules, disease);
    unify_sex_fields(&mut record);
    apply_schema_coercions(&mut record);
    apply_profile_rules(&mut record, rules);

    record
}

/// Move aliases onto their canonical targets and discard leftover aliases
fn apply_renames(record: &mut CanonicalRecord, rules: &DiseaseProfile, disease: Disease) {
    for (alias, target) in rules.renames {
        let Some(value) = record.remove(alias) else {
            continue;
        };
        if record.is_supplied(target) {
            log::debug!("[{disease}] Keeping supplied '{target}' over alias '{alias}'");
        } else {
            record.supply(target, value);
        }
    }

    // Aliases belonging to other diseases' tables
    let schema = master_schema();
    record.retain(|name| schema.contains(name));
}

/// Copy the first supplied sex field onto the unsupplied ones
fn unify_sex_fields(record: &mut CanonicalRecord) {
    let Some(source) = SEX_FIELDS
        .iter()
        .find(|field| record.is_supplied(field))
        .and_then(|field| record.get(field).cloned())
    else {
        return;
    };

    for field in SEX_FIELDS {
        if !record.is_supplied(field) {
            record.supply(field, source.clone());
        }
    }
}

/// Re-encode every field whose schema declares a coercion
fn apply_schema_coercions(record: &mut CanonicalRecord) {
    for field in master_schema().fields() {
        if field.coercion == Coercion::None {
            continue;
        }
        if let Some(value) = record.get(&field.name) {
            let coerced = coerce(value, field.coercion);
            record.replace(&field.name, coerced);
        }
    }
}

/// Disease-specific flags and dropped fields
fn apply_profile_rules(record: &mut CanonicalRecord, rules: &DiseaseProfile) {
    for field in rules.yes_no_fields {
        if let Some(value) = record.get(field) {
            let coerced = FieldValue::Number(coerce_yes_no(value));
            record.replace(field, coerced);
        }
    }
    for field in rules.dropped_fields {
        record.remove(field);
    }
}
