//! Per-disease field mapping
//!
//! Each disease model was trained on a dataset with its own column naming.
//! This module declares, per disease, the aliases that map those training-time
//! names onto canonical fields, the extra binary flags that need yes/no
//! encoding, and the fields removed before alignment.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;

use crate::registry::Disease;

/// Canonical fields that all carry the patient's sex, in precedence order
pub const SEX_FIELDS: [&str; 3] = ["Sex", "sex", "Gender"];

/// Declarative normalization rules for one disease
#[derive(Debug, Clone, Copy)]
pub struct DiseaseProfile {
    /// `(alias, canonical target)` pairs
    pub renames: &'static [(&'static str, &'static str)],
    /// Fields encoded with yes/no coercion in addition to the schema's own
    pub yes_no_fields: &'static [&'static str],
    /// Fields removed from the record before alignment
    pub dropped_fields: &'static [&'static str],
}

const STROKE: DiseaseProfile = DiseaseProfile {
    renames: &[
        ("Heart_disease", "heart_disease"),
        ("Glucose_level", "glucose_level"),
        ("Smoking_status", "smoking_status"),
        ("Work_type", "work_type"),
        ("Residence_type", "residence_type"),
    ],
    yes_no_fields: &[],
    dropped_fields: &[],
};

const HEART_FAILURE: DiseaseProfile = DiseaseProfile {
    renames: &[
        ("ChestPainType", "chest_pain_type"),
        ("Chest_pain_type", "chest_pain_type"),
        ("RestingBP", "resting_bp"),
        ("Cholesterol", "cholesterol"),
        ("FastingBS", "fasting_bs"),
        ("Fasting_bs", "fasting_bs"),
        ("RestingECG", "resting_ecg"),
        ("Resting_ecg", "resting_ecg"),
        ("MaxHR", "max_hr"),
        ("ExerciseAngina", "exercise_angina"),
        ("Oldpeak", "oldpeak"),
        ("ST_Slope", "st_slope"),
        ("St_slope", "st_slope"),
    ],
    yes_no_fields: &[],
    dropped_fields: &[],
};

const HYPERTENSION: DiseaseProfile = DiseaseProfile {
    renames: &[
        ("male", "sex"),
        ("age", "Age"),
        ("currentSmoker", "smokes"),
        ("BPMeds", "BP_Medications"),
        ("totChol", "cholesterol"),
        ("sysBP", "systolic_bp"),
        ("diaBP", "diastolic_bp"),
        ("heartRate", "heart_rate"),
        ("glucose", "glucose_level"),
    ],
    yes_no_fields: &[],
    dropped_fields: &[],
};

const HEART_ATTACK: DiseaseProfile = DiseaseProfile {
    renames: &[
        ("Heart rate", "heart_rate"),
        ("Systolic blood pressure", "systolic_bp"),
        ("Diastolic blood pressure", "diastolic_bp"),
        ("Blood sugar", "blood_sugar"),
        ("CK_MB", "CK-MB"),
        ("Troponin_level", "Troponin"),
    ],
    yes_no_fields: &[],
    dropped_fields: &["Married", "work_type", "residence_type"],
};

const CAD: DiseaseProfile = DiseaseProfile {
    renames: &[
        ("DM", "diabetes"),
        ("HTN", "hypertension"),
        ("Current Smoker", "smokes"),
        ("EX-Smoker", "formerly_smoked"),
        ("BP", "systolic_bp"),
        ("PR", "heart_rate"),
        ("Typical Chest Pain", "typical_angina"),
        ("Atypical", "atypical_angina"),
        ("Nonanginal", "non_anginal_pain"),
        ("TG", "triglycerides"),
    ],
    yes_no_fields: &[
        "Obesity",
        "CRF",
        "CVA",
        "Airway disease",
        "Thyroid Disease",
        "CHF",
        "DLP",
        "Edema",
        "Weak Peripheral Pulse",
        "Lung rales",
        "Systolic Murmur",
        "Diastolic Murmur",
        "Dyspnea",
        "typical_angina",
        "atypical_angina",
        "non_anginal_pain",
        "Exertional CP",
        "LowTH Ang",
        "Q Wave",
        "St Elevation",
        "St Depression",
        "Tinversion",
        "LVH",
        "Poor R Progression",
    ],
    dropped_fields: &[],
};

static RECOGNIZED_ALIASES: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    Disease::ALL
        .iter()
        .flat_map(|d| profile(*d).renames.iter().map(|(alias, _)| *alias))
        .collect()
});

/// Normalization rules for a disease
#[must_use]
pub fn profile(disease: Disease) -> &'static DiseaseProfile {
    match disease {
        Disease::Stroke => &STROKE,
        Disease::HeartFailure => &HEART_FAILURE,
        Disease::Hypertension => &HYPERTENSION,
        Disease::HeartAttack => &HEART_ATTACK,
        Disease::Cad => &CAD,
    }
}

/// Whether `name` is an alias in any disease's rename table
#[must_use]
pub fn is_recognized_alias(name: &str) -> bool {
    RECOGNIZED_ALIASES.contains(name)
}
