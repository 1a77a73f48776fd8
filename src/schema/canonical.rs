//! Canonical field definitions
//!
//! The master schema: every clinical field the predictor recognizes, its type
//! class after normalization and the default used when a request omits it.
//! Defaults are population-typical values so that an empty intake form still
//! produces a complete record.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::schema::{FieldDefinition, FieldValue};

static MASTER_SCHEMA: LazyLock<MasterSchema> = LazyLock::new(|| {
    MasterSchema::new(crate::canonical_fields![
        // Demographics
        "Age" => Numeric(0),
        "Sex" => Numeric("Female") as Sex,
        "sex" => Numeric("Female") as Sex,
        "Gender" => Numeric("Female") as Sex,
        "BMI" => Numeric(22.0),
        "Married" => Numeric("No") as YesNo,
        "work_type" => Categorical("Private"),
        "residence_type" => Categorical("Urban"),
        // Vitals
        "systolic_bp" => Numeric(120),
        "diastolic_bp" => Numeric(80),
        "resting_bp" => Numeric(120),
        "heart_rate" => Numeric(80),
        "max_hr" => Numeric(150),
        // Lipids and glucose
        "cholesterol" => Numeric(200),
        "LDL" => Numeric(100),
        "HDL" => Numeric(50),
        "triglycerides" => Numeric(150),
        "ldl_hdl_ratio" => Numeric(3.0),
        "glucose_level" => Numeric(90),
        "blood_sugar" => Numeric(90),
        "FBS" => Numeric(90),
        "fasting_bs" => Numeric(0) as YesNo,
        // Comorbidities and history
        "Hypertension" => Numeric(0) as YesNo,
        "hypertension" => Numeric(0) as YesNo,
        "diabetes" => Numeric(0) as YesNo,
        "heart_disease" => Numeric(0) as YesNo,
        "BP_Medications" => Numeric(0) as YesNo,
        "FH" => Numeric(0) as YesNo,
        "Family_History" => Categorical("No"),
        "smokes" => Numeric(0) as YesNo,
        "formerly_smoked" => Numeric(0) as YesNo,
        "cigsPerDay" => Numeric(0),
        "smoking_status" => Categorical("never smoked"),
        // Symptom and examination flags
        "Obesity" => Numeric("N"),
        "CRF" => Numeric("N"),
        "CVA" => Numeric("N"),
        "Airway disease" => Numeric("N"),
        "Thyroid Disease" => Numeric("N"),
        "CHF" => Numeric("N"),
        "DLP" => Numeric("N"),
        "Edema" => Numeric("N"),
        "Weak Peripheral Pulse" => Numeric("N"),
        "Lung rales" => Numeric("N"),
        "Systolic Murmur" => Numeric("N"),
        "Diastolic Murmur" => Numeric("N"),
        "Dyspnea" => Numeric("N"),
        "Function Class" => Numeric(0),
        "typical_angina" => Numeric("N"),
        "atypical_angina" => Numeric("N"),
        "non_anginal_pain" => Numeric("N"),
        "Exertional CP" => Numeric("N"),
        "LowTH Ang" => Numeric("N"),
        "exercise_angina" => Numeric("N") as YesNo,
        "chest_pain_type" => Categorical("NAP"),
        // ECG and echo
        "Q Wave" => Numeric("N"),
        "St Elevation" => Numeric("N"),
        "St Depression" => Numeric("N"),
        "Tinversion" => Numeric("N"),
        "LVH" => Numeric("N"),
        "Poor R Progression" => Numeric("N"),
        "BBB" => Categorical("None"),
        "resting_ecg" => Categorical("Normal"),
        "oldpeak" => Numeric(0.0),
        "st_slope" => Categorical("Up"),
        "EF-TTE" => Numeric(60),
        "Region RWMA" => Numeric(0),
        "VHD" => Categorical("N"),
        // Labs
        "CR" => Numeric(1.0),
        "BUN" => Numeric(15),
        "ESR" => Numeric(10),
        "HB" => Numeric(14.0),
        "K" => Numeric(4.0),
        "Na" => Numeric(140),
        "WBC" => Numeric(7000),
        "Lymph" => Numeric(30),
        "Neut" => Numeric(60),
        "PLT" => Numeric(250000),
        "CK-MB" => Numeric(2.5),
        "Troponin" => Numeric(0.01),
    ])
});

/// The master enumeration of canonical fields
#[derive(Debug, Clone)]
pub struct MasterSchema {
    fields: Vec<FieldDefinition>,
    index: FxHashMap<String, usize>,
}

impl MasterSchema {
    /// Create a schema from field definitions, keeping declaration order
    #[must_use]
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name.clone(), i))
            .collect();
        Self { fields, index }
    }

    /// Look up a field by canonical name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Whether `name` is a canonical field
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Iterate over `(name, default)` pairs
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.default))
    }

    /// Number of canonical fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The process-wide master schema
#[must_use]
pub fn master_schema() -> &'static MasterSchema {
    &MASTER_SCHEMA
}
