mod utils;

use cardio_risk::align::align_with_report;
use cardio_risk::schema::adapt::{to_categorical, to_numeric};
use cardio_risk::align::UNKNOWN_CATEGORY;
use cardio_risk::{
    CanonicalRecord, Disease, Feature, GroupPolicy, ModelAsset, ModelRegistry, Transformer, align,
    master_schema, normalize,
};
use serde_json::{Map, Value, json};
use utils::{artifact_dir, init_test_logging};

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn requests() -> Vec<Map<String, Value>> {
    vec![
        Map::new(),
        object(json!({"Age": 55, "Sex": "Male", "cholesterol": 280})),
        object(json!({
            "age": "71",
            "male": 1,
            "sysBP": "150",
            "ChestPainType": "ASY",
            "Heart rate": 95,
            "CK_MB": "4.2",
            "DM": "yes",
            "Obesity": "Y",
            "work_type": "Self-employed",
            "favourite_colour": "green",
        })),
        object(json!({"Age": "not a number", "BMI": [1, 2], "st_slope": 3, "VHD": null})),
    ]
}

/// Aligned vectors match the column list exactly, for every disease and request
#[test]
fn test_alignment_length_and_order() {
    init_test_logging();
    let dir = artifact_dir();
    let registry = ModelRegistry::load(dir.path(), &Disease::ALL).unwrap();

    for asset in registry.iter() {
        for raw in requests() {
            let record = normalize(&raw, asset.disease());
            let vector = align(&record, asset);

            assert_eq!(vector.len(), asset.columns().len(), "{}", asset.disease());
            for (i, (column, _)) in vector.iter().enumerate() {
                assert_eq!(column, asset.columns()[i], "{}", asset.disease());
            }

            // The batch view keeps the same order and feeds the transformer
            let batch = vector.to_record_batch().unwrap();
            let names: Vec<&str> = batch
                .schema_ref()
                .fields()
                .iter()
                .map(|f| f.name().as_str())
                .collect();
            assert_eq!(names, asset.columns());
            assert!(asset.transformer().transform(&batch).is_ok());
        }
    }
}

/// Aligning an empty request yields the defaults, cast per column group
#[test]
fn test_empty_request_yields_defaults() {
    let dir = artifact_dir();
    let registry = ModelRegistry::load(dir.path(), &Disease::ALL).unwrap();

    for asset in registry.iter() {
        let record = normalize(&Map::new(), asset.disease());
        let (vector, report) = align_with_report(&record, asset);
        assert!(report.synthesized.is_empty());

        for (column, value) in vector.iter() {
            assert!(!record.is_supplied(column));
            let default = &master_schema().get(column).unwrap().default;
            // Sex and yes/no defaults are encoded during normalization
            let normalized = record.get(column).unwrap();
            match value {
                Feature::Categorical(label) => assert_eq!(label, &to_categorical(default)),
                Feature::Numeric(n) => assert_eq!(*n, to_numeric(normalized), "{column}"),
            }
        }
    }
}

/// A record with no fields at all aligns to placeholders only
#[test]
fn test_empty_record_yields_placeholders() {
    let dir = artifact_dir();
    let registry = ModelRegistry::load(dir.path(), &Disease::ALL).unwrap();

    for asset in registry.iter() {
        let (vector, report) = align_with_report(&CanonicalRecord::default(), asset);
        assert_eq!(report.synthesized, asset.columns(), "{}", asset.disease());
        assert_eq!(vector.len(), asset.columns().len());

        for (column, value) in vector.iter() {
            match value {
                Feature::Numeric(n) => assert_eq!(*n, 0.0, "{column}"),
                Feature::Categorical(label) => assert_eq!(label, UNKNOWN_CATEGORY, "{column}"),
            }
        }
    }

    let heart_failure = registry.get(Disease::HeartFailure).unwrap();
    let vector = align(&CanonicalRecord::default(), heart_failure);
    assert_eq!(
        vector.get("chest_pain_type"),
        Some(&Feature::Categorical(UNKNOWN_CATEGORY.to_string()))
    );
}

/// Columns outside the master schema are synthesized as placeholders
#[test]
fn test_unknown_columns_are_synthesized() {
    let dir = artifact_dir();
    let registry = ModelRegistry::load(dir.path(), &Disease::ALL).unwrap();
    let cad = registry.get(Disease::Cad).unwrap();

    // The same transformer with an extra column the schema does not know
    let mut columns = cad.columns().to_vec();
    columns.insert(3, "Region RWMA score".to_string());
    let widened = ModelAsset::new(
        Disease::Cad,
        std::sync::Arc::new(utils::FixedClassifier(0.5)),
        std::sync::Arc::new(Passthrough(cad.transformer().column_groups().cloned())),
        columns,
    )
    .unwrap();

    let record = normalize(&Map::new(), Disease::Cad);
    let (vector, report) = align_with_report(&record, &widened);
    assert_eq!(vector.columns()[3], "Region RWMA score");
    assert_eq!(vector.values()[3], Feature::Numeric(0.0));
    assert_eq!(report.synthesized, vec!["Region RWMA score"]);
    assert_eq!(report.policy, GroupPolicy::Recorded);
}

/// Values reach their columns through aliases and coercions
#[test]
fn test_values_land_in_their_columns() {
    let dir = artifact_dir();
    let registry = ModelRegistry::load(dir.path(), &Disease::ALL).unwrap();
    let raw = &requests()[2];

    let heart_failure = registry.get(Disease::HeartFailure).unwrap();
    let vector = align(&normalize(raw, Disease::HeartFailure), heart_failure);
    assert_eq!(
        vector.get("chest_pain_type"),
        Some(&Feature::Categorical("ASY".to_string()))
    );
    // `male` is only an alias for hypertension
    assert_eq!(vector.get("Sex"), Some(&Feature::Numeric(0.0)));

    let hypertension = registry.get(Disease::Hypertension).unwrap();
    let vector = align(&normalize(raw, Disease::Hypertension), hypertension);
    assert_eq!(vector.get("Age"), Some(&Feature::Numeric(71.0)));
    assert_eq!(vector.get("systolic_bp"), Some(&Feature::Numeric(150.0)));
    assert_eq!(vector.get("sex"), Some(&Feature::Numeric(1.0)));

    let heart_attack = registry.get(Disease::HeartAttack).unwrap();
    let vector = align(&normalize(raw, Disease::HeartAttack), heart_attack);
    assert_eq!(vector.get("heart_rate"), Some(&Feature::Numeric(95.0)));
    assert_eq!(vector.get("CK-MB"), Some(&Feature::Numeric(4.2)));

    let cad = registry.get(Disease::Cad).unwrap();
    let vector = align(&normalize(raw, Disease::Cad), cad);
    assert_eq!(vector.get("diabetes"), Some(&Feature::Numeric(1.0)));
    assert_eq!(vector.get("Obesity"), Some(&Feature::Numeric(1.0)));

    let stroke = registry.get(Disease::Stroke).unwrap();
    let vector = align(&normalize(raw, Disease::Stroke), stroke);
    assert_eq!(
        vector.get("work_type"),
        Some(&Feature::Categorical("Self-employed".to_string()))
    );
}

/// Malformed values degrade to policy defaults instead of failing
#[test]
fn test_malformed_values_degrade() {
    let dir = artifact_dir();
    let registry = ModelRegistry::load(dir.path(), &Disease::ALL).unwrap();
    let raw = &requests()[3];

    let heart_failure = registry.get(Disease::HeartFailure).unwrap();
    let vector = align(&normalize(raw, Disease::HeartFailure), heart_failure);
    assert_eq!(vector.get("Age"), Some(&Feature::Numeric(0.0)));
    assert_eq!(
        vector.get("st_slope"),
        Some(&Feature::Categorical("3".to_string()))
    );

    let cad = registry.get(Disease::Cad).unwrap();
    let vector = align(&normalize(raw, Disease::Cad), cad);
    // Non-scalar and null values keep the master default
    assert_eq!(vector.get("BMI"), Some(&Feature::Numeric(22.0)));
    assert_eq!(vector.get("VHD"), Some(&Feature::Categorical("N".to_string())));
}

/// A transformer that records groups but does not transform
struct Passthrough(Option<cardio_risk::ColumnGroups>);

impl Transformer for Passthrough {
    fn transform(
        &self,
        batch: &cardio_risk::RecordBatch,
    ) -> cardio_risk::Result<Vec<Vec<f64>>> {
        Ok(vec![Vec::new(); batch.num_rows()])
    }

    fn column_groups(&self) -> Option<&cardio_risk::ColumnGroups> {
        self.0.as_ref()
    }
}
