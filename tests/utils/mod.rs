#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use cardio_risk::registry::factory::ArtifactPaths;
use cardio_risk::{
    Classifier, Disease, ModelRegistry, PredictorConfig, Result, RiskError, RiskPredictor,
};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Initialise logging for tests
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Artifacts for one disease, ready to be written to disk
pub struct Fixture {
    pub disease: Disease,
    pub columns: Vec<&'static str>,
    pub preprocessor: Value,
    pub model: Value,
}

/// Column transformer with `num`, `cat` and `pass` steps; returns the
/// serialized preprocessor and its output width
fn column_transformer(
    numeric: &[&str],
    categorical: &[(&str, Vec<&str>)],
    passthrough: &[&str],
) -> (Value, usize) {
    let mean: Vec<f64> = numeric.iter().map(|_| 50.0).collect();
    let scale: Vec<f64> = numeric.iter().map(|_| 25.0).collect();
    let names: Vec<&str> = categorical.iter().map(|(name, _)| *name).collect();
    let categories: Vec<&Vec<&str>> = categorical.iter().map(|(_, cats)| cats).collect();
    let width = numeric.len()
        + categories.iter().map(|cats| cats.len() - 1).sum::<usize>()
        + passthrough.len();

    let preprocessor = json!({
        "kind": "column_transformer",
        "transformers": [
            {"name": "num", "columns": numeric,
             "step": {"type": "standard_scaler", "mean": mean, "scale": scale}},
            {"name": "cat", "columns": names,
             "step": {"type": "one_hot", "categories": categories, "drop_first": true}},
            {"name": "pass", "columns": passthrough, "step": {"type": "passthrough"}}
        ]
    });
    (preprocessor, width)
}

/// A categorical column with its fitted categories
fn one_hot<'a>(column: &'a str, categories: &[&'a str]) -> (&'a str, Vec<&'a str>) {
    (column, categories.to_vec())
}

/// Bare positional scaler over `columns`
fn standard_scaler(columns: &[&str]) -> (Value, usize) {
    let mean: Vec<f64> = columns.iter().map(|_| 10.0).collect();
    let scale: Vec<f64> = columns.iter().map(|_| 5.0).collect();
    (
        json!({"kind": "standard_scaler", "mean": mean, "scale": scale}),
        columns.len(),
    )
}

/// Small network: dense(relu) -> batch norm -> dense(sigmoid)
fn network(width: usize) -> Value {
    let hidden = 4;
    let weights: Vec<Vec<f64>> = (0..width)
        .map(|i| {
            (0..hidden)
                .map(|j| ((i * 7 + j * 3) % 11) as f64 / 50.0 - 0.1)
                .collect()
        })
        .collect();
    json!({"layers": [
        {"type": "dense", "weights": weights, "bias": vec![0.05; hidden], "activation": "relu"},
        {"type": "batch_normalization", "gamma": vec![1.0; hidden], "beta": vec![0.0; hidden],
         "moving_mean": vec![0.1; hidden], "moving_variance": vec![1.0; hidden]},
        {"type": "dense", "weights": [[0.3], [-0.2], [0.25], [0.1]], "bias": [0.0],
         "activation": "sigmoid"}
    ]})
}

fn fixture(
    disease: Disease,
    columns: Vec<&'static str>,
    (preprocessor, width): (Value, usize),
) -> Fixture {
    Fixture {
        disease,
        columns,
        preprocessor,
        model: network(width),
    }
}

/// Artifacts for every supported disease
///
/// Column lists are deliberately ordered differently from the transformer
/// steps.
pub fn fixtures() -> Vec<Fixture> {
    vec![
        fixture(
            Disease::Stroke,
            vec![
                "Gender", "Age", "Hypertension", "heart_disease", "Married", "work_type",
                "residence_type", "glucose_level", "BMI", "smoking_status",
            ],
            column_transformer(
                &["Age", "glucose_level", "BMI"],
                &[
                    one_hot("work_type", &["Govt_job", "Private", "Self-employed", "children"]),
                    one_hot("residence_type", &["Rural", "Urban"]),
                    one_hot("smoking_status", &["formerly smoked", "never smoked", "smokes"]),
                ],
                &["Gender", "Hypertension", "heart_disease", "Married"],
            ),
        ),
        fixture(
            Disease::HeartFailure,
            vec![
                "Age", "Sex", "chest_pain_type", "resting_bp", "cholesterol", "fasting_bs",
                "resting_ecg", "max_hr", "exercise_angina", "oldpeak", "st_slope",
            ],
            column_transformer(
                &["Age", "resting_bp", "cholesterol", "max_hr", "oldpeak"],
                &[
                    one_hot("chest_pain_type", &["ASY", "ATA", "NAP", "TA"]),
                    one_hot("resting_ecg", &["LVH", "Normal", "ST"]),
                    one_hot("st_slope", &["Down", "Flat", "Up"]),
                ],
                &["Sex", "fasting_bs", "exercise_angina"],
            ),
        ),
        fixture(
            Disease::Hypertension,
            vec![
                "sex", "Age", "smokes", "cigsPerDay", "BP_Medications", "diabetes",
                "cholesterol", "systolic_bp", "diastolic_bp", "BMI", "heart_rate",
                "glucose_level",
            ],
            standard_scaler(&[
                "sex", "Age", "smokes", "cigsPerDay", "BP_Medications", "diabetes",
                "cholesterol", "systolic_bp", "diastolic_bp", "BMI", "heart_rate",
                "glucose_level",
            ]),
        ),
        fixture(
            Disease::HeartAttack,
            vec![
                "Age", "Gender", "heart_rate", "systolic_bp", "diastolic_bp", "blood_sugar",
                "CK-MB", "Troponin",
            ],
            standard_scaler(&[
                "Age", "Gender", "heart_rate", "systolic_bp", "diastolic_bp", "blood_sugar",
                "CK-MB", "Troponin",
            ]),
        ),
        fixture(
            Disease::Cad,
            vec![
                "Age", "Sex", "BMI", "diabetes", "hypertension", "smokes", "FH", "Obesity",
                "DLP", "systolic_bp", "heart_rate", "typical_angina", "Dyspnea", "LVH",
                "triglycerides", "VHD", "BBB",
            ],
            column_transformer(
                &["Age", "BMI", "systolic_bp", "heart_rate", "triglycerides"],
                &[
                    one_hot("VHD", &["Mild", "Moderate", "N", "Severe"]),
                    one_hot("BBB", &["LBBB", "None", "RBBB"]),
                ],
                &[
                    "Sex", "diabetes", "hypertension", "smokes", "FH", "Obesity", "DLP",
                    "typical_angina", "Dyspnea", "LVH",
                ],
            ),
        ),
    ]
}

/// Write one fixture under `base`
pub fn write_fixture(base: &Path, fixture: &Fixture) {
    let paths = ArtifactPaths::resolve(base, fixture.disease);
    fs::create_dir_all(&paths.directory).unwrap();
    fs::write(&paths.model, fixture.model.to_string()).unwrap();
    fs::write(&paths.preprocessor, fixture.preprocessor.to_string()).unwrap();
    fs::write(&paths.columns, json!(fixture.columns).to_string()).unwrap();
}

/// A temporary artifact directory holding every disease's fixtures
pub fn artifact_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for fixture in fixtures() {
        write_fixture(dir.path(), &fixture);
    }
    dir
}

/// Columns expected by a disease's fixture
pub fn fixture_columns(disease: Disease) -> Vec<&'static str> {
    fixtures()
        .into_iter()
        .find(|f| f.disease == disease)
        .map(|f| f.columns)
        .unwrap()
}

/// Predictor over the fixture artifacts with real networks
pub fn fixture_predictor(dir: &TempDir) -> RiskPredictor {
    RiskPredictor::new(&PredictorConfig {
        log_alignment: false,
        ..PredictorConfig::with_artifact_dir(dir.path())
    })
}

/// Registry over the fixture artifacts with the classifiers replaced
pub fn stub_registry(
    dir: &TempDir,
    classifier: impl Fn(Disease) -> Arc<dyn Classifier>,
) -> ModelRegistry {
    let registry = ModelRegistry::load(dir.path(), &Disease::ALL).unwrap();
    ModelRegistry::from_assets(
        registry
            .iter()
            .map(|asset| asset.with_classifier(classifier(asset.disease()))),
    )
}

/// Classifier returning the same probability for every row
pub struct FixedClassifier(pub f64);

impl Classifier for FixedClassifier {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        Ok(vec![self.0; features.len()])
    }
}

/// Classifier that always fails
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _features: &[Vec<f64>]) -> Result<Vec<f64>> {
        Err(RiskError::inference("model raised during predict"))
    }
}

/// Classifier that panics instead of returning an error
pub struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn predict(&self, _features: &[Vec<f64>]) -> Result<Vec<f64>> {
        panic!("runtime blew up")
    }
}

/// Shared handle to a [`FixedClassifier`]
pub fn fixed(probability: f64) -> Arc<dyn Classifier> {
    Arc::new(FixedClassifier(probability))
}
