//! Pretrained fraud model
//!
//! The model artifact is a JSON document tagged by `kind`:
//!
//! - `gradient_boosted_trees`: a boosted tree ensemble in the XGBoost JSON
//!   dump layout, see [`trees`]
//! - `logistic`: a logistic regression, see [`logistic`]
//!
//! Both produce a raw output (log-odds margin); the fraud probability is its
//! sigmoid. The artifact's `feature_names` must equal the feature schema.

pub mod logistic;
pub mod trees;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::FraudError;
use crate::schema::FeatureSchema;
use crate::vector::EncodedFeatureVector;

pub use logistic::LogisticModel;
pub use trees::TreeEnsemble;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelArtifact {
    GradientBoostedTrees(trees::TreeEnsembleArtifact),
    Logistic(logistic::LogisticArtifact),
}

/// A loaded fraud classifier
#[derive(Debug, Clone)]
pub enum FraudModel {
    Trees(TreeEnsemble),
    Logistic(LogisticModel),
}

impl FraudModel {
    /// Parses and validates a model artifact
    ///
    /// # Errors
    ///
    /// `FraudError::ModelUnavailable` when the JSON is invalid or the model
    /// refers to features it does not declare.
    pub fn from_json_str(json: &str) -> Result<Self, FraudError> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| FraudError::ModelUnavailable(format!("invalid model JSON: {}", e)))?;

        match artifact {
            ModelArtifact::GradientBoostedTrees(a) => Ok(Self::Trees(TreeEnsemble::from_artifact(a)?)),
            ModelArtifact::Logistic(a) => Ok(Self::Logistic(LogisticModel::from_artifact(a)?)),
        }
    }

    /// Loads a model artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FraudError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| FraudError::ModelUnavailable(format!("{}: {}", path.display(), e)))?;
        let model = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            kind = model.kind(),
            features = model.feature_names().len(),
            "Fraud model loaded"
        );
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FraudModel::Trees(_) => "gradient_boosted_trees",
            FraudModel::Logistic(_) => "logistic",
        }
    }

    /// Input columns the model was trained on, in order
    pub fn feature_names(&self) -> &[String] {
        match self {
            FraudModel::Trees(m) => m.feature_names(),
            FraudModel::Logistic(m) => m.feature_names(),
        }
    }

    /// Verifies the model was trained on exactly this schema
    pub fn ensure_schema(&self, schema: &FeatureSchema) -> Result<(), FraudError> {
        ensure_same_columns(self.feature_names(), schema.columns(), "schema")
    }

    /// Verifies a vector has the model's columns in the model's order
    pub fn check_input(&self, vector: &EncodedFeatureVector) -> Result<(), FraudError> {
        ensure_same_columns(self.feature_names(), vector.columns(), "input vector")
    }

    /// Raw model output (log-odds)
    pub fn margin(&self, vector: &EncodedFeatureVector) -> Result<f64, FraudError> {
        self.check_input(vector)?;
        Ok(self.margin_unchecked(vector.values()))
    }

    /// Fraud probability
    pub fn probability(&self, vector: &EncodedFeatureVector) -> Result<f64, FraudError> {
        Ok(sigmoid(self.margin(vector)?))
    }

    pub(crate) fn margin_unchecked(&self, values: &[f64]) -> f64 {
        match self {
            FraudModel::Trees(m) => m.margin(values),
            FraudModel::Logistic(m) => m.margin(values),
        }
    }

    /// Baseline and per-feature contributions to the margin
    pub(crate) fn contributions(&self, values: &[f64]) -> (f64, Vec<f64>) {
        match self {
            FraudModel::Trees(m) => m.contributions(values),
            FraudModel::Logistic(m) => m.contributions(values),
        }
    }
}

fn ensure_same_columns(expected: &[String], actual: &[String], what: &str) -> Result<(), FraudError> {
    if expected.len() != actual.len() {
        return Err(FraudError::ShapeMismatch(format!(
            "model expects {} features, {} has {}",
            expected.len(),
            what,
            actual.len()
        )));
    }

    if let Some((i, (e, a))) = expected
        .iter()
        .zip(actual)
        .enumerate()
        .find(|(_, (e, a))| e != a)
    {
        return Err(FraudError::ShapeMismatch(format!(
            "column {} of {} is '{}', model expects '{}'",
            i, what, a, e
        )));
    }

    Ok(())
}

/// Maps declared feature names to positions, rejecting blanks and duplicates
pub(crate) fn feature_positions(names: &[String]) -> Result<HashMap<&str, usize>, FraudError> {
    if names.is_empty() {
        return Err(FraudError::ModelUnavailable("model declares no features".to_string()));
    }

    let mut positions = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(FraudError::ModelUnavailable("blank feature name".to_string()));
        }
        if positions.insert(name.as_str(), i).is_some() {
            return Err(FraudError::ModelUnavailable(format!("duplicate feature '{}'", name)));
        }
    }
    Ok(positions)
}

/// Logistic function
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse of [`sigmoid`]
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
