//! Feature attribution
//!
//! Splits a model's raw output (log-odds) into a baseline plus one
//! contribution per input column such that
//!
//! ```text
//! baseline + sum(attributions) == raw_output
//! ```
//!
//! Tree ensembles report exact SHAP values (path-dependent TreeSHAP over the
//! training covers), so the baseline is the cover-weighted expected margin.
//! Logistic models attribute `w_i * (x_i - mean_i)`.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::error::FraudError;
use crate::model::FraudModel;
use crate::vector::EncodedFeatureVector;

/// Number of features shown when the caller does not ask for a count
pub const DEFAULT_TOP_FEATURES: usize = 5;

/// Relative tolerance for the additivity check
pub const ATTRIBUTION_TOLERANCE: f64 = 1e-9;

/// Contribution of one input column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureAttribution {
    pub feature: String,
    /// Encoded value of the column
    pub value: f64,
    /// Contribution to the raw output
    pub attribution: f64,
}

/// Explanation of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionSet {
    baseline: f64,
    raw_output: f64,
    attributions: Vec<FeatureAttribution>,
}

impl AttributionSet {
    /// Expected raw output before seeing any feature
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// The model's raw output for this row
    pub fn raw_output(&self) -> f64 {
        self.raw_output
    }

    /// One entry per schema column, in schema order
    pub fn attributions(&self) -> &[FeatureAttribution] {
        &self.attributions
    }

    /// `baseline + sum(attributions)`
    pub fn reconstructed_output(&self) -> f64 {
        self.baseline + self.attributions.iter().map(|a| a.attribution).sum::<f64>()
    }

    /// Whether the attributions add up to the raw output
    pub fn is_additive(&self) -> bool {
        let scale = self.raw_output.abs().max(1.0);
        (self.reconstructed_output() - self.raw_output).abs() <= ATTRIBUTION_TOLERANCE * scale
    }

    /// The `n` features with the largest absolute attribution
    ///
    /// Ties keep schema order.
    pub fn top(&self, n: usize) -> Vec<&FeatureAttribution> {
        let mut ranked: Vec<&FeatureAttribution> = self.attributions.iter().collect();
        ranked.sort_by(|a, b| b.attribution.abs().total_cmp(&a.attribution.abs()));
        ranked.truncate(n);
        ranked
    }
}

/// Produces attributions for the loaded model
#[derive(Debug, Clone)]
pub struct Explainer {
    model: Arc<FraudModel>,
}

impl Explainer {
    pub fn new(model: Arc<FraudModel>) -> Self {
        Self { model }
    }

    /// Explains the model's output for one encoded claim
    ///
    /// # Errors
    ///
    /// `FraudError::ShapeMismatch` when the vector was not encoded against
    /// the model's schema
    pub fn explain(&self, vector: &EncodedFeatureVector) -> Result<AttributionSet, FraudError> {
        self.model.check_input(vector)?;

        let raw_output = self.model.margin_unchecked(vector.values());
        let (baseline, contributions) = self.model.contributions(vector.values());

        let attributions = vector
            .iter()
            .zip(contributions)
            .map(|((feature, value), attribution)| FeatureAttribution {
                feature: feature.to_string(),
                value,
                attribution,
            })
            .collect();

        let set = AttributionSet {
            baseline,
            raw_output,
            attributions,
        };

        if !set.is_additive() {
            warn!(
                raw_output,
                reconstructed = set.reconstructed_output(),
                "Attributions do not add up to the model output"
            );
        }

        Ok(set)
    }
}
