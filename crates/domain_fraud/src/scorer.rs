//! Fraud scoring

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FraudError;
use crate::model::FraudModel;
use crate::vector::EncodedFeatureVector;

/// Probability at or above which a claim is flagged
pub const DEFAULT_FRAUD_THRESHOLD: f64 = 0.30;

/// Decision threshold configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdConfig {
    threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FRAUD_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    /// # Errors
    ///
    /// `FraudError::InvalidThreshold` unless `0 < threshold <= 1`
    pub fn new(threshold: f64) -> Result<Self, FraudError> {
        if threshold > 0.0 && threshold <= 1.0 {
            Ok(Self { threshold })
        } else {
            Err(FraudError::InvalidThreshold(threshold))
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// A probability exactly at the threshold is flagged
    pub fn is_flagged(&self, probability: f64) -> bool {
        probability >= self.threshold
    }
}

impl<'de> Deserialize<'de> for ThresholdConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            threshold: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        ThresholdConfig::new(raw.threshold).map_err(serde::de::Error::custom)
    }
}

/// Result of scoring one claim
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FraudAssessment {
    /// 1 when flagged as suspected fraud, 0 otherwise
    pub label: u8,
    /// Model probability of fraud
    pub probability: f64,
    /// Threshold the label was decided against
    pub threshold: f64,
    /// Probability of the predicted label
    pub confidence: f64,
}

impl FraudAssessment {
    pub fn new(probability: f64, config: ThresholdConfig) -> Self {
        let flagged = config.is_flagged(probability);
        Self {
            label: u8::from(flagged),
            probability,
            threshold: config.threshold(),
            confidence: if flagged { probability } else { 1.0 - probability },
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.label == 1
    }
}

/// Applies the model and threshold to encoded vectors
#[derive(Debug, Clone)]
pub struct FraudScorer {
    model: Arc<FraudModel>,
    config: ThresholdConfig,
}

impl FraudScorer {
    pub fn new(model: Arc<FraudModel>, config: ThresholdConfig) -> Self {
        Self { model, config }
    }

    pub fn model(&self) -> &Arc<FraudModel> {
        &self.model
    }

    pub fn config(&self) -> ThresholdConfig {
        self.config
    }

    /// Scores one encoded claim
    ///
    /// # Errors
    ///
    /// `FraudError::ShapeMismatch` when the vector was not encoded against
    /// the model's schema
    pub fn score(&self, vector: &EncodedFeatureVector) -> Result<FraudAssessment, FraudError> {
        let probability = self.model.probability(vector)?;
        let assessment = FraudAssessment::new(probability, self.config);
        debug!(
            probability,
            threshold = assessment.threshold,
            label = assessment.label,
            "Claim scored"
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(ThresholdConfig::default().threshold(), 0.30);
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(ThresholdConfig::new(1.0).is_ok());
        assert_eq!(ThresholdConfig::new(0.0), Err(FraudError::InvalidThreshold(0.0)));
        assert!(ThresholdConfig::new(1.5).is_err());
        assert!(ThresholdConfig::new(f64::NAN).is_err());
    }

    #[test]
    fn test_deserialization_checks_bounds() {
        let ok: ThresholdConfig = serde_json::from_str(r#"{"threshold":0.45}"#).unwrap();
        assert_eq!(ok.threshold(), 0.45);

        assert!(serde_json::from_str::<ThresholdConfig>(r#"{"threshold":0.0}"#).is_err());
        assert!(serde_json::from_str::<ThresholdConfig>(r#"{"threshold":1.7}"#).is_err());
    }

    #[test]
    fn test_probability_at_threshold_is_flagged() {
        let config = ThresholdConfig::default();
        let at = FraudAssessment::new(0.30, config);
        assert_eq!(at.label, 1);
        assert_eq!(at.confidence, 0.30);

        let below = FraudAssessment::new(0.2999, config);
        assert_eq!(below.label, 0);
        assert!((below.confidence - 0.7001).abs() < 1e-12);
    }
}
