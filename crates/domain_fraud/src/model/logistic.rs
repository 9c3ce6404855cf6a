//! Logistic regression model

use serde::Deserialize;

use super::feature_positions;
use crate::error::FraudError;

#[derive(Debug, Deserialize)]
pub(crate) struct LogisticArtifact {
    intercept: f64,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    #[serde(default)]
    feature_means: Option<Vec<f64>>,
}

/// Linear log-odds model
///
/// `feature_means` is the reference point of the explanation; it defaults to
/// all zeros when the artifact omits it.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    intercept: f64,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    means: Vec<f64>,
}

impl LogisticModel {
    pub(crate) fn from_artifact(artifact: LogisticArtifact) -> Result<Self, FraudError> {
        feature_positions(&artifact.feature_names)?;
        let n = artifact.feature_names.len();

        if artifact.coefficients.len() != n {
            return Err(FraudError::ModelUnavailable(format!(
                "{} coefficients for {} features",
                artifact.coefficients.len(),
                n
            )));
        }

        let means = artifact.feature_means.unwrap_or_else(|| vec![0.0; n]);
        if means.len() != n {
            return Err(FraudError::ModelUnavailable(format!(
                "{} feature means for {} features",
                means.len(),
                n
            )));
        }

        let all_finite = std::iter::once(&artifact.intercept)
            .chain(&artifact.coefficients)
            .chain(&means)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(FraudError::ModelUnavailable(
                "logistic parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            intercept: artifact.intercept,
            feature_names: artifact.feature_names,
            coefficients: artifact.coefficients,
            means,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub(crate) fn margin(&self, values: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(values)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    /// `w_i * (x_i - mean_i)` per feature; baseline is the margin at the means
    pub(crate) fn contributions(&self, values: &[f64]) -> (f64, Vec<f64>) {
        let baseline = self.intercept
            + self
                .coefficients
                .iter()
                .zip(&self.means)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        let contributions = self
            .coefficients
            .iter()
            .zip(values.iter().zip(&self.means))
            .map(|(w, (x, m))| w * (x - m))
            .collect();

        (baseline, contributions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(json: &str) -> Result<LogisticModel, FraudError> {
        LogisticModel::from_artifact(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_margin_and_contributions() {
        let m = model(
            r#"{"intercept":-1.0,"feature_names":["a","b"],"coefficients":[0.5,2.0],"feature_means":[1.0,0.0]}"#,
        )
        .unwrap();
        let x = [3.0, 1.0];
        assert_eq!(m.margin(&x), -1.0 + 1.5 + 2.0);

        let (baseline, contributions) = m.contributions(&x);
        assert_eq!(baseline, -0.5);
        assert_eq!(contributions, vec![1.0, 2.0]);
        assert_eq!(baseline + contributions.iter().sum::<f64>(), m.margin(&x));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = model(r#"{"intercept":0.0,"feature_names":["a","b"],"coefficients":[1.0]}"#).unwrap_err();
        assert!(matches!(err, FraudError::ModelUnavailable(_)));
    }
}
