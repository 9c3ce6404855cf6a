//! Composition root
//!
//! Artifacts and adapters are built once at startup and shared read-only by
//! every request.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use core_kernel::{AdapterHealth, HealthCheckResult, HealthCheckable, RetryPolicy};
use domain_assistant::{
    AssistantError, DisabledAssistant, DocumentAssistant, HttpAssistant, HttpAssistantConfig,
};
use domain_claims::{ClaimRepository, ClaimReviewService};
use domain_fraud::{
    Explainer, FeatureEncoder, FeatureSchema, FraudError, FraudModel, FraudScorer, ThresholdConfig,
};

use crate::config::ApiConfig;

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Artifact(#[from] FraudError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

/// Shared services behind the API
pub struct AppContext {
    pub claims: ClaimReviewService,
    pub encoder: FeatureEncoder,
    pub scorer: FraudScorer,
    pub explainer: Explainer,
    pub assistant: Arc<dyn DocumentAssistant>,
}

impl AppContext {
    /// Loads artifacts from the configured paths and wires the adapters
    ///
    /// # Errors
    ///
    /// * `FraudError::SchemaUnavailable` / `ModelUnavailable` when an artifact
    ///   cannot be read or parsed
    /// * `FraudError::ShapeMismatch` when the model and schema disagree
    /// * `FraudError::InvalidThreshold` for a threshold outside (0, 1]
    /// * `AssistantError::Configuration` for a malformed assistant URL
    pub fn initialize(
        config: &ApiConfig,
        repository: Arc<dyn ClaimRepository>,
    ) -> Result<Self, ContextError> {
        let schema = Arc::new(FeatureSchema::load(&config.schema_path)?);
        let model = Arc::new(FraudModel::load(&config.model_path)?);
        let assistant = build_assistant(config)?;

        let context = Self::from_parts(
            schema,
            model,
            ThresholdConfig::new(config.fraud_threshold)?,
            repository,
            assistant,
        )?;
        Ok(context.with_search_limit(config.search_limit))
    }

    /// Wires already-loaded artifacts and adapters
    ///
    /// # Errors
    ///
    /// `FraudError::ShapeMismatch` when the model's feature names differ
    /// from the schema
    pub fn from_parts(
        schema: Arc<FeatureSchema>,
        model: Arc<FraudModel>,
        threshold: ThresholdConfig,
        repository: Arc<dyn ClaimRepository>,
        assistant: Arc<dyn DocumentAssistant>,
    ) -> Result<Self, FraudError> {
        model.ensure_schema(&schema)?;
        info!(
            columns = schema.len(),
            model = model.kind(),
            threshold = threshold.threshold(),
            "Fraud artifacts ready"
        );

        Ok(Self {
            claims: ClaimReviewService::new(repository),
            encoder: FeatureEncoder::new(schema),
            scorer: FraudScorer::new(model.clone(), threshold),
            explainer: Explainer::new(model),
            assistant,
        })
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.claims = self.claims.with_search_limit(limit);
        self
    }

    /// Health of every adapter behind the API
    pub async fn component_health(&self) -> ComponentHealth {
        let (storage, assistant) = tokio::join!(
            self.claims.repository().health_check(),
            self.assistant.health_check()
        );
        ComponentHealth { storage, assistant }
    }
}

/// Health of the adapters behind the API
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub storage: HealthCheckResult,
    pub assistant: HealthCheckResult,
}

impl ComponentHealth {
    /// Storage is required; the assistant is optional
    pub fn overall(&self) -> AdapterHealth {
        match (self.storage.status, self.assistant.status) {
            (AdapterHealth::Unhealthy, _) => AdapterHealth::Unhealthy,
            (AdapterHealth::Healthy, AdapterHealth::Healthy) => AdapterHealth::Healthy,
            _ => AdapterHealth::Degraded,
        }
    }
}

fn build_assistant(config: &ApiConfig) -> Result<Arc<dyn DocumentAssistant>, AssistantError> {
    let Some(url) = config.assistant_endpoint() else {
        warn!("No document assistant configured; questions will be answered as unavailable");
        return Ok(Arc::new(DisabledAssistant::new()));
    };

    let mut http = HttpAssistantConfig::new(url)
        .with_timeout(Duration::from_secs(config.assistant_timeout_secs))
        .with_retry(RetryPolicy::new(
            config.assistant_max_attempts,
            Duration::from_millis(RetryPolicy::default().base_delay_ms),
        ));
    if let Some(key) = &config.assistant_api_key {
        http = http.with_api_key(key);
    }

    let assistant = HttpAssistant::new(http)?;
    info!(url = assistant.base_url(), "Document assistant configured");
    Ok(Arc::new(assistant))
}
