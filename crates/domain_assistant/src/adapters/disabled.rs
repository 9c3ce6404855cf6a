//! Adapter used when no assistant endpoint is configured

use async_trait::async_trait;

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable};

use crate::error::AssistantError;
use crate::ports::DocumentAssistant;
use crate::question::Question;

/// Always reports the assistant as unavailable
#[derive(Debug, Clone, Default)]
pub struct DisabledAssistant;

impl DisabledAssistant {
    pub fn new() -> Self {
        Self
    }
}

impl DomainPort for DisabledAssistant {}

#[async_trait]
impl HealthCheckable for DisabledAssistant {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new(
            "document-assistant",
            AdapterHealth::Degraded,
            0,
            Some("No assistant endpoint configured".to_string()),
        )
    }
}

#[async_trait]
impl DocumentAssistant for DisabledAssistant {
    async fn answer(&self, _question: &Question) -> Result<String, AssistantError> {
        Err(AssistantError::Unavailable(
            "no document assistant is configured".to_string(),
        ))
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
