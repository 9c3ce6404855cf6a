//! Document Assistant Port
//!
//! ```rust,ignore
//! let assistant: Arc<dyn DocumentAssistant> = match config.assistant_url {
//!     Some(url) => Arc::new(HttpAssistant::new(HttpAssistantConfig::new(url))?),
//!     None => Arc::new(DisabledAssistant::new()),
//! };
//! let answer = assistant.answer(&Question::parse(raw)?).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable};

use crate::error::AssistantError;
use crate::question::Question;

/// Port for the document-grounded question answering service
#[async_trait]
pub trait DocumentAssistant: DomainPort + HealthCheckable {
    /// Answers one question from the claims-handling manual
    ///
    /// # Returns
    ///
    /// The answer text, or `AssistantError::Unavailable` when the service
    /// cannot be reached or fails
    async fn answer(&self, question: &Question) -> Result<String, AssistantError>;

    /// Whether an endpoint is configured at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// In-memory implementation of DocumentAssistant for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// Canned-answer assistant
    ///
    /// Answers are matched by case-insensitive substring of the question; the
    /// first registered match wins. Unmatched questions get the default answer.
    #[derive(Debug)]
    pub struct InMemoryAssistant {
        answers: Vec<(String, String)>,
        default_answer: String,
        available: AtomicBool,
        asked: RwLock<Vec<String>>,
    }

    impl Default for InMemoryAssistant {
        fn default() -> Self {
            Self {
                answers: Vec::new(),
                default_answer: "The manual does not cover that topic.".to_string(),
                available: AtomicBool::new(true),
                asked: RwLock::new(Vec::new()),
            }
        }
    }

    impl InMemoryAssistant {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers an answer for questions containing `topic`
        pub fn with_answer(mut self, topic: impl Into<String>, answer: impl Into<String>) -> Self {
            self.answers.push((topic.into().to_lowercase(), answer.into()));
            self
        }

        /// Simulates an outage
        pub fn set_available(&self, available: bool) {
            self.available.store(available, Ordering::SeqCst);
        }

        /// Questions received so far, in order
        pub async fn asked(&self) -> Vec<String> {
            self.asked.read().await.clone()
        }
    }

    impl DomainPort for InMemoryAssistant {}

    #[async_trait]
    impl HealthCheckable for InMemoryAssistant {
        async fn health_check(&self) -> HealthCheckResult {
            let (status, message) = if self.available.load(Ordering::SeqCst) {
                (AdapterHealth::Healthy, "In-memory assistant available")
            } else {
                (AdapterHealth::Unhealthy, "In-memory assistant offline")
            };
            HealthCheckResult::new("in-memory-assistant", status, 0, Some(message.to_string()))
        }
    }

    #[async_trait]
    impl DocumentAssistant for InMemoryAssistant {
        async fn answer(&self, question: &Question) -> Result<String, AssistantError> {
            if !self.available.load(Ordering::SeqCst) {
                return Err(AssistantError::Unavailable(
                    "in-memory assistant offline".to_string(),
                ));
            }

            self.asked.write().await.push(question.as_str().to_string());

            let lowered = question.as_str().to_lowercase();
            let answer = self
                .answers
                .iter()
                .find(|(topic, _)| lowered.contains(topic.as_str()))
                .map(|(_, answer)| answer.clone())
                .unwrap_or_else(|| self.default_answer.clone());
            Ok(answer)
        }
    }
}
