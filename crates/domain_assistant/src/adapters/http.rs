//! HTTP Document Assistant Adapter
//!
//! Forwards questions to the retrieval-augmented answering service:
//!
//! ```text
//! POST {base_url}/answer
//! Authorization: Bearer {api_key}        (when configured)
//! {"question": "...", "top_k": 3}
//!
//! 200 {"answer": "..."}
//! ```
//!
//! # Error Handling
//!
//! Responses are mapped to `PortError` variants before the retry policy sees
//! them:
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Transport failures -> `PortError::Connection`
//! - Other -> `PortError::Internal`
//!
//! Only the transient ones are retried. Whatever is left after the last
//! attempt surfaces as `AssistantError::Unavailable`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, RetryPolicy};

use crate::error::AssistantError;
use crate::ports::DocumentAssistant;
use crate::question::Question;

/// Default timeout for one answer request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Number of manual passages the service retrieves per question
pub const DEFAULT_TOP_K: usize = 3;

const ADAPTER_ID: &str = "document-assistant";

/// Configuration for the HTTP assistant adapter
#[derive(Debug, Clone)]
pub struct HttpAssistantConfig {
    /// Base URL of the answering service (e.g., "http://assistant:8000")
    pub base_url: String,

    /// Optional bearer token
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry policy for transient failures
    pub retry: RetryPolicy,

    /// Passages retrieved per question
    pub top_k: usize,
}

impl HttpAssistantConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Serialize)]
struct AnswerRequest<'a> {
    question: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct AnswerResponse {
    answer: String,
}

/// Document assistant reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    top_k: usize,
}

impl HttpAssistant {
    /// Creates an adapter
    ///
    /// # Errors
    ///
    /// `AssistantError::Configuration` when the base URL is not an http(s)
    /// URL or the HTTP client cannot be built
    pub fn new(config: HttpAssistantConfig) -> Result<Self, AssistantError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AssistantError::Configuration(format!(
                "assistant URL must start with http:// or https://, got '{}'",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            timeout: config.timeout,
            retry: config.retry,
            top_k: config.top_k.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    fn transport_error(&self, operation: &str, err: reqwest::Error) -> PortError {
        if err.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            PortError::Connection {
                message: format!("{} request failed", operation),
                source: Some(Box::new(err)),
            }
        }
    }

    async fn post_answer(&self, question: &Question) -> Result<String, PortError> {
        let url = format!("{}/answer", self.base_url);
        let body = AnswerRequest {
            question: question.as_str(),
            top_k: self.top_k,
        };

        let response = self
            .request(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| self.transport_error("assistant.answer", e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Err(status_error(status, retry_after_secs));
        }

        let parsed: AnswerResponse = response
            .json()
            .await
            .map_err(|e| PortError::internal(format!("Malformed assistant response: {}", e)))?;

        let answer = parsed.answer.trim();
        if answer.is_empty() {
            return Err(PortError::internal("Assistant returned an empty answer"));
        }
        Ok(answer.to_string())
    }
}

fn status_error(status: StatusCode, retry_after_secs: u64) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: format!("assistant rejected credentials ({})", status),
        },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited { retry_after_secs },
        s if s.is_server_error() => PortError::unavailable(format!("document assistant ({})", s)),
        s => PortError::internal(format!("unexpected assistant status {}", s)),
    }
}

impl DomainPort for HttpAssistant {}

#[async_trait]
impl HealthCheckable for HttpAssistant {
    /// Calls `GET {base_url}/health`
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let url = format!("{}/health", self.base_url);
        let result = self.request(self.client.get(&url)).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(response) if response.status().is_success() => (AdapterHealth::Healthy, None),
            Ok(response) => (
                AdapterHealth::Degraded,
                Some(format!("Assistant health endpoint returned {}", response.status())),
            ),
            Err(e) => (
                AdapterHealth::Degraded,
                Some(format!("Assistant unreachable: {}", e)),
            ),
        };

        HealthCheckResult::new(ADAPTER_ID, status, latency_ms, message)
    }
}

#[async_trait]
impl DocumentAssistant for HttpAssistant {
    #[instrument(skip(self, question), fields(question_chars = question.as_str().chars().count()))]
    async fn answer(&self, question: &Question) -> Result<String, AssistantError> {
        let answer = self
            .retry
            .run("assistant.answer", move || self.post_answer(question))
            .await
            .map_err(|e| {
                warn!(error = %e, "Document assistant request failed");
                AssistantError::Unavailable(e.to_string())
            })?;

        debug!(answer_chars = answer.chars().count(), "Assistant answered");
        Ok(answer)
    }
}
