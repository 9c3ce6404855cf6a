//! Document assistant errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur when asking the document assistant
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Document assistant unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid assistant configuration: {0}")]
    Configuration(String),
}

impl AssistantError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AssistantError::Unavailable(_))
    }
}

impl From<PortError> for AssistantError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Validation { message, .. } => AssistantError::InvalidQuestion(message),
            other => AssistantError::Unavailable(other.to_string()),
        }
    }
}
