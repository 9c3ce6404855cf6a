//! Document Assistant Domain
//!
//! Adjusters ask free-text questions about the claims-handling manual. The
//! retrieval and generation pipeline that answers them is an external
//! service; this crate defines the port it is reached through and the
//! adapters for it.
//!
//! # Adapters
//!
//! - [`adapters::HttpAssistant`]: JSON over HTTP with timeout and bounded retry
//! - [`adapters::DisabledAssistant`]: used when no endpoint is configured
//! - `ports::mock::InMemoryAssistant`: canned answers (feature `mock`)
//!
//! An unavailable assistant never affects claim lookup or scoring; callers
//! receive [`AssistantError::Unavailable`] and report it.

pub mod question;
pub mod ports;
pub mod adapters;
pub mod error;

pub use question::{Question, MAX_QUESTION_CHARS};
pub use ports::DocumentAssistant;
pub use adapters::{DisabledAssistant, HttpAssistant, HttpAssistantConfig};
pub use error::AssistantError;
