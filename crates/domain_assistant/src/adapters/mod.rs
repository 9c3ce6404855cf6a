//! Document assistant adapters

mod disabled;
mod http;

pub use disabled::DisabledAssistant;
pub use http::{HttpAssistant, HttpAssistantConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_K};
