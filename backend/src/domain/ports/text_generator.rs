//! Port abstraction for the external text-generation service.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by text-generation adapters.
    pub enum TextGenerationError {
        /// The service could not be reached or timed out.
        Transport { message: String } => "text generation transport failed: {message}",
        /// The service answered with a non-success status.
        Status { status: u16, message: String } => "text generation returned {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "text generation response invalid: {message}",
        /// No API key is configured.
        NotConfigured => "text generation is not configured",
    }
}

/// Generates free text from a prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit `prompt` and return the first candidate text, if any.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, TextGenerationError>;
}
