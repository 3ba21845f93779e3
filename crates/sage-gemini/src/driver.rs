// Gemini LLM Driver
//
// Production driver for Gemini, spoken over the OpenAI-compatible
// endpoint. Wraps OpenAiProtocolLlmDriver from core and can add
// Gemini-specific features in the future.

use async_trait::async_trait;
use tracing::debug;

use sage_core::error::{Result, SageError};
use sage_core::llm::{LlmCallConfig, LlmDriver, LlmMessage, LlmResponseStream};
use sage_core::OpenAiProtocolLlmDriver;

/// Gemini's OpenAI-compatible chat completions endpoint
pub const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

/// Gemini LLM Driver
///
/// # Example
///
/// ```ignore
/// use sage_gemini::GeminiLlmDriver;
///
/// let driver = GeminiLlmDriver::from_env()?;
/// // or
/// let driver = GeminiLlmDriver::new("your-api-key");
/// // or with a custom endpoint (proxies, regional endpoints)
/// let driver = GeminiLlmDriver::with_base_url("your-api-key", "https://proxy.example.com/v1beta/openai/chat/completions");
/// ```
#[derive(Clone)]
pub struct GeminiLlmDriver {
    inner: OpenAiProtocolLlmDriver,
}

impl GeminiLlmDriver {
    /// Create a new driver with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            inner: OpenAiProtocolLlmDriver::with_base_url(api_key, GEMINI_API_URL),
        }
    }

    /// Create a new driver from the GEMINI_API_KEY environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| SageError::llm("GEMINI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key))
    }

    /// Create a new driver with a custom API URL
    pub fn with_base_url(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            inner: OpenAiProtocolLlmDriver::with_base_url(api_key, api_url),
        }
    }

    /// Get the API URL
    pub fn api_url(&self) -> &str {
        self.inner.api_url()
    }
}

#[async_trait]
impl LlmDriver for GeminiLlmDriver {
    async fn chat_completion_stream(
        &self,
        messages: Vec<LlmMessage>,
        config: &LlmCallConfig,
    ) -> Result<LlmResponseStream> {
        debug!(model = %config.model, messages = messages.len(), "gemini chat completion");
        // Delegate to the base protocol implementation
        // Future: map Gemini-only sampling parameters here
        self.inner.chat_completion_stream(messages, config).await
    }
}

impl std::fmt::Debug for GeminiLlmDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiLlmDriver")
            .field("api_url", &self.api_url())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
