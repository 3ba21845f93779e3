// Gemini Driver Implementation
//
// This crate provides the Gemini LLM driver used by the tutoring service.
// Gemini exposes an OpenAI-compatible chat completions endpoint, so the
// driver wraps OpenAiProtocolLlmDriver from sage-core and points it at
// that endpoint.
//
// The per-role model lineup (planner, tutor, DSA) lives in `models` so
// the core config stays provider-agnostic.

mod driver;
mod models;

pub use driver::{GeminiLlmDriver, GEMINI_API_URL};
pub use models::{tutoring_config, GEMINI_25_FLASH, GEMINI_25_PRO, GEMINI_30_PRO};

// Re-export core types for convenience
pub use sage_core::{LlmCallConfig, LlmDriver, LlmMessage};
