// Service configuration
//
// SageConfig is a backend-agnostic configuration struct that can be:
// - Created directly for standalone usage
// - Deserialized from a config file or environment layer
//
// Model defaults follow the Gemini lineup, but any OpenAI-compatible
// model name works since drivers are pluggable.

use serde::{Deserialize, Serialize};

use crate::session::SessionMode;

/// Model name and sampling temperature for one LLM role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
}

impl ModelSettings {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature,
        }
    }
}

/// Configuration for the tutoring service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SageConfig {
    /// Model used for lesson plan generation (strict JSON output)
    #[serde(default = "default_planner")]
    pub planner: ModelSettings,

    /// Model used for tutoring turns in standard and quick sessions
    #[serde(default = "default_tutor")]
    pub tutor: ModelSettings,

    /// Model used for tutoring turns in DSA sessions
    #[serde(default = "default_dsa")]
    pub dsa: ModelSettings,

    /// Stronger model used for DSA plan generation on custom problems
    #[serde(default = "default_dsa_heavy")]
    pub dsa_heavy: ModelSettings,

    /// Temperature for conversation summarization (runs on the tutor model)
    #[serde(default = "default_summarizer_temperature")]
    pub summarizer_temperature: f32,

    /// Number of buffered turns that triggers summarization
    #[serde(default = "default_buffer_threshold")]
    pub buffer_threshold: usize,

    /// Expected-token count at or above which a reply should stream
    #[serde(default = "default_stream_token_threshold")]
    pub stream_token_threshold: u32,
}

fn default_planner() -> ModelSettings {
    ModelSettings::new("gemini-2.5-pro", 0.3)
}

fn default_tutor() -> ModelSettings {
    ModelSettings::new("gemini-2.5-flash", 0.7)
}

fn default_dsa() -> ModelSettings {
    ModelSettings::new("gemini-2.5-pro", 0.5)
}

fn default_dsa_heavy() -> ModelSettings {
    ModelSettings::new("gemini-3.0-pro", 0.5)
}

fn default_summarizer_temperature() -> f32 {
    0.3
}

fn default_buffer_threshold() -> usize {
    10
}

fn default_stream_token_threshold() -> u32 {
    100
}

impl Default for SageConfig {
    fn default() -> Self {
        Self {
            planner: default_planner(),
            tutor: default_tutor(),
            dsa: default_dsa(),
            dsa_heavy: default_dsa_heavy(),
            summarizer_temperature: default_summarizer_temperature(),
            buffer_threshold: default_buffer_threshold(),
            stream_token_threshold: default_stream_token_threshold(),
        }
    }
}

impl SageConfig {
    /// Settings for tutoring turns in the given session mode
    pub fn tutor_settings(&self, mode: SessionMode) -> &ModelSettings {
        if mode.is_dsa() {
            &self.dsa
        } else {
            &self.tutor
        }
    }

    /// Settings for plan generation in the given session mode
    ///
    /// Plan generation always runs at the planner temperature; DSA modes
    /// swap in a model suited to algorithm explanations.
    pub fn planner_settings(&self, mode: SessionMode) -> ModelSettings {
        let model = match mode {
            SessionMode::Standard | SessionMode::Quick => &self.planner.model,
            SessionMode::DsaLeetcode => &self.dsa.model,
            SessionMode::DsaCustom => &self.dsa_heavy.model,
        };
        ModelSettings::new(model.clone(), self.planner.temperature)
    }

    /// Settings for conversation summarization
    pub fn summarizer_settings(&self) -> ModelSettings {
        ModelSettings::new(self.tutor.model.clone(), self.summarizer_temperature)
    }
}

/// Builder for SageConfig with fluent API
pub struct SageConfigBuilder {
    config: SageConfig,
}

impl SageConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: SageConfig::default(),
        }
    }

    /// Set the planner model
    pub fn planner(mut self, settings: ModelSettings) -> Self {
        self.config.planner = settings;
        self
    }

    /// Set the tutor model
    pub fn tutor(mut self, settings: ModelSettings) -> Self {
        self.config.tutor = settings;
        self
    }

    /// Set the DSA tutor model
    pub fn dsa(mut self, settings: ModelSettings) -> Self {
        self.config.dsa = settings;
        self
    }

    /// Set the heavy DSA planning model
    pub fn dsa_heavy(mut self, settings: ModelSettings) -> Self {
        self.config.dsa_heavy = settings;
        self
    }

    /// Set the summarization trigger threshold
    pub fn buffer_threshold(mut self, threshold: usize) -> Self {
        self.config.buffer_threshold = threshold;
        self
    }

    /// Set the streaming token threshold
    pub fn stream_token_threshold(mut self, threshold: u32) -> Self {
        self.config.stream_token_threshold = threshold;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SageConfig {
        self.config
    }
}

impl Default for SageConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
