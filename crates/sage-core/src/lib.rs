// AI Tutoring Core
//
// This crate is the backend core of an LLM-driven tutoring service: plan
// generation, turn-by-turn teaching, conversation memory, and progress
// tracking over multi-day lesson plans.
//
// Key design decisions:
// - Uses traits (SessionStore, ProblemCatalog, LlmDriver) for pluggable backends
// - One orchestration graph per turn: plan generator node, tutor node, one branch
// - Graph state is rehydrated from the session snapshot each turn; deltas are
//   persisted only after the LLM call succeeded
// - Topic advancement is read off a marker the tutor appends to its reply
// - The conversation buffer folds into rolling summaries past a threshold
// - Response-size classification picks burst vs stream delivery and nothing else
// - Error handling distinguishes invalid input, invalid state, and LLM failures

// Domain types
pub mod message;
pub mod plan;
pub mod session;

pub mod config;
pub mod conversation;
pub mod delivery;
pub mod error;
pub mod graph;
pub mod llm;
pub mod planner;
pub mod progress;
pub mod prompts;
pub mod service;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// LLM driver over the OpenAI-compatible wire protocol
pub mod openai_protocol;

// Re-exports for convenience
pub use config::{ModelSettings, SageConfig, SageConfigBuilder};
pub use error::{Result, SageError};
pub use message::{ChatTurn, TurnRole};
pub use plan::{DayPlan, LessonPlan, TopicPlan};
pub use session::{
    LearningSession, NewSession, ProblemDetails, SessionMode, SessionPatch, SessionStatus,
};

pub use conversation::{ConversationContext, MemoryManager};
pub use delivery::{
    DeliveryMode, DeliveryPolicy, KeywordClassifier, ResponseClass, ResponseClassifier,
};
pub use graph::{Route, TurnOutcome, TutorGraph};
pub use planner::{resolve_dsa_problem, PlanGenerator};
pub use progress::progress_percentage;
pub use service::{
    DayContent, LessonStart, PlanCreated, PlanRequest, PlanView, TurnReply, TutorService,
    DEFAULT_HISTORY_LIMIT,
};
pub use traits::{ProblemCatalog, SessionFilter, SessionStore};

// LLM plumbing re-exports
pub use llm::{
    LlmCallConfig, LlmCompletionMetadata, LlmDriver, LlmMessage, LlmMessageRole, LlmResponse,
    LlmResponseStream, LlmStreamEvent,
};
pub use openai_protocol::OpenAiProtocolLlmDriver;

// In-memory implementations re-exports
pub use memory::{InMemorySessionStore, MockLlmDriver, MockReply, StaticProblemCatalog};
