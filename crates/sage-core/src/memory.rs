// In-memory implementations for examples and testing
//
// These implementations keep all data in memory, making them perfect for:
// - Standalone examples that don't need a database
// - Unit tests
// - Quick prototyping

use async_trait::async_trait;
use chrono::Utc;
use futures::stream;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, SageError};
use crate::llm::{
    LlmCallConfig, LlmCompletionMetadata, LlmDriver, LlmMessage, LlmResponseStream, LlmStreamEvent,
};
use crate::plan::{DayPlan, LessonPlan, TopicPlan};
use crate::session::{
    LearningSession, NewSession, ProblemDetails, SessionMode, SessionPatch, SessionStatus,
};
use crate::traits::{ProblemCatalog, SessionFilter, SessionStore};

// ============================================================================
// InMemorySessionStore - Stores learning sessions in memory
// ============================================================================

/// In-memory session store
///
/// Stores sessions in a HashMap keyed by session ID.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, LearningSession>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory session store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get all session IDs
    pub async fn session_ids(&self) -> Vec<Uuid> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Clear all sessions
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Pre-populate with a session (useful for testing)
    pub async fn seed(&self, session: LearningSession) {
        self.sessions.write().await.insert(session.id, session);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, new_session: NewSession) -> Result<LearningSession> {
        let now = Utc::now();
        let session = LearningSession {
            id: Uuid::now_v7(),
            user_id: new_session.user_id,
            mode: new_session.mode,
            topic: new_session.topic,
            total_days: new_session.total_days,
            time_per_day: new_session.time_per_day,
            target: new_session.target,
            problem_number: new_session.problem_number,
            programming_language: new_session.programming_language,
            problem: new_session.problem,
            lesson_plan: None,
            plan_error: None,
            status: SessionStatus::Planning,
            current_day: 1,
            current_topic_index: 0,
            chat_buffer: Vec::new(),
            chat_archive: Vec::new(),
            summaries: Vec::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.sessions.write().await.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, session_id: Uuid) -> Result<Option<LearningSession>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn update(&self, session_id: Uuid, patch: SessionPatch) -> Result<LearningSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(SageError::SessionNotFound(session_id))?;

        if let Some(status) = patch.status {
            session.status = status;
        }
        if let Some(plan) = patch.lesson_plan {
            session.lesson_plan = Some(plan);
        }
        if let Some(error) = patch.plan_error {
            session.plan_error = Some(error);
        }
        if let Some(day) = patch.current_day {
            session.current_day = day;
        }
        if let Some(index) = patch.current_topic_index {
            session.current_topic_index = index;
        }
        if let Some(buffer) = patch.chat_buffer {
            session.chat_buffer = buffer;
        }
        if let Some(archive) = patch.chat_archive {
            session.chat_archive = archive;
        }
        if let Some(summaries) = patch.summaries {
            session.summaries = summaries;
        }
        if let Some(completed_at) = patch.completed_at {
            session.completed_at = Some(completed_at);
        }
        session.updated_at = Utc::now();

        Ok(session.clone())
    }

    async fn delete(&self, session_id: Uuid) -> Result<bool> {
        Ok(self.sessions.write().await.remove(&session_id).is_some())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
    ) -> Result<Vec<LearningSession>> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<LearningSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .filter(|s| filter.mode.map_or(true, |m| s.mode == m))
            .filter(|s| filter.status.map_or(true, |st| s.status == st))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }
}

// ============================================================================
// StaticProblemCatalog - Serves problems from a fixed map
// ============================================================================

/// Problem catalog backed by a fixed map
///
/// Useful for testing and offline examples; production backends would
/// query an external problem API instead.
#[derive(Debug, Default, Clone)]
pub struct StaticProblemCatalog {
    problems: Arc<RwLock<HashMap<u32, ProblemDetails>>>,
}

impl StaticProblemCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            problems: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a problem to the catalog
    pub async fn add_problem(&self, number: u32, details: ProblemDetails) {
        self.problems.write().await.insert(number, details);
    }
}

#[async_trait]
impl ProblemCatalog for StaticProblemCatalog {
    async fn lookup(&self, problem_number: u32) -> Result<Option<ProblemDetails>> {
        Ok(self.problems.read().await.get(&problem_number).cloned())
    }
}

// ============================================================================
// MockLlmDriver - Returns predefined replies
// ============================================================================

/// A scripted mock reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with this text
    Text(String),
    /// Fail the call with this error message
    Failure(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// One logged LLM call
#[derive(Debug, Clone)]
pub struct MockLlmCall {
    pub messages: Vec<LlmMessage>,
    pub config: LlmCallConfig,
}

/// Mock LLM driver for testing
///
/// Returns predefined replies in sequence and logs every call with the
/// config it was made with, so tests can assert on model and temperature.
#[derive(Debug, Default, Clone)]
pub struct MockLlmDriver {
    replies: Arc<RwLock<Vec<MockReply>>>,
    call_index: Arc<RwLock<usize>>,
    call_log: Arc<RwLock<Vec<MockLlmCall>>>,
}

impl MockLlmDriver {
    /// Create a new mock driver
    pub fn new() -> Self {
        Self {
            replies: Arc::new(RwLock::new(Vec::new())),
            call_index: Arc::new(RwLock::new(0)),
            call_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Add a reply to the queue
    pub async fn add_reply(&self, reply: MockReply) {
        self.replies.write().await.push(reply);
    }

    /// Set all replies at once
    pub async fn set_replies(&self, replies: Vec<MockReply>) {
        *self.replies.write().await = replies;
        *self.call_index.write().await = 0;
    }

    /// Get the call log
    pub async fn calls(&self) -> Vec<MockLlmCall> {
        self.call_log.read().await.clone()
    }

    /// Number of calls made so far
    pub async fn call_count(&self) -> usize {
        self.call_log.read().await.len()
    }

    /// Reset the driver
    pub async fn reset(&self) {
        self.replies.write().await.clear();
        *self.call_index.write().await = 0;
        self.call_log.write().await.clear();
    }
}

#[async_trait]
impl LlmDriver for MockLlmDriver {
    async fn chat_completion_stream(
        &self,
        messages: Vec<LlmMessage>,
        config: &LlmCallConfig,
    ) -> Result<LlmResponseStream> {
        // Log the call
        self.call_log.write().await.push(MockLlmCall {
            messages,
            config: config.clone(),
        });

        // Get next reply
        let mut index = self.call_index.write().await;
        let replies = self.replies.read().await;
        let reply = replies
            .get(*index)
            .cloned()
            .unwrap_or_else(|| MockReply::text("Mock reply (no more replies configured)"));
        *index += 1;
        drop(index);
        drop(replies);

        let text = match reply {
            MockReply::Text(text) => text,
            MockReply::Failure(message) => return Err(SageError::llm(message)),
        };

        let events = vec![
            Ok(LlmStreamEvent::TextDelta(text)),
            Ok(LlmStreamEvent::Done(LlmCompletionMetadata::default())),
        ];
        Ok(Box::pin(stream::iter(events)))
    }
}

// ============================================================================
// Sample data - Fixtures shared by unit and integration tests
// ============================================================================

/// A lesson plan with the given number of days, two topics per day
pub fn sample_plan(days: u32) -> LessonPlan {
    let days: Vec<DayPlan> = (1..=days)
        .map(|day| DayPlan {
            day,
            title: format!("Day {} fundamentals", day),
            objectives: vec![format!("Understand the day {} material", day)],
            estimated_duration: Some("60 minutes".to_string()),
            topics: vec![
                TopicPlan {
                    name: format!("Concept {}.1", day),
                    duration: "30 minutes".to_string(),
                    key_concepts: vec!["definitions".to_string(), "intuition".to_string()],
                    teaching_approach: "Explain with a concrete example".to_string(),
                    check_questions: vec!["Can you restate this in your own words?".to_string()],
                },
                TopicPlan {
                    name: format!("Concept {}.2", day),
                    duration: "30 minutes".to_string(),
                    key_concepts: vec!["application".to_string()],
                    teaching_approach: "Work through an exercise together".to_string(),
                    check_questions: vec!["What would change if the input doubled?".to_string()],
                },
            ],
            day_summary: format!("Wrap-up of day {}", day),
            practice_suggestions: vec![format!("Redo the day {} exercise from scratch", day)],
        })
        .collect();

    LessonPlan {
        title: "Sample Curriculum".to_string(),
        description: "A compact plan used by tests and examples".to_string(),
        learning_outcomes: vec!["Explain the core ideas without notes".to_string()],
        total_days: Some(days.len() as u32),
        time_per_day: Some("1 hour".to_string()),
        target: None,
        difficulty_progression: None,
        days,
    }
}

/// A READY session with a sample plan attached
pub fn sample_session(mode: SessionMode, days: u32) -> LearningSession {
    let now = Utc::now();
    LearningSession {
        id: Uuid::now_v7(),
        user_id: Uuid::now_v7(),
        mode,
        topic: "Graph algorithms".to_string(),
        total_days: days,
        time_per_day: "1 hour".to_string(),
        target: None,
        problem_number: None,
        programming_language: None,
        problem: None,
        lesson_plan: Some(sample_plan(days)),
        plan_error: None,
        status: SessionStatus::Ready,
        current_day: 1,
        current_topic_index: 0,
        chat_buffer: Vec::new(),
        chat_archive: Vec::new(),
        summaries: Vec::new(),
        created_at: now,
        updated_at: now,
        completed_at: None,
    }
}

/// A problem entry for DSA tests
pub fn sample_problem() -> ProblemDetails {
    ProblemDetails {
        title: "Two Sum".to_string(),
        description: "Given an array of integers nums and an integer target, \
                      return indices of the two numbers that add up to target."
            .to_string(),
        difficulty: "Easy".to_string(),
        tags: vec!["array".to_string(), "hash-table".to_string()],
    }
}
