// Session domain types
//
// These types represent the LearningSession aggregate and its status.
// The core never holds a live session across turns: stores hand out
// snapshots and accept patches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::ChatTurn;
use crate::plan::LessonPlan;

/// Lifecycle status of a learning session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Created, plan generation not finished yet
    Planning,
    /// Plan generated, no tutoring turn taken
    Ready,
    /// At least one tutoring turn taken
    InProgress,
    /// Last topic of the last day reached (terminal)
    Completed,
    /// Plan generation failed (terminal)
    Failed,
}

impl SessionStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }

    /// Statuses in which a chat turn is allowed
    pub fn can_chat(&self) -> bool {
        matches!(self, SessionStatus::Ready | SessionStatus::InProgress)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Planning => write!(f, "PLANNING"),
            SessionStatus::Ready => write!(f, "READY"),
            SessionStatus::InProgress => write!(f, "IN_PROGRESS"),
            SessionStatus::Completed => write!(f, "COMPLETED"),
            SessionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl From<&str> for SessionStatus {
    fn from(s: &str) -> Self {
        match s {
            "READY" => SessionStatus::Ready,
            "IN_PROGRESS" => SessionStatus::InProgress,
            "COMPLETED" => SessionStatus::Completed,
            "FAILED" => SessionStatus::Failed,
            _ => SessionStatus::Planning,
        }
    }
}

/// How the session teaches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Multi-day curriculum
    Standard,
    /// Everything in a single session
    Quick,
    /// One LeetCode problem, fetched by number
    DsaLeetcode,
    /// One user-supplied DSA problem
    DsaCustom,
}

impl SessionMode {
    /// DSA modes teach one problem in one day
    pub fn is_dsa(&self) -> bool {
        matches!(self, SessionMode::DsaLeetcode | SessionMode::DsaCustom)
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMode::Standard => write!(f, "standard"),
            SessionMode::Quick => write!(f, "quick"),
            SessionMode::DsaLeetcode => write!(f, "dsa_leetcode"),
            SessionMode::DsaCustom => write!(f, "dsa_custom"),
        }
    }
}

/// Metadata for a DSA problem, fetched or supplied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemDetails {
    pub title: String,
    pub description: String,
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// LearningSession - one user's end-to-end engagement with one curriculum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSession {
    pub id: Uuid,
    pub user_id: Uuid,

    // Configuration, immutable after creation
    pub mode: SessionMode,
    pub topic: String,
    pub total_days: u32,
    pub time_per_day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    // DSA parameters (dsa_* modes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemDetails>,

    // Generated content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_plan: Option<LessonPlan>,
    /// Error payload retained when plan generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_error: Option<String>,

    // Live state
    pub status: SessionStatus,
    /// 1-indexed, never exceeds total_days
    pub current_day: u32,
    /// 0-indexed into the current day's topic list
    pub current_topic_index: u32,

    // Conversation artifacts
    /// Rolling buffer of recent turns, bounded by the memory threshold
    #[serde(default)]
    pub chat_buffer: Vec<ChatTurn>,
    /// Turns already folded into a summary, kept for history reads
    #[serde(default)]
    pub chat_archive: Vec<ChatTurn>,
    /// Accumulated summaries, oldest first
    #[serde(default)]
    pub summaries: Vec<String>,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl LearningSession {
    /// Concatenated memory summary, None when nothing was summarized yet
    pub fn memory_summary(&self) -> Option<String> {
        if self.summaries.is_empty() {
            None
        } else {
            Some(self.summaries.join("\n\n"))
        }
    }

    /// Full transcript: archived turns followed by the live buffer
    pub fn full_history(&self) -> Vec<ChatTurn> {
        let mut history = self.chat_archive.clone();
        history.extend(self.chat_buffer.iter().cloned());
        history
    }
}

/// Creation parameters handed to the session store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    pub user_id: Uuid,
    pub mode: SessionMode,
    pub topic: String,
    pub total_days: u32,
    pub time_per_day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemDetails>,
}

impl NewSession {
    pub fn new(user_id: Uuid, mode: SessionMode, topic: impl Into<String>) -> Self {
        Self {
            user_id,
            mode,
            topic: topic.into(),
            total_days: 1,
            time_per_day: "1 hour".to_string(),
            target: None,
            problem_number: None,
            programming_language: None,
            problem: None,
        }
    }

    pub fn with_total_days(mut self, total_days: u32) -> Self {
        self.total_days = total_days;
        self
    }

    pub fn with_time_per_day(mut self, time_per_day: impl Into<String>) -> Self {
        self.time_per_day = time_per_day.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Partial update applied by the session store; None leaves a field as is
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_plan: Option<LessonPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_topic_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_buffer: Option<Vec<ChatTurn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_archive: Option<Vec<ChatTurn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionPatch {
    pub fn status(status: SessionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Patch capturing everything a tutoring turn may have changed
    pub fn from_session(session: &LearningSession) -> Self {
        Self {
            status: Some(session.status),
            lesson_plan: session.lesson_plan.clone(),
            plan_error: session.plan_error.clone(),
            current_day: Some(session.current_day),
            current_topic_index: Some(session.current_topic_index),
            chat_buffer: Some(session.chat_buffer.clone()),
            chat_archive: Some(session.chat_archive.clone()),
            summaries: Some(session.summaries.clone()),
            completed_at: session.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_roundtrip() {
        for status in [
            SessionStatus::Planning,
            SessionStatus::Ready,
            SessionStatus::InProgress,
            SessionStatus::Completed,
            SessionStatus::Failed,
        ] {
            assert_eq!(SessionStatus::from(status.to_string().as_str()), status);
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(!SessionStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_memory_summary_joins_blocks() {
        let mut session = crate::memory::sample_session(SessionMode::Standard, 3);
        assert_eq!(session.memory_summary(), None);
        session.summaries = vec!["first block".into(), "second block".into()];
        assert_eq!(
            session.memory_summary().as_deref(),
            Some("first block\n\nsecond block")
        );
    }
}
