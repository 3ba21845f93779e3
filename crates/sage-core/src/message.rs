// Chat turn types
//
// ChatTurn is a store-agnostic record of a single utterance in the
// tutoring conversation, as persisted on the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The learner
    User,
    /// The tutor
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<&str> for TurnRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "assistant" | "ai" | "tutor" => TurnRole::Assistant,
            _ => TurnRole::User,
        }
    }
}

/// One utterance in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Unique turn ID
    pub id: Uuid,

    /// Who spoke
    pub role: TurnRole,

    /// Utterance text
    pub content: String,

    /// Timestamp when the turn was recorded
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// Create a new learner turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: TurnRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a new tutor turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: TurnRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Transcript line for summarization ("Student: ..." / "Tutor: ...")
    pub fn transcript_line(&self) -> String {
        match self.role {
            TurnRole::User => format!("Student: {}", self.content),
            TurnRole::Assistant => format!("Tutor: {}", self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_turn() {
        let turn = ChatTurn::user("What is recursion?");
        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.content, "What is recursion?");
    }

    #[test]
    fn test_transcript_line() {
        let turn = ChatTurn::assistant("Think of it as a mirror facing a mirror.");
        assert_eq!(
            turn.transcript_line(),
            "Tutor: Think of it as a mirror facing a mirror."
        );
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(TurnRole::from("assistant"), TurnRole::Assistant);
        assert_eq!(TurnRole::from("human"), TurnRole::User);
    }
}
