// Conversation memory with buffer-based summarization
//
// Turns accumulate in a rolling buffer on the session. Once the buffer
// reaches the configured threshold after an assistant turn, the whole
// buffer is folded into a summary and moved to the archive. Summaries
// accumulate append-only; nothing spoken is ever dropped.

use tracing::{debug, info, warn};

use crate::config::{ModelSettings, SageConfig};
use crate::error::Result;
use crate::llm::{LlmCallConfig, LlmDriver, LlmMessage};
use crate::message::ChatTurn;
use crate::prompts::{SUMMARIZATION_PROMPT, SUMMARIZER_SYSTEM_PROMPT};
use crate::session::LearningSession;

/// What a tutoring turn sees of the conversation so far
#[derive(Debug, Clone)]
pub struct ConversationContext {
    /// All summaries joined, None until the first summarization
    pub memory_summary: Option<String>,
    /// Recent turns still in the buffer
    pub chat_history: Vec<ChatTurn>,
}

/// Buffer and summarization policy for session conversations
///
/// The manager itself is stateless; all conversation state lives on the
/// session so a turn can be rehydrated from the store alone.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    summarizer: ModelSettings,
    buffer_threshold: usize,
}

impl MemoryManager {
    pub fn new(config: &SageConfig) -> Self {
        Self {
            summarizer: config.summarizer_settings(),
            buffer_threshold: config.buffer_threshold,
        }
    }

    /// Append a student turn to the buffer
    pub fn record_user_turn(&self, session: &mut LearningSession, content: impl Into<String>) {
        session.chat_buffer.push(ChatTurn::user(content));
    }

    /// Append a tutor turn, summarizing the buffer if it reached the threshold
    ///
    /// Summarization failures are non-fatal: the turn already produced its
    /// reply, so the buffer is kept and a warning is logged. Returns the
    /// summary when one was produced.
    pub async fn record_assistant_turn<L: LlmDriver>(
        &self,
        session: &mut LearningSession,
        content: impl Into<String>,
        driver: &L,
    ) -> Option<String> {
        session.chat_buffer.push(ChatTurn::assistant(content));

        if !self.should_summarize(session) {
            return None;
        }

        info!(
            session_id = %session.id,
            buffer_len = session.chat_buffer.len(),
            "buffer threshold reached, summarizing"
        );
        match self.summarize_buffer(session, driver).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "summarization failed, keeping buffer");
                None
            }
        }
    }

    /// Whether the buffer has reached the summarization threshold
    pub fn should_summarize(&self, session: &LearningSession) -> bool {
        session.chat_buffer.len() >= self.buffer_threshold
    }

    /// Summarize regardless of the threshold; None if the buffer is empty
    pub async fn force_summarize<L: LlmDriver>(
        &self,
        session: &mut LearningSession,
        driver: &L,
    ) -> Result<Option<String>> {
        if session.chat_buffer.is_empty() {
            return Ok(None);
        }
        self.summarize_buffer(session, driver).await.map(Some)
    }

    /// Fold the whole buffer into one summary and move it to the archive
    ///
    /// On error the session is left exactly as it was.
    pub async fn summarize_buffer<L: LlmDriver>(
        &self,
        session: &mut LearningSession,
        driver: &L,
    ) -> Result<String> {
        let transcript = transcript(&session.chat_buffer);
        let prompt = SUMMARIZATION_PROMPT.replace("{conversation}", &transcript);

        let config = LlmCallConfig::new(self.summarizer.model.clone())
            .with_temperature(self.summarizer.temperature);
        let messages = vec![
            LlmMessage::system(SUMMARIZER_SYSTEM_PROMPT),
            LlmMessage::user(prompt),
        ];
        let response = driver.chat_completion(messages, &config).await?;
        let summary = response.text.trim().to_string();

        debug!(
            session_id = %session.id,
            summarized_turns = session.chat_buffer.len(),
            "buffer summarized"
        );
        session.summaries.push(summary.clone());
        let drained: Vec<ChatTurn> = session.chat_buffer.drain(..).collect();
        session.chat_archive.extend(drained);

        Ok(summary)
    }

    /// Context handed to the tutoring turn
    pub fn context(&self, session: &LearningSession) -> ConversationContext {
        ConversationContext {
            memory_summary: session.memory_summary(),
            chat_history: session.chat_buffer.clone(),
        }
    }
}

/// Render turns as a readable transcript for the summarizer
pub fn transcript(turns: &[ChatTurn]) -> String {
    turns
        .iter()
        .map(ChatTurn::transcript_line)
        .collect::<Vec<_>>()
        .join("\n\n")
}
