// Turn orchestration
//
// Two nodes and one branch. A turn enters at the router: sessions without
// a lesson plan go through the plan generator first, then fall into the
// tutor node for the welcome message; sessions with a plan go straight to
// the tutor. The graph holds no state between turns. Everything it needs
// is rehydrated from the session snapshot, and everything it decides is
// handed back in the outcome for the caller to persist.

use tracing::{debug, info};

use crate::config::SageConfig;
use crate::delivery::{
    DeliveryMode, DeliveryPolicy, KeywordClassifier, ResponseClass, ResponseClassifier,
};
use crate::error::{Result, SageError};
use crate::llm::{LlmCallConfig, LlmDriver, LlmMessage};
use crate::plan::LessonPlan;
use crate::planner::PlanGenerator;
use crate::progress::is_last_topic;
use crate::prompts::{self, ADVANCE_MARKER, STAY_MARKER};
use crate::session::LearningSession;

/// Which node a turn enters at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PlanGenerator,
    Tutor,
}

/// Everything one graph invocation decided. The caller owns persistence;
/// nothing here has touched the store yet.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The visible tutor reply, progress markers stripped.
    pub reply: String,
    /// Present when the plan generator node ran this turn.
    pub lesson_plan: Option<LessonPlan>,
    /// The tutor confirmed the current topic's check question.
    pub should_advance_topic: bool,
    /// Advancing would move past the last topic of the current day.
    pub is_day_complete: bool,
    /// Day complete on the final day.
    pub is_course_complete: bool,
    /// Predicted reply shape for the delivery decision.
    pub response_class: ResponseClass,
    /// Burst or stream, advisory for the transport layer.
    pub delivery: DeliveryMode,
}

/// The per-turn orchestration graph.
pub struct TutorGraph {
    config: SageConfig,
    planner: PlanGenerator,
    classifier: Box<dyn ResponseClassifier>,
    policy: DeliveryPolicy,
}

impl TutorGraph {
    pub fn new(config: &SageConfig) -> Self {
        Self {
            config: config.clone(),
            planner: PlanGenerator::new(config),
            classifier: Box::new(KeywordClassifier),
            policy: DeliveryPolicy::from_config(config),
        }
    }

    /// Swaps the response classifier. The classifier only picks the
    /// delivery mode; it never changes what the tutor says.
    pub fn with_classifier(mut self, classifier: Box<dyn ResponseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Routing branch at the graph entry.
    pub fn route(session: &LearningSession) -> Route {
        if session.lesson_plan.is_none() {
            Route::PlanGenerator
        } else {
            Route::Tutor
        }
    }

    /// Runs one turn through the graph.
    ///
    /// `user_message` of `None` means "start or resume the lesson"; the
    /// tutor is then prompted with a first-message or day-start
    /// instruction instead of student text.
    pub async fn invoke<L: LlmDriver>(
        &self,
        session: &LearningSession,
        user_message: Option<&str>,
        llm: &L,
    ) -> Result<TurnOutcome> {
        match Self::route(session) {
            Route::PlanGenerator => self.plan_generator_node(session, user_message, llm).await,
            Route::Tutor => self.tutor_node(session, user_message, llm).await,
        }
    }

    /// Generates the lesson plan, then flows into the tutor node so the
    /// same turn also yields the welcome message.
    async fn plan_generator_node<L: LlmDriver>(
        &self,
        session: &LearningSession,
        user_message: Option<&str>,
        llm: &L,
    ) -> Result<TurnOutcome> {
        debug!(session_id = %session.id, "no lesson plan, routing to plan generator");
        let plan = self.planner.generate(session, llm).await?;

        let mut planned = session.clone();
        planned.lesson_plan = Some(plan);

        let mut outcome = self.tutor_node(&planned, user_message, llm).await?;
        outcome.lesson_plan = planned.lesson_plan;
        Ok(outcome)
    }

    /// One tutoring exchange: system prompt from the session position,
    /// buffered history, then the student's message (or a start/resume
    /// instruction). A single LLM call; errors propagate untouched so the
    /// turn stays retryable.
    async fn tutor_node<L: LlmDriver>(
        &self,
        session: &LearningSession,
        user_message: Option<&str>,
        llm: &L,
    ) -> Result<TurnOutcome> {
        let plan = session
            .lesson_plan
            .as_ref()
            .ok_or_else(|| SageError::invalid_state("tutor node requires a lesson plan"))?;
        let day = plan.day(session.current_day).ok_or_else(|| {
            SageError::invalid_state(format!(
                "Day {} is not in the lesson plan",
                session.current_day
            ))
        })?;

        let memory = session.memory_summary();
        let system = prompts::tutor_system_prompt(session, day, memory.as_deref());

        let mut messages = Vec::with_capacity(session.chat_buffer.len() + 2);
        messages.push(LlmMessage::system(system));
        messages.extend(session.chat_buffer.iter().map(LlmMessage::from));
        messages.push(LlmMessage::user(match user_message {
            Some(text) => text.to_string(),
            None if session.current_day <= 1 => prompts::first_message_instruction(session, day),
            None => prompts::day_start_instruction(session, day, memory.as_deref()),
        }));

        let response_class = self.classifier.classify(user_message);
        let delivery = self.policy.mode_for(response_class);

        let settings = self.config.tutor_settings(session.mode);
        let call = LlmCallConfig::new(&settings.model).with_temperature(settings.temperature);
        let response = llm.chat_completion(messages, &call).await?;

        let (reply, should_advance_topic) = extract_progress_signal(&response.text);
        let is_day_complete =
            should_advance_topic && is_last_topic(day, session.current_topic_index);
        let is_course_complete = is_day_complete && session.current_day >= session.total_days;

        info!(
            session_id = %session.id,
            day = session.current_day,
            topic_index = session.current_topic_index,
            advance = should_advance_topic,
            class = ?response_class,
            "tutor turn complete"
        );

        Ok(TurnOutcome {
            reply,
            lesson_plan: None,
            should_advance_topic,
            is_day_complete,
            is_course_complete,
            response_class,
            delivery,
        })
    }
}

/// Splits the progress marker off a tutor reply.
///
/// Only a trailing `[[ADVANCE]]` sets the signal; a trailing `[[STAY]]`
/// (or nothing) leaves it unset. Stray markers anywhere else are scrubbed
/// from the visible text without affecting the signal.
pub fn extract_progress_signal(text: &str) -> (String, bool) {
    let mut tail = text.trim_end();
    let mut advance = false;
    loop {
        if let Some(rest) = tail.strip_suffix(ADVANCE_MARKER) {
            advance = true;
            tail = rest.trim_end();
        } else if let Some(rest) = tail.strip_suffix(STAY_MARKER) {
            tail = rest.trim_end();
        } else {
            break;
        }
    }

    let visible = tail
        .replace(ADVANCE_MARKER, "")
        .replace(STAY_MARKER, "")
        .trim()
        .to_string();
    (visible, advance)
}

// ============================================================================
// Tests
// ============================================================================
