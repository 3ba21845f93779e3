// Tutoring service
//
// The composition root: session store, problem catalog, and LLM driver are
// injected, the orchestration graph and memory manager are built from the
// config. All persistence funnels through here. Graph invocations mutate a
// local session snapshot, and the snapshot is written back in a single
// update only after the LLM call succeeded, so a failed turn leaves the
// stored session exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SageConfig;
use crate::conversation::MemoryManager;
use crate::delivery::{DeliveryMode, ResponseClass, ResponseClassifier};
use crate::error::{Result, SageError};
use crate::graph::TutorGraph;
use crate::llm::{LlmCallConfig, LlmDriver, LlmMessage};
use crate::message::ChatTurn;
use crate::plan::{DayPlan, LessonPlan};
use crate::planner::{self, PlanGenerator};
use crate::progress;
use crate::prompts;
use crate::session::{
    LearningSession, NewSession, ProblemDetails, SessionMode, SessionPatch, SessionStatus,
};
use crate::traits::{ProblemCatalog, SessionFilter, SessionStore};

/// Default number of turns returned by [`TutorService::chat_history`].
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

// ============================================================================
// Requests and replies
// ============================================================================

/// Inputs for creating a learning session and generating its plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub user_id: Uuid,
    pub mode: SessionMode,
    pub topic: String,
    pub total_days: u32,
    pub time_per_day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_text: Option<String>,
}

impl PlanRequest {
    pub fn new(user_id: Uuid, mode: SessionMode, topic: impl Into<String>) -> Self {
        Self {
            user_id,
            mode,
            topic: topic.into(),
            total_days: 7,
            time_per_day: "1 hour".to_string(),
            target: None,
            problem_number: None,
            programming_language: None,
            problem_text: None,
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

    pub fn with_problem_number(mut self, number: u32) -> Self {
        self.problem_number = Some(number);
        self
    }

    pub fn with_programming_language(mut self, language: impl Into<String>) -> Self {
        self.programming_language = Some(language.into());
        self
    }

    pub fn with_problem_text(mut self, text: impl Into<String>) -> Self {
        self.problem_text = Some(text.into());
        self
    }

    /// Bounds checks applied before any session is created.
    fn validate(&self) -> Result<()> {
        // DSA sessions derive their topic from the problem statement.
        if !self.mode.is_dsa() {
            let len = self.topic.chars().count();
            if !(3..=500).contains(&len) {
                return Err(SageError::invalid_input(
                    "Topic must be between 3 and 500 characters",
                ));
            }
        }
        if !(1..=90).contains(&self.total_days) {
            return Err(SageError::invalid_input(
                "Total days must be between 1 and 90",
            ));
        }
        if let Some(target) = &self.target {
            if target.chars().count() > 500 {
                return Err(SageError::invalid_input(
                    "Target must be at most 500 characters",
                ));
            }
        }
        if let Some(text) = &self.problem_text {
            if text.chars().count() > 5000 {
                return Err(SageError::invalid_input(
                    "Problem text must be at most 5000 characters",
                ));
            }
        }
        Ok(())
    }
}

/// Outcome of plan creation. Generation failures are part of the payload,
/// not an `Err`: the session exists either way and carries the error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanCreated {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_plan: Option<LessonPlan>,
}

/// One tutoring exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReply {
    pub response: String,
    pub current_day: u32,
    pub current_topic_index: u32,
    pub is_day_complete: bool,
    pub is_course_complete: bool,
    pub response_class: ResponseClass,
    pub delivery: DeliveryMode,
}

/// Payload returned when a lesson starts or resumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonStart {
    pub current_day: u32,
    pub day_title: String,
    pub objectives: Vec<String>,
    pub welcome_message: String,
    pub delivery: DeliveryMode,
}

/// The lesson plan together with computed progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanView {
    pub session_id: Uuid,
    pub topic: String,
    pub lesson_plan: LessonPlan,
    pub current_day: u32,
    pub total_days: u32,
    pub progress_percentage: f64,
}

/// A single day of the plan with position flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayContent {
    pub session_id: Uuid,
    pub total_days: u32,
    pub is_current_day: bool,
    pub is_completed: bool,
    pub day: DayPlan,
}

// ============================================================================
// Service
// ============================================================================

/// Tutoring backend facade. Everything stateful it touches comes in
/// through the constructor.
pub struct TutorService<S, C, L> {
    store: S,
    catalog: C,
    llm: L,
    config: SageConfig,
    graph: TutorGraph,
    planner: PlanGenerator,
    memory: MemoryManager,
}

impl<S, C, L> TutorService<S, C, L>
where
    S: SessionStore,
    C: ProblemCatalog,
    L: LlmDriver,
{
    pub fn new(store: S, catalog: C, llm: L, config: SageConfig) -> Self {
        Self {
            graph: TutorGraph::new(&config),
            planner: PlanGenerator::new(&config),
            memory: MemoryManager::new(&config),
            store,
            catalog,
            llm,
            config,
        }
    }

    /// Replaces the delivery classifier used by the tutor turns.
    pub fn with_classifier(mut self, classifier: Box<dyn ResponseClassifier>) -> Self {
        self.graph = TutorGraph::new(&self.config).with_classifier(classifier);
        self
    }

    // ------------------------------------------------------------------
    // Plan creation
    // ------------------------------------------------------------------

    /// Creates a session and generates its lesson plan in one shot.
    ///
    /// The returned message is the tutor's welcome for standard modes and
    /// a fixed "ready to solve" line for DSA. On generation failure the
    /// session is kept in FAILED with the error payload retained.
    pub async fn create_plan(&self, request: PlanRequest) -> Result<PlanCreated> {
        request.validate()?;

        if request.mode.is_dsa() {
            return self.create_dsa_plan(request).await;
        }

        let total_days = match request.mode {
            SessionMode::Quick => 1,
            _ => request.total_days,
        };

        let mut new_session = NewSession::new(request.user_id, request.mode, request.topic)
            .with_total_days(total_days)
            .with_time_per_day(request.time_per_day);
        new_session.target = request.target;

        let session = self.store.create(new_session).await?;
        info!(
            session_id = %session.id,
            mode = %session.mode,
            total_days,
            "session created, generating plan"
        );

        match self.graph.invoke(&session, None, &self.llm).await {
            Ok(outcome) => {
                let plan = outcome
                    .lesson_plan
                    .ok_or_else(|| SageError::plan("plan generator produced no plan"))?;

                let mut patch = SessionPatch::status(SessionStatus::Ready);
                patch.lesson_plan = Some(plan);
                let updated = self.store.update(session.id, patch).await?;

                let message = if outcome.reply.is_empty() {
                    "Your plan is ready!".to_string()
                } else {
                    outcome.reply
                };

                Ok(PlanCreated {
                    session_id: updated.id,
                    status: updated.status,
                    message,
                    lesson_plan: updated.lesson_plan,
                })
            }
            Err(err) => self.record_plan_failure(session.id, err).await,
        }
    }

    /// DSA variant: seeds the problem statement, then one direct plan call
    /// with no welcome pass.
    async fn create_dsa_plan(&self, request: PlanRequest) -> Result<PlanCreated> {
        let language = request
            .programming_language
            .unwrap_or_else(|| "python".to_string());
        let problem = planner::resolve_dsa_problem(
            &self.catalog,
            request.mode,
            request.problem_number,
            request.problem_text.as_deref(),
        )
        .await;

        let mut new_session = NewSession::new(request.user_id, request.mode, &problem.title)
            .with_total_days(1)
            .with_time_per_day(request.time_per_day)
            .with_target(format!("Solve: {}", problem.title));
        new_session.problem_number = request.problem_number;
        new_session.programming_language = Some(language);
        new_session.problem = Some(problem.clone());

        let session = self.store.create(new_session).await?;
        info!(
            session_id = %session.id,
            mode = %session.mode,
            problem = %problem.title,
            "DSA session created, generating plan"
        );

        match self.planner.generate(&session, &self.llm).await {
            Ok(plan) => {
                let mut patch = SessionPatch::status(SessionStatus::Ready);
                patch.lesson_plan = Some(plan);
                let updated = self.store.update(session.id, patch).await?;

                Ok(PlanCreated {
                    session_id: updated.id,
                    status: updated.status,
                    message: format!("Ready to solve: {}", problem.title),
                    lesson_plan: updated.lesson_plan,
                })
            }
            Err(err) => self.record_plan_failure(session.id, err).await,
        }
    }

    async fn record_plan_failure(&self, session_id: Uuid, err: SageError) -> Result<PlanCreated> {
        warn!(session_id = %session_id, error = %err, "plan generation failed");

        let mut patch = SessionPatch::status(SessionStatus::Failed);
        patch.plan_error = Some(err.to_string());
        self.store.update(session_id, patch).await?;

        Ok(PlanCreated {
            session_id,
            status: SessionStatus::Failed,
            message: format!("Failed to generate plan: {}", err),
            lesson_plan: None,
        })
    }

    // ------------------------------------------------------------------
    // Tutoring
    // ------------------------------------------------------------------

    /// One chat turn with the tutor.
    ///
    /// Nothing is persisted until the tutor call succeeds; after that the
    /// turn, any summarization, the READY to IN_PROGRESS flip, and all
    /// progress transitions land in a single store update.
    pub async fn send_message(&self, session_id: Uuid, message: &str) -> Result<TurnReply> {
        let len = message.chars().count();
        if !(1..=5000).contains(&len) {
            return Err(SageError::invalid_input(
                "Message must be between 1 and 5000 characters",
            ));
        }

        let mut session = self.store.get_required(session_id).await?;
        progress::ensure_can_chat(&session)?;

        let outcome = self.graph.invoke(&session, Some(message), &self.llm).await?;

        if session.status == SessionStatus::Ready {
            progress::set_status(&mut session, SessionStatus::InProgress);
        }

        if !outcome.reply.is_empty() {
            self.memory.record_user_turn(&mut session, message);
            self.memory
                .record_assistant_turn(&mut session, &outcome.reply, &self.llm)
                .await;
        }

        if outcome.should_advance_topic {
            progress::advance_topic(&mut session);
        }
        if outcome.is_day_complete && !outcome.is_course_complete {
            progress::advance_day(&mut session)?;
        }
        if outcome.is_course_complete {
            progress::set_status(&mut session, SessionStatus::Completed);
        }

        let updated = self
            .store
            .update(session_id, SessionPatch::from_session(&session))
            .await?;

        Ok(TurnReply {
            response: outcome.reply,
            current_day: updated.current_day,
            current_topic_index: updated.current_topic_index,
            is_day_complete: outcome.is_day_complete,
            is_course_complete: outcome.is_course_complete,
            response_class: outcome.response_class,
            delivery: outcome.delivery,
        })
    }

    /// Starts or resumes a lesson, optionally jumping to a specific day.
    ///
    /// The welcome exchange is recorded as a "[Started lesson]" user turn
    /// plus the tutor's reply. The session status is left as-is; only the
    /// first real chat message moves READY to IN_PROGRESS.
    pub async fn start_lesson(
        &self,
        session_id: Uuid,
        day: Option<u32>,
    ) -> Result<LessonStart> {
        let mut session = self.store.get_required(session_id).await?;

        match session.status {
            SessionStatus::Planning => {
                return Err(SageError::invalid_state(
                    "Lesson plan is still being generated",
                ));
            }
            SessionStatus::Failed => {
                return Err(SageError::invalid_state(
                    "Plan generation failed for this session",
                ));
            }
            _ => {}
        }

        if let Some(day) = day {
            progress::goto_day(&mut session, day)?;
        }

        let plan = session
            .lesson_plan
            .as_ref()
            .ok_or_else(|| SageError::invalid_state("Lesson plan not yet generated"))?;
        let day_plan = plan.day(session.current_day);
        let day_title = day_plan
            .map(|d| d.title.clone())
            .unwrap_or_else(|| format!("Day {}", session.current_day));
        let objectives = day_plan.map(|d| d.objectives.clone()).unwrap_or_default();

        let outcome = self.graph.invoke(&session, None, &self.llm).await?;

        if !outcome.reply.is_empty() {
            self.memory.record_user_turn(&mut session, "[Started lesson]");
            self.memory
                .record_assistant_turn(&mut session, &outcome.reply, &self.llm)
                .await;
        }

        self.store
            .update(session_id, SessionPatch::from_session(&session))
            .await?;

        info!(
            session_id = %session_id,
            day = session.current_day,
            "lesson started"
        );

        Ok(LessonStart {
            current_day: session.current_day,
            day_title,
            objectives,
            welcome_message: outcome.reply,
            delivery: outcome.delivery,
        })
    }

    // ------------------------------------------------------------------
    // Session access
    // ------------------------------------------------------------------

    pub async fn get_session(&self, session_id: Uuid) -> Result<LearningSession> {
        self.store.get_required(session_id).await
    }

    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
    ) -> Result<Vec<LearningSession>> {
        self.store.list_for_user(user_id, filter).await
    }

    pub async fn delete_session(&self, session_id: Uuid) -> Result<bool> {
        self.store.delete(session_id).await
    }

    /// The lesson plan plus computed progress.
    pub async fn get_plan(&self, session_id: Uuid) -> Result<PlanView> {
        let session = self.store.get_required(session_id).await?;
        let lesson_plan = session
            .lesson_plan
            .clone()
            .ok_or_else(|| SageError::invalid_state("Lesson plan not yet generated"))?;

        Ok(PlanView {
            session_id: session.id,
            topic: session.topic.clone(),
            progress_percentage: progress::progress_percentage(&session),
            current_day: session.current_day,
            total_days: session.total_days,
            lesson_plan,
        })
    }

    /// One day of the plan, flagged relative to the session position.
    pub async fn get_day_content(&self, session_id: Uuid, day: u32) -> Result<DayContent> {
        let session = self.store.get_required(session_id).await?;
        let plan = session
            .lesson_plan
            .as_ref()
            .ok_or_else(|| SageError::invalid_state("Lesson plan not yet generated"))?;
        let content = plan.day(day).ok_or_else(|| {
            SageError::invalid_input(format!("Day must be between 1 and {}", plan.day_count()))
        })?;

        Ok(DayContent {
            session_id: session.id,
            total_days: session.total_days,
            is_current_day: day == session.current_day,
            is_completed: day < session.current_day,
            day: content.clone(),
        })
    }

    /// The most recent `limit` turns, archive and live buffer combined.
    pub async fn chat_history(&self, session_id: Uuid, limit: usize) -> Result<Vec<ChatTurn>> {
        let session = self.store.get_required(session_id).await?;
        let history = session.full_history();
        let skip = history.len().saturating_sub(limit);
        Ok(history.into_iter().skip(skip).collect())
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    /// Direct progress write; the day is clamped to the plan length and
    /// completion is re-derived.
    pub async fn update_progress(
        &self,
        session_id: Uuid,
        current_day: Option<u32>,
        current_topic_index: Option<u32>,
    ) -> Result<LearningSession> {
        if current_day == Some(0) {
            return Err(SageError::invalid_input("Day must be at least 1"));
        }

        let mut session = self.store.get_required(session_id).await?;
        progress::update_progress(&mut session, current_day, current_topic_index);
        self.store
            .update(session_id, SessionPatch::from_session(&session))
            .await
    }

    pub async fn advance_day(&self, session_id: Uuid) -> Result<LearningSession> {
        let mut session = self.store.get_required(session_id).await?;
        progress::advance_day(&mut session)?;
        self.store
            .update(session_id, SessionPatch::from_session(&session))
            .await
    }

    pub async fn goto_day(&self, session_id: Uuid, day: u32) -> Result<LearningSession> {
        let mut session = self.store.get_required(session_id).await?;
        progress::goto_day(&mut session, day)?;
        self.store
            .update(session_id, SessionPatch::from_session(&session))
            .await
    }

    // ------------------------------------------------------------------
    // Recap
    // ------------------------------------------------------------------

    /// Takeaway summary for a completed DSA session.
    ///
    /// Buffered turns are folded into the summaries first so the recap
    /// covers the whole conversation.
    pub async fn session_recap(&self, session_id: Uuid) -> Result<String> {
        let mut session = self.store.get_required(session_id).await?;

        if !session.mode.is_dsa() {
            return Err(SageError::invalid_state(
                "Session recap is only available for DSA sessions",
            ));
        }
        if session.status != SessionStatus::Completed {
            return Err(SageError::invalid_state(
                "Session recap is available once the session is completed",
            ));
        }

        self.memory.force_summarize(&mut session, &self.llm).await?;
        self.store
            .update(session_id, SessionPatch::from_session(&session))
            .await?;

        let conversation = session
            .memory_summary()
            .unwrap_or_else(|| "No conversation recorded.".to_string());
        let fallback = ProblemDetails {
            title: session.topic.clone(),
            description: String::new(),
            difficulty: "Unknown".to_string(),
            tags: Vec::new(),
        };
        let problem = session.problem.as_ref().unwrap_or(&fallback);
        let language = session.programming_language.as_deref().unwrap_or("python");
        let prompt = prompts::dsa_session_summary_prompt(problem, language, &conversation);

        let settings = self.config.tutor_settings(session.mode);
        let call = LlmCallConfig::new(&settings.model).with_temperature(settings.temperature);
        let response = self
            .llm
            .chat_completion(vec![LlmMessage::user(prompt)], &call)
            .await?;

        Ok(response.text)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{
        sample_plan, sample_problem, sample_session, InMemorySessionStore, MockLlmDriver,
        MockReply, StaticProblemCatalog,
    };

    type TestService = TutorService<InMemorySessionStore, StaticProblemCatalog, MockLlmDriver>;

    fn service() -> (TestService, InMemorySessionStore, MockLlmDriver) {
        let store = InMemorySessionStore::new();
        let llm = MockLlmDriver::new();
        let catalog = StaticProblemCatalog::new();
        let svc = TutorService::new(store.clone(), catalog, llm.clone(), SageConfig::default());
        (svc, store, llm)
    }

    fn plan_json(days: u32) -> String {
        serde_json::to_string(&sample_plan(days)).unwrap()
    }

    #[tokio::test]
    async fn test_create_plan_quick_forces_single_day() {
        let (svc, store, llm) = service();
        llm.add_reply(MockReply::text(plan_json(1))).await;
        llm.add_reply(MockReply::text("Welcome! [[STAY]]")).await;

        let created = svc
            .create_plan(
                PlanRequest::new(Uuid::now_v7(), SessionMode::Quick, "Binary search")
                    .with_total_days(7),
            )
            .await
            .unwrap();

        assert_eq!(created.status, SessionStatus::Ready);
        assert_eq!(created.message, "Welcome!");
        assert!(created.lesson_plan.is_some());

        let session = store.get(created.session_id).await.unwrap().unwrap();
        assert_eq!(session.total_days, 1);
        assert_eq!(session.status, SessionStatus::Ready);
        // The welcome pass is not part of the chat history.
        assert!(session.chat_buffer.is_empty());
    }

    #[tokio::test]
    async fn test_create_plan_failure_marks_session_failed() {
        let (svc, store, llm) = service();
        llm.add_reply(MockReply::failure("model quota exhausted")).await;

        let created = svc
            .create_plan(PlanRequest::new(
                Uuid::now_v7(),
                SessionMode::Standard,
                "Dynamic programming",
            ))
            .await
            .unwrap();

        assert_eq!(created.status, SessionStatus::Failed);
        assert!(created.message.starts_with("Failed to generate plan:"));
        assert!(created.lesson_plan.is_none());

        let session = store.get(created.session_id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
        assert!(session.plan_error.unwrap().contains("model quota exhausted"));
    }

    #[tokio::test]
    async fn test_create_plan_validates_inputs() {
        let (svc, _store, _llm) = service();
        let user = Uuid::now_v7();

        let err = svc
            .create_plan(PlanRequest::new(user, SessionMode::Standard, "ab"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("between 3 and 500"));

        let err = svc
            .create_plan(
                PlanRequest::new(user, SessionMode::Standard, "Rust").with_total_days(91),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("between 1 and 90"));
    }

    #[tokio::test]
    async fn test_create_dsa_plan_seeds_problem() {
        let store = InMemorySessionStore::new();
        let llm = MockLlmDriver::new();
        let catalog = StaticProblemCatalog::new();
        catalog.add_problem(1, sample_problem()).await;
        let svc = TutorService::new(
            store.clone(),
            catalog,
            llm.clone(),
            SageConfig::default(),
        );
        llm.add_reply(MockReply::text(plan_json(1))).await;

        let created = svc
            .create_plan(
                PlanRequest::new(Uuid::now_v7(), SessionMode::DsaLeetcode, "")
                    .with_problem_number(1)
                    .with_programming_language("rust"),
            )
            .await
            .unwrap();

        assert_eq!(created.status, SessionStatus::Ready);
        assert_eq!(created.message, "Ready to solve: #1. Two Sum");

        let session = store.get(created.session_id).await.unwrap().unwrap();
        assert_eq!(session.topic, "#1. Two Sum");
        assert_eq!(session.target.as_deref(), Some("Solve: #1. Two Sum"));
        assert_eq!(session.total_days, 1);
        assert_eq!(session.programming_language.as_deref(), Some("rust"));

        // One direct plan call, no welcome pass.
        assert_eq!(llm.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_send_message_flips_ready_to_in_progress() {
        let (svc, store, llm) = service();
        let session = sample_session(SessionMode::Standard, 3);
        let id = session.id;
        store.seed(session).await;
        llm.add_reply(MockReply::text("Let's dig in. [[STAY]]")).await;

        let reply = svc.send_message(id, "What is a graph?").await.unwrap();

        assert_eq!(reply.response, "Let's dig in.");
        assert!(!reply.is_day_complete);

        let session = store.get(id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.chat_buffer.len(), 2);
        assert_eq!(session.chat_buffer[0].content, "What is a graph?");
    }

    #[tokio::test]
    async fn test_send_message_rejects_terminal_sessions() {
        let (svc, store, _llm) = service();
        let mut session = sample_session(SessionMode::Standard, 3);
        session.status = SessionStatus::Completed;
        let id = session.id;
        store.seed(session).await;

        let err = svc.send_message(id, "hello?").await.unwrap_err();
        assert!(err.to_string().contains("not ready for chat"));
    }

    #[tokio::test]
    async fn test_send_message_failure_leaves_session_untouched() {
        let (svc, store, llm) = service();
        let session = sample_session(SessionMode::Standard, 3);
        let id = session.id;
        let before_updated_at = session.updated_at;
        store.seed(session).await;
        llm.add_reply(MockReply::failure("upstream timeout")).await;

        let err = svc.send_message(id, "hello").await.unwrap_err();
        assert!(err.to_string().contains("upstream timeout"));

        let session = store.get(id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Ready);
        assert!(session.chat_buffer.is_empty());
        assert_eq!(session.updated_at, before_updated_at);
    }

    #[tokio::test]
    async fn test_send_message_advances_topic_on_marker() {
        let (svc, store, llm) = service();
        let session = sample_session(SessionMode::Standard, 3);
        let id = session.id;
        store.seed(session).await;
        llm.add_reply(MockReply::text("Correct! [[ADVANCE]]")).await;

        let reply = svc.send_message(id, "Nodes and edges").await.unwrap();

        assert_eq!(reply.current_topic_index, 1);
        let session = store.get(id).await.unwrap().unwrap();
        assert_eq!(session.current_topic_index, 1);
    }

    #[tokio::test]
    async fn test_send_message_rolls_over_to_next_day() {
        let (svc, store, llm) = service();
        let mut session = sample_session(SessionMode::Standard, 3);
        session.current_topic_index = 1;
        let id = session.id;
        store.seed(session).await;
        llm.add_reply(MockReply::text("Day one done! [[ADVANCE]]")).await;

        let reply = svc.send_message(id, "All clear").await.unwrap();

        assert!(reply.is_day_complete);
        assert!(!reply.is_course_complete);
        assert_eq!(reply.current_day, 2);
        assert_eq!(reply.current_topic_index, 0);
    }

    #[tokio::test]
    async fn test_start_lesson_rejects_planning_and_failed() {
        let (svc, store, _llm) = service();
        let mut session = sample_session(SessionMode::Standard, 3);
        session.status = SessionStatus::Planning;
        let id = session.id;
        store.seed(session).await;

        let err = svc.start_lesson(id, None).await.unwrap_err();
        assert!(err.to_string().contains("still being generated"));

        let mut session = sample_session(SessionMode::Standard, 3);
        session.status = SessionStatus::Failed;
        let id = session.id;
        store.seed(session).await;

        assert!(svc.start_lesson(id, None).await.is_err());
    }

    #[tokio::test]
    async fn test_start_lesson_records_welcome_exchange() {
        let (svc, store, llm) = service();
        let session = sample_session(SessionMode::Standard, 3);
        let id = session.id;
        store.seed(session).await;
        llm.add_reply(MockReply::text("Welcome to day two! [[STAY]]")).await;

        let start = svc.start_lesson(id, Some(2)).await.unwrap();

        assert_eq!(start.current_day, 2);
        assert_eq!(start.day_title, "Day 2 fundamentals");
        assert_eq!(start.welcome_message, "Welcome to day two!");
        assert_eq!(start.delivery, DeliveryMode::Stream);

        let session = store.get(id).await.unwrap().unwrap();
        assert_eq!(session.current_day, 2);
        assert_eq!(session.chat_buffer.len(), 2);
        assert_eq!(session.chat_buffer[0].content, "[Started lesson]");
        // Starting a lesson alone does not begin the course.
        assert_eq!(session.status, SessionStatus::Ready);
    }

    #[tokio::test]
    async fn test_start_lesson_day_out_of_range() {
        let (svc, store, _llm) = service();
        let session = sample_session(SessionMode::Standard, 3);
        let id = session.id;
        store.seed(session).await;

        let err = svc.start_lesson(id, Some(9)).await.unwrap_err();
        assert!(err.to_string().contains("Day must be between 1 and 3"));
    }

    #[tokio::test]
    async fn test_get_plan_reports_progress() {
        let (svc, store, _llm) = service();
        let mut session = sample_session(SessionMode::Standard, 3);
        session.current_day = 2;
        session.current_topic_index = 1;
        let id = session.id;
        store.seed(session).await;

        let view = svc.get_plan(id).await.unwrap();
        assert_eq!(view.progress_percentage, 50.0);
        assert_eq!(view.current_day, 2);

        let mut bare = sample_session(SessionMode::Standard, 3);
        bare.lesson_plan = None;
        let bare_id = bare.id;
        store.seed(bare).await;
        let err = svc.get_plan(bare_id).await.unwrap_err();
        assert!(err.to_string().contains("not yet generated"));
    }

    #[tokio::test]
    async fn test_get_day_content_flags_position() {
        let (svc, store, _llm) = service();
        let mut session = sample_session(SessionMode::Standard, 3);
        session.current_day = 2;
        let id = session.id;
        store.seed(session).await;

        let first = svc.get_day_content(id, 1).await.unwrap();
        assert!(first.is_completed);
        assert!(!first.is_current_day);

        let second = svc.get_day_content(id, 2).await.unwrap();
        assert!(second.is_current_day);
        assert!(!second.is_completed);
        assert_eq!(second.day.title, "Day 2 fundamentals");

        let err = svc.get_day_content(id, 4).await.unwrap_err();
        assert!(err.to_string().contains("between 1 and 3"));
    }

    #[tokio::test]
    async fn test_chat_history_returns_most_recent() {
        let (svc, store, _llm) = service();
        let mut session = sample_session(SessionMode::Standard, 3);
        for i in 0..6 {
            session.chat_archive.push(ChatTurn::user(format!("old {}", i)));
        }
        session.chat_buffer.push(ChatTurn::user("newest"));
        let id = session.id;
        store.seed(session).await;

        let history = svc.chat_history(id, 3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].content, "newest");
        assert_eq!(history[0].content, "old 4");
    }

    #[tokio::test]
    async fn test_session_recap_requires_completed_dsa() {
        let (svc, store, llm) = service();

        let mut standard = sample_session(SessionMode::Standard, 1);
        standard.status = SessionStatus::Completed;
        let standard_id = standard.id;
        store.seed(standard).await;
        let err = svc.session_recap(standard_id).await.unwrap_err();
        assert!(err.to_string().contains("DSA"));

        let mut dsa = sample_session(SessionMode::DsaLeetcode, 1);
        dsa.problem = Some(sample_problem());
        dsa.status = SessionStatus::Completed;
        dsa.summaries.push("Worked through two-pointer approach.".to_string());
        let dsa_id = dsa.id;
        store.seed(dsa).await;
        llm.add_reply(MockReply::text("Key takeaway: hash maps trade space for time."))
            .await;

        let recap = svc.session_recap(dsa_id).await.unwrap();
        assert!(recap.contains("hash maps"));

        let calls = llm.calls().await;
        assert!(calls[0].messages[0].content.contains("Two Sum"));
        assert!(calls[0].messages[0].content.contains("two-pointer"));
    }
}
