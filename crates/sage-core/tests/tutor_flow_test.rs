// Integration tests for the full tutoring flow
//
// These drive the service end to end over the in-memory store, mock
// problem catalog, and scripted LLM driver: plan creation, lesson start,
// chat turns with topic/day advancement, buffer summarization, completion,
// and the DSA recap.

use sage_core::memory::{
    sample_plan, sample_problem, sample_session, InMemorySessionStore, MockLlmDriver, MockReply,
    StaticProblemCatalog,
};
use sage_core::{
    PlanRequest, SageConfig, SessionMode, SessionStatus, SessionStore, TutorService,
    DEFAULT_HISTORY_LIMIT,
};
use uuid::Uuid;

type TestService = TutorService<InMemorySessionStore, StaticProblemCatalog, MockLlmDriver>;

fn service() -> (TestService, InMemorySessionStore, MockLlmDriver) {
    service_with_catalog(StaticProblemCatalog::new())
}

fn service_with_catalog(
    catalog: StaticProblemCatalog,
) -> (TestService, InMemorySessionStore, MockLlmDriver) {
    let store = InMemorySessionStore::new();
    let llm = MockLlmDriver::new();
    let svc = TutorService::new(store.clone(), catalog, llm.clone(), SageConfig::default());
    (svc, store, llm)
}

fn plan_json(days: u32) -> String {
    serde_json::to_string(&sample_plan(days)).unwrap()
}

fn single_topic_plan_json() -> String {
    serde_json::json!({
        "title": "Quick session",
        "description": "One focused topic",
        "learning_outcomes": ["Apply the idea unaided"],
        "days": [{
            "day": 1,
            "title": "The one thing",
            "objectives": ["Understand it end to end"],
            "topics": [{
                "name": "Core idea",
                "duration": "45 minutes",
                "key_concepts": ["definition", "application"],
                "teaching_approach": "Worked example",
                "check_questions": ["Explain it back"]
            }]
        }]
    })
    .to_string()
}

// =============================================================================
// Full course lifecycle
// =============================================================================

#[tokio::test]
async fn test_standard_course_end_to_end() {
    let (svc, store, llm) = service();
    llm.set_replies(vec![
        MockReply::text(plan_json(2)),
        MockReply::text("Here is your plan overview. [[STAY]]"),
        MockReply::text("Welcome to day one! [[STAY]]"),
        MockReply::text("Graphs are nodes plus edges. [[STAY]]"),
        MockReply::text("Exactly, that is the key insight. [[ADVANCE]]"),
        MockReply::text("Day one wrapped up nicely. [[ADVANCE]]"),
        MockReply::text("Strong start on day two. [[ADVANCE]]"),
        MockReply::text("The student covered graph fundamentals across two days."),
        MockReply::text("That completes the course, well done! [[ADVANCE]]"),
    ])
    .await;

    // Plan creation: two LLM passes, welcome not persisted.
    let created = svc
        .create_plan(
            PlanRequest::new(Uuid::now_v7(), SessionMode::Standard, "Graph algorithms")
                .with_total_days(2)
                .with_target("Pass the algorithms exam"),
        )
        .await
        .unwrap();
    assert_eq!(created.status, SessionStatus::Ready);
    assert_eq!(created.message, "Here is your plan overview.");
    let id = created.session_id;

    // Lesson start records the welcome exchange.
    let start = svc.start_lesson(id, None).await.unwrap();
    assert_eq!(start.current_day, 1);
    assert_eq!(start.welcome_message, "Welcome to day one!");

    // First real message flips READY to IN_PROGRESS, no advancement.
    let turn = svc.send_message(id, "What is a graph?").await.unwrap();
    assert!(!turn.is_day_complete);
    assert_eq!(turn.current_topic_index, 0);
    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::InProgress);

    // Passing the check moves to the next topic.
    let turn = svc.send_message(id, "Nodes connected by edges").await.unwrap();
    assert_eq!(turn.current_topic_index, 1);

    // Passing the last topic of day one rolls over to day two.
    let turn = svc.send_message(id, "Use a queue for BFS").await.unwrap();
    assert!(turn.is_day_complete);
    assert!(!turn.is_course_complete);
    assert_eq!(turn.current_day, 2);
    assert_eq!(turn.current_topic_index, 0);

    // This assistant turn lands the buffer on the threshold, so it folds
    // into a summary (the scripted plain-text reply above).
    let turn = svc.send_message(id, "Dijkstra relaxes edges greedily").await.unwrap();
    assert_eq!(turn.current_topic_index, 1);
    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.summaries.len(), 1);
    assert!(session.chat_buffer.is_empty());
    assert_eq!(session.chat_archive.len(), 10);

    // Passing the final topic completes the course.
    let turn = svc.send_message(id, "Negative cycles break it").await.unwrap();
    assert!(turn.is_day_complete);
    assert!(turn.is_course_complete);

    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.completed_at.is_some());

    let view = svc.get_plan(id).await.unwrap();
    assert_eq!(view.progress_percentage, 100.0);

    // Archive plus live buffer: the start exchange and five chat turns.
    let history = svc.chat_history(id, DEFAULT_HISTORY_LIMIT).await.unwrap();
    assert_eq!(history.len(), 12);
    assert_eq!(history[0].content, "[Started lesson]");

    // A completed course rejects further chat.
    let err = svc.send_message(id, "one more?").await.unwrap_err();
    assert!(err.to_string().contains("not ready for chat"));
}

#[tokio::test]
async fn test_quick_session_single_message_completion() {
    let (svc, store, llm) = service();
    llm.set_replies(vec![
        MockReply::text(single_topic_plan_json()),
        MockReply::text("Let's get into it. [[STAY]]"),
        MockReply::text("You nailed it, session complete! [[ADVANCE]]"),
    ])
    .await;

    let created = svc
        .create_plan(PlanRequest::new(
            Uuid::now_v7(),
            SessionMode::Quick,
            "Binary search",
        ))
        .await
        .unwrap();
    assert_eq!(created.status, SessionStatus::Ready);
    let plan = created.lesson_plan.unwrap();
    assert_eq!(plan.day_count(), 1);

    // One message that satisfies the only topic's check finishes the course.
    let turn = svc
        .send_message(created.session_id, "Split the range in half each step")
        .await
        .unwrap();
    assert_eq!(turn.response, "You nailed it, session complete!");
    assert!(turn.is_day_complete);
    assert!(turn.is_course_complete);

    let session = store.get(created.session_id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.total_days, 1);
    assert!(session.completed_at.is_some());
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_plan_failure_locks_session_in_failed() {
    let (svc, _store, llm) = service();
    llm.add_reply(MockReply::failure("rate limited")).await;

    let created = svc
        .create_plan(PlanRequest::new(
            Uuid::now_v7(),
            SessionMode::Standard,
            "Sorting algorithms",
        ))
        .await
        .unwrap();
    assert_eq!(created.status, SessionStatus::Failed);
    assert!(created.message.starts_with("Failed to generate plan:"));

    let id = created.session_id;
    let session = svc.get_session(id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Failed);
    assert!(session.plan_error.unwrap().contains("rate limited"));

    // FAILED is terminal: no lessons, no chat.
    assert!(svc.start_lesson(id, None).await.is_err());
    assert!(svc.send_message(id, "hello?").await.is_err());
}

#[tokio::test]
async fn test_tutor_failure_leaves_turn_retryable() {
    let (svc, store, llm) = service();
    let session = sample_session(SessionMode::Standard, 3);
    let id = session.id;
    store.seed(session).await;

    llm.add_reply(MockReply::failure("upstream timeout")).await;
    let err = svc.send_message(id, "What is a graph?").await.unwrap_err();
    assert!(err.to_string().contains("upstream timeout"));

    // Nothing persisted: still READY with an empty buffer.
    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Ready);
    assert!(session.chat_buffer.is_empty());

    // Retrying the same turn succeeds.
    llm.add_reply(MockReply::text("Nodes and edges. [[STAY]]")).await;
    let turn = svc.send_message(id, "What is a graph?").await.unwrap();
    assert_eq!(turn.response, "Nodes and edges.");

    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::InProgress);
    assert_eq!(session.chat_buffer.len(), 2);
}

#[tokio::test]
async fn test_summarization_failure_keeps_buffer() {
    let (svc, store, llm) = service();
    let mut session = sample_session(SessionMode::Standard, 3);
    session.status = SessionStatus::InProgress;
    for i in 0..9 {
        session.chat_buffer.push(if i % 2 == 0 {
            sage_core::ChatTurn::user(format!("question {}", i))
        } else {
            sage_core::ChatTurn::assistant(format!("answer {}", i))
        });
    }
    let id = session.id;
    store.seed(session).await;

    // Tutor reply lands the buffer past the threshold; the summarizer
    // call fails, which must not fail the turn or drop any turns.
    llm.set_replies(vec![
        MockReply::text("Keep going. [[STAY]]"),
        MockReply::failure("summarizer unavailable"),
    ])
    .await;

    let turn = svc.send_message(id, "next question").await.unwrap();
    assert_eq!(turn.response, "Keep going.");

    let session = store.get(id).await.unwrap().unwrap();
    assert!(session.summaries.is_empty());
    assert_eq!(session.chat_buffer.len(), 11);
    assert!(session.chat_archive.is_empty());

    // The next turn retries summarization and succeeds.
    llm.set_replies(vec![
        MockReply::text("Nice recovery. [[STAY]]"),
        MockReply::text("They worked through nine practice questions."),
    ])
    .await;

    svc.send_message(id, "and another").await.unwrap();
    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.summaries.len(), 1);
    assert!(session.chat_buffer.is_empty());
    assert_eq!(session.chat_archive.len(), 13);
}

// =============================================================================
// DSA flow
// =============================================================================

#[tokio::test]
async fn test_dsa_session_with_recap() {
    let catalog = StaticProblemCatalog::new();
    catalog.add_problem(1, sample_problem()).await;
    let (svc, store, llm) = service_with_catalog(catalog);

    llm.set_replies(vec![
        MockReply::text(single_topic_plan_json()),
        MockReply::text("Walk me through your approach. [[ADVANCE]]"),
        MockReply::text("They reasoned from brute force to the hash map solution."),
        MockReply::text("Takeaway: trade memory for lookup speed."),
    ])
    .await;

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
    let id = created.session_id;

    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.topic, "#1. Two Sum");
    assert_eq!(session.total_days, 1);

    // Recap before completion is rejected.
    assert!(svc.session_recap(id).await.is_err());

    let turn = svc
        .send_message(id, "Store complements in a hash map")
        .await
        .unwrap();
    assert!(turn.is_course_complete);

    let recap = svc.session_recap(id).await.unwrap();
    assert_eq!(recap, "Takeaway: trade memory for lookup speed.");

    // The buffered exchange was folded into summaries before the recap.
    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.summaries.len(), 1);
    assert!(session.chat_buffer.is_empty());

    // Recap prompt carried the problem and the conversation summary.
    let calls = llm.calls().await;
    let recap_prompt = &calls.last().unwrap().messages[0].content;
    assert!(recap_prompt.contains("Two Sum"));
    assert!(recap_prompt.contains("hash map solution"));
}

#[tokio::test]
async fn test_dsa_catalog_miss_uses_model_knowledge() {
    let (svc, store, llm) = service();
    llm.add_reply(MockReply::text(single_topic_plan_json())).await;

    let created = svc
        .create_plan(
            PlanRequest::new(Uuid::now_v7(), SessionMode::DsaLeetcode, "")
                .with_problem_number(739),
        )
        .await
        .unwrap();

    assert_eq!(created.message, "Ready to solve: LeetCode #739");
    let session = store.get(created.session_id).await.unwrap().unwrap();
    let problem = session.problem.unwrap();
    assert!(problem.description.contains("use your knowledge"));
    assert_eq!(problem.difficulty, "Unknown");
}

// =============================================================================
// Review navigation
// =============================================================================

#[tokio::test]
async fn test_completed_course_allows_review() {
    let (svc, store, llm) = service();
    let mut session = sample_session(SessionMode::Standard, 3);
    session.status = SessionStatus::Completed;
    session.current_day = 3;
    session.current_topic_index = 2;
    session.completed_at = Some(chrono::Utc::now());
    let id = session.id;
    store.seed(session).await;

    llm.add_reply(MockReply::text("Back to day one for review. [[STAY]]"))
        .await;

    // Revisiting an earlier day keeps the course completed.
    let start = svc.start_lesson(id, Some(1)).await.unwrap();
    assert_eq!(start.current_day, 1);

    let session = store.get(id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.current_day, 1);
    assert_eq!(session.current_topic_index, 0);

    let day = svc.get_day_content(id, 2).await.unwrap();
    assert!(!day.is_current_day);
    assert!(!day.is_completed);
}
