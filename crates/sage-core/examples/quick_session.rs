//! Quick Session Example - One tutoring session start to finish
//!
//! Runs a complete quick session against the in-memory backends. The LLM
//! driver is the scripted mock, so this works offline; swap in a real
//! driver (see the sage-gemini crate) to talk to an actual model.
//!
//! Run with: cargo run -p sage-core --example quick_session

use anyhow::Result;
use sage_core::memory::{InMemorySessionStore, MockLlmDriver, MockReply, StaticProblemCatalog};
use sage_core::{PlanRequest, SageConfig, SessionMode, TutorService, DEFAULT_HISTORY_LIMIT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const PLAN: &str = r#"{
    "title": "Binary Search in One Sitting",
    "description": "A single focused session on binary search.",
    "learning_outcomes": ["Implement binary search without looking it up"],
    "days": [{
        "day": 1,
        "title": "Binary search",
        "objectives": ["Understand the invariant", "Implement it"],
        "topics": [
            {
                "name": "The search invariant",
                "duration": "20 minutes",
                "key_concepts": ["sorted input", "halving the range"],
                "teaching_approach": "Derive the algorithm from the invariant",
                "check_questions": ["Why must the input be sorted?"]
            },
            {
                "name": "Implementation pitfalls",
                "duration": "25 minutes",
                "key_concepts": ["off-by-one", "overflow-safe midpoint"],
                "teaching_approach": "Debug a broken implementation together",
                "check_questions": ["What is wrong with (lo + hi) / 2?"]
            }
        ]
    }]
}"#;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sage_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let llm = MockLlmDriver::new();
    llm.set_replies(vec![
        MockReply::text(PLAN),
        MockReply::text(
            "Welcome! Today we are mastering binary search, starting from its invariant. [[STAY]]",
        ),
        MockReply::text(
            "Because halving only works if everything left of the middle is smaller. \
             Exactly right. [[ADVANCE]]",
        ),
        MockReply::text(
            "Correct, lo + (hi - lo) / 2 avoids the overflow. That wraps up the session! [[ADVANCE]]",
        ),
    ])
    .await;

    let service = TutorService::new(
        InMemorySessionStore::new(),
        StaticProblemCatalog::new(),
        llm,
        SageConfig::default(),
    );

    // One-shot: create the session and generate its plan.
    let created = service
        .create_plan(PlanRequest::new(
            Uuid::now_v7(),
            SessionMode::Quick,
            "Binary search",
        ))
        .await?;
    println!("tutor: {}\n", created.message);

    let session_id = created.session_id;
    let plan = service.get_plan(session_id).await?;
    println!(
        "plan \"{}\": {} day(s), {} topics",
        plan.lesson_plan.title,
        plan.lesson_plan.day_count(),
        plan.lesson_plan.total_topics()
    );

    // Chat until the course completes.
    for answer in [
        "Sorted input means the middle element tells us which half to keep.",
        "It can overflow; use lo + (hi - lo) / 2 instead.",
    ] {
        println!("\nstudent: {}", answer);
        let turn = service.send_message(session_id, answer).await?;
        println!("tutor: {}", turn.response);
        println!(
            "  day {} topic {} (day complete: {}, course complete: {})",
            turn.current_day, turn.current_topic_index, turn.is_day_complete, turn.is_course_complete
        );
    }

    let session = service.get_session(session_id).await?;
    let plan = service.get_plan(session_id).await?;
    println!(
        "\nsession finished: status={}, progress={}%",
        session.status, plan.progress_percentage
    );

    let history = service.chat_history(session_id, DEFAULT_HISTORY_LIMIT).await?;
    println!("{} turns recorded", history.len());

    Ok(())
}
