//! Gemini Chat Example - One live tutoring exchange
//!
//! Generates a real lesson plan and runs one chat turn against the
//! Gemini API.
//!
//! Prerequisites:
//! - Set GEMINI_API_KEY environment variable (or put it in a .env file)
//!
//! Run with: cargo run -p sage-gemini --example gemini_chat

use anyhow::Result;
use sage_core::memory::{InMemorySessionStore, StaticProblemCatalog};
use sage_core::{PlanRequest, SessionMode, SessionStatus, TutorService};
use sage_gemini::{tutoring_config, GeminiLlmDriver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sage_core=info,sage_gemini=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Ok(driver) = GeminiLlmDriver::from_env() else {
        println!("GEMINI_API_KEY is not set; export it (or put it in .env) to run this example.");
        return Ok(());
    };

    let service = TutorService::new(
        InMemorySessionStore::new(),
        StaticProblemCatalog::new(),
        driver,
        tutoring_config(),
    );

    println!("Generating a quick lesson plan (one real Gemini call)...\n");
    let created = service
        .create_plan(PlanRequest::new(
            Uuid::now_v7(),
            SessionMode::Quick,
            "Big-O notation",
        ))
        .await?;

    if created.status != SessionStatus::Ready {
        println!("Plan generation failed: {}", created.message);
        return Ok(());
    }
    println!("tutor: {}\n", created.message);

    let turn = service
        .send_message(
            created.session_id,
            "Why do we drop constant factors in Big-O?",
        )
        .await?;
    println!("student: Why do we drop constant factors in Big-O?\n");
    println!("tutor: {}", turn.response);

    Ok(())
}
