// Lesson plan generation
//
// One strict-JSON LLM call per plan. The model answers with the whole
// curriculum at once; markdown fences are tolerated, anything else that
// fails to parse or validate is a plan failure the caller records on the
// session.

use tracing::{info, warn};

use crate::config::SageConfig;
use crate::error::Result;
use crate::llm::{LlmCallConfig, LlmDriver};
use crate::plan::LessonPlan;
use crate::prompts;
use crate::session::{LearningSession, ProblemDetails, SessionMode};
use crate::traits::ProblemCatalog;

/// Generates lesson plans with the mode-appropriate model and prompt.
pub struct PlanGenerator {
    config: SageConfig,
}

impl PlanGenerator {
    pub fn new(config: &SageConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Runs one plan-generation call and validates the result against the
    /// session's expected day count.
    pub async fn generate<L: LlmDriver>(
        &self,
        session: &LearningSession,
        llm: &L,
    ) -> Result<LessonPlan> {
        let system = system_prompt(session.mode);
        let prompt = user_prompt(session);
        let settings = self.config.planner_settings(session.mode);
        let call = LlmCallConfig::new(&settings.model).with_temperature(settings.temperature);

        let text = llm.complete(system, &prompt, &call).await?;
        let plan = LessonPlan::from_llm_text(&text)?;
        plan.validate(session.total_days)?;

        info!(
            session_id = %session.id,
            mode = %session.mode,
            days = plan.day_count(),
            topics = plan.total_topics(),
            "lesson plan generated"
        );
        Ok(plan)
    }
}

fn system_prompt(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Standard => prompts::PLAN_GENERATION_SYSTEM_PROMPT,
        SessionMode::Quick => prompts::QUICK_PLAN_GENERATION_SYSTEM_PROMPT,
        SessionMode::DsaLeetcode | SessionMode::DsaCustom => {
            prompts::DSA_PLAN_GENERATION_SYSTEM_PROMPT
        }
    }
}

fn user_prompt(session: &LearningSession) -> String {
    match session.mode {
        SessionMode::Standard => prompts::plan_generation_prompt(
            &session.topic,
            session.target.as_deref(),
            session.total_days,
            &session.time_per_day,
        ),
        SessionMode::Quick => prompts::quick_plan_generation_prompt(
            &session.topic,
            session.target.as_deref(),
            &session.time_per_day,
        ),
        SessionMode::DsaLeetcode | SessionMode::DsaCustom => {
            let fallback = ProblemDetails {
                title: session.topic.clone(),
                description: String::new(),
                difficulty: "Unknown".to_string(),
                tags: Vec::new(),
            };
            let problem = session.problem.as_ref().unwrap_or(&fallback);
            let language = session.programming_language.as_deref().unwrap_or("python");
            prompts::dsa_plan_generation_prompt(problem, language)
        }
    }
}

/// Builds the problem statement a DSA session is seeded with.
///
/// LeetCode numbers go through the catalog; a lookup miss (or a catalog
/// error) falls back to the model's own knowledge of the problem. Custom
/// sessions take the provided text as given.
pub async fn resolve_dsa_problem<C: ProblemCatalog>(
    catalog: &C,
    mode: SessionMode,
    problem_number: Option<u32>,
    problem_text: Option<&str>,
) -> ProblemDetails {
    if mode == SessionMode::DsaCustom {
        let description = problem_text
            .filter(|text| !text.is_empty())
            .unwrap_or("No problem description provided");
        return ProblemDetails {
            title: "Custom Problem".to_string(),
            description: description.to_string(),
            difficulty: "Unknown".to_string(),
            tags: Vec::new(),
        };
    }

    let Some(number) = problem_number else {
        return ProblemDetails {
            title: "Custom DSA Problem".to_string(),
            description: problem_text.unwrap_or_default().to_string(),
            difficulty: "Unknown".to_string(),
            tags: Vec::new(),
        };
    };

    let hit = match catalog.lookup(number).await {
        Ok(hit) => hit,
        Err(err) => {
            warn!(number, error = %err, "problem lookup failed, using model knowledge");
            None
        }
    };

    match hit {
        Some(details) => ProblemDetails {
            title: format!("#{}. {}", number, details.title),
            description: details.description,
            difficulty: details.difficulty,
            tags: details.tags,
        },
        None => ProblemDetails {
            title: format!("LeetCode #{}", number),
            description: format!(
                "LeetCode problem number {}. Please use your knowledge of this problem.",
                number
            ),
            difficulty: "Unknown".to_string(),
            tags: Vec::new(),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
