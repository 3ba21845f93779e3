// Prompt templates for plan generation and tutoring
//
// Templates are plain strings with {placeholder} slots filled via
// `replace`. Rendering is deterministic: the same session state always
// produces the same prompt text, which keeps tutoring turns reproducible
// and testable.

use crate::plan::DayPlan;
use crate::session::{LearningSession, ProblemDetails, SessionMode};

// ============================================================================
// Plan generation
// ============================================================================

pub const PLAN_GENERATION_SYSTEM_PROMPT: &str = r#"You are an expert curriculum designer and educational specialist.
Your task is to create comprehensive, well-structured lesson plans that guide learners from
beginner to proficient in any topic.

You always output valid JSON and nothing else. No markdown, no explanations, just pure JSON."#;

pub const PLAN_GENERATION_PROMPT: &str = r#"
Create a comprehensive {total_days}-day lesson plan for learning: "{topic}"

LEARNER'S GOAL: {goal}

The student can dedicate {time_per_day} per day to studying.

Generate a structured JSON curriculum with the following EXACT format:
{
    "title": "Course title",
    "description": "Brief course description (2-3 sentences)",
    "learning_outcomes": ["outcome 1", "outcome 2", "outcome 3"],
    "total_days": {total_days},
    "time_per_day": "{time_per_day}",
    "difficulty_progression": "beginner_to_intermediate",
    "days": [
        {
            "day": 1,
            "title": "Day 1 - [Topic Title]",
            "objectives": ["By the end of this day, you will...", "..."],
            "estimated_duration": "X minutes",
            "topics": [
                {
                    "name": "Topic name",
                    "duration": "15 minutes",
                    "key_concepts": ["concept 1", "concept 2"],
                    "teaching_approach": "Brief description of how to teach this",
                    "check_questions": ["Question to verify understanding"]
                }
            ],
            "day_summary": "Brief summary of what was covered",
            "practice_suggestions": ["Optional practice activity"]
        }
    ]
}

IMPORTANT GUIDELINES:
1. Break complex topics into small, digestible chunks (no more than 3-4 topics per day)
2. Each day should build logically on previous knowledge
3. Include practical examples and real-world applications in teaching_approach
4. Ensure a smooth progression from fundamentals to advanced concepts
5. Add review topics periodically to reinforce learning
6. Make it engaging - include interactive elements
7. Each topic should have 1-2 check questions to verify understanding
8. Match the total content to the available time ({time_per_day} per day)
9. If a learner's goal is provided, tailor the curriculum to help achieve that goal - prioritize relevant topics, include goal-specific exercises, and orient the learning path accordingly

Return ONLY valid JSON. No additional text, explanations, or markdown formatting.
"#;

pub const QUICK_PLAN_GENERATION_SYSTEM_PROMPT: &str = r#"You are an expert curriculum designer specializing in focused, single-session learning plans.
Your task is to create a comprehensive but concise lesson plan that covers a topic in ONE session.

You always output valid JSON and nothing else. No markdown, no explanations, just pure JSON."#;

pub const QUICK_PLAN_GENERATION_PROMPT: &str = r#"
Create a focused single-session lesson plan for learning: "{topic}"

TARGET/GOAL: {target}

The student wants to learn this in ONE session of approximately {time_per_day}.

Generate a structured JSON curriculum with the following EXACT format:
{
    "title": "Session title",
    "description": "Brief description (1-2 sentences)",
    "learning_outcomes": ["outcome 1", "outcome 2", "outcome 3"],
    "total_days": 1,
    "time_per_day": "{time_per_day}",
    "target": "{target}",
    "difficulty_progression": "focused_overview",
    "days": [
        {
            "day": 1,
            "title": "Complete Guide - {topic}",
            "objectives": ["By the end of this session, you will...", "..."],
            "estimated_duration": "{time_per_day}",
            "topics": [
                {
                    "name": "Topic name",
                    "duration": "X minutes",
                    "key_concepts": ["concept 1", "concept 2"],
                    "teaching_approach": "Brief description of how to teach this",
                    "check_questions": ["Question to verify understanding"]
                }
            ],
            "day_summary": "Brief summary of what will be covered",
            "practice_suggestions": ["Optional practice activity"]
        }
    ]
}

IMPORTANT GUIDELINES:
1. This is a SINGLE session - organize all content into one day
2. Prioritize the most important concepts relevant to the target/goal
3. If the target is an exam, focus on exam-relevant topics and common questions
4. Break the session into 4-8 focused topics that flow logically
5. Keep each topic concise but thorough (5-15 minutes each)
6. Include practical examples and quick exercises
7. Add check questions after each topic for reinforcement
8. End with a summary topic that ties everything together
9. Match total content to the available time ({time_per_day})

Return ONLY valid JSON. No additional text, explanations, or markdown formatting.
"#;

pub const DSA_PLAN_GENERATION_SYSTEM_PROMPT: &str =
    "You are an expert DSA curriculum designer. Output valid JSON only.";

pub const DSA_PLAN_GENERATION_PROMPT: &str = r#"
Create a focused single-session lesson plan for solving a DSA problem.

PROBLEM DETAILS:
- Title: {problem_title}
- Difficulty: {difficulty}
- Description: {problem_description}
- Topic Tags: {topic_tags}

STUDENT'S PROGRAMMING LANGUAGE: {programming_language}

Create a structured JSON lesson plan that guides the student through solving this problem step by step.

REQUIRED JSON FORMAT:
{
    "title": "Solving: {problem_title}",
    "description": "A focused session on solving this {difficulty} DSA problem using {programming_language}",
    "learning_outcomes": [
        "Understand the problem and identify edge cases",
        "Identify the optimal data structure and algorithm",
        "Implement a working solution in {programming_language}",
        "Analyze time and space complexity"
    ],
    "total_days": 1,
    "time_per_day": "1 hour",
    "days": [
        {
            "day": 1,
            "title": "Solving: {problem_title}",
            "objectives": [
                "Problem understanding and pattern recognition",
                "Solution approach and algorithm design",
                "Code implementation in {programming_language}",
                "Complexity analysis and optimization"
            ],
            "estimated_duration": "1 hour",
            "topics": [
                {
                    "name": "Problem Understanding",
                    "duration": "10 min",
                    "key_concepts": ["Problem statement analysis", "Input/output patterns", "Edge cases", "Constraints analysis"],
                    "teaching_approach": "Walk through examples and identify patterns",
                    "check_questions": ["What are the inputs and outputs?", "What are the constraints?"]
                },
                {
                    "name": "Approach & Algorithm",
                    "duration": "15 min",
                    "key_concepts": ["Brute force approach", "Optimal approach", "Data structure selection", "Algorithm pattern"],
                    "teaching_approach": "Guide student to discover the optimal approach through questions",
                    "check_questions": ["What's the simplest approach?", "Can we do better?"]
                },
                {
                    "name": "Implementation",
                    "duration": "20 min",
                    "key_concepts": ["Code structure", "Implementation details", "Language-specific idioms"],
                    "teaching_approach": "Help student write the code step by step in {programming_language}",
                    "check_questions": ["How do we initialize?", "What's the loop condition?"]
                },
                {
                    "name": "Complexity & Optimization",
                    "duration": "15 min",
                    "key_concepts": ["Time complexity", "Space complexity", "Trade-offs", "Follow-up variations"],
                    "teaching_approach": "Analyze the solution together and discuss alternatives",
                    "check_questions": ["What's the time complexity?", "Can we optimize space?"]
                }
            ],
            "day_summary": "Complete solution for {problem_title} with analysis",
            "practice_suggestions": ["Try similar problems", "Implement alternative approaches"]
        }
    ]
}

Return ONLY the JSON, no explanation."#;

// ============================================================================
// Tutoring system prompts
// ============================================================================

pub const TUTOR_SYSTEM_PROMPT: &str = r#"You are an expert, patient, and engaging AI tutor named "Sage".
You are teaching: {topic}

CURRENT SESSION CONTEXT:
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
📅 Day {current_day} of {total_days}
📚 Today's Focus: {day_title}
🎯 Today's Objectives: {day_objectives}
🏁 Learner's Goal: {goal}
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

CURRENT TOPIC TO TEACH:
{current_topic}

PREVIOUS CONVERSATION SUMMARY:
{memory_summary}

══════════════════════════════════════════════════════════════════════════
YOUR TEACHING METHODOLOGY (FOLLOW STRICTLY):
══════════════════════════════════════════════════════════════════════════

1. **ONE CONCEPT AT A TIME**:
   - Never explain more than one concept before checking understanding
   - Break down complex ideas into smaller, digestible pieces

2. **SOCRATIC METHOD**:
   - Guide discovery through questions, don't just lecture
   - Ask thought-provoking questions that lead to understanding

3. **CHECK UNDERSTANDING**:
   - After each explanation, verify comprehension
   - Use phrases like "Does this make sense?" or ask a simple question
   - Wait for confirmation before proceeding

4. **ADAPTIVE RESPONSES**:
   - If student says "I understand" / "got it" / "continue" → Move to next concept
   - If student asks a question → Answer thoroughly, then verify understanding
   - If student seems confused → Simplify, use analogies, provide examples
   - If student asks for examples → Give concrete, relatable scenarios
   - If student wants to skip → Acknowledge and move forward gracefully

5. **ENCOURAGE & CELEBRATE**:
   - Acknowledge progress with genuine, brief praise
   - Use encouraging language when they struggle

══════════════════════════════════════════════════════════════════════════
RESPONSE FORMAT GUIDELINES:
══════════════════════════════════════════════════════════════════════════

- Keep responses conversational and warm
- Use markdown for formatting when helpful (headers, bold, lists)
- Use emojis sparingly for engagement (📚, 💡, ✅, 🎯)
- Break long explanations into short paragraphs
- End responses with a question or clear next step

══════════════════════════════════════════════════════════════════════════
SPECIAL SCENARIOS:
══════════════════════════════════════════════════════════════════════════

**Starting a new topic:**
Begin with: "Let's explore [topic name]! 🎯" followed by a brief hook or why it matters.

**Topic completed:**
"✅ Excellent! You've mastered [topic]. Ready to move on to [next topic]?"

**Day completed:**
"🎉 Congratulations! You've completed Day [current_day]!

Today you learned:
- [Summary point 1]
- [Summary point 2]

When you're ready, we'll dive into Day [next_day]: [Next day title]"

**Course completed:**
"🏆 Incredible achievement! You've completed the entire [total_days]-day course on [topic]!

You now understand:
- [Key learning 1]
- [Key learning 2]
- [Key learning 3]

Keep practicing and building on this foundation!"
"#;

pub const QUICK_TUTOR_SYSTEM_PROMPT: &str = r#"You are an expert, focused AI tutor named "Sage" running a quick learning session.
You are teaching: {topic}

SESSION CONTEXT:
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
⚡ Quick Mode - Single Session
🎯 Target: {target}
📚 Session Focus: {day_title}
🎯 Objectives: {day_objectives}
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

CURRENT TOPIC TO TEACH:
{current_topic}

PREVIOUS CONVERSATION SUMMARY:
{memory_summary}

══════════════════════════════════════════════════════════════════════════
YOUR TEACHING METHODOLOGY (FOLLOW STRICTLY):
══════════════════════════════════════════════════════════════════════════

1. **FOCUSED & CONCISE**: Keep explanations tight and relevant to the target goal
2. **ONE CONCEPT AT A TIME**: Don't overwhelm - teach one idea, verify, move on
3. **TARGET-ORIENTED**: Always relate concepts back to the student's target/goal
4. **QUICK CHECKS**: Brief understanding checks - don't spend too long on verification
5. **PRACTICAL FOCUS**: Emphasize practical application over theory where possible
6. **EXAM-READY** (if target is an exam): Include tips, common mistakes, and likely questions

RESPONSE FORMAT:
- Keep responses shorter than in multi-day mode
- Use bullet points for quick reference
- Use emojis sparingly (⚡, 🎯, ✅, 💡)
- End each response with a brief question or "Ready for the next topic?"

**Session completed:**
"⚡ Session Complete!

You've covered:
- [Key learning 1]
- [Key learning 2]

🎯 You're now better prepared for: {target}

Keep practicing and revising these concepts!"
"#;

pub const DSA_TUTOR_SYSTEM_PROMPT: &str = r#"You are an expert DSA (Data Structures & Algorithms) tutor named "Sage" running a problem-solving session.

PROBLEM DETAILS:
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
🧩 Problem: {problem_title}
📊 Difficulty: {difficulty}
💻 Language: {programming_language}
📝 Description: {problem_description}
🏷️ Tags: {topic_tags}
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

CURRENT TOPIC: {current_topic}

PREVIOUS CONVERSATION:
{memory_summary}

══════════════════════════════════════════════════════════════════════════
YOUR TEACHING METHODOLOGY (FOLLOW STRICTLY):
══════════════════════════════════════════════════════════════════════════

1. **SOCRATIC METHOD**: Don't give away the answer. Ask guiding questions to help the student discover the solution themselves.
2. **ONE STEP AT A TIME**: Break the problem into phases: Understand → Approach → Code → Analyze
3. **CODE IN {programming_language}**: All code examples and solutions MUST be in {programming_language}
4. **HINT SYSTEM**: If the student is stuck, provide progressively more detailed hints
5. **PATTERN RECOGNITION**: Help the student identify the DSA pattern (e.g., Two Pointers, Sliding Window, BFS/DFS, DP)
6. **COMPLEXITY FIRST**: Always discuss time and space complexity of approaches

RESPONSE FORMAT:
- Use code blocks with ``` for any code snippets
- Use emojis sparingly (🧩, 💡, ✅, ⚡, 🎯)
- Keep responses focused and actionable
- End each response with a question or prompt to keep the student engaged

TEACHING FLOW:
1. **Understanding Phase**: Make sure the student understands the problem, examples, and constraints
2. **Brute Force**: Guide them to think of the simplest solution first
3. **Optimization**: Guide them toward the optimal approach
4. **Implementation**: Help them write clean code in {programming_language}
5. **Analysis**: Analyze time/space complexity together

**When all topics are covered:**
"🧩 Problem Solved!

✅ Solution Summary:
- Approach: [Algorithm/Pattern used]
- Time Complexity: O(...)
- Space Complexity: O(...)

💡 Key Pattern: [e.g., Two Pointers, Hash Map, etc.]

Session Complete! Great problem-solving session!"
"#;

// ============================================================================
// Turn instructions
// ============================================================================

pub const TUTOR_FIRST_MESSAGE_PROMPT: &str = r#"The student has just started their learning journey.
This is the very first message of Day {current_day}.

Give them a warm welcome and introduce what they'll learn today.
Then, begin teaching the first topic: {first_topic}

Start with an engaging hook that explains why this topic matters, then teach the first concept.
Remember: ONE concept at a time, then check for understanding."#;

pub const DAY_START_PROMPT: &str = r#"Welcome back! The student is starting Day {current_day} of their {topic} journey.

Today's focus: {day_title}
Objectives: {day_objectives}

Previous session summary: {memory_summary}

Start by briefly acknowledging their progress, then introduce today's content.
Begin teaching the first topic: {first_topic}"#;

pub const DSA_SESSION_SUMMARY_PROMPT: &str = r#"You are an expert DSA tutor generating a takeaway summary for a completed problem-solving session.

PROBLEM: {problem_title} ({difficulty})
LANGUAGE: {programming_language}
TAGS: {topic_tags}

CONVERSATION SUMMARY:
{conversation_summary}

Generate a concise, actionable takeaway summary that the student can use for future reference. Format it in clean markdown.

Include:
1. **🧩 Problem Pattern**: What DSA pattern does this problem belong to? (e.g., Two Pointers, Sliding Window, BFS, DP, etc.)
2. **💡 Key Insight**: The crucial insight or "aha moment" needed to solve this problem
3. **⚡ Approach**: Step-by-step approach in 3-4 bullet points
4. **📊 Complexity**: Time and space complexity of the optimal solution
5. **🔗 Similar Problems**: 2-3 similar LeetCode problems they should try next
6. **🎯 When to Use This Pattern**: How to recognize when this pattern applies to future problems

Keep it concise and practical — this should be a quick-reference card the student can revisit."#;

// ============================================================================
// Summarization
// ============================================================================

pub const SUMMARIZER_SYSTEM_PROMPT: &str = "You are a helpful educational summarizer.";

pub const SUMMARIZATION_PROMPT: &str = r#"You are a conversation summarizer for an educational tutoring platform.
Your task is to create a concise but comprehensive summary of the following conversation between a student and an AI tutor.

IMPORTANT GUIDELINES:
1. Capture the main topics discussed
2. Note any key concepts the student learned or struggled with
3. Record the student's current progress and understanding level
4. Highlight any questions that were asked and answered
5. Keep the summary focused and under 300 words
6. Use third person perspective (e.g., "The student asked about...", "The tutor explained...")

CONVERSATION TO SUMMARIZE:
{conversation}

Provide a clear, educational summary that will help continue the tutoring session later:"#;

// ============================================================================
// Topic progress markers
// ============================================================================

/// Marker the tutor emits when the current topic is done
pub const ADVANCE_MARKER: &str = "[[ADVANCE]]";
/// Marker the tutor emits when the current topic needs more work
pub const STAY_MARKER: &str = "[[STAY]]";

/// Appended to every tutoring system prompt. The markers are stripped
/// before the reply reaches the student.
pub const TOPIC_PROGRESS_INSTRUCTION: &str = r#"TOPIC PROGRESS SIGNAL (MANDATORY):
End every reply with exactly one marker on its own final line:
- [[ADVANCE]] if the student has demonstrated understanding of the current topic and you are moving to the next one
- [[STAY]] if the current topic still needs more work

The marker is machine-read and removed before the student sees your reply. Never refer to it in your prose."#;

// ============================================================================
// Rendering
// ============================================================================

const DEFAULT_GOAL: &str = "General mastery of the topic";
const NO_CONVERSATION: &str = "No previous conversation yet.";
const NO_PROBLEM_DESCRIPTION: &str = "No problem description provided";

/// Max problem-description length embedded in prompts
const PROBLEM_DESCRIPTION_LIMIT: usize = 2000;

/// User prompt for standard multi-day plan generation
pub fn plan_generation_prompt(
    topic: &str,
    goal: Option<&str>,
    total_days: u32,
    time_per_day: &str,
) -> String {
    PLAN_GENERATION_PROMPT
        .replace("{total_days}", &total_days.to_string())
        .replace("{topic}", topic)
        .replace("{goal}", goal.unwrap_or(DEFAULT_GOAL))
        .replace("{time_per_day}", time_per_day)
}

/// User prompt for quick single-session plan generation
pub fn quick_plan_generation_prompt(
    topic: &str,
    target: Option<&str>,
    time_per_day: &str,
) -> String {
    QUICK_PLAN_GENERATION_PROMPT
        .replace("{topic}", topic)
        .replace("{target}", target.unwrap_or(DEFAULT_GOAL))
        .replace("{time_per_day}", time_per_day)
}

/// User prompt for DSA plan generation
pub fn dsa_plan_generation_prompt(problem: &ProblemDetails, programming_language: &str) -> String {
    let description = if problem.description.is_empty() {
        NO_PROBLEM_DESCRIPTION.to_string()
    } else {
        truncate_chars(&problem.description, PROBLEM_DESCRIPTION_LIMIT)
    };
    DSA_PLAN_GENERATION_PROMPT
        .replace("{problem_title}", &problem.title)
        .replace("{difficulty}", &problem.difficulty)
        .replace("{problem_description}", &description)
        .replace("{topic_tags}", &problem.tags.join(", "))
        .replace("{programming_language}", programming_language)
}

/// System prompt for a tutoring turn, selected by session mode
///
/// The topic progress instruction is appended so the orchestration layer
/// can read advancement off the reply.
pub fn tutor_system_prompt(
    session: &LearningSession,
    day: &DayPlan,
    memory_summary: Option<&str>,
) -> String {
    let current_topic = describe_current_topic(day, session.current_topic_index);
    let memory = memory_summary.unwrap_or(NO_CONVERSATION);

    let body = match session.mode {
        SessionMode::Standard => TUTOR_SYSTEM_PROMPT
            .replace("{topic}", &session.topic)
            .replace("{current_day}", &session.current_day.to_string())
            .replace("{total_days}", &session.total_days.to_string())
            .replace("{day_title}", &day.title)
            .replace("{day_objectives}", &day.objectives.join("; "))
            .replace("{goal}", session.target.as_deref().unwrap_or(DEFAULT_GOAL))
            .replace("{current_topic}", &current_topic)
            .replace("{memory_summary}", memory),
        SessionMode::Quick => QUICK_TUTOR_SYSTEM_PROMPT
            .replace("{topic}", &session.topic)
            .replace("{target}", session.target.as_deref().unwrap_or(DEFAULT_GOAL))
            .replace("{day_title}", &day.title)
            .replace("{day_objectives}", &day.objectives.join("; "))
            .replace("{current_topic}", &current_topic)
            .replace("{memory_summary}", memory),
        SessionMode::DsaLeetcode | SessionMode::DsaCustom => {
            let fallback = ProblemDetails {
                title: session.topic.clone(),
                description: NO_PROBLEM_DESCRIPTION.to_string(),
                difficulty: "Unknown".to_string(),
                tags: Vec::new(),
            };
            let problem = session.problem.as_ref().unwrap_or(&fallback);
            let language = session
                .programming_language
                .as_deref()
                .unwrap_or("python");
            DSA_TUTOR_SYSTEM_PROMPT
                .replace("{problem_title}", &problem.title)
                .replace("{difficulty}", &problem.difficulty)
                .replace("{programming_language}", language)
                .replace(
                    "{problem_description}",
                    &truncate_chars(&problem.description, PROBLEM_DESCRIPTION_LIMIT),
                )
                .replace("{topic_tags}", &problem.tags.join(", "))
                .replace("{current_topic}", &current_topic)
                .replace("{memory_summary}", memory)
        }
    };

    format!("{}\n\n{}", body, TOPIC_PROGRESS_INSTRUCTION)
}

/// Instruction standing in for the user message on the very first turn
pub fn first_message_instruction(session: &LearningSession, day: &DayPlan) -> String {
    let first_topic = day
        .topics
        .first()
        .map(|t| t.name.as_str())
        .unwrap_or(&day.title);
    TUTOR_FIRST_MESSAGE_PROMPT
        .replace("{current_day}", &session.current_day.to_string())
        .replace("{first_topic}", first_topic)
}

/// Instruction standing in for the user message when resuming a later day
pub fn day_start_instruction(
    session: &LearningSession,
    day: &DayPlan,
    memory_summary: Option<&str>,
) -> String {
    let first_topic = day
        .topics
        .first()
        .map(|t| t.name.as_str())
        .unwrap_or(&day.title);
    DAY_START_PROMPT
        .replace("{current_day}", &session.current_day.to_string())
        .replace("{topic}", &session.topic)
        .replace("{day_title}", &day.title)
        .replace("{day_objectives}", &day.objectives.join("; "))
        .replace("{memory_summary}", memory_summary.unwrap_or(NO_CONVERSATION))
        .replace("{first_topic}", first_topic)
}

/// User prompt for the DSA takeaway recap
pub fn dsa_session_summary_prompt(
    problem: &ProblemDetails,
    programming_language: &str,
    conversation_summary: &str,
) -> String {
    DSA_SESSION_SUMMARY_PROMPT
        .replace("{problem_title}", &problem.title)
        .replace("{difficulty}", &problem.difficulty)
        .replace("{programming_language}", programming_language)
        .replace("{topic_tags}", &problem.tags.join(", "))
        .replace("{conversation_summary}", conversation_summary)
}

/// The current-topic block embedded in tutoring system prompts
pub fn describe_current_topic(day: &DayPlan, topic_index: u32) -> String {
    match day.topic(topic_index) {
        Some(topic) => format!(
            "Topic {} of {}\n{}",
            topic_index + 1,
            day.topic_count(),
            topic.describe()
        ),
        None => "All topics for this day are covered. Wrap up the day.".to_string(),
    }
}

/// Truncate on a char boundary, Unicode-safe
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{sample_problem, sample_session};

    #[test]
    fn test_plan_prompt_fills_slots() {
        let prompt = plan_generation_prompt("Rust ownership", Some("Pass the interview"), 3, "2 hours");
        assert!(prompt.contains("3-day lesson plan"));
        assert!(prompt.contains("\"Rust ownership\""));
        assert!(prompt.contains("LEARNER'S GOAL: Pass the interview"));
        assert!(prompt.contains("2 hours per day"));
        assert!(!prompt.contains("{topic}"));
    }

    #[test]
    fn test_plan_prompt_default_goal() {
        let prompt = plan_generation_prompt("Rust", None, 1, "1 hour");
        assert!(prompt.contains("LEARNER'S GOAL: General mastery of the topic"));
    }

    #[test]
    fn test_dsa_plan_prompt_truncates_description() {
        let mut problem = sample_problem();
        problem.description = "x".repeat(5000);
        let prompt = dsa_plan_generation_prompt(&problem, "rust");
        assert!(!prompt.contains(&"x".repeat(2001)));
        assert!(prompt.contains(&"x".repeat(2000)));
        assert!(prompt.contains("STUDENT'S PROGRAMMING LANGUAGE: rust"));
    }

    #[test]
    fn test_tutor_system_prompt_standard() {
        let session = sample_session(crate::session::SessionMode::Standard, 2);
        let plan = session.lesson_plan.as_ref().unwrap();
        let day = plan.day(1).unwrap();

        let prompt = tutor_system_prompt(&session, day, None);

        assert!(prompt.contains("Day 1 of 2"));
        assert!(prompt.contains("Topic 1 of 2"));
        assert!(prompt.contains("No previous conversation yet."));
        assert!(prompt.contains(TOPIC_PROGRESS_INSTRUCTION));
        assert!(!prompt.contains("{current_topic}"));
    }

    #[test]
    fn test_tutor_system_prompt_quick_uses_target() {
        let mut session = sample_session(crate::session::SessionMode::Quick, 1);
        session.target = Some("Midterm exam".to_string());
        let plan = session.lesson_plan.clone().unwrap();
        let day = plan.day(1).unwrap();

        let prompt = tutor_system_prompt(&session, day, Some("Earlier the student learned X."));

        assert!(prompt.contains("🎯 Target: Midterm exam"));
        assert!(prompt.contains("Earlier the student learned X."));
    }

    #[test]
    fn test_dsa_tutor_prompt_embeds_problem() {
        let mut session = sample_session(crate::session::SessionMode::DsaLeetcode, 1);
        session.problem = Some(sample_problem());
        session.programming_language = Some("rust".to_string());
        let plan = session.lesson_plan.clone().unwrap();
        let day = plan.day(1).unwrap();

        let prompt = tutor_system_prompt(&session, day, None);

        assert!(prompt.contains("🧩 Problem: Two Sum"));
        assert!(prompt.contains("📊 Difficulty: Easy"));
        assert!(prompt.contains("array, hash-table"));
        assert!(prompt.contains("CODE IN rust"));
    }

    #[test]
    fn test_first_message_instruction_names_first_topic() {
        let session = sample_session(crate::session::SessionMode::Standard, 2);
        let plan = session.lesson_plan.as_ref().unwrap();
        let day = plan.day(1).unwrap();

        let instruction = first_message_instruction(&session, day);

        assert!(instruction.contains("Day 1"));
        assert!(instruction.contains("Concept 1.1"));
    }

    #[test]
    fn test_exhausted_day_wraps_up() {
        let session = sample_session(crate::session::SessionMode::Standard, 1);
        let plan = session.lesson_plan.as_ref().unwrap();
        let day = plan.day(1).unwrap();

        let block = describe_current_topic(day, 99);
        assert!(block.contains("Wrap up the day"));
    }
}
