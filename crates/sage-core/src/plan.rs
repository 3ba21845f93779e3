// Lesson plan types
//
// The curriculum produced by plan generation: ordered days, each carrying
// the topics taught that day. Parsed from strict-JSON LLM output and
// validated before a session is marked READY.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SageError};

/// The smallest teachable unit within a day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicPlan {
    pub name: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub teaching_approach: String,
    #[serde(default)]
    pub check_questions: Vec<String>,
}

impl TopicPlan {
    /// Render the topic as the block the tutor prompt embeds
    pub fn describe(&self) -> String {
        let mut block = format!("Topic: {}", self.name);
        if !self.duration.is_empty() {
            block.push_str(&format!("\nDuration: {}", self.duration));
        }
        if !self.key_concepts.is_empty() {
            block.push_str(&format!("\nKey concepts: {}", self.key_concepts.join(", ")));
        }
        if !self.teaching_approach.is_empty() {
            block.push_str(&format!("\nTeaching approach: {}", self.teaching_approach));
        }
        if !self.check_questions.is_empty() {
            block.push_str(&format!(
                "\nCheck questions: {}",
                self.check_questions.join(" | ")
            ));
        }
        block
    }
}

/// One day of the curriculum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    /// 1-indexed day number
    pub day: u32,
    pub title: String,
    pub objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    pub topics: Vec<TopicPlan>,
    #[serde(default)]
    pub day_summary: String,
    #[serde(default)]
    pub practice_suggestions: Vec<String>,
}

impl DayPlan {
    /// Topic at a 0-indexed position
    pub fn topic(&self, index: u32) -> Option<&TopicPlan> {
        self.topics.get(index as usize)
    }

    pub fn topic_count(&self) -> u32 {
        self.topics.len() as u32
    }
}

/// The generated curriculum for a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonPlan {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_per_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_progression: Option<String>,
    pub days: Vec<DayPlan>,
}

impl LessonPlan {
    /// Parse a plan from raw LLM output, stripping a Markdown fence if present.
    /// Parse failures are generation failures; nothing is retried here.
    pub fn from_llm_text(text: &str) -> Result<Self> {
        let cleaned = strip_code_fences(text);
        serde_json::from_str(cleaned)
            .map_err(|e| SageError::plan(format!("invalid plan JSON: {e}")))
    }

    /// Structural validation against the requested day count.
    pub fn validate(&self, expected_days: u32) -> Result<()> {
        if self.days.is_empty() {
            return Err(SageError::plan("plan has no days"));
        }
        if self.days.len() as u32 != expected_days {
            return Err(SageError::plan(format!(
                "plan has {} days, expected {}",
                self.days.len(),
                expected_days
            )));
        }
        for (i, day) in self.days.iter().enumerate() {
            let expected = i as u32 + 1;
            if day.day != expected {
                return Err(SageError::plan(format!(
                    "day numbers must be sequential: position {} carries day {}",
                    expected, day.day
                )));
            }
            if day.topics.is_empty() {
                return Err(SageError::plan(format!("day {} has no topics", day.day)));
            }
        }
        Ok(())
    }

    /// Day entry by 1-indexed number
    pub fn day(&self, number: u32) -> Option<&DayPlan> {
        if number == 0 {
            return None;
        }
        self.days.get(number as usize - 1)
    }

    pub fn day_count(&self) -> u32 {
        self.days.len() as u32
    }

    /// Topics across the whole plan
    pub fn total_topics(&self) -> u32 {
        self.days.iter().map(|d| d.topic_count()).sum()
    }

    pub fn last_day(&self) -> Option<&DayPlan> {
        self.days.last()
    }
}

/// Strip a Markdown code fence wrapper (``` or ```json) from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // First line is the fence, possibly with a language tag
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
