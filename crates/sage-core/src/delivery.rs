// Response delivery classification
//
// Short replies are cheaper to deliver in one burst; long ones should
// stream. A deterministic keyword/length heuristic over the student's
// latest utterance predicts the reply size. Advisory only: delivery mode
// never changes what the tutor says, so a wrong guess costs latency, not
// correctness.

use serde::{Deserialize, Serialize};

use crate::config::SageConfig;

/// Expected shape of the tutor's next reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseClass {
    Acknowledgment,
    ShortAnswer,
    Clarification,
    Explanation,
    DetailedExplanation,
    LessonIntro,
    DaySummary,
    PlanGeneration,
    Default,
}

impl ResponseClass {
    /// Estimated token budget for this class of reply
    pub fn expected_tokens(&self) -> u32 {
        match self {
            ResponseClass::Acknowledgment => 20,
            ResponseClass::ShortAnswer => 50,
            ResponseClass::Clarification => 80,
            ResponseClass::Explanation => 200,
            ResponseClass::DetailedExplanation => 400,
            ResponseClass::LessonIntro => 300,
            ResponseClass::DaySummary => 250,
            ResponseClass::PlanGeneration => 2000,
            ResponseClass::Default => 150,
        }
    }
}

/// How a reply travels to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Full response in one piece
    Burst,
    /// Token-by-token streaming
    Stream,
}

/// Strategy for predicting the reply class from the student's utterance
///
/// Swappable so a hosting application can plug in a smarter predictor
/// without touching the orchestration.
pub trait ResponseClassifier: Send + Sync {
    fn classify(&self, user_message: Option<&str>) -> ResponseClass;
}

/// Keyword/length heuristic classifier
///
/// No message means the turn opens a lesson. Exact acknowledgment phrases
/// and very short inputs expect a short reply; explanation triggers expect
/// a long one.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

const ACKNOWLEDGMENT_PHRASES: &[&str] = &[
    "ok",
    "okay",
    "got it",
    "i understand",
    "understood",
    "yes",
    "no",
    "sure",
    "thanks",
    "thank you",
    "next",
    "continue",
    "go on",
    "proceed",
];

const EXPLANATION_TRIGGERS: &[&str] = &[
    "explain",
    "what is",
    "what are",
    "how does",
    "how do",
    "why is",
    "why does",
    "tell me about",
    "describe",
    "can you explain",
    "help me understand",
];

const CLARIFICATION_TRIGGERS: &[&str] = &[
    "what do you mean",
    "i don't understand",
    "confused",
    "simpler",
    "example",
    "analogy",
];

impl ResponseClassifier for KeywordClassifier {
    fn classify(&self, user_message: Option<&str>) -> ResponseClass {
        let message = match user_message {
            None | Some("") => return ResponseClass::LessonIntro,
            Some(m) => m.to_lowercase().trim().to_string(),
        };

        if ACKNOWLEDGMENT_PHRASES.contains(&message.as_str()) || message.chars().count() < 10 {
            return ResponseClass::Acknowledgment;
        }

        if EXPLANATION_TRIGGERS.iter().any(|t| message.contains(t)) {
            return ResponseClass::DetailedExplanation;
        }

        if CLARIFICATION_TRIGGERS.iter().any(|t| message.contains(t)) {
            return ResponseClass::Explanation;
        }

        ResponseClass::Default
    }
}

/// Streaming decision over a classified reply
#[derive(Debug, Clone, Copy)]
pub struct DeliveryPolicy {
    stream_threshold: u32,
}

impl DeliveryPolicy {
    pub fn new(stream_threshold: u32) -> Self {
        Self { stream_threshold }
    }

    pub fn from_config(config: &SageConfig) -> Self {
        Self::new(config.stream_token_threshold)
    }

    /// Burst below the threshold, stream at or above it
    pub fn mode_for(&self, class: ResponseClass) -> DeliveryMode {
        if class.expected_tokens() >= self.stream_threshold {
            DeliveryMode::Stream
        } else {
            DeliveryMode::Burst
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::from_config(&SageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(message: Option<&str>) -> ResponseClass {
        KeywordClassifier.classify(message)
    }

    #[test]
    fn test_no_message_is_lesson_intro() {
        assert_eq!(classify(None), ResponseClass::LessonIntro);
        assert_eq!(classify(Some("")), ResponseClass::LessonIntro);
    }

    #[test]
    fn test_acknowledgments() {
        assert_eq!(classify(Some("ok")), ResponseClass::Acknowledgment);
        assert_eq!(classify(Some("Got it")), ResponseClass::Acknowledgment);
        // Under ten characters counts as an acknowledgment too
        assert_eq!(classify(Some("wow nice")), ResponseClass::Acknowledgment);
    }

    #[test]
    fn test_explanation_triggers() {
        assert_eq!(
            classify(Some("Can you explain how lifetimes work?")),
            ResponseClass::DetailedExplanation
        );
        assert_eq!(
            classify(Some("what is a borrow checker")),
            ResponseClass::DetailedExplanation
        );
    }

    #[test]
    fn test_clarification_triggers() {
        assert_eq!(
            classify(Some("i'm still confused about this")),
            ResponseClass::Explanation
        );
        assert_eq!(
            classify(Some("could you give me an analogy for that")),
            ResponseClass::Explanation
        );
    }

    #[test]
    fn test_explanation_wins_over_clarification() {
        // Contains both kinds of trigger; explanation is checked first
        assert_eq!(
            classify(Some("explain it simpler this time please")),
            ResponseClass::DetailedExplanation
        );
    }

    #[test]
    fn test_default_class() {
        assert_eq!(
            classify(Some("let me try implementing that now")),
            ResponseClass::Default
        );
    }

    #[test]
    fn test_policy_thresholds() {
        let policy = DeliveryPolicy::new(100);
        assert_eq!(policy.mode_for(ResponseClass::Acknowledgment), DeliveryMode::Burst);
        assert_eq!(policy.mode_for(ResponseClass::Clarification), DeliveryMode::Burst);
        assert_eq!(policy.mode_for(ResponseClass::Default), DeliveryMode::Stream);
        assert_eq!(policy.mode_for(ResponseClass::DetailedExplanation), DeliveryMode::Stream);
    }
}
