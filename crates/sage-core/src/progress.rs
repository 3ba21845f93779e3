// Session progress state machine
//
// Pure transitions over a session snapshot. Callers (the service layer)
// mutate a local copy and persist the whole thing afterwards, so a failed
// turn never leaves a half-applied transition in the store.
//
// Position is (current_day, current_topic_index), both relative to the
// lesson plan. The topic index counts covered topics within the current
// day, so it may legitimately sit one past the last topic once the day is
// done. Completion is re-derived from position on every update rather
// than stored as an independent flag.

use chrono::Utc;

use crate::error::{Result, SageError};
use crate::plan::DayPlan;
use crate::session::{LearningSession, SessionStatus};

/// Rejects chat on sessions that are still planning, failed, or done.
pub fn ensure_can_chat(session: &LearningSession) -> Result<()> {
    if session.status.can_chat() {
        Ok(())
    } else {
        Err(SageError::invalid_state(format!(
            "Session is not ready for chat. Status: {}",
            session.status
        )))
    }
}

/// Moves to the next topic within the current day.
///
/// Does not clamp: pushing past the final topic marks the day as covered,
/// and the day-complete check upstream decides whether to roll over.
pub fn advance_topic(session: &mut LearningSession) {
    session.current_topic_index += 1;
    refresh_completion(session);
}

/// Moves to the next day and resets the topic index.
pub fn advance_day(session: &mut LearningSession) -> Result<()> {
    if session.current_day >= session.total_days {
        return Err(SageError::invalid_state("Already on the last day"));
    }
    session.current_day += 1;
    session.current_topic_index = 0;
    refresh_completion(session);
    Ok(())
}

/// Jumps to an arbitrary day for review. Resets the topic index but never
/// touches the status, so revisiting day 1 of a completed course keeps it
/// completed.
pub fn goto_day(session: &mut LearningSession, day: u32) -> Result<()> {
    if day < 1 || day > session.total_days {
        return Err(SageError::invalid_input(format!(
            "Day must be between 1 and {}",
            session.total_days
        )));
    }
    session.current_day = day;
    session.current_topic_index = 0;
    Ok(())
}

/// Applies an explicit position update. The day is clamped to the plan
/// length; the topic index is taken as-is.
pub fn update_progress(
    session: &mut LearningSession,
    day: Option<u32>,
    topic_index: Option<u32>,
) {
    if let Some(day) = day {
        session.current_day = day.min(session.total_days);
    }
    if let Some(index) = topic_index {
        session.current_topic_index = index;
    }
    refresh_completion(session);
}

/// Sets the status directly, stamping `completed_at` on the first
/// transition to COMPLETED.
pub fn set_status(session: &mut LearningSession, status: SessionStatus) {
    if status == SessionStatus::Completed && session.completed_at.is_none() {
        session.completed_at = Some(Utc::now());
    }
    session.status = status;
}

/// Re-derives COMPLETED from the current position. The course is done
/// once the topic index has moved past the final topic of the final day.
/// Idempotent, and `completed_at` is stamped exactly once.
pub fn refresh_completion(session: &mut LearningSession) {
    let Some(plan) = &session.lesson_plan else {
        return;
    };
    let Some(last) = plan.last_day() else {
        return;
    };
    if session.current_day >= session.total_days
        && session.current_topic_index >= last.topic_count()
    {
        set_status(session, SessionStatus::Completed);
    }
}

/// True when `topic_index` is at or past the final topic of the day, i.e.
/// advancing from here would leave the day fully covered.
pub fn is_last_topic(day: &DayPlan, topic_index: u32) -> bool {
    topic_index >= day.topic_count().saturating_sub(1)
}

/// Fraction of the plan covered so far, as a percentage rounded to one
/// decimal. Days strictly before the current one count in full; the
/// current day contributes the topic index (clamped to the day's size).
/// 0.0 without a plan.
pub fn progress_percentage(session: &LearningSession) -> f64 {
    let Some(plan) = &session.lesson_plan else {
        return 0.0;
    };
    if plan.days.is_empty() {
        return 0.0;
    }
    let total = plan.total_topics();
    if total == 0 {
        return 0.0;
    }

    let mut covered: u32 = 0;
    for day in &plan.days {
        if day.day < session.current_day {
            covered += day.topic_count();
        } else if day.day == session.current_day {
            covered += session.current_topic_index.min(day.topic_count());
        }
    }

    (f64::from(covered) / f64::from(total) * 1000.0).round() / 10.0
}

// ============================================================================
// Tests
// ============================================================================
