// Core traits for pluggable backends
//
// These traits allow the tutoring service to be used with different backends:
// - In-memory implementations for examples and testing
// - Database implementations for production
// - Fixture-backed catalogs for offline problem lookups

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Result, SageError};
use crate::session::{
    LearningSession, NewSession, ProblemDetails, SessionMode, SessionPatch, SessionStatus,
};

// ============================================================================
// SessionStore - For persisting learning sessions
// ============================================================================

/// Filter for listing sessions
#[derive(Debug, Clone)]
pub struct SessionFilter {
    /// Only sessions in this mode
    pub mode: Option<SessionMode>,
    /// Only sessions with this status
    pub status: Option<SessionStatus>,
    /// Maximum number of sessions to return
    pub limit: usize,
    /// Number of sessions to skip
    pub offset: usize,
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self {
            mode: None,
            status: None,
            limit: 50,
            offset: 0,
        }
    }
}

impl SessionFilter {
    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Trait for storing and retrieving learning sessions
///
/// Implementations can:
/// - Store sessions in a database
/// - Keep sessions in memory for examples and testing
///
/// The service layer is stateless between turns; everything a turn needs
/// is loaded from this store and every change is written back through it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session from the given request, starting in PLANNING
    async fn create(&self, new_session: NewSession) -> Result<LearningSession>;

    /// Load a session by id
    async fn get(&self, session_id: Uuid) -> Result<Option<LearningSession>>;

    /// Load a session by id, failing if it does not exist
    async fn get_required(&self, session_id: Uuid) -> Result<LearningSession> {
        self.get(session_id)
            .await?
            .ok_or(SageError::SessionNotFound(session_id))
    }

    /// Apply a patch to a session and return the updated row
    async fn update(&self, session_id: Uuid, patch: SessionPatch) -> Result<LearningSession>;

    /// Delete a session; returns false if it did not exist
    async fn delete(&self, session_id: Uuid) -> Result<bool>;

    /// List sessions for a user, newest first
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
    ) -> Result<Vec<LearningSession>>;
}

// ============================================================================
// ProblemCatalog - For resolving coding problems by number
// ============================================================================

/// Trait for looking up coding problems referenced by number
///
/// Implementations can:
/// - Query an external problem API
/// - Serve a bundled fixture set for tests
///
/// A miss is not an error; DSA planning falls back to a generic
/// statement when the catalog does not know the problem.
#[async_trait]
pub trait ProblemCatalog: Send + Sync {
    /// Look up a problem by its number
    async fn lookup(&self, problem_number: u32) -> Result<Option<ProblemDetails>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = SessionFilter::default();
        assert_eq!(filter.limit, 50);
        assert_eq!(filter.offset, 0);
        assert!(filter.mode.is_none());
        assert!(filter.status.is_none());
    }

    #[test]
    fn test_filter_builders() {
        let filter = SessionFilter::default()
            .with_mode(SessionMode::Quick)
            .with_status(SessionStatus::Completed)
            .with_limit(5);
        assert_eq!(filter.mode, Some(SessionMode::Quick));
        assert_eq!(filter.status, Some(SessionStatus::Completed));
        assert_eq!(filter.limit, 5);
    }
}
