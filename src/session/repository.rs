//! Session repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Session, SessionData};
use crate::{OrganizationId, OrgbookError};

/// Storage for sessions.
///
/// - [`InMemorySessionRepository`](super::InMemorySessionRepository): single process, lost on restart
/// - [`FileSessionRepository`](super::FileSessionRepository): one JSON file per session
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates a session and returns its id.
    async fn create(&self, data: SessionData) -> Result<String, OrgbookError>;

    async fn find(&self, session_id: &str) -> Result<Option<Session>, OrgbookError>;

    /// Moves the expiry forward (sliding sessions).
    async fn extend(
        &self,
        session_id: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<(), OrgbookError>;

    /// Records or clears the active organization.
    async fn set_current_organization(
        &self,
        session_id: &str,
        organization_id: Option<OrganizationId>,
    ) -> Result<(), OrgbookError>;

    async fn destroy(&self, session_id: &str) -> Result<(), OrgbookError>;

    async fn destroy_user_sessions(&self, user_id: i64) -> Result<(), OrgbookError>;

    /// Removes expired sessions and returns how many were removed.
    async fn prune_expired(&self) -> Result<u64, OrgbookError>;
}
