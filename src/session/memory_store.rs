//! In-memory session storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::repository::SessionRepository;
use super::{Session, SessionData};
use crate::crypto::{DEFAULT_TOKEN_LENGTH, generate_token};
use crate::{OrganizationId, OrgbookError};

/// Sessions in a shared `HashMap`; clones see the same sessions.
#[derive(Clone)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn modify<F>(&self, session_id: &str, f: F) -> Result<(), OrgbookError>
    where
        F: FnOnce(&mut SessionData),
    {
        if let Some(data) = self
            .sessions
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?
            .get_mut(session_id)
        {
            f(data);
        }
        Ok(())
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, data: SessionData) -> Result<String, OrgbookError> {
        let session_id = generate_token(DEFAULT_TOKEN_LENGTH);

        self.sessions
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?
            .insert(session_id.clone(), data);

        Ok(session_id)
    }

    async fn find(&self, session_id: &str) -> Result<Option<Session>, OrgbookError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        Ok(sessions
            .get(session_id)
            .map(|data| Session::new(session_id.to_owned(), data.clone())))
    }

    async fn extend(
        &self,
        session_id: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<(), OrgbookError> {
        self.modify(session_id, |data| data.expires_at = new_expires_at)
    }

    async fn set_current_organization(
        &self,
        session_id: &str,
        organization_id: Option<OrganizationId>,
    ) -> Result<(), OrgbookError> {
        self.modify(session_id, |data| {
            data.current_organization_id = organization_id;
        })
    }

    async fn destroy(&self, session_id: &str) -> Result<(), OrgbookError> {
        self.sessions
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?
            .remove(session_id);

        Ok(())
    }

    async fn destroy_user_sessions(&self, user_id: i64) -> Result<(), OrgbookError> {
        self.sessions
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?
            .retain(|_, data| data.user_id != user_id);

        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64, OrgbookError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, data| data.expires_at > now);

        let pruned = before.saturating_sub(sessions.len());
        Ok(u64::try_from(pruned).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::User;

    fn session_data(user_id: i64) -> SessionData {
        let user = User::mock(user_id, "Jane", "jane@example.com");
        SessionData::for_user(&user, Duration::hours(2))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemorySessionRepository::new();

        let session_id = repo.create(session_data(1)).await.unwrap();
        assert_eq!(session_id.len(), 32);

        let session = repo.find(&session_id).await.unwrap().unwrap();
        assert_eq!(session.id, session_id);
        assert_eq!(session.data.user_id, 1);
        assert!(repo.find("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_current_organization() {
        let repo = InMemorySessionRepository::new();
        let session_id = repo.create(session_data(1)).await.unwrap();

        repo.set_current_organization(&session_id, Some(OrganizationId(4)))
            .await
            .unwrap();
        let session = repo.find(&session_id).await.unwrap().unwrap();
        assert_eq!(session.data.current_organization_id, Some(OrganizationId(4)));

        repo.set_current_organization(&session_id, None).await.unwrap();
        let session = repo.find(&session_id).await.unwrap().unwrap();
        assert_eq!(session.data.current_organization_id, None);
    }

    #[tokio::test]
    async fn test_destroy_user_sessions_and_prune() {
        let repo = InMemorySessionRepository::new();
        repo.create(session_data(1)).await.unwrap();
        repo.create(session_data(1)).await.unwrap();
        let keep = repo.create(session_data(2)).await.unwrap();

        repo.destroy_user_sessions(1).await.unwrap();
        assert_eq!(repo.len(), 1);

        repo.extend(&keep, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(repo.prune_expired().await.unwrap(), 1);
        assert!(repo.is_empty());
    }
}
