//! File-based session storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::repository::SessionRepository;
use super::{Session, SessionData};
use crate::crypto::{DEFAULT_TOKEN_LENGTH, generate_token};
use crate::{OrganizationId, OrgbookError};

/// One pretty-printed JSON file per session, named `{session_id}.json`.
///
/// Sessions survive restarts of a single-instance deployment.
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    directory: PathBuf,
}

impl FileSessionRepository {
    /// Creates the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, OrgbookError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|e| {
            OrgbookError::Internal(format!("failed to create session directory: {e}"))
        })?;
        Ok(Self { directory })
    }

    /// `None` for ids that could escape the directory.
    fn session_path(&self, session_id: &str) -> Option<PathBuf> {
        (!session_id.is_empty() && session_id.chars().all(|c| c.is_ascii_alphanumeric()))
            .then(|| self.directory.join(format!("{session_id}.json")))
    }

    fn read(path: &Path) -> Result<Option<SessionData>, OrgbookError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(OrgbookError::Internal(format!(
                    "failed to read session file: {e}"
                )));
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| OrgbookError::Internal(format!("failed to parse session file: {e}")))
    }

    fn write(path: &Path, data: &SessionData) -> Result<(), OrgbookError> {
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| OrgbookError::Internal(format!("failed to serialize session: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| OrgbookError::Internal(format!("failed to write session file: {e}")))
    }

    fn modify<F>(&self, session_id: &str, f: F) -> Result<(), OrgbookError>
    where
        F: FnOnce(&mut SessionData),
    {
        let Some(path) = self.session_path(session_id) else {
            return Ok(());
        };
        if let Some(mut data) = Self::read(&path)? {
            f(&mut data);
            Self::write(&path, &data)?;
        }
        Ok(())
    }

    /// Every readable session file with its parsed data.
    fn entries(&self) -> Result<Vec<(PathBuf, SessionData)>, OrgbookError> {
        let entries = std::fs::read_dir(&self.directory).map_err(|e| {
            OrgbookError::Internal(format!("failed to read session directory: {e}"))
        })?;

        Ok(entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| Self::read(&path).ok().flatten().map(|data| (path, data)))
            .collect())
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn create(&self, data: SessionData) -> Result<String, OrgbookError> {
        let session_id = generate_token(DEFAULT_TOKEN_LENGTH);
        let path = self
            .session_path(&session_id)
            .ok_or_else(|| OrgbookError::Internal("invalid session id".into()))?;
        Self::write(&path, &data)?;
        Ok(session_id)
    }

    async fn find(&self, session_id: &str) -> Result<Option<Session>, OrgbookError> {
        let Some(path) = self.session_path(session_id) else {
            return Ok(None);
        };
        Ok(Self::read(&path)?.map(|data| Session::new(session_id.to_owned(), data)))
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
        let Some(path) = self.session_path(session_id) else {
            return Ok(());
        };
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OrgbookError::Internal(format!(
                "failed to delete session file: {e}"
            ))),
        }
    }

    async fn destroy_user_sessions(&self, user_id: i64) -> Result<(), OrgbookError> {
        for (path, data) in self.entries()? {
            if data.user_id == user_id {
                let _ = std::fs::remove_file(&path);
            }
        }
        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64, OrgbookError> {
        let now = Utc::now();
        let mut pruned = 0u64;
        for (path, data) in self.entries()? {
            if data.expires_at <= now && std::fs::remove_file(&path).is_ok() {
                pruned += 1;
            }
        }
        Ok(pruned)
    }
}
