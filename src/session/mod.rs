//! Server-side sessions identified by an HMAC-signed cookie.
//!
//! A session remembers who is logged in and which organization they are
//! currently working in. The active organization id is stored under
//! [`SessionData::current_organization_id`] and only ever read through
//! [`ActiveOrganizationResolver`](crate::context::ActiveOrganizationResolver),
//! which re-checks membership on every request.

mod config;
mod cookie;
mod file_store;
mod memory_store;
mod repository;

use chrono::{DateTime, Duration, Utc};
pub use config::{SameSite, SessionConfig};
pub use cookie::{
    read_cookie, removal_cookie, session_cookie, sign_session_id, verify_signed_cookie,
};
pub use file_store::FileSessionRepository;
pub use memory_store::InMemorySessionRepository;
pub use repository::SessionRepository;
use serde::{Deserialize, Serialize};

use crate::{OrganizationId, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    /// Organization the user last worked in; may be stale.
    #[serde(default)]
    pub current_organization_id: Option<OrganizationId>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    /// Fresh session for `user` with no organization selected yet.
    pub fn for_user(user: &User, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            current_organization_id: None,
            created_at: now,
            expires_at: now + lifetime,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub data: SessionData,
}

impl Session {
    pub fn new(id: String, data: SessionData) -> Self {
        Self { id, data }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.data.expires_at
    }
}
