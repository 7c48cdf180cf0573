use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::role::GlobalRole;
use crate::OrgbookError;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub global_role: GlobalRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_global_admin(&self) -> bool {
        self.global_role == GlobalRole::Admin
    }
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock(id: i64, name: &str, email: &str) -> Self {
        let now = Utc::now();
        User {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            hashed_password: "fakehashedpassword".to_owned(),
            global_role: GlobalRole::Member,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub global_role: GlobalRole,
}

/// Replacement values for a user; the password is kept when `None`.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub hashed_password: Option<String>,
    pub global_role: GlobalRole,
}

/// Emails are unique across users, compared case-insensitively.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, OrgbookError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, OrgbookError>;

    /// All users ordered by name.
    async fn list_users(&self) -> Result<Vec<User>, OrgbookError>;

    /// Fails with a `Validation` error on `email` when the address is taken.
    async fn create_user(&self, data: NewUser) -> Result<User, OrgbookError>;

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User, OrgbookError>;

    async fn delete_user(&self, id: i64) -> Result<(), OrgbookError>;
}
