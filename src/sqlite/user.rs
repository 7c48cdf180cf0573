use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::{db_error, is_unique_violation};
use crate::repository::{NewUser, UserChanges};
use crate::validators::ValidationError;
use crate::{GlobalRole, OrgbookError, Role, User, UserRepository};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, hashed_password, global_role, created_at, updated_at";

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    name: String,
    email: String,
    hashed_password: String,
    global_role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(row: UserRecord) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            hashed_password: row.hashed_password,
            global_role: GlobalRole::from_str(&row.global_role).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn email_taken() -> OrgbookError {
    OrgbookError::field("email", ValidationError::Taken.to_string())
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, OrgbookError> {
        let row: Option<UserRecord> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find_user_by_id", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, email), err))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, OrgbookError> {
        // the column is COLLATE NOCASE
        let row: Option<UserRecord> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find_user_by_email", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_users(&self) -> Result<Vec<User>, OrgbookError> {
        let rows: Vec<UserRecord> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY name, id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("list_users", &e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, data), err))]
    async fn create_user(&self, data: NewUser) -> Result<User, OrgbookError> {
        let now = Utc::now();
        let row: UserRecord = sqlx::query_as(&format!(
            "INSERT INTO users (name, email, hashed_password, global_role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.hashed_password)
        .bind(data.global_role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                email_taken()
            } else {
                db_error("create_user", &e)
            }
        })?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, changes), err))]
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User, OrgbookError> {
        let now = Utc::now();
        let row: UserRecord = sqlx::query_as(&format!(
            "UPDATE users SET name = ?, email = ?, hashed_password = COALESCE(?, hashed_password), global_role = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(changes.hashed_password.as_deref())
        .bind(changes.global_role.as_str())
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => OrgbookError::NotFound,
            _ if is_unique_violation(&e) => email_taken(),
            _ => db_error("update_user", &e),
        })?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete_user(&self, id: i64) -> Result<(), OrgbookError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_user", &e))?;

        if result.rows_affected() == 0 {
            return Err(OrgbookError::NotFound);
        }

        Ok(())
    }
}
