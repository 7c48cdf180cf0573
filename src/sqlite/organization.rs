use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::{db_error, is_unique_violation};
use crate::repository::NewOrganization;
use crate::validators::ValidationError;
use crate::{Organization, OrganizationId, OrganizationRepository, OrgbookError};

#[derive(Clone)]
pub struct SqliteOrganizationRepository {
    pool: SqlitePool,
}

impl SqliteOrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OrganizationRecord {
    id: i64,
    name: String,
    slug: String,
    owner_user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrganizationRecord> for Organization {
    fn from(row: OrganizationRecord) -> Self {
        Organization {
            id: OrganizationId(row.id),
            name: row.name,
            slug: row.slug,
            owner_user_id: row.owner_user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn slug_taken() -> OrgbookError {
    OrgbookError::field("slug", ValidationError::Taken.to_string())
}

#[async_trait]
impl OrganizationRepository for SqliteOrganizationRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, data), err))]
    async fn create(&self, data: NewOrganization) -> Result<Organization, OrgbookError> {
        let now = Utc::now();
        let row: OrganizationRecord = sqlx::query_as(
            "INSERT INTO organizations (name, slug, owner_user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING id, name, slug, owner_user_id, created_at, updated_at"
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(data.owner_user_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                slug_taken()
            } else {
                db_error("create_organization", &e)
            }
        })?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: OrganizationId) -> Result<Option<Organization>, OrgbookError> {
        let row: Option<OrganizationRecord> = sqlx::query_as(
            "SELECT id, name, slug, owner_user_id, created_at, updated_at FROM organizations WHERE id = ?"
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_organization_by_id", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, OrgbookError> {
        let row: Option<OrganizationRecord> = sqlx::query_as(
            "SELECT id, name, slug, owner_user_id, created_at, updated_at FROM organizations WHERE slug = ?"
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_organization_by_slug", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, name, slug), err))]
    async fn update(
        &self,
        id: OrganizationId,
        name: &str,
        slug: &str,
    ) -> Result<Organization, OrgbookError> {
        let row: OrganizationRecord = sqlx::query_as(
            "UPDATE organizations SET name = ?, slug = ?, updated_at = ? WHERE id = ? RETURNING id, name, slug, owner_user_id, created_at, updated_at"
        )
        .bind(name)
        .bind(slug)
        .bind(Utc::now())
        .bind(id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => OrgbookError::NotFound,
            _ if is_unique_violation(&e) => slug_taken(),
            _ => db_error("update_organization", &e),
        })?;

        Ok(row.into())
    }
}
