use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::{db_error, is_unique_violation};
use crate::repository::CreateMembership;
use crate::{Membership, MembershipRepository, OrgRole, OrganizationId, OrgbookError, Role};

#[derive(Clone)]
pub struct SqliteMembershipRepository {
    pool: SqlitePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const MEMBERSHIP_COLUMNS: &str = "id, organization_id, user_id, role, created_at, updated_at";

#[derive(FromRow)]
struct MembershipRecord {
    id: i64,
    organization_id: i64,
    user_id: i64,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MembershipRecord> for Membership {
    type Error = OrgbookError;

    fn try_from(row: MembershipRecord) -> Result<Self, Self::Error> {
        let role = OrgRole::from_str(&row.role).ok_or_else(|| {
            log::error!(
                target: "orgbook",
                "msg=\"unknown membership role\", membership_id={}, role=\"{}\"",
                row.id,
                row.role
            );
            OrgbookError::Internal(format!("unknown role: {}", row.role))
        })?;

        Ok(Membership {
            id: row.id,
            organization_id: OrganizationId(row.organization_id),
            user_id: row.user_id,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert(rows: Vec<MembershipRecord>) -> Result<Vec<Membership>, OrgbookError> {
    rows.into_iter().map(Membership::try_from).collect()
}

#[async_trait]
impl MembershipRepository for SqliteMembershipRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, data), err))]
    async fn create(&self, data: CreateMembership) -> Result<Membership, OrgbookError> {
        let now = Utc::now();
        let row: MembershipRecord = sqlx::query_as(&format!(
            "INSERT INTO organization_user (organization_id, user_id, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING {MEMBERSHIP_COLUMNS}"
        ))
        .bind(data.organization_id.get())
        .bind(data.user_id)
        .bind(data.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                OrgbookError::AlreadyMember
            } else {
                db_error("create_membership", &e)
            }
        })?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
    ) -> Result<Option<Membership>, OrgbookError> {
        let row: Option<MembershipRecord> = sqlx::query_as(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM organization_user WHERE organization_id = ? AND user_id = ?"
        ))
        .bind(organization_id.get())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_membership", &e))?;

        row.map(Membership::try_from).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Membership>, OrgbookError> {
        let rows: Vec<MembershipRecord> = sqlx::query_as(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM organization_user WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_memberships_for_user", &e))?;

        convert(rows)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_for_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Membership>, OrgbookError> {
        let rows: Vec<MembershipRecord> = sqlx::query_as(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM organization_user WHERE organization_id = ? ORDER BY id"
        ))
        .bind(organization_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_memberships_for_organization", &e))?;

        convert(rows)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn update_role(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
        role: OrgRole,
    ) -> Result<Membership, OrgbookError> {
        let row: MembershipRecord = sqlx::query_as(&format!(
            "UPDATE organization_user SET role = ?, updated_at = ? WHERE organization_id = ? AND user_id = ? RETURNING {MEMBERSHIP_COLUMNS}"
        ))
        .bind(role.as_str())
        .bind(Utc::now())
        .bind(organization_id.get())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => OrgbookError::NotFound,
            _ => db_error("update_membership_role", &e),
        })?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
    ) -> Result<(), OrgbookError> {
        let result =
            sqlx::query("DELETE FROM organization_user WHERE organization_id = ? AND user_id = ?")
                .bind(organization_id.get())
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("delete_membership", &e))?;

        if result.rows_affected() == 0 {
            return Err(OrgbookError::NotFound);
        }

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn count_admins(&self, organization_id: OrganizationId) -> Result<i64, OrgbookError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM organization_user WHERE organization_id = ? AND lower(role) = 'admin'",
        )
        .bind(organization_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("count_admins", &e))
    }
}
