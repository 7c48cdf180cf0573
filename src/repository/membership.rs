use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::organization::OrganizationId;
use super::role::OrgRole;
use crate::OrgbookError;

/// A user's membership in one organization.
#[derive(Debug, Clone, Serialize)]
pub struct Membership {
    pub id: i64,
    pub organization_id: OrganizationId,
    pub user_id: i64,
    pub role: OrgRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    pub fn is_admin(&self) -> bool {
        self.role == OrgRole::Admin
    }
}

#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub organization_id: OrganizationId,
    pub user_id: i64,
    pub role: OrgRole,
}

/// `(organization_id, user_id)` is unique.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Fails with `AlreadyMember` when the pair already exists.
    async fn create(&self, data: CreateMembership) -> Result<Membership, OrgbookError>;

    async fn find(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
    ) -> Result<Option<Membership>, OrgbookError>;

    /// The user's memberships, oldest first.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Membership>, OrgbookError>;

    /// The organization's memberships, oldest first.
    async fn list_for_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Membership>, OrgbookError>;

    async fn update_role(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
        role: OrgRole,
    ) -> Result<Membership, OrgbookError>;

    async fn delete(&self, organization_id: OrganizationId, user_id: i64)
    -> Result<(), OrgbookError>;

    async fn count_admins(&self, organization_id: OrganizationId) -> Result<i64, OrgbookError>;
}
