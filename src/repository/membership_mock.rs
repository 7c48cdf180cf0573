use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::membership::{CreateMembership, Membership, MembershipRepository};
use super::organization::OrganizationId;
use super::role::OrgRole;
use crate::OrgbookError;

#[derive(Clone)]
pub struct MockMembershipRepository {
    memberships: Arc<RwLock<Vec<Membership>>>,
    next_id: Arc<AtomicI64>,
}

impl MockMembershipRepository {
    pub fn new() -> Self {
        Self {
            memberships: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockMembershipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipRepository for MockMembershipRepository {
    async fn create(&self, data: CreateMembership) -> Result<Membership, OrgbookError> {
        let mut memberships = self
            .memberships
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if memberships
            .iter()
            .any(|m| m.organization_id == data.organization_id && m.user_id == data.user_id)
        {
            return Err(OrgbookError::AlreadyMember);
        }

        let now = Utc::now();
        let membership = Membership {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            organization_id: data.organization_id,
            user_id: data.user_id,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        memberships.push(membership.clone());

        Ok(membership)
    }

    async fn find(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
    ) -> Result<Option<Membership>, OrgbookError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(memberships
            .iter()
            .find(|m| m.organization_id == organization_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Membership>, OrgbookError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let mut list: Vec<_> = memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by_key(|m| m.id);
        Ok(list)
    }

    async fn list_for_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Membership>, OrgbookError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let mut list: Vec<_> = memberships
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect();
        list.sort_by_key(|m| m.id);
        Ok(list)
    }

    async fn update_role(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
        role: OrgRole,
    ) -> Result<Membership, OrgbookError> {
        let mut memberships = self
            .memberships
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let membership = memberships
            .iter_mut()
            .find(|m| m.organization_id == organization_id && m.user_id == user_id)
            .ok_or(OrgbookError::NotFound)?;
        membership.role = role;
        membership.updated_at = Utc::now();
        Ok(membership.clone())
    }

    async fn delete(
        &self,
        organization_id: OrganizationId,
        user_id: i64,
    ) -> Result<(), OrgbookError> {
        let mut memberships = self
            .memberships
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let before = memberships.len();
        memberships.retain(|m| !(m.organization_id == organization_id && m.user_id == user_id));
        if memberships.len() == before {
            return Err(OrgbookError::NotFound);
        }
        Ok(())
    }

    async fn count_admins(&self, organization_id: OrganizationId) -> Result<i64, OrgbookError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let count = memberships
            .iter()
            .filter(|m| m.organization_id == organization_id && m.is_admin())
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}
