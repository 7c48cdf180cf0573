use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::organization::{NewOrganization, Organization, OrganizationId, OrganizationRepository};
use crate::OrgbookError;
use crate::validators::ValidationError;

#[derive(Clone)]
pub struct MockOrganizationRepository {
    organizations: Arc<RwLock<HashMap<OrganizationId, Organization>>>,
    next_id: Arc<AtomicI64>,
}

impl MockOrganizationRepository {
    pub fn new() -> Self {
        Self {
            organizations: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockOrganizationRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn slug_taken() -> OrgbookError {
    OrgbookError::field("slug", ValidationError::Taken.to_string())
}

#[async_trait]
impl OrganizationRepository for MockOrganizationRepository {
    async fn create(&self, data: NewOrganization) -> Result<Organization, OrgbookError> {
        let mut organizations = self
            .organizations
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if organizations.values().any(|o| o.slug == data.slug) {
            return Err(slug_taken());
        }

        let id = OrganizationId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        let organization = Organization {
            id,
            name: data.name,
            slug: data.slug,
            owner_user_id: data.owner_user_id,
            created_at: now,
            updated_at: now,
        };
        organizations.insert(id, organization.clone());

        Ok(organization)
    }

    async fn find_by_id(&self, id: OrganizationId) -> Result<Option<Organization>, OrgbookError> {
        let organizations = self
            .organizations
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(organizations.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, OrgbookError> {
        let organizations = self
            .organizations
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(organizations.values().find(|o| o.slug == slug).cloned())
    }

    async fn update(
        &self,
        id: OrganizationId,
        name: &str,
        slug: &str,
    ) -> Result<Organization, OrgbookError> {
        let mut organizations = self
            .organizations
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if organizations.values().any(|o| o.slug == slug && o.id != id) {
            return Err(slug_taken());
        }

        let organization = organizations.get_mut(&id).ok_or(OrgbookError::NotFound)?;
        name.clone_into(&mut organization.name);
        slug.clone_into(&mut organization.slug);
        organization.updated_at = Utc::now();

        Ok(organization.clone())
    }
}
