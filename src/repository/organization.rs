use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OrgbookError;

/// Tenant identifier.
///
/// Every contact, note and custom-field repository call takes one as its
/// first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub i64);

impl OrganizationId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OrganizationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub slug: String,
    pub owner_user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub slug: String,
    pub owner_user_id: i64,
}

/// Slugs are globally unique.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Fails with a `Validation` error on `slug` when the slug is taken.
    async fn create(&self, data: NewOrganization) -> Result<Organization, OrgbookError>;

    async fn find_by_id(&self, id: OrganizationId) -> Result<Option<Organization>, OrgbookError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, OrgbookError>;

    /// Fails with a `Validation` error on `slug` when another organization
    /// uses it.
    async fn update(
        &self,
        id: OrganizationId,
        name: &str,
        slug: &str,
    ) -> Result<Organization, OrgbookError>;
}
