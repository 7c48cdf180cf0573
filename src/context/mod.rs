//! Per-request organization context.
//!
//! The session only remembers which organization the user last picked.
//! [`ActiveOrganizationResolver`] turns that hint into a verified
//! [`Membership`], and handlers receive the result as an explicit
//! [`OrgContext`] instead of reading the session themselves.

mod resolver;

pub use resolver::ActiveOrganizationResolver;

use crate::{Membership, OrgRole, OrganizationId, OrgbookError, User};

/// The acting user and the organization every contact operation is scoped to.
#[derive(Debug, Clone)]
pub struct OrgContext {
    pub user: User,
    pub organization_id: OrganizationId,
    pub role: OrgRole,
    pub session_id: String,
}

impl OrgContext {
    pub fn new(user: User, membership: &Membership, session_id: impl Into<String>) -> Self {
        Self {
            user,
            organization_id: membership.organization_id,
            role: membership.role,
            session_id: session_id.into(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.role == OrgRole::Admin
    }

    /// # Errors
    ///
    /// Returns `Forbidden` unless the user is an admin of the organization.
    pub fn require_admin(&self) -> Result<(), OrgbookError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(OrgbookError::Forbidden)
        }
    }
}
