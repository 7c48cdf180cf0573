use chrono::Utc;

use super::access::require_admin;
use crate::events::{OrgEvent, dispatch};
use crate::repository::CreateMembership;
use crate::validators::ValidationError;
use crate::{
    Membership, MembershipRepository, OrgRole, OrganizationId, OrganizationRepository,
    OrgbookError, Role, UserRepository,
};

/// Parses a submitted role label or returns a field error on `role`.
pub(crate) fn parse_role(role: &str) -> Result<OrgRole, OrgbookError> {
    OrgRole::from_str(role.trim())
        .ok_or_else(|| OrgbookError::field("role", ValidationError::RoleInvalid.to_string()))
}

pub struct AddMemberAction<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    organization_repository: O,
    membership_repository: M,
    user_repository: U,
}

impl<O, M, U> AddMemberAction<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    pub fn new(organization_repository: O, membership_repository: M, user_repository: U) -> Self {
        AddMemberAction {
            organization_repository,
            membership_repository,
            user_repository,
        }
    }

    /// # Returns
    ///
    /// - `Err(OrgbookError::Forbidden)` - the acting user is not an admin here
    /// - `Err(OrgbookError::NotFound)` - unknown organization or user
    /// - `Err(OrgbookError::AlreadyMember)` - the user already belongs to it
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "add_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        acting_user_id: i64,
        organization_id: OrganizationId,
        user_id: i64,
        role: &str,
    ) -> Result<Membership, OrgbookError> {
        self.organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;
        require_admin(&self.membership_repository, organization_id, acting_user_id).await?;

        let role = parse_role(role)?;
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        let membership = self
            .membership_repository
            .create(CreateMembership {
                organization_id,
                user_id,
                role,
            })
            .await?;

        dispatch(OrgEvent::MemberAdded {
            organization_id,
            user_id,
            role,
            by_user_id: acting_user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"member added\", organization_id={organization_id}, user_id={user_id}, role={}",
            role.as_str()
        );

        Ok(membership)
    }
}
