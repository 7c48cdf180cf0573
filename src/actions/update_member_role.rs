use chrono::Utc;

use super::access::{ensure_not_last_admin, require_admin};
use super::add_member::parse_role;
use crate::events::{OrgEvent, dispatch};
use crate::{
    Membership, MembershipRepository, OrgRole, OrganizationId, OrganizationRepository,
    OrgbookError, Role,
};

pub struct UpdateMemberRoleAction<O: OrganizationRepository, M: MembershipRepository> {
    organization_repository: O,
    membership_repository: M,
}

impl<O: OrganizationRepository, M: MembershipRepository> UpdateMemberRoleAction<O, M> {
    pub fn new(organization_repository: O, membership_repository: M) -> Self {
        UpdateMemberRoleAction {
            organization_repository,
            membership_repository,
        }
    }

    /// Changes a member's role. Demoting the last admin is rejected.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_member_role", skip_all, err)
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
        let current = self
            .membership_repository
            .find(organization_id, user_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        if role == OrgRole::Member {
            ensure_not_last_admin(&self.membership_repository, &current).await?;
        }

        let membership = self
            .membership_repository
            .update_role(organization_id, user_id, role)
            .await?;

        dispatch(OrgEvent::MemberRoleChanged {
            organization_id,
            user_id,
            role,
            by_user_id: acting_user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"member role changed\", organization_id={organization_id}, user_id={user_id}, role={}",
            role.as_str()
        );

        Ok(membership)
    }
}
