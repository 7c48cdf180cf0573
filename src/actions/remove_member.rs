use chrono::Utc;

use super::access::{ensure_not_last_admin, require_admin};
use crate::events::{OrgEvent, dispatch};
use crate::{MembershipRepository, OrganizationId, OrganizationRepository, OrgbookError};

pub struct RemoveMemberAction<O: OrganizationRepository, M: MembershipRepository> {
    organization_repository: O,
    membership_repository: M,
}

impl<O: OrganizationRepository, M: MembershipRepository> RemoveMemberAction<O, M> {
    pub fn new(organization_repository: O, membership_repository: M) -> Self {
        RemoveMemberAction {
            organization_repository,
            membership_repository,
        }
    }

    /// # Returns
    ///
    /// - `Err(OrgbookError::NotFound)` - the user is not a member
    /// - `Err(OrgbookError::CannotRemoveOwner)` - the user owns the organization
    /// - `Err(OrgbookError::LastAdmin)` - the user is the only admin left
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "remove_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        acting_user_id: i64,
        organization_id: OrganizationId,
        user_id: i64,
    ) -> Result<(), OrgbookError> {
        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;
        require_admin(&self.membership_repository, organization_id, acting_user_id).await?;

        let membership = self
            .membership_repository
            .find(organization_id, user_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        if organization.owner_user_id == user_id {
            return Err(OrgbookError::CannotRemoveOwner);
        }
        ensure_not_last_admin(&self.membership_repository, &membership).await?;

        self.membership_repository
            .delete(organization_id, user_id)
            .await?;

        dispatch(OrgEvent::MemberRemoved {
            organization_id,
            user_id,
            by_user_id: acting_user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"member removed\", organization_id={organization_id}, user_id={user_id}, by_user_id={acting_user_id}"
        );

        Ok(())
    }
}
