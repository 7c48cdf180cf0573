use super::access::require_member;
use crate::{
    Membership, MembershipRepository, Organization, OrganizationId, OrganizationRepository,
    OrgbookError,
};

/// One organization, visible to its members only.
pub struct ShowOrganizationAction<O: OrganizationRepository, M: MembershipRepository> {
    organization_repository: O,
    membership_repository: M,
}

impl<O: OrganizationRepository, M: MembershipRepository> ShowOrganizationAction<O, M> {
    pub fn new(organization_repository: O, membership_repository: M) -> Self {
        ShowOrganizationAction {
            organization_repository,
            membership_repository,
        }
    }

    pub async fn execute(
        &self,
        user_id: i64,
        organization_id: OrganizationId,
    ) -> Result<(Organization, Membership), OrgbookError> {
        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;
        let membership =
            require_member(&self.membership_repository, organization_id, user_id).await?;

        Ok((organization, membership))
    }
}
