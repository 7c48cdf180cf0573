use crate::{Membership, MembershipRepository, Organization, OrganizationRepository, OrgbookError};

/// Organizations the user belongs to, each with the user's membership.
pub struct ListOrganizationsAction<O: OrganizationRepository, M: MembershipRepository> {
    organization_repository: O,
    membership_repository: M,
}

impl<O: OrganizationRepository, M: MembershipRepository> ListOrganizationsAction<O, M> {
    pub fn new(organization_repository: O, membership_repository: M) -> Self {
        ListOrganizationsAction {
            organization_repository,
            membership_repository,
        }
    }

    pub async fn execute(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Organization, Membership)>, OrgbookError> {
        let memberships = self.membership_repository.list_for_user(user_id).await?;

        let mut organizations = Vec::with_capacity(memberships.len());
        for membership in memberships {
            if let Some(organization) = self
                .organization_repository
                .find_by_id(membership.organization_id)
                .await?
            {
                organizations.push((organization, membership));
            }
        }
        organizations.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(organizations)
    }
}
