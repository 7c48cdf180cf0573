use super::access::require_admin;
use crate::{
    Membership, MembershipRepository, Organization, OrganizationId, OrganizationRepository,
    OrgbookError, User, UserRepository,
};

/// Members of an organization plus every user that could be added.
#[derive(Debug, Clone)]
pub struct MemberList {
    pub organization: Organization,
    /// Ordered by user name.
    pub members: Vec<(User, Membership)>,
    pub all_users: Vec<User>,
}

pub struct ListMembersAction<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    organization_repository: O,
    membership_repository: M,
    user_repository: U,
}

impl<O, M, U> ListMembersAction<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    pub fn new(organization_repository: O, membership_repository: M, user_repository: U) -> Self {
        ListMembersAction {
            organization_repository,
            membership_repository,
            user_repository,
        }
    }

    pub async fn execute(
        &self,
        acting_user_id: i64,
        organization_id: OrganizationId,
    ) -> Result<MemberList, OrgbookError> {
        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;
        require_admin(&self.membership_repository, organization_id, acting_user_id).await?;

        let all_users = self.user_repository.list_users().await?;
        let memberships = self
            .membership_repository
            .list_for_organization(organization_id)
            .await?;

        // all_users is already ordered by name
        let members = all_users
            .iter()
            .filter_map(|user| {
                memberships
                    .iter()
                    .find(|m| m.user_id == user.id)
                    .map(|m| (user.clone(), m.clone()))
            })
            .collect();

        Ok(MemberList {
            organization,
            members,
            all_users,
        })
    }
}
