use super::access::require_admin;
use crate::{
    ContactDetails, ContactRepository, MembershipRepository, Organization, OrganizationId,
    OrganizationRepository, OrgbookError,
};

/// Admin overview: the organization with every contact, note and custom
/// field it owns.
pub struct ManageOrganizationAction<O, M, C>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    C: ContactRepository,
{
    organization_repository: O,
    membership_repository: M,
    contact_repository: C,
}

impl<O, M, C> ManageOrganizationAction<O, M, C>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    C: ContactRepository,
{
    pub fn new(organization_repository: O, membership_repository: M, contact_repository: C) -> Self {
        ManageOrganizationAction {
            organization_repository,
            membership_repository,
            contact_repository,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "manage_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        user_id: i64,
        organization_id: OrganizationId,
    ) -> Result<(Organization, Vec<ContactDetails>), OrgbookError> {
        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;
        require_admin(&self.membership_repository, organization_id, user_id).await?;

        let contacts = self.contact_repository.list(organization_id, None).await?;
        let mut details = Vec::with_capacity(contacts.len());
        for contact in contacts {
            if let Some(d) = self
                .contact_repository
                .find_details(organization_id, contact.id)
                .await?
            {
                details.push(d);
            }
        }

        Ok((organization, details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{create_org, join, new_contact};
    use crate::{
        MockContactRepository, MockMembershipRepository, MockOrganizationRepository, OrgRole,
    };

    #[tokio::test]
    async fn test_manage_is_admin_only_and_scoped() {
        let orgs = MockOrganizationRepository::new();
        let memberships = MockMembershipRepository::new();
        let contacts = MockContactRepository::new();
        let acme = create_org(&orgs, &memberships, "acme", 1).await;
        let other = create_org(&orgs, &memberships, "other", 1).await;
        join(&memberships, acme.id, 2, OrgRole::Member).await;

        let mut data = new_contact("Jane", "Doe", None);
        data.notes = vec!["hello".to_owned()];
        contacts.create(acme.id, data).await.unwrap();
        contacts
            .create(other.id, new_contact("Eve", "Other", None))
            .await
            .unwrap();

        let action = ManageOrganizationAction::new(orgs, memberships, contacts);

        assert_eq!(action.execute(2, acme.id).await.unwrap_err(), OrgbookError::Forbidden);

        let (org, details) = action.execute(1, acme.id).await.unwrap();
        assert_eq!(org.id, acme.id);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].notes.len(), 1);
    }
}
