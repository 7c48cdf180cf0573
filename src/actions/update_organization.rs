use chrono::Utc;

use super::access::require_admin;
use super::organization_input::OrganizationInput;
use crate::events::{OrgEvent, dispatch};
use crate::{
    MembershipRepository, Organization, OrganizationId, OrganizationRepository, OrgbookError,
};

pub struct UpdateOrganizationAction<O: OrganizationRepository, M: MembershipRepository> {
    organization_repository: O,
    membership_repository: M,
}

impl<O: OrganizationRepository, M: MembershipRepository> UpdateOrganizationAction<O, M> {
    pub fn new(organization_repository: O, membership_repository: M) -> Self {
        UpdateOrganizationAction {
            organization_repository,
            membership_repository,
        }
    }

    /// Renames an organization. Only its admins may do so.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        user_id: i64,
        organization_id: OrganizationId,
        input: OrganizationInput,
    ) -> Result<Organization, OrgbookError> {
        self.organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;
        require_admin(&self.membership_repository, organization_id, user_id).await?;

        let (name, slug) = input.validate()?;
        let organization = self
            .organization_repository
            .update(organization_id, &name, &slug)
            .await?;

        dispatch(OrgEvent::OrganizationUpdated {
            organization_id,
            user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"organization updated\", organization_id={organization_id}, user_id={user_id}"
        );

        Ok(organization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{create_org, join};
    use crate::{MockMembershipRepository, MockOrganizationRepository, OrgRole};

    #[tokio::test]
    async fn test_admin_updates_member_cannot() {
        let orgs = MockOrganizationRepository::new();
        let memberships = MockMembershipRepository::new();
        let org = create_org(&orgs, &memberships, "acme", 1).await;
        join(&memberships, org.id, 2, OrgRole::Member).await;

        let action = UpdateOrganizationAction::new(orgs, memberships);
        let input = OrganizationInput {
            name: "Acme Two".to_owned(),
            slug: "acme-two".to_owned(),
        };

        assert_eq!(
            action.execute(2, org.id, input.clone()).await.unwrap_err(),
            OrgbookError::Forbidden
        );
        let updated = action.execute(1, org.id, input).await.unwrap();
        assert_eq!(updated.name, "Acme Two");
        assert_eq!(updated.slug, "acme-two");
    }

    #[tokio::test]
    async fn test_slug_unique_except_self() {
        let orgs = MockOrganizationRepository::new();
        let memberships = MockMembershipRepository::new();
        let acme = create_org(&orgs, &memberships, "acme", 1).await;
        create_org(&orgs, &memberships, "globex", 1).await;

        let action = UpdateOrganizationAction::new(orgs, memberships);

        assert!(
            action
                .execute(
                    1,
                    acme.id,
                    OrganizationInput {
                        name: "Acme".to_owned(),
                        slug: "acme".to_owned(),
                    },
                )
                .await
                .is_ok()
        );
        let taken = action
            .execute(
                1,
                acme.id,
                OrganizationInput {
                    name: "Acme".to_owned(),
                    slug: "globex".to_owned(),
                },
            )
            .await;
        assert!(matches!(taken, Err(OrgbookError::Validation(e)) if e.contains("slug")));
    }

    #[tokio::test]
    async fn test_unknown_organization() {
        let action =
            UpdateOrganizationAction::new(MockOrganizationRepository::new(), MockMembershipRepository::new());
        let result = action
            .execute(1, OrganizationId(404), OrganizationInput::default())
            .await;
        assert_eq!(result.unwrap_err(), OrgbookError::NotFound);
    }
}
