use chrono::Utc;

use super::organization_input::OrganizationInput;
use crate::events::{OrgEvent, dispatch};
use crate::repository::{CreateMembership, NewOrganization};
use crate::session::{Session, SessionRepository};
use crate::{MembershipRepository, OrgRole, Organization, OrganizationRepository, OrgbookError};

pub struct CreateOrganizationAction<O, M, S>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    organization_repository: O,
    membership_repository: M,
    session_repository: S,
}

impl<O, M, S> CreateOrganizationAction<O, M, S>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    pub fn new(organization_repository: O, membership_repository: M, session_repository: S) -> Self {
        CreateOrganizationAction {
            organization_repository,
            membership_repository,
            session_repository,
        }
    }

    /// Creates an organization owned by the session user, who joins it as
    /// admin. The new organization becomes the session's active one.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        session: &Session,
        input: OrganizationInput,
    ) -> Result<Organization, OrgbookError> {
        let (name, slug) = input.validate()?;
        let user_id = session.data.user_id;

        let organization = self
            .organization_repository
            .create(NewOrganization {
                name,
                slug,
                owner_user_id: user_id,
            })
            .await?;

        self.membership_repository
            .create(CreateMembership {
                organization_id: organization.id,
                user_id,
                role: OrgRole::Admin,
            })
            .await?;

        self.session_repository
            .set_current_organization(&session.id, Some(organization.id))
            .await?;

        dispatch(OrgEvent::OrganizationCreated {
            organization_id: organization.id,
            owner_user_id: user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"organization created\", organization_id={}, slug=\"{}\", owner_user_id={user_id}",
            organization.id,
            organization.slug
        );

        Ok(organization)
    }
}
