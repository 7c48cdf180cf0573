use chrono::Utc;

use crate::context::ActiveOrganizationResolver;
use crate::events::{OrgEvent, dispatch};
use crate::session::{Session, SessionRepository};
use crate::{
    MembershipRepository, Organization, OrganizationId, OrganizationRepository, OrgbookError,
};

pub struct SwitchOrganizationAction<O, M, S>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    organization_repository: O,
    resolver: ActiveOrganizationResolver<M, S>,
}

impl<O, M, S> SwitchOrganizationAction<O, M, S>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    pub fn new(organization_repository: O, membership_repository: M, session_repository: S) -> Self {
        SwitchOrganizationAction {
            organization_repository,
            resolver: ActiveOrganizationResolver::new(membership_repository, session_repository),
        }
    }

    /// # Returns
    ///
    /// - `Err(OrgbookError::NotFound)` - no such organization
    /// - `Err(OrgbookError::Forbidden)` - the user is not a member of it
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "switch_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        session: &Session,
        organization_id: OrganizationId,
    ) -> Result<Organization, OrgbookError> {
        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        self.resolver.switch(session, organization_id).await?;

        dispatch(OrgEvent::OrganizationSwitched {
            organization_id,
            user_id: session.data.user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::session",
            "msg=\"organization switched\", organization_id={organization_id}, user_id={}",
            session.data.user_id
        );

        Ok(organization)
    }
}
