use crate::session::{Session, SessionRepository};
use crate::{Membership, MembershipRepository, OrganizationId, OrgbookError};

/// Works out which organization a session is acting in.
pub struct ActiveOrganizationResolver<M: MembershipRepository, S: SessionRepository> {
    membership_repository: M,
    session_repository: S,
}

impl<M: MembershipRepository, S: SessionRepository> ActiveOrganizationResolver<M, S> {
    pub fn new(membership_repository: M, session_repository: S) -> Self {
        ActiveOrganizationResolver {
            membership_repository,
            session_repository,
        }
    }

    /// Returns the membership for the session's organization if the user
    /// still belongs to it, otherwise the user's oldest membership.
    ///
    /// A fallback is written back to the session. `None` means the user
    /// belongs to no organization; any stale session value is cleared.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "resolve_active_organization", skip_all, err)
    )]
    pub async fn resolve(&self, session: &Session) -> Result<Option<Membership>, OrgbookError> {
        let user_id = session.data.user_id;
        let current = session.data.current_organization_id;

        if let Some(organization_id) = current
            && let Some(membership) = self
                .membership_repository
                .find(organization_id, user_id)
                .await?
        {
            return Ok(Some(membership));
        }

        let fallback = self
            .membership_repository
            .list_for_user(user_id)
            .await?
            .into_iter()
            .min_by_key(|m| m.id);

        let fallback_id = fallback.as_ref().map(|m| m.organization_id);
        if fallback_id != current {
            self.session_repository
                .set_current_organization(&session.id, fallback_id)
                .await?;

            log::debug!(
                target: "orgbook::session",
                "msg=\"active organization reset\", user_id={user_id}, from={current:?}, to={fallback_id:?}"
            );
        }

        Ok(fallback)
    }

    /// Makes `organization_id` the session's active organization.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the user is not a member of it.
    pub async fn switch(
        &self,
        session: &Session,
        organization_id: OrganizationId,
    ) -> Result<Membership, OrgbookError> {
        let membership = self
            .membership_repository
            .find(organization_id, session.data.user_id)
            .await?
            .ok_or(OrgbookError::Forbidden)?;

        self.session_repository
            .set_current_organization(&session.id, Some(organization_id))
            .await?;

        Ok(membership)
    }
}
