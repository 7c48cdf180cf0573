use chrono::Utc;

use super::access::{ensure_not_last_admin, require_global_admin};
use crate::events::{OrgEvent, dispatch};
use crate::session::SessionRepository;
use crate::{
    MembershipRepository, OrganizationRepository, OrgbookError, User, UserRepository,
};

pub struct DeleteUserAction<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    user_repository: U,
    organization_repository: O,
    membership_repository: M,
    session_repository: S,
}

impl<U, O, M, S> DeleteUserAction<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repository: U,
        organization_repository: O,
        membership_repository: M,
        session_repository: S,
    ) -> Self {
        DeleteUserAction {
            user_repository,
            organization_repository,
            membership_repository,
            session_repository,
        }
    }

    /// Deletes a user account and its sessions.
    ///
    /// # Returns
    ///
    /// - `Err(OrgbookError::CannotDeleteSelf)` - `user_id` is the acting user
    /// - `Err(OrgbookError::Validation(_))` - the user still owns an organization
    /// - `Err(OrgbookError::LastAdmin)` - the user is the only admin of an organization
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_user", skip_all, err)
    )]
    pub async fn execute(&self, acting: &User, user_id: i64) -> Result<(), OrgbookError> {
        require_global_admin(acting)?;
        if acting.id == user_id {
            return Err(OrgbookError::CannotDeleteSelf);
        }
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        // owners can neither leave nor be removed, so their memberships cover
        // every organization they own
        for membership in self.membership_repository.list_for_user(user_id).await? {
            if let Some(organization) = self
                .organization_repository
                .find_by_id(membership.organization_id)
                .await?
                && organization.owner_user_id == user_id
            {
                return Err(OrgbookError::field(
                    "user",
                    format!("still owns the organization {}", organization.slug),
                ));
            }
            ensure_not_last_admin(&self.membership_repository, &membership).await?;
        }

        self.user_repository.delete_user(user_id).await?;
        for membership in self.membership_repository.list_for_user(user_id).await? {
            self.membership_repository
                .delete(membership.organization_id, user_id)
                .await?;
        }
        self.session_repository.destroy_user_sessions(user_id).await?;

        dispatch(OrgEvent::UserDeleted {
            user_id,
            by_user_id: acting.id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"account deleted\", user_id={user_id}, by_user_id={}",
            acting.id
        );

        Ok(())
    }
}
