use chrono::Utc;

use super::access::{ensure_not_last_admin, require_member};
use crate::events::{OrgEvent, dispatch};
use crate::session::{Session, SessionRepository};
use crate::{MembershipRepository, OrganizationId, OrganizationRepository, OrgbookError};

pub struct LeaveOrganizationAction<O, M, S>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    organization_repository: O,
    membership_repository: M,
    session_repository: S,
}

impl<O, M, S> LeaveOrganizationAction<O, M, S>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SessionRepository,
{
    pub fn new(organization_repository: O, membership_repository: M, session_repository: S) -> Self {
        LeaveOrganizationAction {
            organization_repository,
            membership_repository,
            session_repository,
        }
    }

    /// Removes the session user from the organization.
    ///
    /// The owner can never leave, whatever their role. If the organization
    /// was active, the session moves to the user's oldest remaining
    /// membership, or to none.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "leave_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        session: &Session,
        organization_id: OrganizationId,
    ) -> Result<(), OrgbookError> {
        let user_id = session.data.user_id;
        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;
        let membership =
            require_member(&self.membership_repository, organization_id, user_id).await?;

        if organization.owner_user_id == user_id {
            return Err(OrgbookError::OwnerCannotLeave);
        }
        ensure_not_last_admin(&self.membership_repository, &membership).await?;

        self.membership_repository
            .delete(organization_id, user_id)
            .await?;

        if session.data.current_organization_id == Some(organization_id) {
            let next = self
                .membership_repository
                .list_for_user(user_id)
                .await?
                .into_iter()
                .min_by_key(|m| m.id)
                .map(|m| m.organization_id);
            self.session_repository
                .set_current_organization(&session.id, next)
                .await?;
        }

        dispatch(OrgEvent::OrganizationLeft {
            organization_id,
            user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"organization left\", organization_id={organization_id}, user_id={user_id}"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{create_org, join, session_for};
    use crate::session::InMemorySessionRepository;
    use crate::{MockMembershipRepository, MockOrganizationRepository, OrgRole};

    struct Fixture {
        orgs: MockOrganizationRepository,
        memberships: MockMembershipRepository,
        sessions: InMemorySessionRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                orgs: MockOrganizationRepository::new(),
                memberships: MockMembershipRepository::new(),
                sessions: InMemorySessionRepository::new(),
            }
        }

        fn action(
            &self,
        ) -> LeaveOrganizationAction<
            MockOrganizationRepository,
            MockMembershipRepository,
            InMemorySessionRepository,
        > {
            LeaveOrganizationAction::new(
                self.orgs.clone(),
                self.memberships.clone(),
                self.sessions.clone(),
            )
        }
    }

    #[tokio::test]
    async fn test_owner_cannot_leave_even_as_member() {
        let f = Fixture::new();
        let org = create_org(&f.orgs, &f.memberships, "acme", 1).await;
        join(&f.memberships, org.id, 2, OrgRole::Admin).await;
        f.memberships
            .update_role(org.id, 1, OrgRole::Member)
            .await
            .unwrap();
        let session = session_for(&f.sessions, 1).await;

        assert_eq!(
            f.action().execute(&session, org.id).await.unwrap_err(),
            OrgbookError::OwnerCannotLeave
        );
    }

    #[tokio::test]
    async fn test_last_admin_cannot_leave() {
        let f = Fixture::new();
        let org = create_org(&f.orgs, &f.memberships, "acme", 1).await;
        // the owner steps down so user 2 becomes the only admin
        join(&f.memberships, org.id, 2, OrgRole::Admin).await;
        f.memberships
            .update_role(org.id, 1, OrgRole::Member)
            .await
            .unwrap();
        let session = session_for(&f.sessions, 2).await;

        assert_eq!(
            f.action().execute(&session, org.id).await.unwrap_err(),
            OrgbookError::LastAdmin
        );
    }

    #[tokio::test]
    async fn test_member_leaves_and_session_falls_back() {
        let f = Fixture::new();
        let first = create_org(&f.orgs, &f.memberships, "first", 1).await;
        let second = create_org(&f.orgs, &f.memberships, "second", 1).await;
        join(&f.memberships, second.id, 3, OrgRole::Member).await;
        join(&f.memberships, first.id, 3, OrgRole::Member).await;

        let mut session = session_for(&f.sessions, 3).await;
        f.sessions
            .set_current_organization(&session.id, Some(second.id))
            .await
            .unwrap();
        session.data.current_organization_id = Some(second.id);

        f.action().execute(&session, second.id).await.unwrap();

        assert!(f.memberships.find(second.id, 3).await.unwrap().is_none());
        let stored = f.sessions.find(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.data.current_organization_id, Some(first.id));
    }

    #[tokio::test]
    async fn test_non_member_is_forbidden() {
        let f = Fixture::new();
        let org = create_org(&f.orgs, &f.memberships, "acme", 1).await;
        let session = session_for(&f.sessions, 9).await;

        assert_eq!(
            f.action().execute(&session, org.id).await.unwrap_err(),
            OrgbookError::Forbidden
        );
    }
}
