use chrono::{Duration, Utc};

use crate::crypto::PasswordHasher;
use crate::events::{OrgEvent, dispatch};
use crate::session::{Session, SessionData, SessionRepository};
use crate::{OrgbookError, User, UserRepository};

/// Verifies credentials and opens a server-side session.
pub struct LoginAction<U: UserRepository, S: SessionRepository, H: PasswordHasher> {
    user_repository: U,
    session_repository: S,
    hasher: H,
    session_lifetime: Duration,
}

impl<U: UserRepository, S: SessionRepository, H: PasswordHasher> LoginAction<U, S, H> {
    pub fn new(
        user_repository: U,
        session_repository: S,
        hasher: H,
        session_lifetime: Duration,
    ) -> Self {
        LoginAction {
            user_repository,
            session_repository,
            hasher,
            session_lifetime,
        }
    }

    /// # Returns
    ///
    /// - `Ok((user, session))` - the session has no active organization yet
    /// - `Err(OrgbookError::InvalidCredentials)` - unknown email or wrong password
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(&self, email: &str, password: &str) -> Result<(User, Session), OrgbookError> {
        let email = email.trim();
        let user = match self.user_repository.find_user_by_email(email).await? {
            Some(user) if self.hasher.verify(password, &user.hashed_password)? => user,
            _ => {
                dispatch(OrgEvent::LoginFailed {
                    email: email.to_owned(),
                    at: Utc::now(),
                })
                .await;

                log::info!(
                    target: "orgbook::session",
                    "msg=\"login failed\""
                );

                return Err(OrgbookError::InvalidCredentials);
            }
        };

        let data = SessionData::for_user(&user, self.session_lifetime);
        let session_id = self.session_repository.create(data.clone()).await?;

        dispatch(OrgEvent::LoginSuccess {
            user_id: user.id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::session",
            "msg=\"login success\", user_id={}",
            user.id
        );

        Ok((user, Session::new(session_id, data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::fast_hasher;
    use crate::repository::NewUser;
    use crate::session::InMemorySessionRepository;
    use crate::{GlobalRole, MockUserRepository};

    #[tokio::test]
    async fn test_login_action() {
        let users = MockUserRepository::new();
        let sessions = InMemorySessionRepository::new();
        let hasher = fast_hasher();
        users
            .create_user(NewUser {
                name: "Jane".to_owned(),
                email: "jane@example.com".to_owned(),
                hashed_password: hasher.hash("securepassword").unwrap(),
                global_role: GlobalRole::Member,
            })
            .await
            .unwrap();

        let login = LoginAction::new(users, sessions.clone(), hasher, Duration::hours(2));

        let (user, session) = login
            .execute("jane@example.com", "securepassword")
            .await
            .unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(session.data.user_id, user.id);
        assert!(sessions.find(&session.id).await.unwrap().is_some());

        assert_eq!(
            login.execute("jane@example.com", "wrongpassword").await.unwrap_err(),
            OrgbookError::InvalidCredentials
        );
        assert_eq!(
            login.execute("nobody@example.com", "securepassword").await.unwrap_err(),
            OrgbookError::InvalidCredentials
        );
    }
}
