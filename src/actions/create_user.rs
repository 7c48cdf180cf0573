use chrono::Utc;

use super::access::require_global_admin;
use super::user_input::UserInput;
use crate::crypto::PasswordHasher;
use crate::events::{OrgEvent, dispatch};
use crate::repository::NewUser;
use crate::{OrgbookError, User, UserRepository};

pub struct CreateUserAction<U: UserRepository, H: PasswordHasher> {
    user_repository: U,
    hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> CreateUserAction<U, H> {
    pub fn new(user_repository: U, hasher: H) -> Self {
        CreateUserAction {
            user_repository,
            hasher,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_user", skip_all, err)
    )]
    pub async fn execute(&self, acting: &User, input: UserInput) -> Result<User, OrgbookError> {
        require_global_admin(acting)?;
        let valid = input.validate(true)?;

        let password = valid.password.unwrap_or_default();
        let hashed_password = self.hasher.hash(&password)?;

        let user = self
            .user_repository
            .create_user(NewUser {
                name: valid.name,
                email: valid.email,
                hashed_password,
                global_role: valid.global_role,
            })
            .await?;

        dispatch(OrgEvent::UserCreated {
            user_id: user.id,
            by_user_id: acting.id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"user created\", user_id={}, by_user_id={}",
            user.id,
            acting.id
        );

        Ok(user)
    }
}
