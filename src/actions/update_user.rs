use chrono::Utc;

use super::access::require_global_admin;
use super::user_input::UserInput;
use crate::crypto::PasswordHasher;
use crate::events::{OrgEvent, dispatch};
use crate::repository::UserChanges;
use crate::{OrgbookError, User, UserRepository};

pub struct UpdateUserAction<U: UserRepository, H: PasswordHasher> {
    user_repository: U,
    hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> UpdateUserAction<U, H> {
    pub fn new(user_repository: U, hasher: H) -> Self {
        UpdateUserAction {
            user_repository,
            hasher,
        }
    }

    /// Updates name, email and global role; the password only when given.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_user", skip_all, err)
    )]
    pub async fn execute(
        &self,
        acting: &User,
        user_id: i64,
        input: UserInput,
    ) -> Result<User, OrgbookError> {
        require_global_admin(acting)?;
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        let valid = input.validate(false)?;
        let hashed_password = match valid.password.as_deref() {
            Some(p) => Some(self.hasher.hash(p)?),
            None => None,
        };

        let user = self
            .user_repository
            .update_user(
                user_id,
                UserChanges {
                    name: valid.name,
                    email: valid.email,
                    hashed_password,
                    global_role: valid.global_role,
                },
            )
            .await?;

        dispatch(OrgEvent::UserUpdated {
            user_id,
            by_user_id: acting.id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook",
            "msg=\"user updated\", user_id={user_id}, by_user_id={}",
            acting.id
        );

        Ok(user)
    }
}
