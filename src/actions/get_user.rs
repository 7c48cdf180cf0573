use super::access::require_global_admin;
use crate::{OrgbookError, User, UserRepository};

pub struct GetUserAction<U: UserRepository> {
    user_repository: U,
}

impl<U: UserRepository> GetUserAction<U> {
    pub fn new(user_repository: U) -> Self {
        GetUserAction { user_repository }
    }

    pub async fn execute(&self, acting: &User, user_id: i64) -> Result<User, OrgbookError> {
        require_global_admin(acting)?;
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(OrgbookError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::global_admin;
    use crate::MockUserRepository;

    #[tokio::test]
    async fn test_get_user() {
        let users = MockUserRepository::new();
        let admin = global_admin(&users).await;
        let action = GetUserAction::new(users);

        assert_eq!(action.execute(&admin, admin.id).await.unwrap().email, admin.email);
        assert_eq!(action.execute(&admin, 404).await.unwrap_err(), OrgbookError::NotFound);
    }
}
