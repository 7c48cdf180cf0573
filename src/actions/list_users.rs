use super::access::require_global_admin;
use crate::{OrgbookError, User, UserRepository};

pub struct ListUsersAction<U: UserRepository> {
    user_repository: U,
}

impl<U: UserRepository> ListUsersAction<U> {
    pub fn new(user_repository: U) -> Self {
        ListUsersAction { user_repository }
    }

    /// Every user, ordered by name.
    pub async fn execute(&self, acting: &User) -> Result<Vec<User>, OrgbookError> {
        require_global_admin(acting)?;
        self.user_repository.list_users().await
    }
}
