use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::user::{NewUser, User, UserChanges, UserRepository};
use crate::OrgbookError;
use crate::validators::ValidationError;

#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<Vec<User>>>,
    next_id: Arc<AtomicI64>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn email_taken(users: &[User], email: &str, except: Option<i64>) -> bool {
        users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != except)
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, OrgbookError> {
        let users = self
            .users
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, OrgbookError> {
        let users = self
            .users
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, OrgbookError> {
        let users = self
            .users
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let mut list = users.clone();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn create_user(&self, data: NewUser) -> Result<User, OrgbookError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if Self::email_taken(&users, &data.email, None) {
            return Err(OrgbookError::field(
                "email",
                ValidationError::Taken.to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: data.name,
            email: data.email,
            hashed_password: data.hashed_password,
            global_role: data.global_role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User, OrgbookError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if Self::email_taken(&users, &changes.email, Some(id)) {
            return Err(OrgbookError::field(
                "email",
                ValidationError::Taken.to_string(),
            ));
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(OrgbookError::NotFound)?;
        user.name = changes.name;
        user.email = changes.email;
        if let Some(hash) = changes.hashed_password {
            user.hashed_password = hash;
        }
        user.global_role = changes.global_role;
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), OrgbookError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(OrgbookError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlobalRole;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            hashed_password: "hash".to_owned(),
            global_role: GlobalRole::Member,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_taken_email_case_insensitively() {
        let repo = MockUserRepository::new();
        repo.create_user(new_user("Jane", "jane@example.com"))
            .await
            .unwrap();

        let err = repo
            .create_user(new_user("Other Jane", "JANE@example.com"))
            .await
            .unwrap_err();
        match err {
            OrgbookError::Validation(errors) => assert!(errors.contains("email")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_password_when_absent() {
        let repo = MockUserRepository::new();
        let user = repo
            .create_user(new_user("Jane", "jane@example.com"))
            .await
            .unwrap();

        let updated = repo
            .update_user(
                user.id,
                UserChanges {
                    name: "Jane Doe".to_owned(),
                    email: "jane@example.com".to_owned(),
                    hashed_password: None,
                    global_role: GlobalRole::Admin,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.hashed_password, "hash");
        assert!(updated.is_global_admin());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name_and_delete() {
        let repo = MockUserRepository::new();
        let zed = repo.create_user(new_user("Zed", "zed@example.com")).await.unwrap();
        repo.create_user(new_user("Amy", "amy@example.com")).await.unwrap();

        let names: Vec<_> = repo
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);

        repo.delete_user(zed.id).await.unwrap();
        assert_eq!(repo.delete_user(zed.id).await, Err(OrgbookError::NotFound));
    }
}
