use chrono::Utc;

use super::avatar_files::discard_avatar;
use crate::context::OrgContext;
use crate::events::{OrgEvent, dispatch};
use crate::repository::NewContact;
use crate::storage::AvatarStorage;
use crate::{ContactDetails, ContactRepository, MetaFields, OrgbookError};

pub struct DuplicateContactAction<C: ContactRepository, A: AvatarStorage> {
    contact_repository: C,
    avatar_storage: A,
}

impl<C: ContactRepository, A: AvatarStorage> DuplicateContactAction<C, A> {
    pub fn new(contact_repository: C, avatar_storage: A) -> Self {
        DuplicateContactAction {
            contact_repository,
            avatar_storage,
        }
    }

    /// Copies a contact's core fields into a new contact with no email.
    ///
    /// Notes and custom fields are not copied. The avatar file is copied so
    /// the two contacts never share one; a missing source file leaves the
    /// copy without an avatar.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "duplicate_contact", skip_all, err)
    )]
    pub async fn execute(&self, ctx: &OrgContext, id: i64) -> Result<ContactDetails, OrgbookError> {
        ctx.require_admin()?;

        let source = self
            .contact_repository
            .find(ctx.organization_id, id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        let avatar_path = match source.avatar_path.as_deref() {
            Some(path) => match self.avatar_storage.copy(path).await {
                Ok(copied) => Some(copied),
                Err(e) => {
                    log::warn!(
                        target: "orgbook::storage",
                        "msg=\"avatar not copied\", contact_id={id}, path=\"{path}\", error=\"{e}\""
                    );
                    None
                }
            },
            None => None,
        };

        let data = NewContact {
            first_name: source.first_name,
            last_name: source.last_name,
            email: None,
            phone: source.phone,
            avatar_path: avatar_path.clone(),
            created_by: ctx.user_id(),
            notes: Vec::new(),
            meta: MetaFields::new(),
        };
        let details = match self.contact_repository.create(ctx.organization_id, data).await {
            Ok(details) => details,
            Err(e) => {
                if let Some(path) = avatar_path.as_deref() {
                    discard_avatar(&self.avatar_storage, path).await;
                }
                return Err(e);
            }
        };

        dispatch(OrgEvent::ContactDuplicated {
            organization_id: ctx.organization_id,
            source_contact_id: id,
            contact_id: details.contact.id,
            user_id: ctx.user_id(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::contacts",
            "msg=\"contact duplicated\", organization_id={}, source_contact_id={id}, contact_id={}",
            ctx.organization_id,
            details.contact.id
        );

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::actions::test_support::{admin_context, new_contact, png_upload};
    use crate::repository::ContactChanges;
    use crate::storage::InMemoryAvatarStorage;
    use crate::{Contact, ContactNote, MockContactRepository, OrganizationId};

    /// Reads go to the wrapped mock; inserts fail.
    struct ReadOnlyContacts(MockContactRepository);

    #[async_trait]
    impl ContactRepository for ReadOnlyContacts {
        async fn list(
            &self,
            organization_id: OrganizationId,
            search: Option<&str>,
        ) -> Result<Vec<Contact>, OrgbookError> {
            self.0.list(organization_id, search).await
        }

        async fn find(
            &self,
            organization_id: OrganizationId,
            id: i64,
        ) -> Result<Option<Contact>, OrgbookError> {
            self.0.find(organization_id, id).await
        }

        async fn find_details(
            &self,
            organization_id: OrganizationId,
            id: i64,
        ) -> Result<Option<ContactDetails>, OrgbookError> {
            self.0.find_details(organization_id, id).await
        }

        async fn find_by_email(
            &self,
            organization_id: OrganizationId,
            email: &str,
            exclude_id: Option<i64>,
        ) -> Result<Option<Contact>, OrgbookError> {
            self.0.find_by_email(organization_id, email, exclude_id).await
        }

        async fn create(
            &self,
            _organization_id: OrganizationId,
            _data: NewContact,
        ) -> Result<ContactDetails, OrgbookError> {
            Err(OrgbookError::DatabaseError("database is locked".to_owned()))
        }

        async fn update(
            &self,
            organization_id: OrganizationId,
            id: i64,
            changes: ContactChanges,
        ) -> Result<ContactDetails, OrgbookError> {
            self.0.update(organization_id, id, changes).await
        }

        async fn delete(
            &self,
            organization_id: OrganizationId,
            id: i64,
        ) -> Result<Contact, OrgbookError> {
            self.0.delete(organization_id, id).await
        }

        async fn add_note(
            &self,
            organization_id: OrganizationId,
            contact_id: i64,
            user_id: i64,
            body: &str,
        ) -> Result<ContactNote, OrgbookError> {
            self.0.add_note(organization_id, contact_id, user_id, body).await
        }
    }

    #[tokio::test]
    async fn test_duplicate_clears_email_and_copies_avatar() {
        let contacts = MockContactRepository::new();
        let storage = InMemoryAvatarStorage::new();
        let ctx = admin_context(3, 10);

        let path = storage.store(&png_upload()).await.unwrap();
        let mut data = new_contact("Jane", "Doe", Some("jane@example.com"));
        data.phone = Some("555-0100".to_owned());
        data.avatar_path = Some(path.clone());
        data.notes = vec!["note".to_owned()];
        data.meta = MetaFields::from_pairs(vec![("k".to_owned(), "v".to_owned())], 5).unwrap();
        let source = contacts.create(ctx.organization_id, data).await.unwrap();

        let copy = DuplicateContactAction::new(contacts.clone(), storage.clone())
            .execute(&ctx, source.contact.id)
            .await
            .unwrap();

        assert_ne!(copy.contact.id, source.contact.id);
        assert_eq!(copy.contact.first_name, "Jane");
        assert_eq!(copy.contact.phone.as_deref(), Some("555-0100"));
        assert_eq!(copy.contact.email, None);
        assert_eq!(copy.contact.created_by, Some(3));
        assert!(copy.notes.is_empty());
        assert!(copy.meta.is_empty());

        let copied_path = copy.contact.avatar_path.unwrap();
        assert_ne!(copied_path, path);
        assert!(storage.exists(&copied_path));
        assert!(storage.exists(&path));
    }

    #[tokio::test]
    async fn test_duplicate_foreign_contact_is_not_found() {
        let contacts = MockContactRepository::new();
        let source = contacts
            .create(OrganizationId(11), new_contact("Jane", "Doe", None))
            .await
            .unwrap();

        let result = DuplicateContactAction::new(contacts, InMemoryAvatarStorage::new())
            .execute(&admin_context(3, 10), source.contact.id)
            .await;

        assert_eq!(result.unwrap_err(), OrgbookError::NotFound);
    }

    #[tokio::test]
    async fn test_failed_insert_discards_copied_avatar() {
        let contacts = MockContactRepository::new();
        let storage = InMemoryAvatarStorage::new();
        let ctx = admin_context(3, 10);

        let path = storage.store(&png_upload()).await.unwrap();
        let mut data = new_contact("Jane", "Doe", None);
        data.avatar_path = Some(path.clone());
        let source = contacts.create(ctx.organization_id, data).await.unwrap();

        let result = DuplicateContactAction::new(ReadOnlyContacts(contacts), storage.clone())
            .execute(&ctx, source.contact.id)
            .await;

        assert!(matches!(result, Err(OrgbookError::DatabaseError(_))));
        assert_eq!(storage.len(), 1);
        assert!(storage.exists(&path));
    }
}
