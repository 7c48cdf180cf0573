use chrono::Utc;

use super::avatar_files::discard_avatar;
use crate::context::OrgContext;
use crate::events::{OrgEvent, dispatch};
use crate::storage::AvatarStorage;
use crate::{ContactRepository, OrgbookError};

pub struct DeleteContactAction<C: ContactRepository, A: AvatarStorage> {
    contact_repository: C,
    avatar_storage: A,
}

impl<C: ContactRepository, A: AvatarStorage> DeleteContactAction<C, A> {
    pub fn new(contact_repository: C, avatar_storage: A) -> Self {
        DeleteContactAction {
            contact_repository,
            avatar_storage,
        }
    }

    /// Deletes the contact, its notes and custom fields, then its avatar file.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_contact", skip_all, err)
    )]
    pub async fn execute(&self, ctx: &OrgContext, id: i64) -> Result<(), OrgbookError> {
        ctx.require_admin()?;

        let contact = self
            .contact_repository
            .delete(ctx.organization_id, id)
            .await?;

        if let Some(path) = contact.avatar_path.as_deref() {
            discard_avatar(&self.avatar_storage, path).await;
        }

        dispatch(OrgEvent::ContactDeleted {
            organization_id: ctx.organization_id,
            contact_id: id,
            user_id: ctx.user_id(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::contacts",
            "msg=\"contact deleted\", organization_id={}, contact_id={id}, user_id={}",
            ctx.organization_id,
            ctx.user_id()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{admin_context, member_context, new_contact};
    use crate::storage::{AvatarStorage, InMemoryAvatarStorage};
    use crate::{MetaFields, MockContactRepository, OrganizationId};

    #[tokio::test]
    async fn test_delete_cascades_and_removes_avatar() {
        let contacts = MockContactRepository::new();
        let storage = InMemoryAvatarStorage::new();
        let ctx = admin_context(1, 10);

        let path = storage
            .store(&crate::actions::test_support::png_upload())
            .await
            .unwrap();
        let mut data = new_contact("Jane", "Doe", None);
        data.avatar_path = Some(path.clone());
        data.notes = vec!["note".to_owned()];
        data.meta = MetaFields::from_pairs(vec![("k".to_owned(), "v".to_owned())], 5).unwrap();
        let created = contacts.create(ctx.organization_id, data).await.unwrap();

        DeleteContactAction::new(contacts.clone(), storage.clone())
            .execute(&ctx, created.contact.id)
            .await
            .unwrap();

        assert!(contacts.find(ctx.organization_id, created.contact.id).await.unwrap().is_none());
        assert_eq!(contacts.note_count(), 0);
        assert_eq!(contacts.meta_count(), 0);
        assert!(!storage.exists(&path));
    }

    #[tokio::test]
    async fn test_delete_requires_admin_and_scope() {
        let contacts = MockContactRepository::new();
        let created = contacts
            .create(OrganizationId(10), new_contact("Jane", "Doe", None))
            .await
            .unwrap();
        let action = DeleteContactAction::new(contacts.clone(), InMemoryAvatarStorage::new());

        assert_eq!(
            action
                .execute(&member_context(1, 10), created.contact.id)
                .await
                .unwrap_err(),
            OrgbookError::Forbidden
        );
        assert_eq!(
            action
                .execute(&admin_context(1, 11), created.contact.id)
                .await
                .unwrap_err(),
            OrgbookError::NotFound
        );
        assert!(contacts.find(OrganizationId(10), created.contact.id).await.unwrap().is_some());
    }
}
