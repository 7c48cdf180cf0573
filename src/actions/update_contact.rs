use chrono::Utc;

use super::avatar_files::discard_avatar;
use super::contact_input::ContactInput;
use super::duplicate_email_guard::{DuplicateEmailGuard, blocked};
use crate::config::ContactLimits;
use crate::context::OrgContext;
use crate::events::{OrgEvent, dispatch};
use crate::repository::ContactChanges;
use crate::storage::AvatarStorage;
use crate::{ContactDetails, ContactRepository, OrgbookError};

pub struct UpdateContactAction<C: ContactRepository, A: AvatarStorage> {
    contact_repository: C,
    avatar_storage: A,
    limits: ContactLimits,
}

impl<C: ContactRepository, A: AvatarStorage> UpdateContactAction<C, A> {
    pub fn new(contact_repository: C, avatar_storage: A, limits: ContactLimits) -> Self {
        UpdateContactAction {
            contact_repository,
            avatar_storage,
            limits,
        }
    }

    /// Replaces the contact's fields, notes and custom fields.
    ///
    /// Notes and custom fields not present in `input` are deleted. A new
    /// avatar replaces the old file; `remove_avatar` clears it without an
    /// upload. The old file is removed only after the row is saved.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_contact", skip_all, err)
    )]
    pub async fn execute(
        &self,
        ctx: &OrgContext,
        id: i64,
        input: ContactInput,
    ) -> Result<ContactDetails, OrgbookError> {
        ctx.require_admin()?;

        let existing = self
            .contact_repository
            .find(ctx.organization_id, id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        let valid = input.validate(&self.limits)?;

        DuplicateEmailGuard::new(&self.contact_repository)
            .check(ctx, valid.email.as_deref(), Some(id))
            .await?;

        let (avatar_path, stored, replaced) = match (valid.avatar.as_ref(), valid.remove_avatar) {
            (Some(upload), _) => {
                let path = self.avatar_storage.store(upload).await?;
                (Some(path.clone()), Some(path), existing.avatar_path.clone())
            }
            (None, true) => (None, None, existing.avatar_path.clone()),
            (None, false) => (existing.avatar_path.clone(), None, None),
        };

        let changes = ContactChanges {
            first_name: valid.first_name,
            last_name: valid.last_name,
            email: valid.email.clone(),
            phone: valid.phone,
            avatar_path,
            updated_by: ctx.user_id(),
            notes: valid.notes,
            meta: valid.meta,
        };

        let details = match self
            .contact_repository
            .update(ctx.organization_id, id, changes)
            .await
        {
            Ok(details) => details,
            Err(e) => {
                if let Some(path) = stored.as_deref() {
                    discard_avatar(&self.avatar_storage, path).await;
                }
                if let OrgbookError::DuplicateEmail {
                    existing_contact_id,
                } = e
                    && let Some(email) = valid.email.as_deref()
                {
                    return Err(blocked(ctx, email, existing_contact_id).await);
                }
                return Err(e);
            }
        };

        if let Some(old) = replaced.as_deref() {
            discard_avatar(&self.avatar_storage, old).await;
        }

        dispatch(OrgEvent::ContactUpdated {
            organization_id: ctx.organization_id,
            contact_id: id,
            user_id: ctx.user_id(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::contacts",
            "msg=\"contact updated\", organization_id={}, contact_id={id}, user_id={}, notes={}, meta={}",
            ctx.organization_id,
            ctx.user_id(),
            details.notes.len(),
            details.meta.len()
        );

        Ok(details)
    }
}
