use chrono::Utc;

use super::avatar_files::discard_avatar;
use super::contact_input::ContactInput;
use super::duplicate_email_guard::{DuplicateEmailGuard, blocked};
use crate::config::ContactLimits;
use crate::context::OrgContext;
use crate::events::{OrgEvent, dispatch};
use crate::repository::NewContact;
use crate::storage::AvatarStorage;
use crate::{ContactDetails, ContactRepository, OrgbookError};

pub struct CreateContactAction<C: ContactRepository, A: AvatarStorage> {
    contact_repository: C,
    avatar_storage: A,
    limits: ContactLimits,
}

impl<C: ContactRepository, A: AvatarStorage> CreateContactAction<C, A> {
    pub fn new(contact_repository: C, avatar_storage: A, limits: ContactLimits) -> Self {
        CreateContactAction {
            contact_repository,
            avatar_storage,
            limits,
        }
    }

    /// Creates a contact with its notes and custom fields in the active
    /// organization. Notes are authored by the acting user.
    ///
    /// # Returns
    ///
    /// - `Err(OrgbookError::Forbidden)` - the user is not an admin here
    /// - `Err(OrgbookError::Validation(_))` - field errors
    /// - `Err(OrgbookError::DuplicateEmail { .. })` - email already used in this organization
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_contact", skip_all, err)
    )]
    pub async fn execute(
        &self,
        ctx: &OrgContext,
        input: ContactInput,
    ) -> Result<ContactDetails, OrgbookError> {
        ctx.require_admin()?;
        let valid = input.validate(&self.limits)?;

        DuplicateEmailGuard::new(&self.contact_repository)
            .check(ctx, valid.email.as_deref(), None)
            .await?;

        let avatar_path = match valid.avatar.as_ref() {
            Some(upload) => Some(self.avatar_storage.store(upload).await?),
            None => None,
        };

        let data = NewContact {
            first_name: valid.first_name,
            last_name: valid.last_name,
            email: valid.email.clone(),
            phone: valid.phone,
            avatar_path: avatar_path.clone(),
            created_by: ctx.user_id(),
            notes: valid.notes,
            meta: valid.meta,
        };

        let details = match self.contact_repository.create(ctx.organization_id, data).await {
            Ok(details) => details,
            Err(e) => {
                if let Some(path) = avatar_path.as_deref() {
                    discard_avatar(&self.avatar_storage, path).await;
                }
                // lost a race against a concurrent insert of the same email
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

        dispatch(OrgEvent::ContactCreated {
            organization_id: ctx.organization_id,
            contact_id: details.contact.id,
            user_id: ctx.user_id(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::contacts",
            "msg=\"contact created\", organization_id={}, contact_id={}, user_id={}",
            ctx.organization_id,
            details.contact.id,
            ctx.user_id()
        );

        Ok(details)
    }
}
