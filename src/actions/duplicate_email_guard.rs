use chrono::Utc;

use crate::context::OrgContext;
use crate::events::{OrgEvent, dispatch};
use crate::{ContactRepository, OrgbookError};

/// Fast-path check that no other contact in the organization uses an email.
///
/// The unique index on `(organization_id, lower(email))` remains the
/// authority; this only turns the common case into a clean
/// `DuplicateEmail` before any file is stored.
pub struct DuplicateEmailGuard<'a, C: ContactRepository> {
    contact_repository: &'a C,
}

impl<'a, C: ContactRepository> DuplicateEmailGuard<'a, C> {
    pub fn new(contact_repository: &'a C) -> Self {
        DuplicateEmailGuard { contact_repository }
    }

    /// # Errors
    ///
    /// Returns `DuplicateEmail` with the colliding contact's id.
    pub async fn check(
        &self,
        ctx: &OrgContext,
        email: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<(), OrgbookError> {
        let Some(email) = email else {
            return Ok(());
        };

        match self
            .contact_repository
            .find_by_email(ctx.organization_id, email, exclude_id)
            .await?
        {
            Some(existing) => Err(blocked(ctx, email, existing.id).await),
            None => Ok(()),
        }
    }
}

/// Records a blocked duplicate and builds the error to return.
pub(crate) async fn blocked(ctx: &OrgContext, email: &str, existing_contact_id: i64) -> OrgbookError {
    log::info!(
        target: "orgbook::contacts",
        "msg=\"duplicate contact blocked\", organization_id={}, user_id={}, existing_contact_id={existing_contact_id}",
        ctx.organization_id,
        ctx.user_id()
    );

    dispatch(OrgEvent::DuplicateContactBlocked {
        organization_id: ctx.organization_id,
        email: email.to_owned(),
        existing_contact_id,
        user_id: ctx.user_id(),
        at: Utc::now(),
    })
    .await;

    OrgbookError::DuplicateEmail {
        existing_contact_id,
    }
}
