use chrono::Utc;

use super::contact_input::validate_note;
use crate::config::ContactLimits;
use crate::context::OrgContext;
use crate::events::{OrgEvent, dispatch};
use crate::{ContactNote, ContactRepository, OrgbookError};

/// Appends one note; open to every member of the organization.
pub struct AddNoteAction<C: ContactRepository> {
    contact_repository: C,
    limits: ContactLimits,
}

impl<C: ContactRepository> AddNoteAction<C> {
    pub fn new(contact_repository: C, limits: ContactLimits) -> Self {
        AddNoteAction {
            contact_repository,
            limits,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "add_note", skip_all, err)
    )]
    pub async fn execute(
        &self,
        ctx: &OrgContext,
        contact_id: i64,
        body: &str,
    ) -> Result<ContactNote, OrgbookError> {
        let body = validate_note(body, &self.limits)?;

        let note = self
            .contact_repository
            .add_note(ctx.organization_id, contact_id, ctx.user_id(), &body)
            .await?;

        dispatch(OrgEvent::NoteAdded {
            organization_id: ctx.organization_id,
            contact_id,
            note_id: note.id,
            user_id: ctx.user_id(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::contacts",
            "msg=\"note added\", organization_id={}, contact_id={contact_id}, note_id={}",
            ctx.organization_id,
            note.id
        );

        Ok(note)
    }
}
