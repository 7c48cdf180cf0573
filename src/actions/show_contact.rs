use std::collections::HashMap;

use crate::context::OrgContext;
use crate::storage::AvatarStorage;
use crate::{Contact, ContactMeta, ContactNote, ContactRepository, OrgbookError, UserRepository};

/// A note with its author's display name, if the author still exists.
#[derive(Debug, Clone)]
pub struct NoteView {
    pub note: ContactNote,
    pub author_name: Option<String>,
}

/// Everything the contact page needs.
#[derive(Debug, Clone)]
pub struct ContactView {
    pub contact: Contact,
    pub avatar_url: Option<String>,
    pub notes: Vec<NoteView>,
    pub meta: Vec<ContactMeta>,
}

pub struct ShowContactAction<C: ContactRepository, U: UserRepository, A: AvatarStorage> {
    contact_repository: C,
    user_repository: U,
    avatar_storage: A,
}

impl<C: ContactRepository, U: UserRepository, A: AvatarStorage> ShowContactAction<C, U, A> {
    pub fn new(contact_repository: C, user_repository: U, avatar_storage: A) -> Self {
        ShowContactAction {
            contact_repository,
            user_repository,
            avatar_storage,
        }
    }

    /// # Errors
    ///
    /// Returns `NotFound` when the contact is missing or belongs to another
    /// organization.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "show_contact", skip_all, err)
    )]
    pub async fn execute(&self, ctx: &OrgContext, id: i64) -> Result<ContactView, OrgbookError> {
        let details = self
            .contact_repository
            .find_details(ctx.organization_id, id)
            .await?
            .ok_or(OrgbookError::NotFound)?;

        let mut authors: HashMap<i64, Option<String>> = HashMap::new();
        let mut notes = Vec::with_capacity(details.notes.len());
        for note in details.notes {
            let author_name = match note.user_id {
                Some(user_id) => {
                    if !authors.contains_key(&user_id) {
                        let name = self
                            .user_repository
                            .find_user_by_id(user_id)
                            .await?
                            .map(|u| u.name);
                        authors.insert(user_id, name);
                    }
                    authors.get(&user_id).cloned().flatten()
                }
                None => None,
            };
            notes.push(NoteView { note, author_name });
        }

        let avatar_url = details
            .contact
            .avatar_path
            .as_deref()
            .map(|path| self.avatar_storage.url(path));

        Ok(ContactView {
            contact: details.contact,
            avatar_url,
            notes,
            meta: details.meta,
        })
    }
}
