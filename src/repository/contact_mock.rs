use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::contact::{
    Contact, ContactChanges, ContactDetails, ContactMeta, ContactNote, ContactRepository,
    MetaFields, NewContact,
};
use super::organization::OrganizationId;
use crate::OrgbookError;

#[derive(Default)]
struct Store {
    contacts: Vec<Contact>,
    notes: Vec<ContactNote>,
    meta: Vec<ContactMeta>,
    next_contact_id: i64,
    next_note_id: i64,
    next_meta_id: i64,
}

impl Store {
    fn email_owner(
        &self,
        organization_id: OrganizationId,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Option<&Contact> {
        let needle = email.to_ascii_lowercase();
        self.contacts.iter().find(|c| {
            c.organization_id == organization_id
                && Some(c.id) != exclude_id
                && c.email.as_deref().is_some_and(|e| e.to_ascii_lowercase() == needle)
        })
    }

    fn details(&self, contact: &Contact) -> ContactDetails {
        ContactDetails {
            contact: contact.clone(),
            notes: self
                .notes
                .iter()
                .filter(|n| n.contact_id == contact.id)
                .cloned()
                .collect(),
            meta: self
                .meta
                .iter()
                .filter(|m| m.contact_id == contact.id)
                .cloned()
                .collect(),
        }
    }

    fn push_children(&mut self, contact_id: i64, user_id: i64, notes: &[String], meta: &MetaFields) {
        let now = Utc::now();
        for body in notes {
            self.next_note_id += 1;
            self.notes.push(ContactNote {
                id: self.next_note_id,
                contact_id,
                user_id: Some(user_id),
                body: body.clone(),
                created_at: now,
            });
        }
        for (key, value) in meta.iter() {
            self.next_meta_id += 1;
            self.meta.push(ContactMeta {
                id: self.next_meta_id,
                contact_id,
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
    }
}

/// In-memory contact store enforcing the same per-organization email
/// uniqueness and cascade rules as the database schema.
#[derive(Clone)]
pub struct MockContactRepository {
    store: Arc<RwLock<Store>>,
}

impl MockContactRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    /// Number of notes stored across all contacts.
    pub fn note_count(&self) -> usize {
        self.store.read().map(|s| s.notes.len()).unwrap_or(0)
    }

    /// Number of custom fields stored across all contacts.
    pub fn meta_count(&self) -> usize {
        self.store.read().map(|s| s.meta.len()).unwrap_or(0)
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn list(
        &self,
        organization_id: OrganizationId,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, OrgbookError> {
        let store = self
            .store
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let needle = search.map(str::to_ascii_lowercase);
        let mut contacts: Vec<_> = store
            .contacts
            .iter()
            .filter(|c| c.organization_id == organization_id)
            .filter(|c| match &needle {
                Some(n) => {
                    c.first_name.to_ascii_lowercase().contains(n)
                        || c.last_name.to_ascii_lowercase().contains(n)
                        || c.email.as_deref().is_some_and(|e| e.to_ascii_lowercase().contains(n))
                }
                None => true,
            })
            .cloned()
            .collect();
        contacts.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then(a.id.cmp(&b.id))
        });
        Ok(contacts)
    }

    async fn find(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Option<Contact>, OrgbookError> {
        let store = self
            .store
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(store
            .contacts
            .iter()
            .find(|c| c.organization_id == organization_id && c.id == id)
            .cloned())
    }

    async fn find_details(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Option<ContactDetails>, OrgbookError> {
        let store = self
            .store
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(store
            .contacts
            .iter()
            .find(|c| c.organization_id == organization_id && c.id == id)
            .map(|c| store.details(c)))
    }

    async fn find_by_email(
        &self,
        organization_id: OrganizationId,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Contact>, OrgbookError> {
        let store = self
            .store
            .read()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        Ok(store.email_owner(organization_id, email, exclude_id).cloned())
    }

    async fn create(
        &self,
        organization_id: OrganizationId,
        data: NewContact,
    ) -> Result<ContactDetails, OrgbookError> {
        let mut store = self
            .store
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if let Some(email) = data.email.as_deref()
            && let Some(existing) = store.email_owner(organization_id, email, None)
        {
            return Err(OrgbookError::DuplicateEmail {
                existing_contact_id: existing.id,
            });
        }

        store.next_contact_id += 1;
        let now = Utc::now();
        let contact = Contact {
            id: store.next_contact_id,
            organization_id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            avatar_path: data.avatar_path,
            created_by: Some(data.created_by),
            updated_by: Some(data.created_by),
            created_at: now,
            updated_at: now,
        };
        store.contacts.push(contact.clone());
        store.push_children(contact.id, data.created_by, &data.notes, &data.meta);

        Ok(store.details(&contact))
    }

    async fn update(
        &self,
        organization_id: OrganizationId,
        id: i64,
        changes: ContactChanges,
    ) -> Result<ContactDetails, OrgbookError> {
        let mut store = self
            .store
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if let Some(email) = changes.email.as_deref()
            && let Some(existing) = store.email_owner(organization_id, email, Some(id))
        {
            return Err(OrgbookError::DuplicateEmail {
                existing_contact_id: existing.id,
            });
        }

        let contact = store
            .contacts
            .iter_mut()
            .find(|c| c.organization_id == organization_id && c.id == id)
            .ok_or(OrgbookError::NotFound)?;
        contact.first_name = changes.first_name;
        contact.last_name = changes.last_name;
        contact.email = changes.email;
        contact.phone = changes.phone;
        contact.avatar_path = changes.avatar_path;
        contact.updated_by = Some(changes.updated_by);
        contact.updated_at = Utc::now();
        let contact = contact.clone();

        store.notes.retain(|n| n.contact_id != id);
        store.meta.retain(|m| m.contact_id != id);
        store.push_children(id, changes.updated_by, &changes.notes, &changes.meta);

        Ok(store.details(&contact))
    }

    async fn delete(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Contact, OrgbookError> {
        let mut store = self
            .store
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        let index = store
            .contacts
            .iter()
            .position(|c| c.organization_id == organization_id && c.id == id)
            .ok_or(OrgbookError::NotFound)?;
        let contact = store.contacts.remove(index);
        store.notes.retain(|n| n.contact_id != id);
        store.meta.retain(|m| m.contact_id != id);

        Ok(contact)
    }

    async fn add_note(
        &self,
        organization_id: OrganizationId,
        contact_id: i64,
        user_id: i64,
        body: &str,
    ) -> Result<ContactNote, OrgbookError> {
        let mut store = self
            .store
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;

        if !store
            .contacts
            .iter()
            .any(|c| c.organization_id == organization_id && c.id == contact_id)
        {
            return Err(OrgbookError::NotFound);
        }

        store.next_note_id += 1;
        let note = ContactNote {
            id: store.next_note_id,
            contact_id,
            user_id: Some(user_id),
            body: body.to_owned(),
            created_at: Utc::now(),
        };
        store.notes.push(note.clone());

        Ok(note)
    }
}
