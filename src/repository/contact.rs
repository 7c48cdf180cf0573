use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::organization::OrganizationId;
use crate::OrgbookError;
use crate::validators::ValidationError;

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: i64,
    pub organization_id: OrganizationId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Path relative to the avatar storage root.
    pub avatar_path: Option<String>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactNote {
    pub id: i64,
    pub contact_id: i64,
    /// Author; `None` once the author account is deleted.
    pub user_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactMeta {
    pub id: i64,
    pub contact_id: i64,
    pub key: String,
    pub value: String,
}

/// A contact together with its notes (oldest first) and custom fields
/// (insertion order).
#[derive(Debug, Clone, Serialize)]
pub struct ContactDetails {
    pub contact: Contact,
    pub notes: Vec<ContactNote>,
    pub meta: Vec<ContactMeta>,
}

/// Ordered custom fields with unique keys.
///
/// Pairs whose key or value is blank are dropped. A repeated key keeps its
/// first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaFields(Vec<(String, String)>);

impl MetaFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes submitted pairs and enforces the `max` distinct keys cap.
    pub fn from_pairs<I>(pairs: I, max: usize) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields: Vec<(String, String)> = Vec::new();

        for (key, value) in pairs {
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            match fields.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => value.clone_into(&mut existing.1),
                None => fields.push((key.to_owned(), value.to_owned())),
            }
        }

        if fields.len() > max {
            return Err(ValidationError::TooManyCustomFields { max });
        }

        Ok(Self(fields))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validated input for a new contact. Notes are authored by `created_by`.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar_path: Option<String>,
    pub created_by: i64,
    pub notes: Vec<String>,
    pub meta: MetaFields,
}

/// Full replacement of a contact's fields, notes and custom fields.
///
/// Notes and meta not listed here are deleted; the recreated notes are
/// authored by `updated_by`.
#[derive(Debug, Clone)]
pub struct ContactChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar_path: Option<String>,
    pub updated_by: i64,
    pub notes: Vec<String>,
    pub meta: MetaFields,
}

/// Organization-scoped contact storage.
///
/// A contact id that exists under another organization behaves exactly like
/// a missing one.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Contacts ordered by last name, first name, id. `search` matches first
    /// name, last name or email, ignoring ASCII case.
    async fn list(
        &self,
        organization_id: OrganizationId,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, OrgbookError>;

    async fn find(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Option<Contact>, OrgbookError>;

    async fn find_details(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Option<ContactDetails>, OrgbookError>;

    /// Email lookup that folds ASCII case only, optionally ignoring one
    /// contact. Matches the `lower(email)` unique index.
    async fn find_by_email(
        &self,
        organization_id: OrganizationId,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Contact>, OrgbookError>;

    /// Inserts the contact with its notes and meta atomically.
    ///
    /// Fails with `DuplicateEmail` when the email collides with another
    /// contact of the organization.
    async fn create(
        &self,
        organization_id: OrganizationId,
        data: NewContact,
    ) -> Result<ContactDetails, OrgbookError>;

    /// Replaces fields, notes and meta atomically.
    async fn update(
        &self,
        organization_id: OrganizationId,
        id: i64,
        changes: ContactChanges,
    ) -> Result<ContactDetails, OrgbookError>;

    /// Deletes the contact and its notes and meta, returning the deleted row.
    async fn delete(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Contact, OrgbookError>;

    async fn add_note(
        &self,
        organization_id: OrganizationId,
        contact_id: i64,
        user_id: i64,
        body: &str,
    ) -> Result<ContactNote, OrgbookError>;
}
