use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::{db_error, is_unique_violation};
use crate::repository::{ContactChanges, NewContact};
use crate::{
    Contact, ContactDetails, ContactMeta, ContactNote, ContactRepository, MetaFields,
    OrganizationId, OrgbookError,
};

#[derive(Clone)]
pub struct SqliteContactRepository {
    pool: SqlitePool,
}

impl SqliteContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolves a unique-index violation on `(organization_id, lower(email))`
    /// into the contact that holds the address.
    async fn duplicate_email(
        &self,
        organization_id: OrganizationId,
        email: Option<&str>,
        exclude_id: Option<i64>,
        operation: &str,
        e: &sqlx::Error,
    ) -> OrgbookError {
        let existing = match email {
            Some(email) => self.find_by_email(organization_id, email, exclude_id).await,
            None => Ok(None),
        };
        match existing {
            Ok(Some(contact)) => OrgbookError::DuplicateEmail {
                existing_contact_id: contact.id,
            },
            Ok(None) | Err(_) => db_error(operation, e),
        }
    }
}

const CONTACT_COLUMNS: &str = "id, organization_id, first_name, last_name, email, phone, avatar_path, created_by, updated_by, created_at, updated_at";

#[derive(FromRow)]
struct ContactRecord {
    id: i64,
    organization_id: i64,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    avatar_path: Option<String>,
    created_by: Option<i64>,
    updated_by: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRecord> for Contact {
    fn from(row: ContactRecord) -> Self {
        Contact {
            id: row.id,
            organization_id: OrganizationId(row.organization_id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            avatar_path: row.avatar_path,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct NoteRecord {
    id: i64,
    contact_id: i64,
    user_id: Option<i64>,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<NoteRecord> for ContactNote {
    fn from(row: NoteRecord) -> Self {
        ContactNote {
            id: row.id,
            contact_id: row.contact_id,
            user_id: row.user_id,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct MetaRecord {
    id: i64,
    contact_id: i64,
    key: String,
    value: String,
}

impl From<MetaRecord> for ContactMeta {
    fn from(row: MetaRecord) -> Self {
        ContactMeta {
            id: row.id,
            contact_id: row.contact_id,
            key: row.key,
            value: row.value,
        }
    }
}

/// Escapes `LIKE` wildcards; pair with `ESCAPE '\'`.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn insert_children(
    conn: &mut SqliteConnection,
    contact_id: i64,
    user_id: i64,
    notes: &[String],
    meta: &MetaFields,
) -> Result<(Vec<ContactNote>, Vec<ContactMeta>), sqlx::Error> {
    let now = Utc::now();

    let mut inserted_notes = Vec::with_capacity(notes.len());
    for body in notes {
        let note: NoteRecord = sqlx::query_as(
            "INSERT INTO contact_notes (contact_id, user_id, body, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING id, contact_id, user_id, body, created_at",
        )
        .bind(contact_id)
        .bind(user_id)
        .bind(body)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
        inserted_notes.push(note.into());
    }

    let mut inserted_meta = Vec::with_capacity(meta.len());
    for (key, value) in meta.iter() {
        let field: MetaRecord = sqlx::query_as(
            "INSERT INTO contact_meta (contact_id, key, value, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING id, contact_id, key, value",
        )
        .bind(contact_id)
        .bind(key)
        .bind(value)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
        inserted_meta.push(field.into());
    }

    Ok((inserted_notes, inserted_meta))
}

#[async_trait]
impl ContactRepository for SqliteContactRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, search), err))]
    async fn list(
        &self,
        organization_id: OrganizationId,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, OrgbookError> {
        let rows: Vec<ContactRecord> = match search {
            Some(search) => {
                sqlx::query_as(&format!(
                    r"SELECT {CONTACT_COLUMNS} FROM contacts
                    WHERE organization_id = ?1
                      AND (lower(first_name) LIKE ?2 ESCAPE '\'
                        OR lower(last_name) LIKE ?2 ESCAPE '\'
                        OR lower(email) LIKE ?2 ESCAPE '\')
                    ORDER BY last_name, first_name, id"
                ))
                .bind(organization_id.get())
                .bind(like_pattern(search))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts WHERE organization_id = ? ORDER BY last_name, first_name, id"
                ))
                .bind(organization_id.get())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| db_error("list_contacts", &e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Option<Contact>, OrgbookError> {
        let row: Option<ContactRecord> = sqlx::query_as(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE organization_id = ? AND id = ?"
        ))
        .bind(organization_id.get())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_contact", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_details(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Option<ContactDetails>, OrgbookError> {
        let Some(contact) = self.find(organization_id, id).await? else {
            return Ok(None);
        };

        let notes: Vec<NoteRecord> = sqlx::query_as(
            "SELECT id, contact_id, user_id, body, created_at FROM contact_notes WHERE contact_id = ? ORDER BY created_at, id",
        )
        .bind(contact.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find_contact_notes", &e))?;

        let meta: Vec<MetaRecord> = sqlx::query_as(
            "SELECT id, contact_id, key, value FROM contact_meta WHERE contact_id = ? ORDER BY id",
        )
        .bind(contact.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find_contact_meta", &e))?;

        Ok(Some(ContactDetails {
            contact,
            notes: notes.into_iter().map(Into::into).collect(),
            meta: meta.into_iter().map(Into::into).collect(),
        }))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, email), err))]
    async fn find_by_email(
        &self,
        organization_id: OrganizationId,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Contact>, OrgbookError> {
        let row: Option<ContactRecord> = sqlx::query_as(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE organization_id = ? AND lower(email) = lower(?) AND (? IS NULL OR id <> ?) ORDER BY id LIMIT 1"
        ))
        .bind(organization_id.get())
        .bind(email)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_contact_by_email", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, data), err))]
    async fn create(
        &self,
        organization_id: OrganizationId,
        data: NewContact,
    ) -> Result<ContactDetails, OrgbookError> {
        let result = async {
            let now = Utc::now();
            let mut tx = self.pool.begin().await?;

            let row: ContactRecord = sqlx::query_as(&format!(
                "INSERT INTO contacts (organization_id, first_name, last_name, email, phone, avatar_path, created_by, updated_by, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {CONTACT_COLUMNS}"
            ))
            .bind(organization_id.get())
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(data.email.as_deref())
            .bind(data.phone.as_deref())
            .bind(data.avatar_path.as_deref())
            .bind(data.created_by)
            .bind(data.created_by)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

            let (notes, meta) =
                insert_children(&mut tx, row.id, data.created_by, &data.notes, &data.meta).await?;
            tx.commit().await?;

            Ok::<_, sqlx::Error>(ContactDetails {
                contact: row.into(),
                notes,
                meta,
            })
        }
        .await;

        match result {
            Ok(details) => Ok(details),
            Err(e) if is_unique_violation(&e) => Err(self
                .duplicate_email(organization_id, data.email.as_deref(), None, "create_contact", &e)
                .await),
            Err(e) => Err(db_error("create_contact", &e)),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, changes), err))]
    async fn update(
        &self,
        organization_id: OrganizationId,
        id: i64,
        changes: ContactChanges,
    ) -> Result<ContactDetails, OrgbookError> {
        let result = async {
            let mut tx = self.pool.begin().await?;

            let row: ContactRecord = sqlx::query_as(&format!(
                "UPDATE contacts SET first_name = ?, last_name = ?, email = ?, phone = ?, avatar_path = ?, updated_by = ?, updated_at = ? WHERE organization_id = ? AND id = ? RETURNING {CONTACT_COLUMNS}"
            ))
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(changes.email.as_deref())
            .bind(changes.phone.as_deref())
            .bind(changes.avatar_path.as_deref())
            .bind(changes.updated_by)
            .bind(Utc::now())
            .bind(organization_id.get())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM contact_notes WHERE contact_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM contact_meta WHERE contact_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            let (notes, meta) =
                insert_children(&mut tx, id, changes.updated_by, &changes.notes, &changes.meta)
                    .await?;
            tx.commit().await?;

            Ok::<_, sqlx::Error>(ContactDetails {
                contact: row.into(),
                notes,
                meta,
            })
        }
        .await;

        match result {
            Ok(details) => Ok(details),
            Err(sqlx::Error::RowNotFound) => Err(OrgbookError::NotFound),
            Err(e) if is_unique_violation(&e) => Err(self
                .duplicate_email(
                    organization_id,
                    changes.email.as_deref(),
                    Some(id),
                    "update_contact",
                    &e,
                )
                .await),
            Err(e) => Err(db_error("update_contact", &e)),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(
        &self,
        organization_id: OrganizationId,
        id: i64,
    ) -> Result<Contact, OrgbookError> {
        // notes and meta go with it through ON DELETE CASCADE
        let row: Option<ContactRecord> = sqlx::query_as(&format!(
            "DELETE FROM contacts WHERE organization_id = ? AND id = ? RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(organization_id.get())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("delete_contact", &e))?;

        row.map(Into::into).ok_or(OrgbookError::NotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, body), err))]
    async fn add_note(
        &self,
        organization_id: OrganizationId,
        contact_id: i64,
        user_id: i64,
        body: &str,
    ) -> Result<ContactNote, OrgbookError> {
        let now = Utc::now();
        let row: Option<NoteRecord> = sqlx::query_as(
            "INSERT INTO contact_notes (contact_id, user_id, body, created_at, updated_at) SELECT id, ?, ?, ?, ? FROM contacts WHERE organization_id = ? AND id = ? RETURNING id, contact_id, user_id, body, created_at",
        )
        .bind(user_id)
        .bind(body)
        .bind(now)
        .bind(now)
        .bind(organization_id.get())
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("add_contact_note", &e))?;

        row.map(Into::into).ok_or(OrgbookError::NotFound)
    }
}
