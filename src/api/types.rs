use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::{ContactInput, ContactView, MemberList, NoteView, OrganizationInput, UserInput};
use crate::config::ContactLimits;
use crate::storage::{AvatarStorage, AvatarUpload};
use crate::validators::ValidationError;
use crate::{
    Contact, ContactDetails, ContactMeta, ContactNote, FieldErrors, GlobalRole, Membership,
    OrgRole, Organization, OrganizationId, OrgbookError, User,
};

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Base64-encoded avatar file.
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarPayload {
    pub file_name: String,
    pub content_type: String,
    pub data: String,
}

impl AvatarPayload {
    /// # Errors
    ///
    /// Returns a validation error on `avatar` when `data` is not valid base64.
    pub fn decode(self) -> Result<AvatarUpload, OrgbookError> {
        let bytes = STANDARD
            .decode(self.data.trim())
            .map_err(|_| OrgbookError::field("avatar", ValidationError::AvatarUnreadable.to_string()))?;

        Ok(AvatarUpload {
            file_name: self.file_name,
            content_type: self.content_type,
            bytes,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomField {
    pub key: String,
    pub value: String,
}

/// Body of contact create and update. Omitted `notes` and `custom_fields`
/// mean "none", which on update deletes the existing ones.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<AvatarPayload>,
    pub remove_avatar: bool,
    pub notes: Vec<String>,
    pub custom_fields: Vec<CustomField>,
}

impl ContactRequest {
    /// # Errors
    ///
    /// Fails only when the avatar payload cannot be decoded.
    pub fn into_input(self) -> Result<ContactInput, OrgbookError> {
        let avatar = self.avatar.map(AvatarPayload::decode).transpose()?;

        Ok(ContactInput {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            avatar,
            remove_avatar: self.remove_avatar,
            notes: self.notes,
            custom_fields: self
                .custom_fields
                .into_iter()
                .map(|f| (f.key, f.value))
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrganizationRequest {
    pub name: String,
    pub slug: String,
}

impl From<OrganizationRequest> for OrganizationInput {
    fn from(req: OrganizationRequest) -> Self {
        OrganizationInput {
            name: req.name,
            slug: req.slug,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: i64,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub global_role: Option<String>,
}

impl From<UserRequest> for UserInput {
    fn from(req: UserRequest) -> Self {
        UserInput {
            name: req.name,
            email: req.email,
            password: req.password,
            global_role: req.global_role,
        }
    }
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub global_role: GlobalRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            global_role: user.global_role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub current_organization_id: Option<OrganizationId>,
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: OrganizationId,
    pub name: String,
    pub slug: String,
    pub owner_user_id: i64,
    /// The acting user's role, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<OrgRole>,
    pub created_at: DateTime<Utc>,
}

impl OrganizationResponse {
    pub fn with_role(organization: Organization, role: OrgRole) -> Self {
        Self {
            role: Some(role),
            ..Self::from(organization)
        }
    }
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        OrganizationResponse {
            id: org.id,
            name: org.name,
            slug: org.slug,
            owner_user_id: org.owner_user_id,
            role: None,
            created_at: org.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: i64,
    pub organization_id: OrganizationId,
    pub user_id: i64,
    pub role: OrgRole,
    pub created_at: DateTime<Utc>,
}

impl From<Membership> for MembershipResponse {
    fn from(m: Membership) -> Self {
        MembershipResponse {
            id: m.id,
            organization_id: m.organization_id,
            user_id: m.user_id,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: OrgRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub organization: OrganizationResponse,
    pub members: Vec<MemberResponse>,
    pub users: Vec<UserResponse>,
}

impl From<MemberList> for MembersResponse {
    fn from(list: MemberList) -> Self {
        MembersResponse {
            organization: list.organization.into(),
            members: list
                .members
                .into_iter()
                .map(|(user, membership)| MemberResponse {
                    user_id: user.id,
                    name: user.name,
                    email: user.email,
                    role: membership.role,
                    joined_at: membership.created_at,
                })
                .collect(),
            users: list.all_users.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub organization_id: OrganizationId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactResponse {
    pub fn new<A: AvatarStorage>(contact: Contact, storage: &A) -> Self {
        ContactResponse {
            avatar_url: contact.avatar_path.as_deref().map(|p| storage.url(p)),
            id: contact.id,
            organization_id: contact.organization_id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            created_by: contact.created_by,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: i64,
    pub body: String,
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NoteResponse {
    pub fn new(note: ContactNote, author_name: Option<String>) -> Self {
        NoteResponse {
            id: note.id,
            body: note.body,
            user_id: note.user_id,
            author_name,
            created_at: note.created_at,
        }
    }
}

impl From<NoteView> for NoteResponse {
    fn from(view: NoteView) -> Self {
        NoteResponse::new(view.note, view.author_name)
    }
}

fn custom_fields(meta: Vec<ContactMeta>) -> Vec<CustomField> {
    meta.into_iter()
        .map(|m| CustomField {
            key: m.key,
            value: m.value,
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ContactDetailsResponse {
    #[serde(flatten)]
    pub contact: ContactResponse,
    pub notes: Vec<NoteResponse>,
    pub custom_fields: Vec<CustomField>,
}

impl ContactDetailsResponse {
    /// Notes written by `author` get their name attached; others carry only
    /// the author id.
    pub fn new<A: AvatarStorage>(details: ContactDetails, storage: &A, author: Option<&User>) -> Self {
        ContactDetailsResponse {
            contact: ContactResponse::new(details.contact, storage),
            notes: details
                .notes
                .into_iter()
                .map(|note| {
                    let name = author
                        .filter(|a| note.user_id == Some(a.id))
                        .map(|a| a.name.clone());
                    NoteResponse::new(note, name)
                })
                .collect(),
            custom_fields: custom_fields(details.meta),
        }
    }

    pub fn from_view<A: AvatarStorage>(view: ContactView, storage: &A) -> Self {
        ContactDetailsResponse {
            contact: ContactResponse::new(view.contact, storage),
            notes: view.notes.into_iter().map(Into::into).collect(),
            custom_fields: custom_fields(view.meta),
        }
    }
}

/// Validation limits the contact form needs to render.
#[derive(Debug, Serialize)]
pub struct FormLimits {
    pub max_custom_fields: usize,
    pub max_avatar_kilobytes: usize,
    pub allowed_avatar_types: Vec<String>,
    pub max_note_length: usize,
}

impl From<&ContactLimits> for FormLimits {
    fn from(limits: &ContactLimits) -> Self {
        FormLimits {
            max_custom_fields: limits.max_custom_fields,
            max_avatar_kilobytes: limits.max_avatar_bytes / 1024,
            allowed_avatar_types: limits.allowed_avatar_types.clone(),
            max_note_length: limits.max_note_length,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactFormResponse {
    pub limits: FormLimits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactDetailsResponse>,
}

#[derive(Debug, Serialize)]
pub struct ManageOrganizationResponse {
    pub organization: OrganizationResponse,
    pub contacts: Vec<ContactDetailsResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// The structured conflict body: exactly `code` and `existing_contact_id`.
#[derive(Debug, Serialize)]
pub struct DuplicateEmailResponse {
    pub code: &'static str,
    pub existing_contact_id: i64,
}

impl From<OrgbookError> for ErrorResponse {
    fn from(err: OrgbookError) -> Self {
        let code = match &err {
            OrgbookError::Unauthenticated => "UNAUTHENTICATED",
            OrgbookError::InvalidCredentials => "INVALID_CREDENTIALS",
            OrgbookError::Forbidden => "FORBIDDEN",
            OrgbookError::NotFound => "NOT_FOUND",
            OrgbookError::NoActiveOrganization => "NO_ACTIVE_ORGANIZATION",
            OrgbookError::Validation(_) => "VALIDATION_ERROR",
            OrgbookError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            OrgbookError::AlreadyMember => "ALREADY_MEMBER",
            OrgbookError::LastAdmin => "LAST_ADMIN",
            OrgbookError::OwnerCannotLeave => "OWNER_CANNOT_LEAVE",
            OrgbookError::CannotRemoveOwner => "CANNOT_REMOVE_OWNER",
            OrgbookError::CannotDeleteSelf => "CANNOT_DELETE_SELF",
            OrgbookError::PasswordHashError => "PASSWORD_HASH_ERROR",
            OrgbookError::Storage(_) => "STORAGE_ERROR",
            OrgbookError::DatabaseError(_) => "DATABASE_ERROR",
            OrgbookError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            OrgbookError::Internal(_) => "INTERNAL_ERROR",
        };

        // server-side details stay in the logs
        let error = match &err {
            OrgbookError::Storage(_)
            | OrgbookError::DatabaseError(_)
            | OrgbookError::ConfigurationError(_)
            | OrgbookError::Internal(_)
            | OrgbookError::PasswordHashError => "Internal server error".to_owned(),
            other => other.to_string(),
        };

        let errors = match err {
            OrgbookError::Validation(errors) => Some(errors),
            _ => None,
        };

        ErrorResponse {
            error,
            code: code.to_owned(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_request_defaults() {
        let req: ContactRequest =
            serde_json::from_str(r#"{"first_name": "Jane", "last_name": "Doe"}"#).unwrap();
        let input = req.into_input().unwrap();

        assert!(input.notes.is_empty());
        assert!(input.custom_fields.is_empty());
        assert!(input.avatar.is_none());
        assert!(!input.remove_avatar);
    }

    #[test]
    fn test_avatar_payload_decodes_base64() {
        let payload = AvatarPayload {
            file_name: "face.png".to_owned(),
            content_type: "image/png".to_owned(),
            data: STANDARD.encode(b"\x89PNG"),
        };
        assert_eq!(payload.decode().unwrap().bytes, b"\x89PNG".to_vec());
    }

    #[test]
    fn test_avatar_payload_rejects_garbage() {
        let payload = AvatarPayload {
            file_name: "face.png".to_owned(),
            content_type: "image/png".to_owned(),
            data: "***".to_owned(),
        };
        match payload.decode() {
            Err(OrgbookError::Validation(errors)) => assert!(errors.contains("avatar")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_error_response_hides_database_details() {
        let body = ErrorResponse::from(OrgbookError::DatabaseError("disk I/O error".to_owned()));
        assert_eq!(body.code, "DATABASE_ERROR");
        assert_eq!(body.error, "Internal server error");
        assert!(body.errors.is_none());
    }

    #[test]
    fn test_error_response_carries_field_errors() {
        let body = ErrorResponse::from(OrgbookError::field("slug", "has already been taken"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"]["slug"][0], "has already been taken");
    }
}
