//! Multi-tenant contacts: organizations, memberships and organization-scoped
//! contacts with notes and custom fields.
//!
//! Every contact read or write goes through a repository method that takes an
//! [`OrganizationId`] first, so a call site cannot forget the tenant filter.
//! The active organization for a request is resolved from the session by
//! [`context::ActiveOrganizationResolver`] and handed to handlers as an
//! explicit [`context::OrgContext`].
//!
//! # Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sqlx_sqlite` | `SQLite` repositories and embedded migrations |
//! | `axum_api` | HTTP routes, handlers and extractors |
//! | `mocks` | In-memory repositories and avatar storage |
//! | `tracing` | Spans on repositories and a tracing event listener |

pub mod actions;
pub mod config;
pub mod context;
pub mod crypto;
pub mod events;
pub mod repository;
pub mod session;
pub mod storage;
pub mod validators;

#[cfg(feature = "axum_api")]
pub mod api;

#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

use std::fmt;

pub use config::OrgbookConfig;
pub use events::{dispatch, register_event_listeners};
pub use repository::{
    Contact, ContactDetails, ContactMeta, ContactNote, ContactRepository, GlobalRole, Membership,
    MembershipRepository, MetaFields, OrgRole, Organization, OrganizationId,
    OrganizationRepository, Role, User, UserRepository,
};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{
    MockContactRepository, MockMembershipRepository, MockOrganizationRepository,
    MockUserRepository,
};
pub use crypto::SecretString;
pub use validators::FieldErrors;

/// Errors produced by repositories, actions and the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub enum OrgbookError {
    /// No valid session accompanies the request.
    Unauthenticated,
    InvalidCredentials,
    /// The acting user lacks the membership or role the operation needs.
    Forbidden,
    /// The record does not exist or belongs to another organization.
    NotFound,
    /// The user belongs to no organization, so there is nothing to scope to.
    NoActiveOrganization,
    /// Field-level validation failures.
    Validation(FieldErrors),
    /// Another contact in the organization already uses this email.
    DuplicateEmail { existing_contact_id: i64 },
    AlreadyMember,
    LastAdmin,
    OwnerCannotLeave,
    CannotRemoveOwner,
    CannotDeleteSelf,
    PasswordHashError,
    Storage(String),
    DatabaseError(String),
    ConfigurationError(String),
    Internal(String),
}

impl OrgbookError {
    /// Shorthand for a validation error on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl std::error::Error for OrgbookError {}

impl fmt::Display for OrgbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Unauthenticated"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::Forbidden => write!(f, "You are not allowed to perform this action"),
            Self::NotFound => write!(f, "Not found"),
            Self::NoActiveOrganization => write!(f, "You do not belong to any organization"),
            Self::Validation(errors) => write!(f, "Validation failed: {errors}"),
            Self::DuplicateEmail { existing_contact_id } => write!(
                f,
                "A contact with this email already exists (contact {existing_contact_id})"
            ),
            Self::AlreadyMember => write!(f, "User is already a member of this organization"),
            Self::LastAdmin => write!(f, "Cannot remove the last admin of the organization"),
            Self::OwnerCannotLeave => {
                write!(f, "The owner cannot leave their own organization")
            }
            Self::CannotRemoveOwner => write!(f, "The organization owner cannot be removed"),
            Self::CannotDeleteSelf => write!(f, "You cannot delete your own account"),
            Self::PasswordHashError => write!(f, "Failed to hash password"),
            Self::Storage(msg) => write!(f, "Storage error: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}
