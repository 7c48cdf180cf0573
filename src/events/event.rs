use chrono::{DateTime, Utc};

use crate::{OrgRole, OrganizationId};

/// Domain events fired by actions.
///
/// Dispatching is a no-op until listeners are registered through
/// [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum OrgEvent {
    // contacts
    ContactCreated {
        organization_id: OrganizationId,
        contact_id: i64,
        user_id: i64,
        at: DateTime<Utc>,
    },
    ContactUpdated {
        organization_id: OrganizationId,
        contact_id: i64,
        user_id: i64,
        at: DateTime<Utc>,
    },
    ContactDeleted {
        organization_id: OrganizationId,
        contact_id: i64,
        user_id: i64,
        at: DateTime<Utc>,
    },
    ContactDuplicated {
        organization_id: OrganizationId,
        source_contact_id: i64,
        contact_id: i64,
        user_id: i64,
        at: DateTime<Utc>,
    },
    NoteAdded {
        organization_id: OrganizationId,
        contact_id: i64,
        note_id: i64,
        user_id: i64,
        at: DateTime<Utc>,
    },
    DuplicateContactBlocked {
        organization_id: OrganizationId,
        email: String,
        existing_contact_id: i64,
        user_id: i64,
        at: DateTime<Utc>,
    },

    // organizations
    OrganizationCreated {
        organization_id: OrganizationId,
        owner_user_id: i64,
        at: DateTime<Utc>,
    },
    OrganizationUpdated {
        organization_id: OrganizationId,
        user_id: i64,
        at: DateTime<Utc>,
    },
    OrganizationSwitched {
        organization_id: OrganizationId,
        user_id: i64,
        at: DateTime<Utc>,
    },
    OrganizationLeft {
        organization_id: OrganizationId,
        user_id: i64,
        at: DateTime<Utc>,
    },

    // memberships
    MemberAdded {
        organization_id: OrganizationId,
        user_id: i64,
        role: OrgRole,
        by_user_id: i64,
        at: DateTime<Utc>,
    },
    MemberRoleChanged {
        organization_id: OrganizationId,
        user_id: i64,
        role: OrgRole,
        by_user_id: i64,
        at: DateTime<Utc>,
    },
    MemberRemoved {
        organization_id: OrganizationId,
        user_id: i64,
        by_user_id: i64,
        at: DateTime<Utc>,
    },

    // users and sessions
    UserCreated {
        user_id: i64,
        by_user_id: i64,
        at: DateTime<Utc>,
    },
    UserUpdated {
        user_id: i64,
        by_user_id: i64,
        at: DateTime<Utc>,
    },
    UserDeleted {
        user_id: i64,
        by_user_id: i64,
        at: DateTime<Utc>,
    },
    LoginSuccess {
        user_id: i64,
        at: DateTime<Utc>,
    },
    LoginFailed {
        email: String,
        at: DateTime<Utc>,
    },
    LogoutSuccess {
        user_id: i64,
        at: DateTime<Utc>,
    },
}

impl OrgEvent {
    /// Dot-separated name for logs and traces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContactCreated { .. } => "contact.created",
            Self::ContactUpdated { .. } => "contact.updated",
            Self::ContactDeleted { .. } => "contact.deleted",
            Self::ContactDuplicated { .. } => "contact.duplicated",
            Self::NoteAdded { .. } => "contact.note_added",
            Self::DuplicateContactBlocked { .. } => "contact.duplicate_blocked",
            Self::OrganizationCreated { .. } => "organization.created",
            Self::OrganizationUpdated { .. } => "organization.updated",
            Self::OrganizationSwitched { .. } => "organization.switched",
            Self::OrganizationLeft { .. } => "organization.left",
            Self::MemberAdded { .. } => "membership.added",
            Self::MemberRoleChanged { .. } => "membership.role_changed",
            Self::MemberRemoved { .. } => "membership.removed",
            Self::UserCreated { .. } => "user.created",
            Self::UserUpdated { .. } => "user.updated",
            Self::UserDeleted { .. } => "user.deleted",
            Self::LoginSuccess { .. } => "session.login.success",
            Self::LoginFailed { .. } => "session.login.failed",
            Self::LogoutSuccess { .. } => "session.logout",
        }
    }

    /// Organization the event belongs to, if any.
    pub fn organization_id(&self) -> Option<OrganizationId> {
        match self {
            Self::ContactCreated { organization_id, .. }
            | Self::ContactUpdated { organization_id, .. }
            | Self::ContactDeleted { organization_id, .. }
            | Self::ContactDuplicated { organization_id, .. }
            | Self::NoteAdded { organization_id, .. }
            | Self::DuplicateContactBlocked { organization_id, .. }
            | Self::OrganizationCreated { organization_id, .. }
            | Self::OrganizationUpdated { organization_id, .. }
            | Self::OrganizationSwitched { organization_id, .. }
            | Self::OrganizationLeft { organization_id, .. }
            | Self::MemberAdded { organization_id, .. }
            | Self::MemberRoleChanged { organization_id, .. }
            | Self::MemberRemoved { organization_id, .. } => Some(*organization_id),
            Self::UserCreated { .. }
            | Self::UserUpdated { .. }
            | Self::UserDeleted { .. }
            | Self::LoginSuccess { .. }
            | Self::LoginFailed { .. }
            | Self::LogoutSuccess { .. } => None,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ContactCreated { at, .. }
            | Self::ContactUpdated { at, .. }
            | Self::ContactDeleted { at, .. }
            | Self::ContactDuplicated { at, .. }
            | Self::NoteAdded { at, .. }
            | Self::DuplicateContactBlocked { at, .. }
            | Self::OrganizationCreated { at, .. }
            | Self::OrganizationUpdated { at, .. }
            | Self::OrganizationSwitched { at, .. }
            | Self::OrganizationLeft { at, .. }
            | Self::MemberAdded { at, .. }
            | Self::MemberRoleChanged { at, .. }
            | Self::MemberRemoved { at, .. }
            | Self::UserCreated { at, .. }
            | Self::UserUpdated { at, .. }
            | Self::UserDeleted { at, .. }
            | Self::LoginSuccess { at, .. }
            | Self::LoginFailed { at, .. }
            | Self::LogoutSuccess { at, .. } => *at,
        }
    }
}
