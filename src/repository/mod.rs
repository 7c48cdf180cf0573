//! Entity types, repository traits and in-memory implementations.
//!
//! # Traits
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`UserRepository`] | User accounts |
//! | [`OrganizationRepository`] | Organizations (tenants) |
//! | [`MembershipRepository`] | User to organization links with a role |
//! | [`ContactRepository`] | Organization-scoped contacts, notes and custom fields |
//!
//! # Mock Implementations
//!
//! Enable the `mocks` feature for in-memory implementations useful for
//! testing. They are `Clone` and share state between clones.

mod contact;
mod membership;
mod organization;
mod role;
mod user;

#[cfg(any(test, feature = "mocks"))]
mod contact_mock;
#[cfg(any(test, feature = "mocks"))]
mod membership_mock;
#[cfg(any(test, feature = "mocks"))]
mod organization_mock;
#[cfg(any(test, feature = "mocks"))]
mod user_mock;

pub use contact::{
    Contact, ContactChanges, ContactDetails, ContactMeta, ContactNote, ContactRepository,
    MetaFields, NewContact,
};
pub use membership::{CreateMembership, Membership, MembershipRepository};
pub use organization::{NewOrganization, Organization, OrganizationId, OrganizationRepository};
pub use role::{GlobalRole, OrgRole, Role};
pub use user::{NewUser, User, UserChanges, UserRepository};

#[cfg(any(test, feature = "mocks"))]
pub use contact_mock::MockContactRepository;
#[cfg(any(test, feature = "mocks"))]
pub use membership_mock::MockMembershipRepository;
#[cfg(any(test, feature = "mocks"))]
pub use organization_mock::MockOrganizationRepository;
#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
