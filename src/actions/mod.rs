//! Application actions.
//!
//! Each action owns the repositories it needs, is built with `new` and run
//! with `execute`. Contact actions take an [`OrgContext`](crate::context::OrgContext)
//! and never see an organization id they could pick themselves.
//!
//! | Area | Actions |
//! |------|---------|
//! | Contacts | [`ListContactsAction`], [`ShowContactAction`], [`CreateContactAction`], [`UpdateContactAction`], [`DeleteContactAction`], [`DuplicateContactAction`], [`AddNoteAction`] |
//! | Organizations | [`ListOrganizationsAction`], [`ShowOrganizationAction`], [`ManageOrganizationAction`], [`CreateOrganizationAction`], [`UpdateOrganizationAction`], [`SwitchOrganizationAction`], [`LeaveOrganizationAction`] |
//! | Members | [`ListMembersAction`], [`AddMemberAction`], [`UpdateMemberRoleAction`], [`RemoveMemberAction`] |
//! | Users | [`ListUsersAction`], [`GetUserAction`], [`CreateUserAction`], [`UpdateUserAction`], [`DeleteUserAction`] |
//! | Sessions | [`LoginAction`], [`LogoutAction`] |

mod access;
mod avatar_files;
mod contact_input;
mod duplicate_email_guard;
mod organization_input;
mod user_input;

mod add_member;
mod add_note;
mod create_contact;
mod create_organization;
mod create_user;
mod delete_contact;
mod delete_user;
mod duplicate_contact;
mod get_user;
mod leave_organization;
mod list_contacts;
mod list_members;
mod list_organizations;
mod list_users;
mod login;
mod logout;
mod manage_organization;
mod remove_member;
mod show_contact;
mod show_organization;
mod switch_organization;
mod update_contact;
mod update_member_role;
mod update_organization;
mod update_user;

#[cfg(test)]
pub(crate) mod test_support;

pub use contact_input::{ContactInput, ValidContact};
pub use duplicate_email_guard::DuplicateEmailGuard;
pub use organization_input::OrganizationInput;
pub use user_input::UserInput;

pub use add_member::AddMemberAction;
pub use add_note::AddNoteAction;
pub use create_contact::CreateContactAction;
pub use create_organization::CreateOrganizationAction;
pub use create_user::CreateUserAction;
pub use delete_contact::DeleteContactAction;
pub use delete_user::DeleteUserAction;
pub use duplicate_contact::DuplicateContactAction;
pub use get_user::GetUserAction;
pub use leave_organization::LeaveOrganizationAction;
pub use list_contacts::ListContactsAction;
pub use list_members::{ListMembersAction, MemberList};
pub use list_organizations::ListOrganizationsAction;
pub use list_users::ListUsersAction;
pub use login::LoginAction;
pub use logout::LogoutAction;
pub use manage_organization::ManageOrganizationAction;
pub use remove_member::RemoveMemberAction;
pub use show_contact::{ContactView, NoteView, ShowContactAction};
pub use show_organization::ShowOrganizationAction;
pub use switch_organization::SwitchOrganizationAction;
pub use update_contact::UpdateContactAction;
pub use update_member_role::UpdateMemberRoleAction;
pub use update_organization::UpdateOrganizationAction;
pub use update_user::UpdateUserAction;
