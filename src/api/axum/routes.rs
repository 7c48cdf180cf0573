use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};

use super::handlers::{contacts, members, organizations, session, users};
use crate::OrgbookConfig;
use crate::session::SessionRepository;
use crate::storage::AvatarStorage;
use crate::{ContactRepository, MembershipRepository, OrganizationRepository, UserRepository};

/// Shared handler state. Repositories are cloned into each action.
#[derive(Clone)]
pub struct AppState<U, O, M, C, S, A> {
    pub user_repository: U,
    pub organization_repository: O,
    pub membership_repository: M,
    pub contact_repository: C,
    pub session_repository: S,
    pub avatar_storage: A,
    pub config: Arc<OrgbookConfig>,
}

/// Every route.
pub fn routes<U, O, M, C, S, A>() -> Router<AppState<U, O, M, C, S, A>>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    Router::new()
        .merge(public_routes())
        .merge(organization_routes())
        .merge(contact_routes())
        .merge(member_routes())
        .merge(user_routes())
}

/// `/healthz`, `/login` and `/logout`.
pub fn public_routes<U, O, M, C, S, A>() -> Router<AppState<U, O, M, C, S, A>>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    Router::new()
        .route("/healthz", get(session::healthz))
        .route("/login", post(session::login::<U, O, M, C, S, A>))
        .route("/logout", post(session::logout::<U, O, M, C, S, A>))
}

/// Organization listing, creation, management and switching.
pub fn organization_routes<U, O, M, C, S, A>() -> Router<AppState<U, O, M, C, S, A>>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    Router::new()
        .route("/organizations", get(organizations::index::<U, O, M, C, S, A>))
        .route(
            "/organizations/{id}",
            get(organizations::show::<U, O, M, C, S, A>)
                .put(organizations::update::<U, O, M, C, S, A>),
        )
        .route(
            "/organization/create",
            post(organizations::store::<U, O, M, C, S, A>),
        )
        .route(
            "/organizations/{id}/manage",
            get(organizations::manage::<U, O, M, C, S, A>),
        )
        .route(
            "/organizations/{id}/leave",
            post(organizations::leave::<U, O, M, C, S, A>),
        )
        .route(
            "/switch-org/{id}",
            post(organizations::switch::<U, O, M, C, S, A>),
        )
}

/// Contacts of the active organization.
pub fn contact_routes<U, O, M, C, S, A>() -> Router<AppState<U, O, M, C, S, A>>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    Router::new()
        .route("/contacts", get(contacts::index::<U, O, M, C, S, A>))
        .route(
            "/contacts/create",
            get(contacts::create::<U, O, M, C, S, A>).post(contacts::store::<U, O, M, C, S, A>),
        )
        .route(
            "/contacts/{id}",
            get(contacts::show::<U, O, M, C, S, A>)
                .put(contacts::update::<U, O, M, C, S, A>)
                .delete(contacts::destroy::<U, O, M, C, S, A>),
        )
        .route("/contacts/{id}/edit", get(contacts::edit::<U, O, M, C, S, A>))
        .route(
            "/contacts/{id}/duplicate",
            post(contacts::duplicate::<U, O, M, C, S, A>),
        )
        .route(
            "/contacts/{id}/notes",
            post(contacts::add_note::<U, O, M, C, S, A>),
        )
}

/// Membership management of one organization.
pub fn member_routes<U, O, M, C, S, A>() -> Router<AppState<U, O, M, C, S, A>>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    Router::new()
        .route(
            "/organizations/{id}/users",
            get(members::index::<U, O, M, C, S, A>).post(members::store::<U, O, M, C, S, A>),
        )
        .route(
            "/organizations/{id}/users/{user_id}",
            put(members::update::<U, O, M, C, S, A>).delete(members::destroy::<U, O, M, C, S, A>),
        )
}

/// Global user administration.
pub fn user_routes<U, O, M, C, S, A>() -> Router<AppState<U, O, M, C, S, A>>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    Router::new()
        .route(
            "/users",
            get(users::index::<U, O, M, C, S, A>).post(users::store::<U, O, M, C, S, A>),
        )
        .route(
            "/users/{id}",
            get(users::show::<U, O, M, C, S, A>)
                .put(users::update::<U, O, M, C, S, A>)
                .delete(users::destroy::<U, O, M, C, S, A>),
        )
}
