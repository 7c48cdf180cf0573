//! Request extractors for the session user and the active organization.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use chrono::Utc;

use super::error::AppError;
use super::routes::AppState;
use crate::context::{ActiveOrganizationResolver, OrgContext};
use crate::session::{Session, SessionRepository, read_cookie, verify_signed_cookie};
use crate::storage::AvatarStorage;
use crate::{
    ContactRepository, MembershipRepository, OrganizationRepository, OrgbookError, User,
    UserRepository,
};

/// The logged-in user and their session.
///
/// Rejects with 401 when the cookie is missing, forged or expired, or the
/// user no longer exists. Every accepted request slides the session expiry.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub session: Session,
}

/// The organization context contact handlers run in.
///
/// Rejects with 403 `NO_ACTIVE_ORGANIZATION` when the user belongs to no
/// organization.
#[derive(Debug, Clone)]
pub struct ActiveOrganization(pub OrgContext);

fn session_id_from(parts: &Parts, cookie_name: &str) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| read_cookie(header, cookie_name).map(ToOwned::to_owned))
}

impl<U, O, M, C, S, A> FromRequestParts<AppState<U, O, M, C, S, A>> for SessionUser
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, O, M, C, S, A>,
    ) -> Result<Self, Self::Rejection> {
        let session_config = &state.config.session;

        let signed = session_id_from(parts, &session_config.cookie_name)
            .ok_or(AppError(OrgbookError::Unauthenticated))?;
        let session_id = verify_signed_cookie(&signed, &session_config.secret_key)
            .ok_or(AppError(OrgbookError::Unauthenticated))?;

        let mut session = state
            .session_repository
            .find(&session_id)
            .await?
            .ok_or(AppError(OrgbookError::Unauthenticated))?;

        if session.is_expired() {
            log::debug!(target: "orgbook::session", "msg=\"session expired\", user_id={}", session.data.user_id);
            state.session_repository.destroy(&session.id).await?;
            return Err(AppError(OrgbookError::Unauthenticated));
        }

        let Some(user) = state
            .user_repository
            .find_user_by_id(session.data.user_id)
            .await?
        else {
            log::info!(target: "orgbook::session", "msg=\"session user gone\", user_id={}", session.data.user_id);
            state.session_repository.destroy(&session.id).await?;
            return Err(AppError(OrgbookError::Unauthenticated));
        };

        let expires_at = Utc::now() + session_config.session_lifetime;
        state.session_repository.extend(&session.id, expires_at).await?;
        session.data.expires_at = expires_at;

        Ok(SessionUser { user, session })
    }
}

impl<U, O, M, C, S, A> FromRequestParts<AppState<U, O, M, C, S, A>> for ActiveOrganization
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, O, M, C, S, A>,
    ) -> Result<Self, Self::Rejection> {
        let SessionUser { user, session } = SessionUser::from_request_parts(parts, state).await?;

        let resolver = ActiveOrganizationResolver::new(
            state.membership_repository.clone(),
            state.session_repository.clone(),
        );
        let membership = resolver
            .resolve(&session)
            .await?
            .ok_or(AppError(OrgbookError::NoActiveOrganization))?;

        Ok(ActiveOrganization(OrgContext::new(
            user,
            &membership,
            session.id,
        )))
    }
}
