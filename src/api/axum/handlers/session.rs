use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use serde_json::json;

use super::super::error::AppError;
use super::super::middleware::SessionUser;
use super::super::routes::AppState;
use crate::actions::{LoginAction, LogoutAction};
use crate::api::{LoginRequest, MessageResponse, SessionResponse};
use crate::session::{SessionRepository, removal_cookie, session_cookie, sign_session_id};
use crate::storage::AvatarStorage;
use crate::{ContactRepository, MembershipRepository, OrganizationRepository, UserRepository};

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Verify credentials and start a session.
///
/// POST /login
pub async fn login<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let session_config = &state.config.session;
    let action = LoginAction::new(
        state.user_repository.clone(),
        state.session_repository.clone(),
        state.config.password_hasher(),
        session_config.session_lifetime,
    );

    let (user, session) = action.execute(&body.email, &body.password).await?;
    let cookie = session_cookie(
        &sign_session_id(&session.id, &session_config.secret_key),
        session_config,
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(SessionResponse {
            user: user.into(),
            current_organization_id: session.data.current_organization_id,
        }),
    ))
}

/// Destroy the current session.
///
/// POST /logout
pub async fn logout<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    LogoutAction::new(state.session_repository.clone())
        .execute(&current.session)
        .await?;

    Ok((
        [(SET_COOKIE, removal_cookie(&state.config.session))],
        Json(MessageResponse::new("Logged out")),
    ))
}
