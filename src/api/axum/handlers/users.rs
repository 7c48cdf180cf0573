use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::super::error::AppError;
use super::super::middleware::SessionUser;
use super::super::routes::AppState;
use crate::actions::{
    CreateUserAction, DeleteUserAction, GetUserAction, ListUsersAction, UpdateUserAction,
};
use crate::api::{UserRequest, UserResponse};
use crate::session::SessionRepository;
use crate::storage::AvatarStorage;
use crate::{ContactRepository, MembershipRepository, OrganizationRepository, UserRepository};

/// GET /users
pub async fn index<U, O, M, C, S, A>(
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
    let users = ListUsersAction::new(state.user_repository.clone())
        .execute(&current.user)
        .await?;

    let body: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// POST /users
pub async fn store<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Json(body): Json<UserRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let user = CreateUserAction::new(
        state.user_repository.clone(),
        state.config.password_hasher(),
    )
    .execute(&current.user, body.into())
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users/{id}
pub async fn show<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let user = GetUserAction::new(state.user_repository.clone())
        .execute(&current.user, id)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/{id}
pub async fn update<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Path(id): Path<i64>,
    Json(body): Json<UserRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let user = UpdateUserAction::new(
        state.user_repository.clone(),
        state.config.password_hasher(),
    )
    .execute(&current.user, id, body.into())
    .await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/{id}
pub async fn destroy<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    DeleteUserAction::new(
        state.user_repository.clone(),
        state.organization_repository.clone(),
        state.membership_repository.clone(),
        state.session_repository.clone(),
    )
    .execute(&current.user, id)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
