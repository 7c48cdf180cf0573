use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::super::error::AppError;
use super::super::middleware::SessionUser;
use super::super::routes::AppState;
use crate::actions::{
    AddMemberAction, ListMembersAction, RemoveMemberAction, UpdateMemberRoleAction,
};
use crate::api::{AddMemberRequest, MembersResponse, MembershipResponse, UpdateRoleRequest};
use crate::session::SessionRepository;
use crate::storage::AvatarStorage;
use crate::{
    ContactRepository, MembershipRepository, OrganizationId, OrganizationRepository,
    UserRepository,
};

/// GET /organizations/{id}/users
pub async fn index<U, O, M, C, S, A>(
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
    let list = ListMembersAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
        state.user_repository.clone(),
    )
    .execute(current.user.id, OrganizationId(id))
    .await?;

    Ok(Json(MembersResponse::from(list)))
}

/// POST /organizations/{id}/users
pub async fn store<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Path(id): Path<i64>,
    Json(body): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let membership = AddMemberAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
        state.user_repository.clone(),
    )
    .execute(current.user.id, OrganizationId(id), body.user_id, &body.role)
    .await?;

    Ok((StatusCode::CREATED, Json(MembershipResponse::from(membership))))
}

/// PUT /organizations/{id}/users/{user_id}
pub async fn update<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Path((id, user_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let membership = UpdateMemberRoleAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
    )
    .execute(current.user.id, OrganizationId(id), user_id, &body.role)
    .await?;

    Ok(Json(MembershipResponse::from(membership)))
}

/// DELETE /organizations/{id}/users/{user_id}
pub async fn destroy<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    RemoveMemberAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
    )
    .execute(current.user.id, OrganizationId(id), user_id)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
