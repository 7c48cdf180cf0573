use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::super::error::AppError;
use super::super::middleware::SessionUser;
use super::super::routes::AppState;
use crate::actions::{
    CreateOrganizationAction, LeaveOrganizationAction, ListOrganizationsAction,
    ManageOrganizationAction, ShowOrganizationAction, SwitchOrganizationAction,
    UpdateOrganizationAction,
};
use crate::api::{
    ContactDetailsResponse, ManageOrganizationResponse, MessageResponse, OrganizationRequest,
    OrganizationResponse,
};
use crate::session::SessionRepository;
use crate::storage::AvatarStorage;
use crate::{
    ContactRepository, MembershipRepository, OrgRole, OrganizationId, OrganizationRepository,
    UserRepository,
};

/// Organizations the user belongs to, with their role in each.
///
/// GET /organizations
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
    let organizations = ListOrganizationsAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
    )
    .execute(current.user.id)
    .await?;

    let body: Vec<OrganizationResponse> = organizations
        .into_iter()
        .map(|(org, membership)| OrganizationResponse::with_role(org, membership.role))
        .collect();
    Ok(Json(body))
}

/// GET /organizations/{id}
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
    let (organization, membership) = ShowOrganizationAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
    )
    .execute(current.user.id, OrganizationId(id))
    .await?;

    Ok(Json(OrganizationResponse::with_role(
        organization,
        membership.role,
    )))
}

/// Create an organization owned by the user and make it active.
///
/// POST /organization/create
pub async fn store<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Json(body): Json<OrganizationRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let organization = CreateOrganizationAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
        state.session_repository.clone(),
    )
    .execute(&current.session, body.into())
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse::with_role(organization, OrgRole::Admin)),
    ))
}

/// PUT /organizations/{id}
pub async fn update<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    current: SessionUser,
    Path(id): Path<i64>,
    Json(body): Json<OrganizationRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let organization = UpdateOrganizationAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
    )
    .execute(current.user.id, OrganizationId(id), body.into())
    .await?;

    Ok(Json(OrganizationResponse::with_role(
        organization,
        OrgRole::Admin,
    )))
}

/// The organization with every contact, notes and custom fields included.
///
/// GET /organizations/{id}/manage
pub async fn manage<U, O, M, C, S, A>(
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
    let (organization, contacts) = ManageOrganizationAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
        state.contact_repository.clone(),
    )
    .execute(current.user.id, OrganizationId(id))
    .await?;

    Ok(Json(ManageOrganizationResponse {
        organization: OrganizationResponse::with_role(organization, OrgRole::Admin),
        contacts: contacts
            .into_iter()
            .map(|details| ContactDetailsResponse::new(details, &state.avatar_storage, None))
            .collect(),
    }))
}

/// POST /organizations/{id}/leave
pub async fn leave<U, O, M, C, S, A>(
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
    LeaveOrganizationAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
        state.session_repository.clone(),
    )
    .execute(&current.session, OrganizationId(id))
    .await?;

    Ok(Json(MessageResponse::new("You have left the organization")))
}

/// Make another organization the active one.
///
/// POST /switch-org/{id}
pub async fn switch<U, O, M, C, S, A>(
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
    let organization = SwitchOrganizationAction::new(
        state.organization_repository.clone(),
        state.membership_repository.clone(),
        state.session_repository.clone(),
    )
    .execute(&current.session, OrganizationId(id))
    .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}
