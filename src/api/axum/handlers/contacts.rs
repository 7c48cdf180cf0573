use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::super::error::AppError;
use super::super::middleware::ActiveOrganization;
use super::super::routes::AppState;
use crate::actions::{
    AddNoteAction, CreateContactAction, DeleteContactAction, DuplicateContactAction,
    ListContactsAction, ShowContactAction, UpdateContactAction,
};
use crate::api::{
    ContactDetailsResponse, ContactFormResponse, ContactRequest, ContactResponse, ContactsQuery,
    FormLimits, NoteRequest, NoteResponse,
};
use crate::session::SessionRepository;
use crate::storage::AvatarStorage;
use crate::{ContactRepository, MembershipRepository, OrganizationRepository, UserRepository};

/// List contacts of the active organization.
///
/// GET /contacts?search=
pub async fn index<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
    Query(query): Query<ContactsQuery>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let contacts = ListContactsAction::new(state.contact_repository.clone())
        .execute(&ctx, query.search.as_deref())
        .await?;

    let body: Vec<ContactResponse> = contacts
        .into_iter()
        .map(|c| ContactResponse::new(c, &state.avatar_storage))
        .collect();
    Ok(Json(body))
}

/// GET /contacts/{id}
pub async fn show<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
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
    let view = ShowContactAction::new(
        state.contact_repository.clone(),
        state.user_repository.clone(),
        state.avatar_storage.clone(),
    )
    .execute(&ctx, id)
    .await?;

    Ok(Json(ContactDetailsResponse::from_view(view, &state.avatar_storage)))
}

/// Limits for an empty contact form.
///
/// GET /contacts/create
pub async fn create<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    ctx.require_admin()?;

    Ok(Json(ContactFormResponse {
        limits: FormLimits::from(&state.config.contacts),
        contact: None,
    }))
}

/// POST /contacts/create
pub async fn store<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
    Json(body): Json<ContactRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    // before the upload is decoded
    ctx.require_admin()?;
    let input = body.into_input()?;

    let details = CreateContactAction::new(
        state.contact_repository.clone(),
        state.avatar_storage.clone(),
        state.config.contacts.clone(),
    )
    .execute(&ctx, input)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactDetailsResponse::new(
            details,
            &state.avatar_storage,
            Some(&ctx.user),
        )),
    ))
}

/// A contact with the form limits.
///
/// GET /contacts/{id}/edit
pub async fn edit<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
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
    ctx.require_admin()?;

    let view = ShowContactAction::new(
        state.contact_repository.clone(),
        state.user_repository.clone(),
        state.avatar_storage.clone(),
    )
    .execute(&ctx, id)
    .await?;

    Ok(Json(ContactFormResponse {
        limits: FormLimits::from(&state.config.contacts),
        contact: Some(ContactDetailsResponse::from_view(view, &state.avatar_storage)),
    }))
}

/// Replace a contact, its notes and custom fields.
///
/// PUT /contacts/{id}
pub async fn update<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
    Path(id): Path<i64>,
    Json(body): Json<ContactRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    ctx.require_admin()?;
    let input = body.into_input()?;

    let details = UpdateContactAction::new(
        state.contact_repository.clone(),
        state.avatar_storage.clone(),
        state.config.contacts.clone(),
    )
    .execute(&ctx, id, input)
    .await?;

    Ok(Json(ContactDetailsResponse::new(
        details,
        &state.avatar_storage,
        Some(&ctx.user),
    )))
}

/// DELETE /contacts/{id}
pub async fn destroy<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
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
    DeleteContactAction::new(
        state.contact_repository.clone(),
        state.avatar_storage.clone(),
    )
    .execute(&ctx, id)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /contacts/{id}/duplicate
pub async fn duplicate<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
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
    let details = DuplicateContactAction::new(
        state.contact_repository.clone(),
        state.avatar_storage.clone(),
    )
    .execute(&ctx, id)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactDetailsResponse::new(details, &state.avatar_storage, None)),
    ))
}

/// Append one note; open to every member.
///
/// POST /contacts/{id}/notes
pub async fn add_note<U, O, M, C, S, A>(
    State(state): State<AppState<U, O, M, C, S, A>>,
    ActiveOrganization(ctx): ActiveOrganization,
    Path(id): Path<i64>,
    Json(body): Json<NoteRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    O: OrganizationRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    C: ContactRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    A: AvatarStorage + Clone + 'static,
{
    let note = AddNoteAction::new(
        state.contact_repository.clone(),
        state.config.contacts.clone(),
    )
    .execute(&ctx, id, &body.body)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(NoteResponse::new(note, Some(ctx.user.name.clone()))),
    ))
}
