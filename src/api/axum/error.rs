use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::OrgbookError;
use crate::api::{DuplicateEmailResponse, ErrorResponse};

/// Converts `OrgbookError` into an HTTP response.
#[derive(Debug)]
pub struct AppError(pub OrgbookError);

impl From<OrgbookError> for AppError {
    fn from(err: OrgbookError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            OrgbookError::Validation(_) | OrgbookError::DuplicateEmail { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            OrgbookError::AlreadyMember
            | OrgbookError::LastAdmin
            | OrgbookError::OwnerCannotLeave
            | OrgbookError::CannotRemoveOwner
            | OrgbookError::CannotDeleteSelf => StatusCode::BAD_REQUEST,
            OrgbookError::Unauthenticated | OrgbookError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            OrgbookError::Forbidden | OrgbookError::NoActiveOrganization => StatusCode::FORBIDDEN,
            OrgbookError::NotFound => StatusCode::NOT_FOUND,
            OrgbookError::PasswordHashError
            | OrgbookError::Storage(_)
            | OrgbookError::DatabaseError(_)
            | OrgbookError::ConfigurationError(_)
            | OrgbookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let OrgbookError::DuplicateEmail {
            existing_contact_id,
        } = self.0
        {
            let body = DuplicateEmailResponse {
                code: "DUPLICATE_EMAIL",
                existing_contact_id,
            };
            return (status, Json(body)).into_response();
        }

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
