use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::rest::dto::ErrorBody;
use crate::domain::error::DomainError;

/// Client-facing failures. The display string is the exact `error` message
/// sent to the caller; internal detail only goes to the log.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Invalid birth date")]
    InvalidBirth,
    #[error("Email already in use")]
    EmailConflict,
    #[error("Failed to list users")]
    ListFailed,
    #[error("Failed to create user")]
    CreateFailed,
    #[error("Failed to update user")]
    UpdateFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidBody | Self::InvalidBirth => StatusCode::BAD_REQUEST,
            Self::EmailConflict => StatusCode::CONFLICT,
            Self::ListFailed | Self::CreateFailed | Self::UpdateFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn map_list_error(e: &DomainError) -> ApiError {
    error!(error = %e, "Failed to list users");
    ApiError::ListFailed
}

pub fn map_create_error(e: &DomainError) -> ApiError {
    match e {
        DomainError::InvalidBirth { value } => {
            error!(birth = %value, "Rejected user creation with invalid birth date");
            ApiError::InvalidBirth
        }
        DomainError::EmailAlreadyExists { email } => {
            error!(email = %email, "Rejected user creation with duplicate email");
            ApiError::EmailConflict
        }
        _ => {
            error!(error = %e, "Failed to create user");
            ApiError::CreateFailed
        }
    }
}

/// Every failure on the update path collapses into one generic response.
pub fn map_update_error(e: &(dyn std::error::Error + 'static)) -> ApiError {
    error!(error = %e, "Failed to update user");
    ApiError::UpdateFailed
}
