use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request},
    response::Json,
    Extension,
};
use tracing::{info, warn};

use crate::api::rest::dto::{birth_text, CreateUserReq, UpdateUserReq, UserDto};
use crate::api::rest::error::{map_create_error, map_list_error, map_update_error, ApiError};
use crate::contract::model::{NewUser, ProfileUpdate};
use crate::domain::birth::parse_optional_birth;
use crate::domain::ports::SessionProvider;
use crate::domain::service::Service;

/// Upper bound for a profile update body.
const PATCH_BODY_LIMIT: usize = 64 * 1024;

/// List every user
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    info!("Listing users");

    let users = svc.list_users().await.map_err(|e| map_list_error(&e))?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Create a new user
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<Json<UserDto>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        warn!(error = %rejection, "Rejected user creation payload");
        ApiError::InvalidBody
    })?;
    info!(email = %req.email, "Creating user");

    let birth = birth_text(req.birth.as_ref())
        .and_then(parse_optional_birth)
        .map_err(|e| map_create_error(&e))?;
    let new_user = NewUser {
        email: req.email,
        password: req.password,
        birth,
    };

    let user = svc
        .create_user(new_user)
        .await
        .map_err(|e| map_create_error(&e))?;
    Ok(Json(UserDto::from(user)))
}

/// Update the profile of the signed-in user
pub async fn patch_current_user(
    Extension(svc): Extension<Arc<Service>>,
    Extension(sessions): Extension<Arc<dyn SessionProvider>>,
    request: Request,
) -> Result<Json<UserDto>, ApiError> {
    let (parts, body) = request.into_parts();

    // a session without a user id is no session
    let Some(session) = sessions
        .current_session(&parts)
        .await
        .filter(|s| !s.user.id.trim().is_empty())
    else {
        info!("Profile update without a session");
        return Err(ApiError::NotAuthenticated);
    };
    info!(session_user_id = %session.user.id, "Updating current user");

    let bytes = axum::body::to_bytes(body, PATCH_BODY_LIMIT)
        .await
        .map_err(|e| map_update_error(&e))?;
    let req: UpdateUserReq = serde_json::from_slice(&bytes).map_err(|e| map_update_error(&e))?;

    let update = ProfileUpdate {
        username: req.username,
        birth: birth_text(req.birth.as_ref())
            .and_then(parse_optional_birth)
            .map_err(|e| map_update_error(&e))?,
        icon: req.icon,
        title: req.title,
    };

    let user = svc
        .update_profile(&session.user.id, update)
        .await
        .map_err(|e| map_update_error(&e))?;
    Ok(Json(UserDto::from(user)))
}
