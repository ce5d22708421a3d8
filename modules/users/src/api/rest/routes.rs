use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::ports::SessionProvider;
use crate::domain::service::Service;

/// Mount the user resource on `router`:
///
/// - `GET /users`: list all users
/// - `POST /users`: create a user
/// - `PATCH /users`: update the signed-in user's profile
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    sessions: Arc<dyn SessionProvider>,
) -> Router {
    let users = Router::new()
        .route(
            "/users",
            get(handlers::list_users)
                .post(handlers::create_user)
                .patch(handlers::patch_current_user),
        )
        .layer(Extension(service))
        .layer(Extension(sessions));

    router.merge(users)
}
