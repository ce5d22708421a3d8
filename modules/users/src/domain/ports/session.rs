use async_trait::async_trait;
use axum::http::request::Parts;

use crate::contract::model::AppSession;

/// Resolves who is calling. `None` means the request is anonymous.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self, parts: &Parts) -> Option<AppSession>;
}
