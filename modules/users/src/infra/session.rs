//! Session provider adapters and the cookie session layer.
//!
//! Session records live in the service database (`tower_sessions` table on
//! SQLite, `tower_sessions.session` on Postgres) so that the external auth
//! provider can write them.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use axum::http::request::Parts;
use axum::Router;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, SessionManagerLayer, SessionStore,
};
use tower_sessions_sqlx_store::{PostgresStore, SqliteStore};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::contract::model::AppSession;
use crate::domain::ports::SessionProvider;

/// Key under which the auth provider stores [`AppSession`] in the cookie session.
pub const SESSION_KEY: &str = "session";

/// Cookie session layer over `store`.
#[must_use]
pub fn session_layer<S: SessionStore>(store: S, cfg: &SessionConfig) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(cfg.cookie_name.clone())
        .with_expiry(Expiry::OnInactivity(Duration::days(cfg.inactivity_days)))
        .with_secure(cfg.secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Wrap `router` in a session layer backed by the same database as the
/// user store, creating the session table if needed.
pub async fn with_database_sessions(
    router: Router,
    db: &DatabaseConnection,
    cfg: &SessionConfig,
) -> anyhow::Result<Router> {
    match db.get_database_backend() {
        DatabaseBackend::Sqlite => {
            let store = SqliteStore::new(db.get_sqlite_connection_pool().clone());
            store
                .migrate()
                .await
                .context("failed to create the SQLite session table")?;
            info!("Cookie sessions stored in SQLite");
            Ok(router.layer(session_layer(store, cfg)))
        }
        DatabaseBackend::Postgres => {
            let store = PostgresStore::new(db.get_postgres_connection_pool().clone());
            store
                .migrate()
                .await
                .context("failed to create the Postgres session table")?;
            info!("Cookie sessions stored in Postgres");
            Ok(router.layer(session_layer(store, cfg)))
        }
        other => Err(anyhow!("no session store for database backend {other:?}")),
    }
}

/// Reads the identity from the `tower_sessions::Session` that
/// `SessionManagerLayer` puts into request extensions.
#[derive(Debug, Clone, Default)]
pub struct TowerSessionProvider;

#[async_trait]
impl SessionProvider for TowerSessionProvider {
    async fn current_session(&self, parts: &Parts) -> Option<AppSession> {
        let session = parts.extensions.get::<tower_sessions::Session>()?;
        match session.get::<AppSession>(SESSION_KEY).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Failed to load session record");
                None
            }
        }
    }
}

/// Fixed identity, for tests and local tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionProvider(pub Option<AppSession>);

impl StaticSessionProvider {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self(Some(AppSession::for_user(id)))
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self, _parts: &Parts) -> Option<AppSession> {
        self.0.clone()
    }
}
