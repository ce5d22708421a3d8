use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::UsersConfig;
use crate::domain::ports::SessionProvider;
use crate::domain::service::{Service, ServiceConfig};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

/// The user resource: domain service plus the session provider its REST
/// surface authenticates with.
#[derive(Clone)]
pub struct Users {
    service: Arc<Service>,
    sessions: Arc<dyn SessionProvider>,
}

impl Users {
    /// Wire the SeaORM store into the domain service.
    pub fn init(
        db: DatabaseConnection,
        cfg: &UsersConfig,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        info!("Initializing users module");
        debug!(
            "Loaded users config: clear_birth_when_absent={}",
            cfg.clear_birth_when_absent
        );

        let repo = SeaOrmUsersRepository::new(db);
        let service = Service::new(Arc::new(repo), ServiceConfig::from(cfg));
        Self {
            service: Arc::new(service),
            sessions,
        }
    }

    /// Build the module around an already constructed service.
    pub fn from_parts(service: Arc<Service>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { service, sessions }
    }

    /// Bring the `users` table up to date.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running users database migrations");
        Migrator::up(db, None).await?;
        info!("Users database migrations completed successfully");
        Ok(())
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering users REST routes");
        routes::register_routes(router, self.service.clone(), self.sessions.clone())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }
}
