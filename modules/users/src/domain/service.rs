use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{NewUser, ProfileUpdate, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::{RepoError, UsersRepository};

/// Domain service for the user resource.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// When a profile update carries no birth date, clear the stored one
    /// instead of leaving it unchanged.
    pub clear_birth_when_absent: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            clear_birth_when_absent: true,
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        debug!("Listing all users");
        let users = self.repo.find_all().await.map_err(|e| map_repo_error(e, None))?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(
        name = "users.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");
        let email = new_user.email.clone();

        let user = self.repo.create(new_user).await.map_err(|e| match e {
            RepoError::Conflict(_) => DomainError::email_already_exists(email),
            other => map_repo_error(other, None),
        })?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    /// Update the profile of the user identified by the session id string.
    #[instrument(
        name = "users.service.update_profile",
        skip(self, update),
        fields(session_user_id = %session_user_id)
    )]
    pub async fn update_profile(
        &self,
        session_user_id: &str,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let id: i32 = session_user_id
            .trim()
            .parse()
            .map_err(|_| DomainError::invalid_session_id(session_user_id))?;
        info!(user_id = id, "Updating user profile");

        let patch = self.to_patch(update);
        let user = self
            .repo
            .update_by_id(id, patch)
            .await
            .map_err(|e| map_repo_error(e, Some(id)))?;

        info!("Successfully updated user");
        Ok(user)
    }

    fn to_patch(&self, update: ProfileUpdate) -> UserPatch {
        let birth = match update.birth {
            Some(date) => Some(Some(date)),
            None if self.config.clear_birth_when_absent => Some(None),
            None => None,
        };
        UserPatch {
            username: update.username,
            birth,
            icon: update.icon,
            title: update.title,
        }
    }
}

fn map_repo_error(e: RepoError, id: Option<i32>) -> DomainError {
    match e {
        RepoError::NotFound(missing) => DomainError::user_not_found(id.unwrap_or(missing)),
        RepoError::Conflict(message) => DomainError::database(message),
        RepoError::Other(err) => DomainError::database(format!("{err:#}")),
    }
}
