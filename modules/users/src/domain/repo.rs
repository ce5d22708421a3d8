use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{NewUser, User, UserPatch};

/// Failures a store reports back to the domain.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("no user with id {0}")]
    NotFound(i32),
    /// A unique constraint rejected the write. Carries the store's message.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Every stored user, in store order.
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;
    /// Persist a new user; the store assigns the id and derives the hash.
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError>;
    /// Apply `patch` to the user with `id` and return the updated record.
    async fn update_by_id(&self, id: i32, patch: UserPatch) -> Result<User, RepoError>;
}
