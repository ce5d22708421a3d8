//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it works with a `DatabaseConnection`
//! or with a transaction handle.

use anyhow::Context;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set,
    SqlErr,
};

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::repo::{RepoError, UsersRepository};
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};
use crate::infra::storage::password::hash_password;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn write_error(err: DbErr, id: Option<i32>, what: &'static str) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
        return RepoError::Conflict(message);
    }
    match (err, id) {
        (DbErr::RecordNotUpdated | DbErr::RecordNotFound(_), Some(id)) => RepoError::NotFound(id),
        (err, _) => RepoError::Other(anyhow::Error::new(err).context(what)),
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let hash = hash_password(&new_user.password)?;
        let m = UserAM {
            id: NotSet,
            email: Set(new_user.email),
            hash: Set(hash),
            username: Set(None),
            birth: Set(new_user.birth),
            icon: Set(None),
            title: Set(None),
            created_at: Set(Utc::now()),
        };
        let inserted = m
            .insert(&self.conn)
            .await
            .map_err(|e| write_error(e, None, "insert failed"))?;
        Ok(inserted.into())
    }

    async fn update_by_id(&self, id: i32, patch: UserPatch) -> Result<User, RepoError> {
        if patch.is_empty() {
            let found = UserEntity::find_by_id(id)
                .one(&self.conn)
                .await
                .context("find_by_id failed")?;
            return found.map(Into::into).ok_or(RepoError::NotFound(id));
        }

        let mut m = UserAM {
            id: Set(id),
            ..Default::default()
        };
        if let Some(username) = patch.username {
            m.username = Set(username);
        }
        if let Some(birth) = patch.birth {
            m.birth = Set(birth);
        }
        if let Some(icon) = patch.icon {
            m.icon = Set(icon);
        }
        if let Some(title) = patch.title {
            m.title = Set(title);
        }

        let updated = m
            .update(&self.conn)
            .await
            .map_err(|e| write_error(e, Some(id), "update failed"))?;
        Ok(updated.into())
    }
}
