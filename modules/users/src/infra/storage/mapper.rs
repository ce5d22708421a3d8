use crate::contract::model::User;
use crate::infra::storage::entity::Model as UserEntity;

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            hash: entity.hash,
            username: entity.username,
            birth: entity.birth,
            icon: entity.icon,
            title: entity.title,
            created_at: entity.created_at,
        }
    }
}
