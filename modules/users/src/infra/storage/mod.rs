pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod password;
pub mod sea_orm_repo;
