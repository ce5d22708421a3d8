#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

use users::contract::model::{NewUser, User, UserPatch};
use users::domain::ports::SessionProvider;
use users::domain::repo::{RepoError, UsersRepository};
use users::domain::service::{Service, ServiceConfig};
use users::Users;

/// In-memory store that records every update it receives.
#[derive(Default)]
pub struct MockUsersRepository {
    pub users: Mutex<Vec<User>>,
    pub updates: Mutex<Vec<(i32, UserPatch)>>,
    pub fail_next: Mutex<Option<RepoError>>,
}

impl MockUsersRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Default::default()
        }
    }

    pub fn fail_next(&self, err: RepoError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    fn take_failure(&self) -> Result<(), RepoError> {
        match self.fail_next.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn get(&self, id: i32) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UsersRepository for MockUsersRepository {
    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        self.take_failure()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        self.take_failure()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(RepoError::Conflict("users.email".into()));
        }
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            email: new_user.email,
            hash: new_user.password,
            username: None,
            birth: new_user.birth,
            icon: None,
            title: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_by_id(&self, id: i32, patch: UserPatch) -> Result<User, RepoError> {
        self.updates.lock().unwrap().push((id, patch.clone()));
        self.take_failure()?;

        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepoError::NotFound(id))?;
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(birth) = patch.birth {
            user.birth = birth;
        }
        if let Some(icon) = patch.icon {
            user.icon = icon;
        }
        if let Some(title) = patch.title {
            user.title = title;
        }
        Ok(user.clone())
    }
}

pub fn user(id: i32, email: &str) -> User {
    User {
        id,
        email: email.to_string(),
        hash: format!("hash-{id}"),
        username: Some(format!("user{id}")),
        birth: None,
        icon: None,
        title: None,
        created_at: Utc::now(),
    }
}

pub fn router_with(
    repo: Arc<dyn UsersRepository>,
    sessions: Arc<dyn SessionProvider>,
    config: ServiceConfig,
) -> Router {
    let service = Arc::new(Service::new(repo, config));
    Users::from_parts(service, sessions).register_rest(Router::new())
}

/// Fresh in-memory SQLite database with the users schema applied.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    Users::migrate(&db).await.expect("Failed to run migrations");
    db
}

pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request and decode the JSON response body (Null when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
