use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Stored form of the password. Never leaves the service through REST.
    pub hash: String,
    pub username: Option<String>,
    pub birth: Option<DateTime<Utc>>,
    pub icon: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user. The password is handed to the store as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub birth: Option<DateTime<Utc>>,
}

/// Profile changes requested by the owner of the record.
///
/// For `username`, `icon` and `title` the outer `None` means the key was not
/// sent and `Some(None)` means it was sent as `null`.
///
/// `birth: None` means "no usable birth date was supplied"; what that does to the
/// stored value is decided by the service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileUpdate {
    pub username: Option<Option<String>>,
    pub birth: Option<DateTime<Utc>>,
    pub icon: Option<Option<String>>,
    pub title: Option<Option<String>>,
}

/// Column-level update handed to the store. `None` leaves a column untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub username: Option<Option<String>>,
    pub birth: Option<Option<DateTime<Utc>>>,
    pub icon: Option<Option<String>>,
    pub title: Option<Option<String>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.birth.is_none() && self.icon.is_none() && self.title.is_none()
    }
}

/// Identity resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSession {
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User id as issued by the auth provider, a base-10 integer in string form.
    ///
    /// The whole value must be numeric (surrounding whitespace is ignored):
    /// `"5abc"` is rejected rather than read as `5`. An empty id counts as
    /// no session at all.
    pub id: String,
}

impl AppSession {
    pub fn for_user(id: impl Into<String>) -> Self {
        Self {
            user: SessionUser { id: id.into() },
        }
    }
}
