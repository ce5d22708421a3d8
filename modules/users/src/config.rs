use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the users module (`modules.users` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersConfig {
    /// A profile update without a usable `birth` clears the stored date.
    /// Set to false to leave it unchanged instead.
    #[serde(default = "default_clear_birth_when_absent")]
    pub clear_birth_when_absent: bool,
    /// Cookie session shared with the auth provider.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Cookie settings of the database-backed session. The auth provider must
/// issue cookies under the same name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the cookie `Secure`; set when served over HTTPS.
    #[serde(default)]
    pub secure: bool,
    /// Sessions expire after this many days without a request.
    #[serde(default = "default_inactivity_days")]
    pub inactivity_days: i64,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            clear_birth_when_absent: default_clear_birth_when_absent(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure: false,
            inactivity_days: default_inactivity_days(),
        }
    }
}

fn default_clear_birth_when_absent() -> bool {
    true
}

fn default_cookie_name() -> String {
    "users_sid".to_string()
}

fn default_inactivity_days() -> i64 {
    7
}

impl From<&UsersConfig> for ServiceConfig {
    fn from(cfg: &UsersConfig) -> Self {
        Self {
            clear_birth_when_absent: cfg.clear_birth_when_absent,
        }
    }
}
