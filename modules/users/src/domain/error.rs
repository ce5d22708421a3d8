use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: i32 },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Invalid birth date: '{value}'")]
    InvalidBirth { value: String },

    #[error("Session user id is not an integer: '{value}'")]
    InvalidSessionId { value: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: i32) -> Self {
        Self::UserNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn invalid_birth(value: impl Into<String>) -> Self {
        Self::InvalidBirth {
            value: value.into(),
        }
    }

    pub fn invalid_session_id(value: impl Into<String>) -> Self {
        Self::InvalidSessionId {
            value: value.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
