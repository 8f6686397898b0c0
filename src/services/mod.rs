pub mod scheme_service;
pub mod user_service;

pub use scheme_service::SchemeService;
pub use user_service::UserService;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;

/// Domain outcome of a service call, before it is rendered for HTTP
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(DatabaseError),

    #[error(transparent)]
    Auth(AuthError),

    #[error("{0}")]
    Internal(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => ServiceError::NotFound(format!("{} not found", capitalize(&what))),
            DatabaseError::Duplicate(what) => ServiceError::Conflict(format!("{} already exists", capitalize(&what))),
            other => ServiceError::Database(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                ServiceError::Unauthorized("Invalid or expired token".to_string())
            }
            other => ServiceError::Auth(other),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
