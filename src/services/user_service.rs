use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use crate::auth::{AuthError, Authenticator};
use crate::database::{CredentialStore, DatabaseError};

use super::ServiceError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 1024;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Verified against when the username is unknown, so both login failures
/// pay for one Argon2 verification.
const DUMMY_PASSWORD: &str = "colorscheme-api-unknown-user";

/// Registration and login: password hashes in, session tokens out
#[derive(Clone)]
pub struct UserService {
    credentials: Arc<dyn CredentialStore>,
    authenticator: Arc<dyn Authenticator>,
    dummy_hash: Arc<OnceLock<String>>,
}

impl UserService {
    pub fn new(credentials: Arc<dyn CredentialStore>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            credentials,
            authenticator,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Create an account and return a session token for it
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        validate_username_format(username).map_err(ServiceError::Validation)?;
        validate_password(password).map_err(ServiceError::Validation)?;

        let hash = self.hash_password(password).await?;

        info!("Creating account for user: {}", username);
        self.credentials.create_account(username, &hash).await?;

        Ok(self.authenticator.issue_token(username)?)
    }

    /// Verify credentials and return a fresh session token.
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::Validation("Username and password are required".to_string()));
        }

        let hash = match self.credentials.find_password_hash(username).await {
            Ok(hash) => hash,
            Err(DatabaseError::NotFound(_)) => {
                self.verify_against_dummy(password).await?;
                warn!("Login attempt for unknown user: {}", username);
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if !self.verify_password(password, hash).await? {
            warn!("Invalid password for user: {}", username);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(self.authenticator.issue_token(username)?)
    }

    async fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        run_blocking(move || authenticator.hash_password(&password)).await
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, ServiceError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        run_blocking(move || authenticator.verify_password(&password, &hash)).await
    }

    /// Compute the unknown-user stand-in hash ahead of the first login
    pub async fn warm_up(&self) -> Result<(), ServiceError> {
        if self.dummy_hash.get().is_some() {
            return Ok(());
        }
        let authenticator = Arc::clone(&self.authenticator);
        let hash = run_blocking(move || authenticator.hash_password(DUMMY_PASSWORD)).await?;
        self.dummy_hash.get_or_init(|| hash);
        Ok(())
    }

    /// Same Argon2 work as a real verification, result discarded
    async fn verify_against_dummy(&self, password: &str) -> Result<(), ServiceError> {
        let authenticator = Arc::clone(&self.authenticator);
        let dummy_hash = Arc::clone(&self.dummy_hash);
        let password = password.to_string();
        run_blocking(move || {
            let hash = match dummy_hash.get() {
                Some(hash) => hash.clone(),
                None => {
                    let hash = authenticator.hash_password(DUMMY_PASSWORD)?;
                    dummy_hash.get_or_init(|| hash).clone()
                }
            };
            authenticator.verify_password(&password, &hash).map(|_| ())
        })
        .await
    }
}

/// Argon2 is CPU-bound; keep it off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("password task failed: {}", e)))?
        .map_err(ServiceError::from)
}

/// Username rules: 3-50 characters of letters, digits, underscore or hyphen,
/// starting with a letter or digit.
pub fn validate_username_format(username: &str) -> Result<(), String> {
    let first = match username.chars().next() {
        Some(c) => c,
        None => return Err("Username cannot be empty".to_string()),
    };

    let length = username.chars().count();
    if length < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if length > 50 {
        return Err("Username must be at most 50 characters".to_string());
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err("Username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    if !first.is_alphanumeric() {
        return Err("Username must start with a letter or number".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(format!("Password must be at most {} bytes", MAX_PASSWORD_LENGTH));
    }
    Ok(())
}
