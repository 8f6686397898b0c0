use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};

pub mod password;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token lifetime of {0} hours is out of range")]
    InvalidLifetime(u64),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Authenticated caller, resolved from a verified session token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

/// Session token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: &str, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }
}

/// Credential hashing and session token issuance.
///
/// Hashing is deliberately slow; async callers should run it on the blocking pool.
pub trait Authenticator: Send + Sync {
    fn hash_password(&self, plaintext: &str) -> Result<String, AuthError>;

    fn verify_password(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError>;

    fn issue_token(&self, username: &str) -> Result<String, AuthError>;

    /// Username carried by a token with an intact signature that has not
    /// yet expired. Signature is checked before expiry.
    fn verify_token(&self, token: &str) -> Result<String, AuthError>;
}

/// HS256 JWT sessions with Argon2id password hashes
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl JwtAuthenticator {
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        let hours = security.jwt_expiry_hours;
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&hours) {
            return Err(AuthError::InvalidLifetime(hours));
        }
        // bounded above, so the cast cannot wrap
        let lifetime = Duration::try_hours(hours as i64).ok_or(AuthError::InvalidLifetime(hours))?;
        Self::new(&security.jwt_secret, lifetime)
    }

    /// Issue a token as if it had been created at `issued_at`
    pub fn issue_token_at(&self, username: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims::new(username, issued_at, self.lifetime);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }
}

impl Authenticator for JwtAuthenticator {
    fn hash_password(&self, plaintext: &str) -> Result<String, AuthError> {
        password::hash_password(plaintext)
    }

    fn verify_password(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError> {
        password::verify_password(plaintext, hash)
    }

    fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        self.issue_token_at(username, Utc::now())
    }

    fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            }
        })?;

        Ok(token_data.claims.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator(secret: &str) -> JwtAuthenticator {
        JwtAuthenticator::new(secret, Duration::hours(24)).unwrap()
    }

    #[test]
    fn fresh_token_yields_username() {
        let auth = authenticator("secret-one");
        let token = auth.issue_token("alice").unwrap();
        assert_eq!(auth.verify_token(&token).unwrap(), "alice");
    }

    #[test]
    fn token_past_lifetime_is_expired() {
        let auth = authenticator("secret-one");
        let token = auth
            .issue_token_at("alice", Utc::now() - Duration::hours(25))
            .unwrap();
        assert!(matches!(auth.verify_token(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn token_just_inside_lifetime_is_valid() {
        let auth = authenticator("secret-one");
        let token = auth
            .issue_token_at("alice", Utc::now() - Duration::hours(23))
            .unwrap();
        assert_eq!(auth.verify_token(&token).unwrap(), "alice");
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let token = authenticator("secret-one").issue_token("alice").unwrap();
        assert!(matches!(
            authenticator("secret-two").verify_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn forged_and_expired_token_reports_invalid() {
        // Signature is checked first, so an expired token from another key is
        // rejected as invalid rather than expired.
        let token = authenticator("secret-one")
            .issue_token_at("alice", Utc::now() - Duration::hours(48))
            .unwrap();
        assert!(matches!(
            authenticator("secret-two").verify_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn mutated_token_is_invalid() {
        let auth = authenticator("secret-one");
        let token = auth.issue_token("alice").unwrap();

        // Swap the payload for one claiming a different user
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let other = auth.issue_token("mallory").unwrap();
        parts[1] = other.split('.').nth(1).unwrap().to_string();
        let tampered = parts.join(".");

        assert!(matches!(auth.verify_token(&tampered), Err(AuthError::InvalidToken)));
        assert!(matches!(auth.verify_token("not.a.token"), Err(AuthError::InvalidToken)));
        assert!(matches!(auth.verify_token(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn claims_expire_after_lifetime() {
        let now = Utc::now();
        let claims = Claims::new("alice", now, Duration::hours(24));
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn out_of_range_lifetime_is_rejected() {
        let mut security = crate::config::AppConfig::development().security;
        for hours in [0, MAX_JWT_EXPIRY_HOURS + 1, u64::MAX] {
            security.jwt_expiry_hours = hours;
            assert!(matches!(
                JwtAuthenticator::from_config(&security),
                Err(AuthError::InvalidLifetime(h)) if h == hours
            ));
        }

        security.jwt_expiry_hours = MAX_JWT_EXPIRY_HOURS;
        let auth = JwtAuthenticator::from_config(&security).unwrap();
        let token = auth.issue_token("alice").unwrap();
        assert_eq!(auth.verify_token(&token).unwrap(), "alice");
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            JwtAuthenticator::new("", Duration::hours(24)),
            Err(AuthError::InvalidSecret)
        ));
    }

    #[test]
    fn password_round_trip_through_trait() {
        let auth: Box<dyn Authenticator> = Box::new(authenticator("secret-one"));
        let hash = auth.hash_password("hunter22").unwrap();
        assert!(auth.verify_password("hunter22", &hash).unwrap());
        assert!(!auth.verify_password("hunter23", &hash).unwrap());
    }
}
