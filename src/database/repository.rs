use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::ColorScheme;

/// Header columns plus each color row, one row per color (or a single row
/// with NULL color columns when the scheme has none).
pub(crate) const SELECT_SCHEMES_WITH_COLORS: &str = r#"
    SELECT s.id, s.name, s.author, s.category, c.color_key, c.color_value
    FROM color_schemes s
    LEFT JOIN color_scheme_colors c ON c.scheme_id = s.id
"#;

/// Persistence for username / password-hash pairs
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. Fails with `DatabaseError::Duplicate` when the
    /// username is taken.
    async fn create_account(&self, username: &str, password_hash: &str) -> Result<(), DatabaseError>;

    /// Stored hash for `username`, or `DatabaseError::NotFound`.
    async fn find_password_hash(&self, username: &str) -> Result<String, DatabaseError>;
}

/// Persistence for scheme headers and their color rows.
///
/// Every operation that touches more than one row runs in a single
/// transaction; readers observe either the old or the new scheme.
#[async_trait]
pub trait SchemeStore: Send + Sync {
    async fn create(&self, scheme: &ColorScheme) -> Result<(), DatabaseError>;

    /// `DatabaseError::NotFound` when no header exists; a scheme with zero
    /// colors is returned with an empty map.
    async fn get_by_id(&self, id: &str) -> Result<ColorScheme, DatabaseError>;

    /// All schemes written by `author`, each with its full color map.
    async fn list_by_author(&self, author: &str) -> Result<Vec<ColorScheme>, DatabaseError>;

    /// Full replace of header and colors; slots missing from `scheme` are dropped.
    ///
    /// Only a scheme whose author is `owner` is touched. Any other scheme,
    /// or no scheme at all, is `DatabaseError::NotFound`.
    async fn update(&self, scheme: &ColorScheme, owner: &str) -> Result<(), DatabaseError>;

    /// Remove the scheme `id` authored by `owner`, NotFound otherwise
    async fn delete(&self, id: &str, owner: &str) -> Result<(), DatabaseError>;
}

pub(crate) fn scheme_not_found(id: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("color scheme '{}'", id))
}
