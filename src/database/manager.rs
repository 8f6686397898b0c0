use sqlx::{
    postgres::PgPoolOptions,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    PgPool, SqlitePool,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::postgres::{PgCredentialStore, PgSchemeStore};
use crate::database::repository::{CredentialStore, SchemeStore};
use crate::database::schema;
use crate::database::sqlite::{SqliteCredentialStore, SqliteSchemeStore};

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Reclassify a unique/primary-key violation as `Duplicate`; anything else
    /// stays a raw sqlx error.
    pub(crate) fn from_insert(err: sqlx::Error, subject: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::Duplicate(subject.into())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Storage engine, chosen from the database URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, DatabaseError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            Err(DatabaseError::UnsupportedUrl(redact_url(url)))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }
}

/// Connection pool for whichever backend the configuration selected
#[derive(Clone, Debug)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }

        let acquire_timeout = Duration::from_secs(config.connection_timeout);
        let idle_timeout = seconds_or_none(config.idle_timeout);
        let max_lifetime = seconds_or_none(config.max_lifetime);

        let database = match Backend::from_url(&config.url)? {
            Backend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(max_lifetime)
                    .connect(&config.url)
                    .await?;
                Database::Postgres(pool)
            }
            Backend::Sqlite => {
                let options = SqliteConnectOptions::from_str(&config.url)?.foreign_keys(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(max_lifetime)
                    .connect_with(options)
                    .await?;
                Database::Sqlite(pool)
            }
        };

        info!("Connected to {:?} database at {}", database.backend(), redact_url(&config.url));
        Ok(database)
    }

    /// Single-connection in-memory SQLite database with the schema applied.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
            idle_timeout: 0,
            max_lifetime: 0,
        };
        let database = Self::connect(&config).await?;
        database.bootstrap().await?;
        Ok(database)
    }

    pub fn backend(&self) -> Backend {
        match self {
            Database::Postgres(_) => Backend::Postgres,
            Database::Sqlite(_) => Backend::Sqlite,
        }
    }

    /// Create tables and indexes if they do not exist yet
    pub async fn bootstrap(&self) -> Result<(), DatabaseError> {
        match self {
            Database::Postgres(pool) => {
                for statement in schema::POSTGRES {
                    sqlx::query(statement).execute(pool).await?;
                }
            }
            Database::Sqlite(pool) => {
                for statement in schema::SQLITE {
                    sqlx::query(statement).execute(pool).await?;
                }
            }
        }
        info!("Database schema ready ({:?})", self.backend());
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match self {
            Database::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            Database::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }
        Ok(())
    }

    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        match self {
            Database::Postgres(pool) => Arc::new(PgCredentialStore::new(pool.clone())),
            Database::Sqlite(pool) => Arc::new(SqliteCredentialStore::new(pool.clone())),
        }
    }

    pub fn scheme_store(&self) -> Arc<dyn SchemeStore> {
        match self {
            Database::Postgres(pool) => Arc::new(PgSchemeStore::new(pool.clone())),
            Database::Sqlite(pool) => Arc::new(SqliteSchemeStore::new(pool.clone())),
        }
    }

    pub async fn close(&self) {
        match self {
            Database::Postgres(pool) => pool.close().await,
            Database::Sqlite(pool) => pool.close().await,
        }
        info!("Closed database pool");
    }
}

fn seconds_or_none(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Strip the password from a database URL so it can be logged
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                // cannot-be-a-base URLs have no credentials to strip
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable database url>".to_string(),
    }
}
