use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in the `users` table. Timestamps are maintained by column defaults and
/// never read back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}
