use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::BTreeMap;

use crate::database::manager::DatabaseError;
use crate::database::models::{fold_scheme_rows, ColorScheme, SchemeColorRow, User};
use crate::database::repository::{
    scheme_not_found, CredentialStore, SchemeStore, SELECT_SCHEMES_WITH_COLORS,
};

pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_account(&self, username: &str, password_hash: &str) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_insert(e, format!("user '{}'", username)))?;
        Ok(())
    }

    async fn find_password_hash(&self, username: &str) -> Result<String, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        user.map(|u| u.password_hash)
            .ok_or_else(|| DatabaseError::NotFound(format!("user '{}'", username)))
    }
}

pub struct PgSchemeStore {
    pool: PgPool,
}

impl PgSchemeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert the whole color map with one statement by unnesting parallel arrays
async fn insert_colors(
    tx: &mut Transaction<'_, Postgres>,
    scheme_id: &str,
    colors: &BTreeMap<String, String>,
) -> Result<(), sqlx::Error> {
    if colors.is_empty() {
        return Ok(());
    }

    let (keys, values): (Vec<String>, Vec<String>) =
        colors.iter().map(|(k, v)| (k.clone(), v.clone())).unzip();

    sqlx::query(
        r#"
        INSERT INTO color_scheme_colors (scheme_id, color_key, color_value)
        SELECT $1, k, v FROM UNNEST($2::text[], $3::text[]) AS t (k, v)
        "#,
    )
    .bind(scheme_id)
    .bind(keys)
    .bind(values)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl SchemeStore for PgSchemeStore {
    async fn create(&self, scheme: &ColorScheme) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO color_schemes (id, name, author, category) VALUES ($1, $2, $3, $4)")
            .bind(&scheme.id)
            .bind(&scheme.name)
            .bind(&scheme.author)
            .bind(&scheme.category)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from_insert(e, format!("color scheme '{}'", scheme.id)))?;

        insert_colors(&mut tx, &scheme.id, &scheme.colors).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<ColorScheme, DatabaseError> {
        let sql = format!("{} WHERE s.id = $1", SELECT_SCHEMES_WITH_COLORS);
        let rows = sqlx::query_as::<_, SchemeColorRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        fold_scheme_rows(rows)
            .into_iter()
            .next()
            .ok_or_else(|| scheme_not_found(id))
    }

    async fn list_by_author(&self, author: &str) -> Result<Vec<ColorScheme>, DatabaseError> {
        let sql = format!("{} WHERE s.author = $1 ORDER BY s.id", SELECT_SCHEMES_WITH_COLORS);
        let rows = sqlx::query_as::<_, SchemeColorRow>(&sql)
            .bind(author)
            .fetch_all(&self.pool)
            .await?;

        Ok(fold_scheme_rows(rows))
    }

    async fn update(&self, scheme: &ColorScheme, owner: &str) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE color_schemes SET name = $1, category = $2 WHERE id = $3 AND author = $4")
            .bind(&scheme.name)
            .bind(&scheme.category)
            .bind(&scheme.id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // dropping tx rolls back
            return Err(scheme_not_found(&scheme.id));
        }

        sqlx::query("DELETE FROM color_scheme_colors WHERE scheme_id = $1")
            .bind(&scheme.id)
            .execute(&mut *tx)
            .await?;

        insert_colors(&mut tx, &scheme.id, &scheme.colors).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: &str, owner: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM color_schemes WHERE id = $1 AND author = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(scheme_not_found(id));
        }
        Ok(())
    }
}
