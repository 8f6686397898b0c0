use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::BTreeMap;

use crate::database::manager::DatabaseError;
use crate::database::models::{fold_scheme_rows, ColorScheme, SchemeColorRow, User};
use crate::database::repository::{
    scheme_not_found, CredentialStore, SchemeStore, SELECT_SCHEMES_WITH_COLORS,
};

pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create_account(&self, username: &str, password_hash: &str) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_insert(e, format!("user '{}'", username)))?;
        Ok(())
    }

    async fn find_password_hash(&self, username: &str) -> Result<String, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        user.map(|u| u.password_hash)
            .ok_or_else(|| DatabaseError::NotFound(format!("user '{}'", username)))
    }
}

pub struct SqliteSchemeStore {
    pool: SqlitePool,
}

impl SqliteSchemeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert_colors(
    tx: &mut Transaction<'_, Sqlite>,
    scheme_id: &str,
    colors: &BTreeMap<String, String>,
) -> Result<(), sqlx::Error> {
    for (key, value) in colors {
        sqlx::query("INSERT INTO color_scheme_colors (scheme_id, color_key, color_value) VALUES (?, ?, ?)")
            .bind(scheme_id)
            .bind(key)
            .bind(value)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl SchemeStore for SqliteSchemeStore {
    async fn create(&self, scheme: &ColorScheme) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO color_schemes (id, name, author, category) VALUES (?, ?, ?, ?)")
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
        let sql = format!("{} WHERE s.id = ?", SELECT_SCHEMES_WITH_COLORS);
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
        let sql = format!("{} WHERE s.author = ? ORDER BY s.id", SELECT_SCHEMES_WITH_COLORS);
        let rows = sqlx::query_as::<_, SchemeColorRow>(&sql)
            .bind(author)
            .fetch_all(&self.pool)
            .await?;

        Ok(fold_scheme_rows(rows))
    }

    async fn update(&self, scheme: &ColorScheme, owner: &str) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE color_schemes SET name = ?, category = ? WHERE id = ? AND author = ?")
            .bind(&scheme.name)
            .bind(&scheme.category)
            .bind(&scheme.id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(scheme_not_found(&scheme.id));
        }

        sqlx::query("DELETE FROM color_scheme_colors WHERE scheme_id = ?")
            .bind(&scheme.id)
            .execute(&mut *tx)
            .await?;

        insert_colors(&mut tx, &scheme.id, &scheme.colors).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: &str, owner: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM color_schemes WHERE id = ? AND author = ?")
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn scheme(id: &str, author: &str, colors: &[(&str, &str)]) -> ColorScheme {
        ColorScheme {
            id: id.to_string(),
            name: "n".to_string(),
            author: author.to_string(),
            category: "c".to_string(),
            colors: colors.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    async fn stores() -> (Database, SqliteSchemeStore, SqliteCredentialStore) {
        let db = Database::in_memory().await.unwrap();
        let pool = match &db {
            Database::Sqlite(pool) => pool.clone(),
            Database::Postgres(_) => unreachable!("in-memory database is always SQLite"),
        };
        (db, SqliteSchemeStore::new(pool.clone()), SqliteCredentialStore::new(pool))
    }

    async fn color_row_count(db: &Database, scheme_id: &str) -> i64 {
        let Database::Sqlite(pool) = db else { unreachable!() };
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM color_scheme_colors WHERE scheme_id = ?")
            .bind(scheme_id)
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_db, store, _) = stores().await;
        let original = scheme("x", "a", &[("bg", "#000"), ("fg", "#fff")]);

        store.create(&original).await.unwrap();
        let loaded = store.get_by_id("x").await.unwrap();

        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_db, store, _) = stores().await;
        assert!(matches!(store.get_by_id("nope").await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn scheme_without_colors_is_found_with_empty_map() {
        let (_db, store, _) = stores().await;
        store.create(&scheme("bare", "a", &[])).await.unwrap();

        let loaded = store.get_by_id("bare").await.unwrap();
        assert!(loaded.colors.is_empty());
    }

    #[tokio::test]
    async fn list_by_author_returns_only_their_schemes() {
        let (_db, store, _) = stores().await;
        store.create(&scheme("a1", "a", &[("bg", "#000")])).await.unwrap();
        store.create(&scheme("a2", "a", &[("bg", "#111"), ("fg", "#eee")])).await.unwrap();
        store.create(&scheme("b1", "b", &[("bg", "#222")])).await.unwrap();

        let mut listed = store.list_by_author("a").await.unwrap();
        listed.sort_by(|l, r| l.id.cmp(&r.id));

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "a1");
        assert_eq!(listed[0].colors.len(), 1);
        assert_eq!(listed[1].id, "a2");
        assert_eq!(listed[1].colors.len(), 2);
    }

    #[tokio::test]
    async fn list_for_author_without_schemes_is_empty() {
        let (_db, store, _) = stores().await;
        assert!(store.list_by_author("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_color_map() {
        let (_db, store, _) = stores().await;
        store.create(&scheme("x", "a", &[("bg", "#000")])).await.unwrap();

        let mut replacement = scheme("x", "a", &[("fg", "#fff")]);
        replacement.name = "renamed".to_string();
        store.update(&replacement, "a").await.unwrap();

        let loaded = store.get_by_id("x").await.unwrap();
        assert_eq!(loaded.name, "renamed");
        assert_eq!(loaded.colors.len(), 1);
        assert_eq!(loaded.colors.get("fg").map(String::as_str), Some("#fff"));
        assert!(!loaded.colors.contains_key("bg"));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_writes_nothing() {
        let (db, store, _) = stores().await;
        let result = store.update(&scheme("ghost", "a", &[("bg", "#000")]), "a").await;

        assert!(matches!(result, Err(DatabaseError::NotFound(_))));
        assert_eq!(color_row_count(&db, "ghost").await, 0);
    }

    #[tokio::test]
    async fn delete_cascades_to_colors() {
        let (db, store, _) = stores().await;
        store.create(&scheme("x", "a", &[("bg", "#000"), ("fg", "#fff")])).await.unwrap();
        assert_eq!(color_row_count(&db, "x").await, 2);

        store.delete("x", "a").await.unwrap();

        assert!(matches!(store.get_by_id("x").await, Err(DatabaseError::NotFound(_))));
        assert_eq!(color_row_count(&db, "x").await, 0);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (_db, store, _) = stores().await;
        assert!(matches!(store.delete("nope", "a").await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_by_other_author_is_not_found_and_changes_nothing() {
        let (db, store, _) = stores().await;
        store.create(&scheme("x", "a", &[("bg", "#000")])).await.unwrap();

        let result = store.update(&scheme("x", "b", &[("fg", "#fff")]), "b").await;
        assert!(matches!(result, Err(DatabaseError::NotFound(_))));

        let loaded = store.get_by_id("x").await.unwrap();
        assert_eq!(loaded, scheme("x", "a", &[("bg", "#000")]));
        assert_eq!(color_row_count(&db, "x").await, 1);
    }

    #[tokio::test]
    async fn delete_by_other_author_is_not_found() {
        let (_db, store, _) = stores().await;
        store.create(&scheme("x", "a", &[("bg", "#000")])).await.unwrap();

        assert!(matches!(store.delete("x", "b").await, Err(DatabaseError::NotFound(_))));
        assert_eq!(store.get_by_id("x").await.unwrap().author, "a");
    }

    #[tokio::test]
    async fn stale_owner_cannot_touch_recreated_id() {
        let (_db, store, _) = stores().await;
        store.create(&scheme("x", "a", &[("bg", "#000")])).await.unwrap();

        // "x" changes hands after "a" last saw it
        store.delete("x", "a").await.unwrap();
        store.create(&scheme("x", "b", &[("fg", "#fff")])).await.unwrap();

        let mut stale = scheme("x", "a", &[]);
        stale.name = "overwritten".to_string();
        assert!(matches!(store.update(&stale, "a").await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(store.delete("x", "a").await, Err(DatabaseError::NotFound(_))));

        assert_eq!(store.get_by_id("x").await.unwrap(), scheme("x", "b", &[("fg", "#fff")]));
    }

    #[tokio::test]
    async fn duplicate_scheme_id_rolls_back() {
        let (db, store, _) = stores().await;
        store.create(&scheme("x", "a", &[("bg", "#000")])).await.unwrap();

        let result = store.create(&scheme("x", "b", &[("fg", "#fff")])).await;
        assert!(matches!(result, Err(DatabaseError::Duplicate(_))));

        let loaded = store.get_by_id("x").await.unwrap();
        assert_eq!(loaded.author, "a");
        assert_eq!(color_row_count(&db, "x").await, 1);
    }

    #[tokio::test]
    async fn credentials_reject_duplicate_username() {
        let (_db, _, users) = stores().await;
        users.create_account("alice", "$argon2id$hash").await.unwrap();

        let again = users.create_account("alice", "$argon2id$other").await;
        assert!(matches!(again, Err(DatabaseError::Duplicate(_))));
        assert_eq!(users.find_password_hash("alice").await.unwrap(), "$argon2id$hash");
    }

    #[tokio::test]
    async fn unknown_user_has_no_hash() {
        let (_db, _, users) = stores().await;
        assert!(matches!(users.find_password_hash("bob").await, Err(DatabaseError::NotFound(_))));
    }
}
