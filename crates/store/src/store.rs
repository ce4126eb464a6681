//! Record store trait and the SQLite implementation.

use crate::error::{StoreError, StoreResult};
use crate::models::{FeedbackRow, PreferenceRow, RecipeRow};
use crate::repos::{FeedbackRepo, PreferenceRepo, RecipeRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined record store trait.
#[async_trait]
pub trait RecordStore: PreferenceRepo + RecipeRepo + FeedbackRepo + Send + Sync {
    /// Apply the embedded schema (idempotent).
    async fn migrate(&self) -> StoreResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> StoreResult<()>;
}

/// SQLite schema (embedded).
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    user_id     TEXT PRIMARY KEY,
    cuisines    TEXT NOT NULL,
    allergies   TEXT NOT NULL,
    budget_week REAL NOT NULL,
    spicy       INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recipes (
    id              BLOB PRIMARY KEY,
    name            TEXT NOT NULL,
    cuisine         TEXT NOT NULL,
    prep_minutes    INTEGER NOT NULL,
    calories        INTEGER NOT NULL,
    ingredients     TEXT NOT NULL,
    cost            REAL NOT NULL,
    shelf_life_days INTEGER NOT NULL,
    tags            TEXT NOT NULL,
    nutrition       TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recipes_cuisine ON recipes (cuisine);

CREATE TABLE IF NOT EXISTS feedback (
    user_id          TEXT NOT NULL,
    dish_id          TEXT NOT NULL,
    cooked_at        TEXT NOT NULL,
    rating           INTEGER NOT NULL,
    skipped          INTEGER NOT NULL,
    substituted_with TEXT NOT NULL,
    comment          TEXT NOT NULL,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    PRIMARY KEY (user_id, dish_id, cooked_at)
);
"#;

/// SQLite-based record store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    #[allow(dead_code)] // Reserved for a future timeout wrapper
    query_timeout_secs: u64,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(path: impl AsRef<Path>, query_timeout_secs: Option<u64>) -> StoreResult<Self> {
        let path = path.as_ref();
        let query_timeout_secs = query_timeout_secs.unwrap_or(600);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Config(format!("create database directory: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under concurrent batches.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self {
            pool,
            query_timeout_secs,
        };
        store.migrate().await?;

        tracing::warn!(
            query_timeout_secs = query_timeout_secs,
            "SQLite query timeout is advisory only - long queries may exceed it. \
             For production deployments use PostgreSQL; SQLite is recommended for \
             testing and single-node deployments only."
        );

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use spiceroute_core::{
        FeedbackEntry, MAX_RECIPE_LIST_RESULTS, Preference, Recipe, RecipeId, RecipeQuery,
    };
    use time::OffsetDateTime;

    const RECIPE_COLUMNS: &str = "id, name, cuisine, prep_minutes, calories, ingredients, cost, \
                                  shelf_life_days, tags, nutrition, created_at";

    #[async_trait]
    impl PreferenceRepo for SqliteStore {
        async fn upsert_preference(&self, pref: &Preference) -> StoreResult<Preference> {
            let row = PreferenceRow::from_record(pref, OffsetDateTime::now_utc())?;
            // Upsert and read-back share one transaction so the returned
            // profile is this call's persisted state, not a concurrent
            // writer's.
            let mut tx = self.pool.begin().await?;
            sqlx::query(
                r#"
                INSERT INTO preferences (user_id, cuisines, allergies, budget_week, spicy, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(user_id) DO UPDATE SET
                    cuisines = excluded.cuisines,
                    allergies = excluded.allergies,
                    budget_week = excluded.budget_week,
                    spicy = excluded.spicy,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&row.user_id)
            .bind(&row.cuisines)
            .bind(&row.allergies)
            .bind(row.budget_week)
            .bind(row.spicy)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&mut *tx)
            .await?;

            // Round-trip through the store rather than echoing the input.
            let stored: Option<PreferenceRow> = sqlx::query_as(
                "SELECT user_id, cuisines, allergies, budget_week, spicy, created_at, updated_at \
                 FROM preferences WHERE user_id = ?",
            )
            .bind(&row.user_id)
            .fetch_optional(&mut *tx)
            .await?;
            tx.commit().await?;

            stored
                .map(PreferenceRow::into_record)
                .transpose()?
                .ok_or_else(|| {
                    StoreError::Internal(format!(
                        "preference for '{}' missing after upsert",
                        pref.user_id
                    ))
                })
        }

        async fn get_preference(&self, user_id: &str) -> StoreResult<Option<Preference>> {
            let row: Option<PreferenceRow> = sqlx::query_as(
                "SELECT user_id, cuisines, allergies, budget_week, spicy, created_at, updated_at \
                 FROM preferences WHERE user_id = ?",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            row.map(PreferenceRow::into_record).transpose()
        }
    }

    #[async_trait]
    impl RecipeRepo for SqliteStore {
        async fn create_recipe(&self, recipe: &Recipe) -> StoreResult<RecipeId> {
            let id = RecipeId::new();
            let row = RecipeRow::from_record(id, recipe, OffsetDateTime::now_utc())?;
            let insert_sql = format!(
                "INSERT INTO recipes ({RECIPE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            );
            sqlx::query(&insert_sql)
                .bind(row.id)
                .bind(&row.name)
                .bind(&row.cuisine)
                .bind(row.prep_minutes)
                .bind(row.calories)
                .bind(&row.ingredients)
                .bind(row.cost)
                .bind(row.shelf_life_days)
                .bind(&row.tags)
                .bind(&row.nutrition)
                .bind(row.created_at)
                .execute(&self.pool)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        StoreError::Conflict(format!("recipe id {id} already exists"))
                    }
                    _ => StoreError::from(e),
                })?;
            Ok(id)
        }

        async fn list_recipes(&self, query: &RecipeQuery) -> StoreResult<Vec<Recipe>> {
            // The spicy flag filters nothing: no recipe column encodes spiciness.
            let rows: Vec<RecipeRow> = if query.cuisines.is_empty() {
                let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes LIMIT ?");
                sqlx::query_as(&sql)
                    .bind(i64::from(MAX_RECIPE_LIST_RESULTS))
                    .fetch_all(&self.pool)
                    .await?
            } else {
                // SQLite cannot bind a list; expand one placeholder per label.
                let placeholders = vec!["?"; query.cuisines.len()].join(", ");
                let sql = format!(
                    "SELECT {RECIPE_COLUMNS} FROM recipes WHERE cuisine IN ({placeholders}) LIMIT ?"
                );
                let mut q = sqlx::query_as(&sql);
                for cuisine in &query.cuisines {
                    q = q.bind(cuisine);
                }
                q.bind(i64::from(MAX_RECIPE_LIST_RESULTS))
                    .fetch_all(&self.pool)
                    .await?
            };
            rows.into_iter().map(RecipeRow::into_record).collect()
        }
    }

    async fn apply_feedback_entry(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        entry: &FeedbackEntry,
        now: OffsetDateTime,
    ) -> StoreResult<()> {
        let row = FeedbackRow::from_entry(entry, now)?;
        sqlx::query(
            r#"
            INSERT INTO feedback (user_id, dish_id, cooked_at, rating, skipped, substituted_with, comment, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, dish_id, cooked_at) DO UPDATE SET
                rating = excluded.rating,
                skipped = excluded.skipped,
                substituted_with = excluded.substituted_with,
                comment = excluded.comment,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&row.user_id)
        .bind(&row.dish_id)
        .bind(row.cooked_at)
        .bind(row.rating)
        .bind(row.skipped)
        .bind(&row.substituted_with)
        .bind(&row.comment)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    #[async_trait]
    impl FeedbackRepo for SqliteStore {
        async fn submit_feedback(&self, entries: &[FeedbackEntry]) -> StoreResult<()> {
            let now = OffsetDateTime::now_utc();
            // One transaction scopes the whole batch: every entry is durably
            // applied or none are. Dropping the transaction (e.g. the caller
            // cancelling mid-batch) also rolls it back.
            let mut tx = self.pool.begin().await?;

            for (position, entry) in entries.iter().enumerate() {
                if let Err(source) = apply_feedback_entry(&mut tx, entry, now).await {
                    // Best-effort: a failed rollback must not mask which
                    // entry broke the batch.
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::warn!(error = %rollback_err, "feedback batch rollback failed");
                    }
                    tracing::debug!(position, "feedback batch rolled back");
                    return Err(StoreError::BatchEntry {
                        position,
                        source: Box::new(source),
                    });
                }
            }

            tx.commit().await?;
            Ok(())
        }
    }
}
