//! PostgreSQL-based record store implementation.

use crate::error::{StoreError, StoreResult};
use crate::models::{FeedbackRow, PreferenceRow, RecipeRow};
use crate::repos::{FeedbackRepo, PreferenceRepo, RecipeRepo};
use crate::store::RecordStore;
use async_trait::async_trait;
use spiceroute_core::config::PgSslMode;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    user_id     TEXT PRIMARY KEY,
    cuisines    TEXT NOT NULL,
    allergies   TEXT NOT NULL,
    budget_week DOUBLE PRECISION NOT NULL,
    spicy       BOOLEAN NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS recipes (
    id              UUID PRIMARY KEY,
    name            TEXT NOT NULL,
    cuisine         TEXT NOT NULL,
    prep_minutes    INTEGER NOT NULL,
    calories        INTEGER NOT NULL,
    ingredients     TEXT NOT NULL,
    cost            DOUBLE PRECISION NOT NULL,
    shelf_life_days INTEGER NOT NULL,
    tags            TEXT NOT NULL,
    nutrition       TEXT NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recipes_cuisine ON recipes (cuisine);

CREATE TABLE IF NOT EXISTS feedback (
    user_id          TEXT NOT NULL,
    dish_id          TEXT NOT NULL,
    cooked_at        TIMESTAMPTZ NOT NULL,
    rating           INTEGER NOT NULL,
    skipped          BOOLEAN NOT NULL,
    substituted_with TEXT NOT NULL,
    comment          TEXT NOT NULL,
    created_at       TIMESTAMPTZ NOT NULL,
    updated_at       TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (user_id, dish_id, cooked_at)
);
"#;

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based record store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    ///
    /// This allows credentials to be passed separately, enabling better
    /// secret management (e.g., passwords via environment variables).
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL with individual parameters"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Internal: Connect to PostgreSQL with the given options.
    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        // Let the server cancel hung statements instead of holding a
        // batch transaction open indefinitely.
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn migrate(&self) -> StoreResult<()> {
        // PostgreSQL doesn't allow multiple statements in a single prepared
        // statement, so the schema is executed statement by statement.
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

mod postgres_impl {
    use super::*;
    use spiceroute_core::{
        FeedbackEntry, MAX_RECIPE_LIST_RESULTS, Preference, Recipe, RecipeId, RecipeQuery,
    };
    use time::OffsetDateTime;

    const RECIPE_COLUMNS: &str = "id, name, cuisine, prep_minutes, calories, ingredients, cost, \
                                  shelf_life_days, tags, nutrition, created_at";

    #[async_trait]
    impl PreferenceRepo for PostgresStore {
        async fn upsert_preference(&self, pref: &Preference) -> StoreResult<Preference> {
            let row = PreferenceRow::from_record(pref, OffsetDateTime::now_utc())?;
            // Upsert and read-back share one transaction so the returned
            // profile is this call's persisted state, not a concurrent
            // writer's.
            let mut tx = self.pool.begin().await?;
            sqlx::query(
                r#"
                INSERT INTO preferences (user_id, cuisines, allergies, budget_week, spicy, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT(user_id) DO UPDATE SET
                    cuisines = EXCLUDED.cuisines,
                    allergies = EXCLUDED.allergies,
                    budget_week = EXCLUDED.budget_week,
                    spicy = EXCLUDED.spicy,
                    updated_at = EXCLUDED.updated_at
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

            let stored: Option<PreferenceRow> = sqlx::query_as(
                "SELECT user_id, cuisines, allergies, budget_week, spicy, created_at, updated_at \
                 FROM preferences WHERE user_id = $1",
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
                 FROM preferences WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            row.map(PreferenceRow::into_record).transpose()
        }
    }

    #[async_trait]
    impl RecipeRepo for PostgresStore {
        async fn create_recipe(&self, recipe: &Recipe) -> StoreResult<RecipeId> {
            let id = RecipeId::new();
            let row = RecipeRow::from_record(id, recipe, OffsetDateTime::now_utc())?;
            let insert_sql = format!(
                "INSERT INTO recipes ({RECIPE_COLUMNS}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
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
                let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes LIMIT $1");
                sqlx::query_as(&sql)
                    .bind(i64::from(MAX_RECIPE_LIST_RESULTS))
                    .fetch_all(&self.pool)
                    .await?
            } else {
                let sql = format!(
                    "SELECT {RECIPE_COLUMNS} FROM recipes WHERE cuisine = ANY($1) LIMIT $2"
                );
                sqlx::query_as(&sql)
                    .bind(&query.cuisines)
                    .bind(i64::from(MAX_RECIPE_LIST_RESULTS))
                    .fetch_all(&self.pool)
                    .await?
            };
            rows.into_iter().map(RecipeRow::into_record).collect()
        }
    }

    async fn apply_feedback_entry(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        entry: &FeedbackEntry,
        now: OffsetDateTime,
    ) -> StoreResult<()> {
        let row = FeedbackRow::from_entry(entry, now)?;
        sqlx::query(
            r#"
            INSERT INTO feedback (user_id, dish_id, cooked_at, rating, skipped, substituted_with, comment, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(user_id, dish_id, cooked_at) DO UPDATE SET
                rating = EXCLUDED.rating,
                skipped = EXCLUDED.skipped,
                substituted_with = EXCLUDED.substituted_with,
                comment = EXCLUDED.comment,
                updated_at = EXCLUDED.updated_at
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
    impl FeedbackRepo for PostgresStore {
        async fn submit_feedback(&self, entries: &[FeedbackEntry]) -> StoreResult<()> {
            let now = OffsetDateTime::now_utc();
            // One transaction scopes the whole batch; dropping it (e.g. on
            // caller cancellation) rolls it back.
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
