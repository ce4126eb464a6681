//! Record store abstraction and implementations for SpiceRoute.
//!
//! This crate provides the durable data model behind the preference,
//! recipe, and feedback services:
//! - User preference profiles (one row per user, full-replace upsert)
//! - Recipes with store-assigned identity and filtered listing
//! - Post-meal feedback keyed by (user, dish, cooked-at), ingested in
//!   atomic batches

pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use postgres::PostgresStore;
pub use store::{RecordStore, SqliteStore};

use spiceroute_core::config::StoreConfig;
use std::sync::Arc;

/// Create a record store from configuration.
pub async fn from_config(config: &StoreConfig) -> StoreResult<Arc<dyn RecordStore>> {
    match config {
        StoreConfig::Sqlite {
            path,
            query_timeout_secs,
        } => {
            let store = SqliteStore::new(path, *query_timeout_secs).await?;
            Ok(Arc::new(store) as Arc<dyn RecordStore>)
        }
        StoreConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
        } => {
            let store = if let Some(url) = url {
                // URL takes precedence when both forms are provided
                tracing::info!("Connecting to PostgreSQL using connection URL");
                PostgresStore::from_url(url, *max_connections, *statement_timeout_ms).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *ssl_mode,
                    *max_connections,
                    *statement_timeout_ms,
                )
                .await?
            } else {
                return Err(StoreError::Config(
                    "postgres backend requires either 'url' or both 'host' and 'database'"
                        .to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn RecordStore>)
        }
    }
}
