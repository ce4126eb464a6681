//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SSL mode for PostgreSQL connections.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PgSslMode {
    Disable,
    Prefer,
    Require,
}

/// Record store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// SQLite database (recommended for testing and small deployments only).
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Query timeout in seconds. Advisory only: SQLite cannot
        /// force-cancel a running query the way PostgreSQL's
        /// statement_timeout does.
        #[serde(default = "default_sqlite_query_timeout_secs")]
        query_timeout_secs: Option<u64>,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL (optional if using individual fields).
        /// Takes precedence over individual fields if both are provided.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// WARNING: prefer an environment variable over storing in config.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// SSL mode for connections.
        ssl_mode: Option<PgSslMode>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
        /// Statement timeout in milliseconds (prevents hung queries).
        #[serde(default = "default_statement_timeout_ms")]
        statement_timeout_ms: Option<u64>,
    },
}

fn default_max_connections() -> u32 {
    10
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

fn default_statement_timeout_ms() -> Option<u64> {
    Some(30000)
}

fn default_sqlite_query_timeout_secs() -> Option<u64> {
    Some(600)
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite {
            path: PathBuf::from("data/spiceroute.db"),
            query_timeout_secs: default_sqlite_query_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_config_from_json() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"backend": "sqlite", "path": "/tmp/test.db"}"#).unwrap();
        match config {
            StoreConfig::Sqlite {
                path,
                query_timeout_secs,
            } => {
                assert_eq!(path, PathBuf::from("/tmp/test.db"));
                assert_eq!(query_timeout_secs, Some(600));
            }
            other => panic!("expected sqlite config, got {other:?}"),
        }
    }

    #[test]
    fn test_postgres_config_defaults() {
        let config: StoreConfig = serde_json::from_str(
            r#"{"backend": "postgres", "url": "postgres://localhost/spiceroute"}"#,
        )
        .unwrap();
        match config {
            StoreConfig::Postgres {
                max_connections,
                statement_timeout_ms,
                ..
            } => {
                assert_eq!(max_connections, 10);
                assert_eq!(statement_timeout_ms, Some(30000));
            }
            other => panic!("expected postgres config, got {other:?}"),
        }
    }
}
