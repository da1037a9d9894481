use std::{
    str::FromStr,
    time::{Duration, Instant},
};

use pdrdb_core::{ConnectionConfig, Rdbms};
use sqlx::{
    mysql::{MySql, MySqlConnectOptions, MySqlConnection},
    postgres::{PgConnectOptions, PgConnection, Postgres},
    sqlite::{Sqlite, SqliteConnectOptions, SqliteConnection},
    ConnectOptions, Connection,
};
use tracing::{debug, info};

use crate::error::CliError;

const SQLITE_MEMORY: &str = ":memory:";

// Submodules
#[cfg(feature = "oracle")]
mod oracle_backend;
mod rows;

/// Result of one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    /// Row values as text; `None` is SQL NULL
    pub rows: Vec<Vec<Option<String>>>,
    pub rows_affected: u64,
    pub elapsed: Duration,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// False for statements without a result set (DDL, plain DML).
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }
}

enum Backend {
    Postgres(PgConnection),
    MySql(MySqlConnection),
    Sqlite(SqliteConnection),
    #[cfg(feature = "oracle")]
    Oracle(oracle::Connection),
}

/// A single database connection, reused for every statement of an invocation.
pub struct SqlExecutor {
    backend: Backend,
}

impl SqlExecutor {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, CliError> {
        config.validate()?;
        let rdbms = config.rdbms;
        let credentials = &config.credentials;

        let backend = match rdbms {
            Rdbms::Postgresql => {
                let url = rdbms.connection_url(credentials)?;
                let options = PgConnectOptions::from_str(&url)?.disable_statement_logging();
                Backend::Postgres(options.connect().await?)
            }
            Rdbms::Mysql => {
                let url = rdbms.connection_url(credentials)?;
                let options = MySqlConnectOptions::from_str(&url)?.disable_statement_logging();
                Backend::MySql(options.connect().await?)
            }
            Rdbms::Sqlite => {
                let options = sqlite_options(credentials.require_dsn()?)?;
                Backend::Sqlite(options.disable_statement_logging().connect().await?)
            }
            #[cfg(feature = "oracle")]
            Rdbms::Oracle => Backend::Oracle(oracle_backend::connect(credentials)?),
            #[cfg(not(feature = "oracle"))]
            Rdbms::Oracle => {
                return Err(CliError::NotImplemented(
                    "Oracle support requires building with the `oracle` feature".to_string(),
                ))
            }
        };

        info!("connected to {} at {}", rdbms, credentials.dsn.as_deref().unwrap_or_default());
        Ok(SqlExecutor { backend })
    }

    pub async fn execute(&mut self, sql: &str) -> Result<QueryResult, CliError> {
        let start = Instant::now();

        let mut result = match &mut self.backend {
            Backend::Postgres(conn) => rows::fetch::<Postgres, _>(conn, sql).await?,
            Backend::MySql(conn) => rows::fetch::<MySql, _>(conn, sql).await?,
            Backend::Sqlite(conn) => rows::fetch::<Sqlite, _>(conn, sql).await?,
            #[cfg(feature = "oracle")]
            Backend::Oracle(conn) => oracle_backend::execute(conn, sql)?,
        };

        result.elapsed = start.elapsed();
        debug!(
            "{} rows, {} affected in {:.3}s",
            result.row_count(),
            result.rows_affected,
            result.elapsed.as_secs_f64()
        );
        Ok(result)
    }

    /// Close the connection gracefully.
    pub async fn close(self) -> Result<(), CliError> {
        match self.backend {
            Backend::Postgres(conn) => conn.close().await?,
            Backend::MySql(conn) => conn.close().await?,
            Backend::Sqlite(conn) => conn.close().await?,
            #[cfg(feature = "oracle")]
            Backend::Oracle(conn) => conn.close()?,
        }
        debug!("connection closed");
        Ok(())
    }
}

/// The dsn is a file path taken verbatim; only `:memory:` is special.
fn sqlite_options(dsn: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    if dsn == SQLITE_MEMORY {
        return SqliteConnectOptions::from_str("sqlite::memory:");
    }
    Ok(SqliteConnectOptions::new().filename(dsn).create_if_missing(true))
}

#[cfg(test)]
mod tests {
    use pdrdb_core::Credentials;

    use super::*;

    fn sqlite_memory() -> ConnectionConfig {
        ConnectionConfig {
            rdbms: Rdbms::Sqlite,
            credentials: Credentials { dsn: Some(":memory:".to_string()), ..Default::default() },
        }
    }

    #[tokio::test]
    async fn test_select_values_as_text() {
        let mut executor = SqlExecutor::connect(&sqlite_memory()).await.unwrap();
        let result =
            executor.execute("SELECT 1 AS n, 'a' AS s, NULL AS z, 2.5 AS f").await.unwrap();

        assert_eq!(result.columns, vec!["n", "s", "z", "f"]);
        assert_eq!(
            result.rows,
            vec![vec![Some("1".to_string()), Some("a".to_string()), None, Some("2.5".to_string())]]
        );
        executor.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_dml_reports_rows_affected() {
        let mut executor = SqlExecutor::connect(&sqlite_memory()).await.unwrap();
        executor.execute("CREATE TABLE t (id INTEGER, name TEXT)").await.unwrap();

        let result =
            executor.execute("INSERT INTO t VALUES (1, 'Alice'), (2, 'Bob')").await.unwrap();
        assert!(!result.has_columns());
        assert_eq!(result.rows_affected, 2);

        let result = executor.execute("SELECT name FROM t ORDER BY id").await.unwrap();
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.rows[1], vec![Some("Bob".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_select_keeps_columns() {
        let mut executor = SqlExecutor::connect(&sqlite_memory()).await.unwrap();
        executor.execute("CREATE TABLE t (id INTEGER, name TEXT)").await.unwrap();

        let result = executor.execute("SELECT id, name FROM t").await.unwrap();
        assert_eq!(result.columns, vec!["id", "name"]);
        assert_eq!(result.row_count(), 0);
    }

    #[tokio::test]
    async fn test_blob_renders_as_hex() {
        let mut executor = SqlExecutor::connect(&sqlite_memory()).await.unwrap();
        let result = executor.execute("SELECT X'FF00' AS b").await.unwrap();
        assert_eq!(result.rows, vec![vec![Some("\\xff00".to_string())]]);
    }

    #[tokio::test]
    async fn test_sqlite_dsn_is_a_plain_file_path() {
        let dir = tempfile::TempDir::new().unwrap();

        for name in ["data%41.db", "report?v2.db"] {
            let path = dir.path().join(name);
            let config = ConnectionConfig {
                rdbms: Rdbms::Sqlite,
                credentials: Credentials {
                    dsn: Some(path.to_str().unwrap().to_string()),
                    ..Default::default()
                },
            };

            let mut executor = SqlExecutor::connect(&config).await.unwrap();
            executor.execute("CREATE TABLE t (id INTEGER)").await.unwrap();
            executor.close().await.unwrap();
            assert!(path.exists(), "{} should be created as named", name);
        }

        assert!(!dir.path().join("dataA.db").exists());
    }

    #[tokio::test]
    async fn test_bad_sql_is_an_error() {
        let mut executor = SqlExecutor::connect(&sqlite_memory()).await.unwrap();
        let err = executor.execute("SELEC 1").await.unwrap_err();
        assert!(matches!(err, CliError::Database(_)));
    }

    #[tokio::test]
    async fn test_missing_dsn_is_rejected_before_connecting() {
        let config = ConnectionConfig { rdbms: Rdbms::Sqlite, credentials: Credentials::default() };
        let err = SqlExecutor::connect(&config).await.err().unwrap();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[cfg(not(feature = "oracle"))]
    #[tokio::test]
    async fn test_oracle_without_feature_is_not_implemented() {
        let config = ConnectionConfig {
            rdbms: Rdbms::Oracle,
            credentials: Credentials {
                user: Some("scott".to_string()),
                dsn: Some("//localhost/XE".to_string()),
                ..Default::default()
            },
        };
        let err = SqlExecutor::connect(&config).await.err().unwrap();
        assert!(matches!(err, CliError::NotImplemented(_)));
    }
}
