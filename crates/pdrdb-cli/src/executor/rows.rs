//! Row fetching shared by the sqlx drivers.
//!
//! Statements run unprepared. PostgreSQL and MySQL then answer in their text
//! protocols, so every column decodes as a string whatever its SQL type.
//! SQLite converts numeric values to text on request. Values that are not
//! valid UTF-8 fall back to a `\x`-prefixed hex dump.

use futures_util::TryStreamExt;
use sqlx::{
    mysql::MySqlQueryResult, postgres::PgQueryResult, sqlite::SqliteQueryResult, ColumnIndex,
    Database, Decode, Either, Executor, Row,
};

use super::QueryResult;

/// Leading keywords of statements that produce a result set.
const ROW_RETURNING_KEYWORDS: &[&str] =
    &["SELECT", "WITH", "VALUES", "TABLE", "SHOW", "PRAGMA", "EXPLAIN", "DESCRIBE", "DESC"];

/// Driver query results expose their row counts through inherent methods only.
pub(super) trait RowsAffected {
    fn rows_affected(&self) -> u64;
}

impl RowsAffected for PgQueryResult {
    fn rows_affected(&self) -> u64 {
        PgQueryResult::rows_affected(self)
    }
}

impl RowsAffected for MySqlQueryResult {
    fn rows_affected(&self) -> u64 {
        MySqlQueryResult::rows_affected(self)
    }
}

impl RowsAffected for SqliteQueryResult {
    fn rows_affected(&self) -> u64 {
        SqliteQueryResult::rows_affected(self)
    }
}

pub(super) async fn fetch<DB, C>(conn: &mut C, sql: &str) -> Result<QueryResult, sqlx::Error>
where
    DB: Database,
    for<'c> &'c mut C: Executor<'c, Database = DB>,
    DB::QueryResult: RowsAffected,
    usize: ColumnIndex<DB::Row>,
    for<'r> String: Decode<'r, DB>,
    for<'r> Vec<u8>: Decode<'r, DB>,
{
    let mut result = QueryResult::default();

    {
        let mut stream = (&mut *conn).fetch_many(sql);
        while let Some(step) = stream.try_next().await? {
            match step {
                Either::Left(done) => result.rows_affected += done.rows_affected(),
                Either::Right(row) => {
                    if result.columns.is_empty() {
                        result.columns = column_names(row.columns());
                    }
                    result.rows.push(decode_row(&row)?);
                }
            }
        }
    }

    // Column names only arrive with rows; ask the server for them so empty
    // results still get a header.
    if result.rows.is_empty() && returns_rows(sql) {
        if let Ok(describe) = (&mut *conn).describe(sql).await {
            result.columns = column_names(describe.columns());
        }
    }

    Ok(result)
}

fn column_names<C: sqlx::Column>(columns: &[C]) -> Vec<String> {
    columns.iter().map(|column| column.name().to_string()).collect()
}

fn decode_row<R>(row: &R) -> Result<Vec<Option<String>>, sqlx::Error>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> String: Decode<'r, R::Database>,
    for<'r> Vec<u8>: Decode<'r, R::Database>,
{
    (0..row.len())
        .map(|index| match row.try_get_unchecked::<Option<String>, _>(index) {
            Ok(value) => Ok(value),
            Err(_) => row
                .try_get_unchecked::<Option<Vec<u8>>, _>(index)
                .map(|value| value.map(|bytes| format!("\\x{}", hex::encode(bytes)))),
        })
        .collect()
}

fn returns_rows(sql: &str) -> bool {
    let keyword = sql
        .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default()
        .to_uppercase();
    ROW_RETURNING_KEYWORDS.contains(&keyword.as_str())
}
