use oracle::Connection;
use pdrdb_core::Credentials;
use tracing::debug;

use super::QueryResult;
use crate::error::CliError;

pub(super) fn connect(credentials: &Credentials) -> Result<Connection, CliError> {
    let user = credentials.require_user()?;
    let dsn = credentials.require_dsn()?;
    let password = credentials.password.as_deref().unwrap_or_default();

    let mut conn = Connection::connect(user, password, dsn)?;
    conn.set_autocommit(true);
    debug!("oracle session opened for {}", user);
    Ok(conn)
}

pub(super) fn execute(conn: &Connection, sql: &str) -> Result<QueryResult, CliError> {
    let mut stmt = conn.statement(sql).build()?;

    if !stmt.is_query() {
        stmt.execute(&[])?;
        return Ok(QueryResult { rows_affected: stmt.row_count()?, ..Default::default() });
    }

    let result_set = stmt.query(&[])?;
    let columns: Vec<String> =
        result_set.column_info().iter().map(|col| col.name().to_string()).collect();

    let mut rows = Vec::new();
    for row in result_set {
        let row = row?;
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            let value: Option<String> = row.get(index)?;
            values.push(value);
        }
        rows.push(values);
    }

    Ok(QueryResult { columns, rows, ..Default::default() })
}
