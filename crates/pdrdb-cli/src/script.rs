use std::io::{self, Write};

use pdrdb_core::Statement;
use tracing::{debug, error, info, warn};

use crate::{error::CliError, executor::SqlExecutor, formatter::ResultFormatter};

/// Separator printed between the outputs of consecutive statements.
pub const RESULT_SEPARATOR: &str = "---";

/// Script executor - runs a sequence of statements against one connection
pub struct ScriptExecutor<W: Write> {
    executor: SqlExecutor,
    formatter: ResultFormatter,
    out: W,
    executed: usize,
    /// Set once any result has printed something
    wrote_output: bool,
}

impl<W: Write> ScriptExecutor<W> {
    pub fn new(executor: SqlExecutor, formatter: ResultFormatter, out: W) -> Self {
        ScriptExecutor { executor, formatter, out, executed: 0, wrote_output: false }
    }

    /// Number of statements executed so far.
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Execute statements in order as they are produced.
    ///
    /// Each statement runs to completion before the next one is pulled, so a
    /// lazy source is read only as far as execution has progressed. Blank
    /// statements are skipped. The first failure stops the run.
    pub async fn execute_statements<I>(&mut self, statements: I) -> Result<usize, CliError>
    where
        I: IntoIterator<Item = io::Result<Statement>>,
    {
        for (idx, statement) in statements.into_iter().enumerate() {
            let ordinal = idx + 1;
            let statement = match statement {
                Ok(statement) => statement,
                Err(e) => {
                    error!("statement {} failed: {}", ordinal, e);
                    return Err(e.into());
                }
            };

            if statement.is_blank() {
                warn!("skipping empty statement {}", ordinal);
                continue;
            }

            if let Err(e) = self.execute_statement(&statement).await {
                error!("statement {} failed: {}", ordinal, e);
                return Err(e);
            }
        }

        debug!("executed {} statements", self.executed);
        Ok(self.executed)
    }

    /// Execute one statement and print its result, if it has one to print.
    pub async fn execute_statement(&mut self, statement: &Statement) -> Result<(), CliError> {
        info!("sql: {}", statement);
        let result = self.executor.execute(statement.as_str()).await?;

        if self.formatter.writes_output(&result) {
            if self.wrote_output {
                writeln!(self.out, "{}", RESULT_SEPARATOR)?;
            }
            self.formatter.write_result(&mut self.out, &result)?;
            self.out.flush()?;
            self.wrote_output = true;
        }
        self.executed += 1;
        Ok(())
    }

    /// Close the connection and hand back the output sink.
    pub async fn finish(self) -> Result<W, CliError> {
        self.executor.close().await?;
        Ok(self.out)
    }
}
