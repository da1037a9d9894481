use std::{
    io::{self, Write},
    iter,
};

use anyhow::Context;
use clap::Parser;
use pdrdb_cli::{Args, ResultFormatter, ScriptExecutor, SqlExecutor, SqlSource};
use pdrdb_core::{input::STDIN_PATH, ConnectionConfig, FileConfig, SqlInput, Statement};
use tracing::{debug, info, warn};

type Statements = Box<dyn Iterator<Item = io::Result<Statement>>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.log_config().init();

    // Load configuration from ~/.pdrdbrc
    let file_config = FileConfig::load().unwrap_or_else(|e| {
        warn!("could not load config file: {}", e);
        FileConfig::default()
    });

    // Use command-line format if provided, otherwise use config default
    let format = match args.output_format() {
        Some(format) => format,
        None => file_config.output_format()?.unwrap_or_default(),
    };

    let config = ConnectionConfig::resolve(args.connection_flags(), &file_config)?;
    debug!("resolved connection settings: {:?}", config);

    // Open the input before connecting
    let statements = open_statements(&args.source(), &config)?;

    let executor = SqlExecutor::connect(&config).await?;
    let formatter = ResultFormatter::with_format(format);
    let mut script = ScriptExecutor::new(executor, formatter, io::stdout().lock());
    let executed = script.execute_statements(statements).await?;
    let mut stdout = script.finish().await?;
    stdout.flush()?;

    info!("{} statements executed", executed);
    Ok(())
}

fn open_statements(source: &SqlSource, config: &ConnectionConfig) -> anyhow::Result<Statements> {
    let statements: Statements = match source {
        SqlSource::Command(sql) => Box::new(iter::once(Ok(Statement::new(sql.as_str())))),
        SqlSource::UserTables => {
            Box::new(iter::once(Ok(Statement::new(config.rdbms.user_tables_sql()))))
        }
        SqlSource::UserViews => {
            Box::new(iter::once(Ok(Statement::new(config.rdbms.user_views_sql()))))
        }
        SqlSource::Path(path) => {
            if path == STDIN_PATH && is_stdin_terminal() {
                info!("reading SQL from the terminal; finish with Ctrl-D");
            }
            let input = SqlInput::open(path)
                .with_context(|| format!("failed to read SQL from '{}'", path))?;
            Box::new(input.statements())
        }
    };
    Ok(statements)
}

fn is_stdin_terminal() -> bool {
    atty::is(atty::Stream::Stdin)
}
