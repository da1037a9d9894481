use clap::{ArgGroup, Parser};
use pdrdb_core::{input::STDIN_PATH, ConnectionFlags, Credentials, OutputFormat};

use crate::logging::LogConfig;

#[derive(Parser, Debug)]
#[command(name = "pdrdb")]
#[command(version)]
#[command(about = "Execute SQL against PostgreSQL, MySQL, SQLite or Oracle")]
#[command(long_about = "pdrdb - command-line SQL executor

SQL is read from a file, from stdin, or from --sql-command, split into
statements at each `;` and executed in order over one connection. Results
are printed as a table (default), CSV or TSV, with a `---` line between the
results of consecutive statements.

ENVIRONMENT:
  PDRDB_RDBMS         Database kind when --rdbms is omitted
  PDRDB_DB_USER       Database user when --db-user is omitted
  PDRDB_DB_PASSWORD   Database password when --db-password is omitted
  PDRDB_DB_DSN        Data source name when --db-dsn is omitted

CONFIGURATION:
  Fallback settings can be kept in ~/.pdrdbrc (TOML format):
    [database]
    rdbms = \"postgresql\"
    user = \"app\"
    dsn = \"localhost:5432/app\"

    [display]
    format = \"table\"

EXAMPLES:
  # Run a script against PostgreSQL
  pdrdb --db-user app --db-dsn localhost/app schema.sql

  # Query a SQLite file as CSV
  pdrdb --rdbms sqlite --db-dsn data.db --csv -c \"SELECT * FROM users\"

  # List tables
  pdrdb --rdbms mysql --db-user root --db-dsn localhost/shop --user-tables")]
#[command(group(
    ArgGroup::new("source").args(["path", "sql_path", "sql_command", "user_tables", "user_views"])
))]
pub struct Args {
    /// SQL file to execute, `-` for stdin
    #[arg(value_name = "SQL_PATH")]
    pub path: Option<String>,

    /// SQL file to execute, `-` for stdin
    #[arg(long, value_name = "PATH")]
    pub sql_path: Option<String>,

    /// Execute one SQL statement and exit
    #[arg(short = 'c', long, value_name = "SQL")]
    pub sql_command: Option<String>,

    /// List the tables owned by the connected user
    #[arg(long)]
    pub user_tables: bool,

    /// List the views owned by the connected user
    #[arg(long)]
    pub user_views: bool,

    /// Database kind [default: postgresql]
    #[arg(
        long,
        value_name = "RDBMS",
        value_parser = ["postgresql", "postgres", "mysql", "sqlite", "oracle"],
        ignore_case = true
    )]
    pub rdbms: Option<String>,

    /// Database user
    #[arg(long, value_name = "USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, value_name = "PASSWORD")]
    pub db_password: Option<String>,

    /// Data source name (host[:port]/database, SQLite file, Oracle connect string)
    #[arg(long, value_name = "DSN")]
    pub db_dsn: Option<String>,

    /// Output results as CSV
    #[arg(long, conflicts_with = "tsv")]
    pub csv: bool,

    /// Output results as TSV
    #[arg(long)]
    pub tsv: bool,

    /// Log at debug level
    #[arg(long, conflicts_with = "info")]
    pub debug: bool,

    /// Log at info level
    #[arg(long)]
    pub info: bool,
}

/// Where the SQL of one invocation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlSource {
    /// File path, or `-` for stdin
    Path(String),
    /// A single literal statement
    Command(String),
    UserTables,
    UserViews,
}

impl Default for SqlSource {
    fn default() -> Self {
        SqlSource::Path(STDIN_PATH.to_string())
    }
}

impl Args {
    pub fn source(&self) -> SqlSource {
        if let Some(sql) = &self.sql_command {
            SqlSource::Command(sql.clone())
        } else if self.user_tables {
            SqlSource::UserTables
        } else if self.user_views {
            SqlSource::UserViews
        } else if let Some(path) = self.path.as_ref().or(self.sql_path.as_ref()) {
            SqlSource::Path(path.clone())
        } else {
            SqlSource::default()
        }
    }

    /// Format chosen by `--csv`/`--tsv`; `None` leaves it to the config file.
    pub fn output_format(&self) -> Option<OutputFormat> {
        if self.csv {
            Some(OutputFormat::Csv)
        } else if self.tsv {
            Some(OutputFormat::Tsv)
        } else {
            None
        }
    }

    pub fn connection_flags(&self) -> ConnectionFlags {
        ConnectionFlags {
            rdbms: self.rdbms.clone(),
            credentials: Credentials {
                user: self.db_user.clone(),
                password: self.db_password.clone(),
                dsn: self.db_dsn.clone(),
            },
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_flags(self.debug, self.info)
    }
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, CommandFactory};
    use tracing::Level;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pdrdb").chain(args.iter().copied())).unwrap()
    }

    fn parse_err(args: &[&str]) -> ErrorKind {
        Args::try_parse_from(std::iter::once("pdrdb").chain(args.iter().copied()))
            .unwrap_err()
            .kind()
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_default_source_is_stdin() {
        let args = parse(&[]);
        assert_eq!(args.source(), SqlSource::Path("-".to_string()));
        assert_eq!(args.output_format(), None);
        assert_eq!(args.log_config().level, None);
    }

    #[test]
    fn test_sources() {
        assert_eq!(parse(&["query.sql"]).source(), SqlSource::Path("query.sql".to_string()));
        assert_eq!(
            parse(&["--sql-path", "query.sql"]).source(),
            SqlSource::Path("query.sql".to_string())
        );
        assert_eq!(
            parse(&["-c", "SELECT 1; SELECT 2"]).source(),
            SqlSource::Command("SELECT 1; SELECT 2".to_string())
        );
        assert_eq!(parse(&["--user-tables"]).source(), SqlSource::UserTables);
        assert_eq!(parse(&["--user-views"]).source(), SqlSource::UserViews);
    }

    #[test]
    fn test_sources_are_exclusive() {
        assert_eq!(parse_err(&["query.sql", "-c", "SELECT 1"]), ErrorKind::ArgumentConflict);
        assert_eq!(parse_err(&["--user-tables", "--user-views"]), ErrorKind::ArgumentConflict);
        assert_eq!(
            parse_err(&["--sql-path", "a.sql", "--user-tables"]),
            ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_output_format_flags() {
        assert_eq!(parse(&["--csv"]).output_format(), Some(OutputFormat::Csv));
        assert_eq!(parse(&["--tsv"]).output_format(), Some(OutputFormat::Tsv));
        assert_eq!(parse_err(&["--csv", "--tsv"]), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_log_flags() {
        assert_eq!(parse(&["--debug"]).log_config().level, Some(Level::DEBUG));
        assert_eq!(parse(&["--info"]).log_config().level, Some(Level::INFO));
        assert_eq!(parse_err(&["--debug", "--info"]), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_connection_flags() {
        let args = parse(&["--rdbms", "mysql", "--db-user", "root", "--db-dsn", "localhost/shop"]);
        let flags = args.connection_flags();
        assert_eq!(flags.rdbms.as_deref(), Some("mysql"));
        assert_eq!(flags.credentials.user.as_deref(), Some("root"));
        assert_eq!(flags.credentials.password, None);
        assert_eq!(flags.credentials.dsn.as_deref(), Some("localhost/shop"));
    }

    #[test]
    fn test_unknown_rdbms_is_rejected() {
        assert_eq!(parse_err(&["--rdbms", "db2"]), ErrorKind::InvalidValue);
    }
}
