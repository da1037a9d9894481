//! pdrdb command-line interface: argument parsing, logging, database
//! execution and result formatting.

pub mod args;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod logging;
pub mod script;

pub use args::{Args, SqlSource};
pub use error::CliError;
pub use executor::{QueryResult, SqlExecutor};
pub use formatter::ResultFormatter;
pub use logging::LogConfig;
pub use script::ScriptExecutor;
