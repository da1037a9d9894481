//! Core building blocks for pdrdb: statement splitting, SQL input sources,
//! RDBMS kinds and connection configuration.

pub mod config;
pub mod error;
pub mod input;
pub mod rdbms;
pub mod splitter;

pub use config::{ConnectionConfig, ConnectionFlags, Credentials, FileConfig, OutputFormat};
pub use error::ConfigError;
pub use input::SqlInput;
pub use rdbms::Rdbms;
pub use splitter::{split_str, Statement, StatementSplitter};
