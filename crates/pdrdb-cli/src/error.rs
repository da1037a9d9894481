use pdrdb_core::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "oracle")]
    #[error("oracle error: {0}")]
    Oracle(#[from] oracle::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output error: {0}")]
    Output(#[from] csv::Error),

    #[error("not implemented: {0}")]
    NotImplemented(String),
}
