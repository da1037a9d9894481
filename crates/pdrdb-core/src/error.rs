use std::path::PathBuf;

/// Errors raised while resolving how to reach the database.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing {name}: pass --{flag} or set ${env}")]
    MissingCredential { name: &'static str, flag: &'static str, env: &'static str },

    #[error("not implemented RDBMS: {0:?} (expected postgresql, mysql, sqlite or oracle)")]
    UnsupportedRdbms(String),

    #[error("{0} is not reached through a connection url")]
    NoConnectionUrl(&'static str),

    #[error("unknown output format: {0:?} (expected table, csv or tsv)")]
    UnsupportedFormat(String),

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not determine home directory")]
    NoHomeDir,
}
