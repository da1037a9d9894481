//! Connection and display settings.
//!
//! Each setting is resolved on its own: a command-line flag wins, then the
//! `PDRDB_*` environment variable, then `~/.pdrdbrc`, then the default.

use std::{fmt, fs, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ConfigError, rdbms::Rdbms};

pub const ENV_RDBMS: &str = "PDRDB_RDBMS";
pub const ENV_DB_USER: &str = "PDRDB_DB_USER";
pub const ENV_DB_PASSWORD: &str = "PDRDB_DB_PASSWORD";
pub const ENV_DB_DSN: &str = "PDRDB_DB_DSN";

const CONFIG_FILE_NAME: &str = ".pdrdbrc";

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Database credentials. The password is never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: Option<String>,
    pub password: Option<String>,
    pub dsn: Option<String>,
}

impl Credentials {
    pub fn require_user(&self) -> Result<&str, ConfigError> {
        self.user.as_deref().ok_or(ConfigError::MissingCredential {
            name: "database user",
            flag: "db-user",
            env: ENV_DB_USER,
        })
    }

    pub fn require_dsn(&self) -> Result<&str, ConfigError> {
        self.dsn.as_deref().ok_or(ConfigError::MissingCredential {
            name: "data source name",
            flag: "db-dsn",
            env: ENV_DB_DSN,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("dsn", &self.dsn)
            .finish()
    }
}

/// Settings given on the command line; `None` means the flag was omitted.
#[derive(Debug, Clone, Default)]
pub struct ConnectionFlags {
    pub rdbms: Option<String>,
    pub credentials: Credentials,
}

/// Contents of `~/.pdrdbrc`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseSection {
    /// postgresql, mysql, sqlite or oracle
    #[serde(default)]
    pub rdbms: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Data source name, or the database file for SQLite
    #[serde(default)]
    pub dsn: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplaySection {
    /// Default output format: table, csv, tsv
    #[serde(default)]
    pub format: Option<String>,
}

impl FileConfig {
    /// Load `~/.pdrdbrc`, or defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            debug!("no config file at {}", path.display());
            return Ok(FileConfig::default());
        }
        Self::load_from(path)
    }

    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) => return Err(ConfigError::ConfigFile { path, source }),
        };
        let config = toml::from_str(&content)
            .map_err(|source| ConfigError::ConfigParse { path: path.clone(), source })?;
        debug!("loaded config file {}", path.display());
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    pub fn output_format(&self) -> Result<Option<OutputFormat>, ConfigError> {
        self.display.format.as_deref().map(str::parse::<OutputFormat>).transpose()
    }
}

/// Fully resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub rdbms: Rdbms,
    pub credentials: Credentials,
}

impl ConnectionConfig {
    /// Resolve against the process environment.
    pub fn resolve(flags: ConnectionFlags, file: &FileConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(flags, file, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup. Empty values count as unset.
    pub fn resolve_with<F>(
        flags: ConnectionFlags,
        file: &FileConfig,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.is_empty());
        let ConnectionFlags { rdbms, credentials } = flags;

        let rdbms = rdbms.or_else(|| lookup(ENV_RDBMS)).or_else(|| file.database.rdbms.clone());
        let rdbms = match rdbms {
            Some(name) => name.parse()?,
            None => Rdbms::default(),
        };

        let credentials = Credentials {
            user: credentials
                .user
                .or_else(|| lookup(ENV_DB_USER))
                .or_else(|| file.database.user.clone()),
            password: credentials
                .password
                .or_else(|| lookup(ENV_DB_PASSWORD))
                .or_else(|| file.database.password.clone()),
            dsn: credentials
                .dsn
                .or_else(|| lookup(ENV_DB_DSN))
                .or_else(|| file.database.dsn.clone()),
        };

        Ok(ConnectionConfig { rdbms, credentials })
    }

    /// Check that every credential the RDBMS needs is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credentials.require_dsn()?;
        if !self.rdbms.is_file_based() {
            self.credentials.require_user()?;
        }
        Ok(())
    }
}
