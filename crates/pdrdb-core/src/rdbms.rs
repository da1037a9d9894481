use std::{fmt, str::FromStr};

use crate::{config::Credentials, error::ConfigError};

/// Kind of relational database server targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rdbms {
    #[default]
    Postgresql,
    Mysql,
    Sqlite,
    Oracle,
}

impl Rdbms {
    pub const ALL: [Rdbms; 4] = [Rdbms::Postgresql, Rdbms::Mysql, Rdbms::Sqlite, Rdbms::Oracle];

    pub fn name(&self) -> &'static str {
        match self {
            Rdbms::Postgresql => "postgresql",
            Rdbms::Mysql => "mysql",
            Rdbms::Sqlite => "sqlite",
            Rdbms::Oracle => "oracle",
        }
    }

    /// SQLite is addressed by file path and needs no user.
    pub fn is_file_based(&self) -> bool {
        matches!(self, Rdbms::Sqlite)
    }

    /// Catalog query listing the user's tables.
    pub fn user_tables_sql(&self) -> &'static str {
        match self {
            Rdbms::Sqlite => "SELECT * FROM sqlite_master WHERE type = 'table' ORDER BY name",
            Rdbms::Postgresql => "SELECT * FROM information_schema.tables ORDER BY table_name",
            Rdbms::Mysql => {
                "SELECT * FROM information_schema.TABLES \
                 WHERE TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME"
            }
            Rdbms::Oracle => "SELECT * FROM USER_TABLES ORDER BY TABLE_NAME",
        }
    }

    /// Catalog query listing the user's views.
    pub fn user_views_sql(&self) -> &'static str {
        match self {
            Rdbms::Sqlite => "SELECT * FROM sqlite_master WHERE type = 'view' ORDER BY name",
            Rdbms::Postgresql => "SELECT * FROM information_schema.views ORDER BY table_name",
            Rdbms::Mysql => {
                "SELECT * FROM information_schema.TABLES \
                 WHERE TABLE_TYPE = 'VIEW' ORDER BY TABLE_NAME"
            }
            Rdbms::Oracle => "SELECT * FROM USER_VIEWS ORDER BY VIEW_NAME",
        }
    }

    /// Connection URL for the server databases reached through sqlx.
    ///
    /// SQLite opens its dsn as a plain file path and Oracle connects through
    /// its own client, so neither has a URL.
    pub fn connection_url(&self, credentials: &Credentials) -> Result<String, ConfigError> {
        let scheme = match self {
            Rdbms::Postgresql => "postgres",
            Rdbms::Mysql => "mysql",
            Rdbms::Sqlite | Rdbms::Oracle => return Err(ConfigError::NoConnectionUrl(self.name())),
        };
        let dsn = credentials.require_dsn()?;

        let user = urlencoding::encode(credentials.require_user()?);
        let url = match credentials.password.as_deref() {
            Some(password) => {
                format!("{}://{}:{}@{}", scheme, user, urlencoding::encode(password), dsn)
            }
            None => format!("{}://{}@{}", scheme, user, dsn),
        };
        Ok(url)
    }
}

impl fmt::Display for Rdbms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rdbms {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(Rdbms::Postgresql),
            "mysql" => Ok(Rdbms::Mysql),
            "sqlite" => Ok(Rdbms::Sqlite),
            "oracle" => Ok(Rdbms::Oracle),
            _ => Err(ConfigError::UnsupportedRdbms(s.to_string())),
        }
    }
}
