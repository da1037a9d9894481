use tracing::Level;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Crates whose events follow the selected level. Everything else stays at `warn`.
const OWN_TARGETS: &[&str] = &["pdrdb", "pdrdb_cli", "pdrdb_core"];

/// Logging setup chosen on the command line.
///
/// Built once from the parsed flags and handed to [`LogConfig::init`] at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogConfig {
    /// `None` defers to `RUST_LOG`, falling back to warnings only
    pub level: Option<Level>,
}

impl LogConfig {
    pub fn from_flags(debug: bool, info: bool) -> Self {
        let level = if debug {
            Some(Level::DEBUG)
        } else if info {
            Some(Level::INFO)
        } else {
            None
        };
        LogConfig { level }
    }

    pub fn directives(level: Level) -> String {
        let level = level.to_string().to_lowercase();
        let mut directives = vec!["warn".to_string()];
        directives.extend(OWN_TARGETS.iter().map(|target| format!("{}={}", target, level)));
        directives.join(",")
    }

    pub fn filter(&self) -> EnvFilter {
        match self.level {
            Some(level) => EnvFilter::new(Self::directives(level)),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Self::directives(Level::WARN))),
        }
    }

    /// Install the global subscriber: timestamped lines on stderr.
    pub fn init(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .ok(); // Ignore error if already initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(LogConfig::from_flags(true, false).level, Some(Level::DEBUG));
        assert_eq!(LogConfig::from_flags(false, true).level, Some(Level::INFO));
        assert_eq!(LogConfig::from_flags(false, false).level, None);
    }

    #[test]
    fn test_directives() {
        assert_eq!(
            LogConfig::directives(Level::DEBUG),
            "warn,pdrdb=debug,pdrdb_cli=debug,pdrdb_core=debug"
        );
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::from_flags(false, true);
        config.init();
        config.init();
    }
}
