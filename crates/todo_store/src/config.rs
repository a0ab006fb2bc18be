//! Store configuration.

use std::{env, fmt, path::PathBuf, str::FromStr};

/// Storage backend selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Durable SQLite database.
    #[default]
    Sqlite,
    /// In-memory lists kept in the user's session.
    Session,
}

impl Backend {
    /// Returns the configuration name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sql" => Ok(Self::Sqlite),
            "session" | "memory" => Ok(Self::Session),
            other => anyhow::bail!("unknown storage backend: {other}"),
        }
    }
}

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend.
    pub backend: Backend,
    /// Database URL.
    pub database_url: String,
    /// Maximum number of pooled database connections.
    pub max_connections: u32,
    /// Seed fixture for the session backend. The bundled fixture is used
    /// when unset.
    pub seed_path: Option<PathBuf>,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            database_url: "sqlite:todos.db?mode=rwc".to_string(),
            max_connections: 5,
            seed_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let backend = match env::var("TODOS_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        let max_connections = match env::var("TODOS_DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value.parse().map_err(|e| {
                anyhow::anyhow!("invalid TODOS_DATABASE_MAX_CONNECTIONS {value:?}: {e}")
            })?,
            Err(_) => defaults.max_connections,
        };

        Ok(Self {
            backend,
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections,
            seed_path: env::var_os("TODOS_SEED_PATH").map(PathBuf::from),
            log_level: env::var("TODOS_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Selects the in-memory session backend.
    pub fn session() -> Self {
        Self {
            backend: Backend::Session,
            ..Self::default()
        }
    }

    /// Selects the SQLite backend at `database_url`.
    pub fn sqlite(database_url: impl Into<String>) -> Self {
        Self {
            backend: Backend::Sqlite,
            database_url: database_url.into(),
            ..Self::default()
        }
    }
}

/// Initializes tracing with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
