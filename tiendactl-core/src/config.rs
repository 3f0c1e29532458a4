//! Connection settings for the store database.
//!
//! Settings come from `~/.tiendactl/config.toml` (or an explicit path), then
//! `TIENDACTL_DB_*` environment variables override individual fields. A missing
//! file is not an error: defaults plus environment are enough to start.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Storage engine behind the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Network MySQL/MariaDB server
    #[default]
    Mysql,
    /// Local SQLite file (`database` is the file path)
    Sqlite,
}

impl FromStr for Backend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Backend::Mysql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(StoreError::config(format!(
                "unknown backend '{}' (expected mysql or sqlite)",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Mysql => write!(f, "mysql"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Credentials and location of the store database
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name (MySQL) or file path (SQLite)
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Mysql,
            host: "localhost".to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: "root".to_string(),
            password: String::new(),
            database: "tienda".to_string(),
        }
    }
}

// Hand-written so the password never lands in logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl DatabaseConfig {
    /// SQLite settings pointing at a file
    pub fn sqlite(path: impl AsRef<Path>) -> Self {
        Self {
            backend: Backend::Sqlite,
            database: path.as_ref().display().to_string(),
            ..Self::default()
        }
    }

    /// Short human-readable target, e.g. `mysql://root@localhost:3306/tienda`
    pub fn describe(&self) -> String {
        match self.backend {
            Backend::Mysql => format!(
                "mysql://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
            Backend::Sqlite => format!("sqlite://{}", self.database),
        }
    }

    /// Reject settings no backend can connect with
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(StoreError::config("database name must not be empty"));
        }
        if self.backend == Backend::Mysql && self.host.trim().is_empty() {
            return Err(StoreError::config("host must not be empty for mysql"));
        }
        Ok(())
    }
}

/// Top-level config file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TiendaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl TiendaConfig {
    /// Load from an explicit path, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_overrides(|key| env::var(key).ok())?;
        config.database.validate()?;
        Ok(config)
    }

    /// Parse the file alone; a missing file yields the defaults
    fn read_file(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
            let parsed: Self = toml::from_str(&content).map_err(|e| {
                StoreError::config(format!("invalid TOML in {}: {}", path.display(), e))
            })?;
            debug!(path = %path.display(), "loaded config file");
            parsed
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        Ok(config)
    }

    /// Apply `TIENDACTL_DB_*` overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = &mut self.database;

        if let Some(backend) = lookup("TIENDACTL_DB_BACKEND") {
            db.backend = backend.parse()?;
        }
        if let Some(host) = lookup("TIENDACTL_DB_HOST") {
            db.host = host;
        }
        if let Some(port) = lookup("TIENDACTL_DB_PORT") {
            db.port = port.trim().parse().map_err(|_| {
                StoreError::config(format!("TIENDACTL_DB_PORT is not a port number: {}", port))
            })?;
        }
        if let Some(user) = lookup("TIENDACTL_DB_USER") {
            db.user = user;
        }
        if let Some(password) = lookup("TIENDACTL_DB_PASSWORD") {
            db.password = password;
        }
        if let Some(name) = lookup("TIENDACTL_DB_NAME") {
            db.database = name;
        }

        Ok(())
    }

    /// Config directory: ~/.tiendactl
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tiendactl")
    }

    /// Config file path: ~/.tiendactl/config.toml
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Commented template written by `tiendactl config init`
    pub fn template() -> &'static str {
        TEMPLATE
    }
}

const TEMPLATE: &str = r#"# tiendactl configuration
#
# Environment overrides: TIENDACTL_DB_BACKEND, TIENDACTL_DB_HOST, TIENDACTL_DB_PORT,
# TIENDACTL_DB_USER, TIENDACTL_DB_PASSWORD, TIENDACTL_DB_NAME

[database]
# mysql or sqlite
backend = "mysql"
host = "localhost"
port = 3306
user = "root"
password = ""
# database name for mysql, file path for sqlite
database = "tienda"
"#;

/// Load `.env` files: current directory first, then ~/.tiendactl/.env.
///
/// dotenvy never overwrites variables that are already set.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
    }

    let env_file = TiendaConfig::config_dir().join(".env");
    if env_file.exists() {
        match dotenvy::from_path(&env_file) {
            Ok(()) => info!("Loaded .env from {}", env_file.display()),
            Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
        }
    }
}
