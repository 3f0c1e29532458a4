//! Structured error types for tiendactl-core.
//!
//! Uses `thiserror` so the data layer hands back composable errors.
//! The binary (tiendactl-tui) wraps these with `anyhow` at the edges,
//! while panels only ever see them as user-facing notices.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tiendactl-core operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not establish (or re-establish) a database handle
    #[error("Could not connect to the database: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// The storage engine rejected a statement
    #[error("Statement failed: {source}")]
    Statement {
        #[source]
        source: sqlx::Error,
    },

    /// Field text could not be converted to the column's type
    #[error("Invalid value '{value}' for column '{column}': {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: String,
    },

    /// Table name outside the known entity set
    #[error("Unknown table '{name}'")]
    UnknownTable { name: String },

    /// Schema bootstrap stopped at a table
    #[error("Failed to create table {table}: {source}")]
    Bootstrap {
        table: &'static str,
        #[source]
        source: Box<StoreError>,
    },

    /// Operation attempted with no handle and reconnecting failed
    #[error("Not connected to the database")]
    NotConnected,

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// I/O operation failed
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for tiendactl-core operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// The two failure kinds an operator ever sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Cannot establish or maintain a handle
    Connectivity,
    /// Constraint violation, malformed input or any other rejected statement
    Statement,
}

impl StoreError {
    /// Create a connection error
    pub fn connection(source: sqlx::Error) -> Self {
        Self::Connection { source }
    }

    /// Create a statement error
    pub fn statement(source: sqlx::Error) -> Self {
        Self::Statement { source }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            column: column.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown table error
    pub fn unknown_table(name: impl Into<String>) -> Self {
        Self::UnknownTable { name: name.into() }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create an I/O error tied to a path
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a failure while creating `table`
    pub fn bootstrap(table: &'static str, source: StoreError) -> Self {
        Self::Bootstrap {
            table,
            source: Box::new(source),
        }
    }

    /// Classify into the operator-facing failure kinds
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Connection { .. } | Self::NotConnected => FailureKind::Connectivity,
            Self::Statement { source } if is_connectivity(source) => FailureKind::Connectivity,
            Self::Bootstrap { source, .. } => source.kind(),
            _ => FailureKind::Statement,
        }
    }

    /// True when the storage engine reported a foreign-key violation
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Statement {
                source: sqlx::Error::Database(db),
            } => {
                matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
                    || db.message().to_ascii_lowercase().contains("foreign key")
            }
            Self::Bootstrap { source, .. } => source.is_foreign_key_violation(),
            _ => false,
        }
    }
}

fn is_connectivity(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
