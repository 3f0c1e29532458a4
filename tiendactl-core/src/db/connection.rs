use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, Row as _, TypeInfo, ValueRef};
use tracing::{debug, info, warn};

use crate::config::{Backend, DatabaseConfig};
use crate::error::{FailureKind, Result, StoreError};
use crate::notice::{Notice, Notifier};
use crate::value::{Row, Value, TIMESTAMP_FORMAT};

/// Capability the entity panels depend on: run a statement, run a query.
///
/// Both report failures themselves and degrade to a no-op result
/// (`false` / no rows), so callers never see an error value.
#[async_trait]
pub trait Store: Send {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> bool;
    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Vec<Row>;
}

/// Single lazily-established database handle.
///
/// Every operation checks the handle first and reconnects once if it is
/// missing or fails a ping. There is no pool and no retry beyond that.
pub struct Database {
    config: DatabaseConfig,
    handle: Option<Handle>,
    notifier: Arc<dyn Notifier>,
}

impl Database {
    /// Create an unconnected manager; the first operation connects
    pub fn new(config: DatabaseConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            handle: None,
            notifier,
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// SQL dialect of the configured backend
    pub fn dialect(&self) -> Backend {
        self.config.backend
    }

    /// Whether a handle is currently held (it may still be dead)
    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Establish a handle, reporting the cause on failure
    pub async fn connect(&mut self) -> bool {
        match self.try_connect().await {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    /// Establish a handle, replacing any existing one
    pub async fn try_connect(&mut self) -> Result<()> {
        self.disconnect().await;

        let handle = Handle::open(&self.config)
            .await
            .map_err(StoreError::connection)?;
        info!(target_db = %self.config.describe(), "connected");
        self.handle = Some(handle);
        Ok(())
    }

    /// Release the handle; a no-op when none is held
    pub async fn disconnect(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.close().await {
                debug!("error while closing connection: {}", err);
            }
        }
    }

    /// Run a mutating statement, returning the affected row count
    pub async fn try_execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        debug!(sql, params = params.len(), "execute");
        let handle = self.live_handle().await?;
        handle
            .execute(sql, params)
            .await
            .map_err(StoreError::statement)
    }

    /// Run a query, returning every row
    pub async fn try_fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        debug!(sql, params = params.len(), "fetch_all");
        let handle = self.live_handle().await?;
        handle
            .fetch_all(sql, params)
            .await
            .map_err(StoreError::statement)
    }

    /// [`try_execute`](Self::try_execute) with failures reported and flattened to `false`
    pub async fn execute(&mut self, sql: &str, params: &[Value]) -> bool {
        match self.try_execute(sql, params).await {
            Ok(_) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    /// [`try_fetch_all`](Self::try_fetch_all) with failures reported and flattened to no rows
    pub async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Vec<Row> {
        match self.try_fetch_all(sql, params).await {
            Ok(rows) => rows,
            Err(err) => {
                self.report(&err);
                Vec::new()
            }
        }
    }

    /// Surface an error to the operator
    pub fn report(&self, err: &StoreError) {
        let title = match err.kind() {
            FailureKind::Connectivity => "Connection error",
            FailureKind::Statement => "Database error",
        };
        let message = if err.is_foreign_key_violation() {
            format!("{}\n\nThe row is linked to records in another table.", err)
        } else {
            err.to_string()
        };
        self.notifier.notify(Notice::error(title, message));
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    async fn live_handle(&mut self) -> Result<&mut Handle> {
        let alive = match self.handle.as_mut() {
            Some(handle) => handle.ping().await.is_ok(),
            None => false,
        };

        if !alive {
            if self.handle.take().is_some() {
                warn!("connection lost, reconnecting");
            }
            self.try_connect().await?;
        }

        self.handle.as_mut().ok_or(StoreError::NotConnected)
    }
}

#[async_trait]
impl Store for Database {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> bool {
        Database::execute(self, sql, params).await
    }

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Vec<Row> {
        Database::fetch_all(self, sql, params).await
    }
}

/// An open session on one of the supported engines
enum Handle {
    Mysql(MySqlConnection),
    Sqlite(SqliteConnection),
}

impl Handle {
    async fn open(config: &DatabaseConfig) -> std::result::Result<Self, sqlx::Error> {
        match config.backend {
            Backend::Mysql => {
                let options = MySqlConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .username(&config.user)
                    .password(&config.password)
                    .database(&config.database);
                Ok(Handle::Mysql(MySqlConnection::connect_with(&options).await?))
            }
            Backend::Sqlite => {
                let options = SqliteConnectOptions::new()
                    .filename(&config.database)
                    .create_if_missing(true)
                    .busy_timeout(Duration::from_secs(5))
                    .foreign_keys(true); // FK enforcement is per-connection in SQLite
                Ok(Handle::Sqlite(SqliteConnection::connect_with(&options).await?))
            }
        }
    }

    async fn ping(&mut self) -> std::result::Result<(), sqlx::Error> {
        match self {
            Handle::Mysql(conn) => conn.ping().await,
            Handle::Sqlite(conn) => conn.ping().await,
        }
    }

    async fn close(self) -> std::result::Result<(), sqlx::Error> {
        match self {
            Handle::Mysql(conn) => conn.close().await,
            Handle::Sqlite(conn) => conn.close().await,
        }
    }

    // Outside an explicit transaction both engines autocommit each statement.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> std::result::Result<u64, sqlx::Error> {
        let result = match self {
            Handle::Mysql(conn) => params
                .iter()
                .fold(sqlx::query(sql), bind_mysql)
                .execute(&mut *conn)
                .await?
                .rows_affected(),
            Handle::Sqlite(conn) => params
                .iter()
                .fold(sqlx::query(sql), bind_sqlite)
                .execute(&mut *conn)
                .await?
                .rows_affected(),
        };
        Ok(result)
    }

    async fn fetch_all(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> std::result::Result<Vec<Row>, sqlx::Error> {
        match self {
            Handle::Mysql(conn) => {
                let rows = params
                    .iter()
                    .fold(sqlx::query(sql), bind_mysql)
                    .fetch_all(&mut *conn)
                    .await?;
                rows.iter().map(decode_mysql_row).collect()
            }
            Handle::Sqlite(conn) => {
                let rows = params
                    .iter()
                    .fold(sqlx::query(sql), bind_sqlite)
                    .fetch_all(&mut *conn)
                    .await?;
                rows.iter().map(decode_sqlite_row).collect()
            }
        }
    }
}

fn bind_mysql<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Int(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Decimal(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Timestamp(v) => query.bind(*v),
    }
}

// SQLite has no decimal or datetime storage class: decimals go in as text
// (NUMERIC affinity converts them) and timestamps in CURRENT_TIMESTAMP's format.
fn bind_sqlite<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Int(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Decimal(v) => query.bind(v.to_string()),
        Value::Text(v) => query.bind(v.clone()),
        Value::Timestamp(v) => query.bind(v.format(TIMESTAMP_FORMAT).to_string()),
    }
}

fn decode_mysql_row(row: &MySqlRow) -> std::result::Result<Row, sqlx::Error> {
    (0..row.len())
        .map(|idx| {
            let raw = row.try_get_raw(idx)?;
            if raw.is_null() {
                return Ok(Value::Null);
            }
            let type_name = raw.type_info().name().to_ascii_uppercase();

            let value = if type_name.contains("INT") {
                match row.try_get::<i64, _>(idx) {
                    Ok(v) => Value::Int(v),
                    Err(_) => Value::Int(row.try_get::<u64, _>(idx)? as i64),
                }
            } else if type_name == "DECIMAL" {
                Value::Decimal(row.try_get(idx)?)
            } else if type_name == "FLOAT" || type_name == "DOUBLE" {
                Value::Real(row.try_get(idx)?)
            } else if type_name == "DATETIME" || type_name == "TIMESTAMP" {
                Value::Timestamp(row.try_get(idx)?)
            } else {
                match row.try_get::<String, _>(idx) {
                    Ok(text) => Value::Text(text),
                    Err(_) => {
                        let bytes: Vec<u8> = row.try_get(idx)?;
                        Value::Text(String::from_utf8_lossy(&bytes).into_owned())
                    }
                }
            };
            Ok(value)
        })
        .collect()
}

fn decode_sqlite_row(row: &SqliteRow) -> std::result::Result<Row, sqlx::Error> {
    (0..row.len())
        .map(|idx| {
            let raw = row.try_get_raw(idx)?;
            if raw.is_null() {
                return Ok(Value::Null);
            }

            // Storage class of the value itself, not the declared column type
            let value = match raw.type_info().name() {
                "INTEGER" => Value::Int(row.try_get(idx)?),
                "REAL" => Value::Real(row.try_get(idx)?),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get(idx)?;
                    Value::Text(String::from_utf8_lossy(&bytes).into_owned())
                }
                "TEXT" => Value::Text(row.try_get(idx)?),
                _ => match row.try_get::<i64, _>(idx) {
                    Ok(v) => Value::Int(v),
                    Err(_) => match row.try_get::<f64, _>(idx) {
                        Ok(v) => Value::Real(v),
                        Err(_) => Value::Text(row.try_get(idx)?),
                    },
                },
            };
            Ok(value)
        })
        .collect()
}
