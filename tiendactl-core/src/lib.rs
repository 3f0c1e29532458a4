//! tiendactl-core: data layer for the store manager
//!
//! Entity descriptors, the single-handle connection manager, schema
//! bootstrap and the generic panel controller the terminal UI drives.

pub mod config;
pub mod db;
pub mod error;
pub mod notice;
pub mod panel;
pub mod schema;
pub mod value;

pub use config::{load_dotenv, Backend, DatabaseConfig, TiendaConfig};
pub use db::{Database, Store, TableContents};
pub use error::{FailureKind, Result, StoreError};
pub use notice::{ChannelNotifier, Level, LogNotifier, Notice, Notifier};
pub use panel::EntityPanel;
pub use schema::{Column, ColumnKind, EntityDescriptor, EntityKind};
pub use value::{Row, Value};
