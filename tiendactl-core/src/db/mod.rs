//! Database access: the connection manager, schema bootstrap and inspection helpers.

pub mod bootstrap;
mod connection;
pub mod inspect;

pub use bootstrap::{bootstrap, try_bootstrap};
pub use connection::{Database, Store};
pub use inspect::{list_tables, table_contents, TableContents};
