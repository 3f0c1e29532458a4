//! Idempotent schema creation for the five store tables

use tracing::info;

use super::Database;
use crate::error::{Result, StoreError};
use crate::schema::EntityKind;

/// Create every table that does not exist yet, in dependency order.
///
/// Stops at the first failing statement; tables created before it are kept.
pub async fn try_bootstrap(db: &mut Database) -> Result<()> {
    info!(dialect = %db.dialect(), "bootstrapping schema");

    for kind in EntityKind::ALL {
        let ddl = kind.descriptor().create_table_sql(db.dialect());
        db.try_execute(&ddl, &[])
            .await
            .map_err(|e| StoreError::bootstrap(kind.table(), e))?;
    }

    info!("schema ready ({} tables)", EntityKind::ALL.len());
    Ok(())
}

/// [`try_bootstrap`] with the failure reported through the notifier
pub async fn bootstrap(db: &mut Database) -> bool {
    match try_bootstrap(db).await {
        Ok(()) => true,
        Err(err) => {
            db.report(&err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::inspect::list_tables;
    use crate::notice::ChannelNotifier;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn bootstrap_twice_is_harmless() {
        let dir = tempdir().unwrap();
        let (notifier, mut rx) = ChannelNotifier::channel();
        let mut db = Database::new(
            DatabaseConfig::sqlite(dir.path().join("tienda.db")),
            Arc::new(notifier),
        );

        assert!(bootstrap(&mut db).await);
        assert!(bootstrap(&mut db).await);
        assert!(rx.try_recv().is_err());

        let tables = list_tables(&mut db).await.unwrap();
        assert_eq!(tables, EntityKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn failure_names_the_table() {
        let dir = tempdir().unwrap();
        let (notifier, mut rx) = ChannelNotifier::channel();
        let mut db = Database::new(
            DatabaseConfig::sqlite(dir.path().join("clash.db")),
            Arc::new(notifier),
        );

        // IF NOT EXISTS skips tables and views, but an index name still clashes
        db.try_execute("CREATE TABLE scratch (x INT)", &[]).await.unwrap();
        db.try_execute("CREATE INDEX Productos ON scratch (x)", &[])
            .await
            .unwrap();

        let err = try_bootstrap(&mut db).await.unwrap_err();
        assert!(matches!(err, StoreError::Bootstrap { table: "Productos", .. }));

        assert!(!bootstrap(&mut db).await);
        let notice = rx.try_recv().unwrap();
        assert!(notice.message.contains("Productos"));
    }
}
