//! Read-only inspection of the store tables.
//!
//! Only the five known tables are ever listed or dumped. Requested names are
//! resolved through [`EntityKind::from_table`] before any SQL is built.

use super::Database;
use crate::config::Backend;
use crate::error::{Result, StoreError};
use crate::schema::EntityKind;
use crate::value::{Row, Value};

/// Known tables present in the database, in dependency order
pub async fn list_tables(db: &mut Database) -> Result<Vec<EntityKind>> {
    let sql = match db.dialect() {
        Backend::Mysql => "SHOW TABLES",
        Backend::Sqlite => "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    };

    let rows = db.try_fetch_all(sql, &[]).await?;
    let mut kinds: Vec<EntityKind> = rows
        .iter()
        .filter_map(|row| match row.first() {
            Some(Value::Text(name)) => EntityKind::from_table(name),
            _ => None,
        })
        .collect();
    kinds.sort_by_key(|kind| kind.index());
    kinds.dedup();
    Ok(kinds)
}

/// Snapshot of one table
#[derive(Debug, Clone)]
pub struct TableContents {
    pub kind: EntityKind,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Row>,
}

impl TableContents {
    /// Rows rendered per column kind, ready for a text grid
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        let descriptor = self.kind.descriptor();
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(pos, value)| value.render(descriptor.kind_at(pos)))
                    .collect()
            })
            .collect()
    }
}

/// Every row of a known table
pub async fn table_contents(db: &mut Database, name: &str) -> Result<TableContents> {
    let kind = EntityKind::from_table(name).ok_or_else(|| StoreError::unknown_table(name))?;
    let descriptor = kind.descriptor();

    let rows = db.try_fetch_all(&descriptor.select_all_sql(), &[]).await?;
    Ok(TableContents {
        kind,
        columns: descriptor.column_names(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::bootstrap::try_bootstrap;
    use crate::notice::LogNotifier;
    use std::sync::Arc;
    use tempfile::tempdir;

    async fn bootstrapped(path: &std::path::Path) -> Database {
        let mut db = Database::new(DatabaseConfig::sqlite(path), Arc::new(LogNotifier));
        try_bootstrap(&mut db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn empty_database_has_no_tables() {
        let dir = tempdir().unwrap();
        let mut db = Database::new(
            DatabaseConfig::sqlite(dir.path().join("empty.db")),
            Arc::new(LogNotifier),
        );
        assert!(list_tables(&mut db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unrelated_tables_are_hidden() {
        let dir = tempdir().unwrap();
        let mut db = bootstrapped(&dir.path().join("t.db")).await;
        db.try_execute("CREATE TABLE notas (id INTEGER)", &[])
            .await
            .unwrap();

        let tables = list_tables(&mut db).await.unwrap();
        assert_eq!(tables.len(), 5);
        assert_eq!(tables[0], EntityKind::Customer);
    }

    #[tokio::test]
    async fn contents_are_rendered_per_column() {
        let dir = tempdir().unwrap();
        let mut db = bootstrapped(&dir.path().join("t.db")).await;
        db.try_execute(
            "INSERT INTO Productos (nombre, descripcion, precio, stock) VALUES (?, ?, ?, ?)",
            &[
                Value::Text("Widget".into()),
                Value::Text("desc".into()),
                Value::Decimal(rust_decimal::Decimal::new(1000, 2)),
                Value::Int(10),
            ],
        )
        .await
        .unwrap();

        let contents = table_contents(&mut db, "productos").await.unwrap();
        assert_eq!(
            contents.columns,
            vec!["producto_id", "nombre", "descripcion", "precio", "stock"]
        );
        assert_eq!(
            contents.rendered_rows(),
            vec![vec!["1", "Widget", "desc", "10.00", "10"]]
        );
    }

    #[tokio::test]
    async fn unknown_table_is_rejected_before_sql() {
        let dir = tempdir().unwrap();
        let mut db = Database::new(
            DatabaseConfig::sqlite(dir.path().join("never.db")),
            Arc::new(LogNotifier),
        );

        let err = table_contents(&mut db, "Clientes; DROP TABLE Ventas")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownTable { .. }));
        assert!(!db.is_connected());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn mysql_lists_bootstrapped_tables() {
        let mut config = crate::config::TiendaConfig::default();
        config
            .apply_overrides(|key| std::env::var(key).ok())
            .unwrap();
        let mut db = Database::new(config.database, Arc::new(LogNotifier));

        try_bootstrap(&mut db).await.unwrap();
        assert_eq!(list_tables(&mut db).await.unwrap(), EntityKind::ALL.to_vec());
    }
}
