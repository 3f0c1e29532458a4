//! End-to-end store scenarios against a throwaway SQLite file.
//!
//! Each test drives EntityPanel through the real Database, the same path the
//! terminal UI takes, and checks what actually landed in storage.

use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;
use tiendactl_core::db::{list_tables, table_contents, try_bootstrap};
use tiendactl_core::{
    ChannelNotifier, Database, DatabaseConfig, EntityKind, EntityPanel, Level, Notice, Value,
};
use tokio::sync::mpsc::UnboundedReceiver;

async fn open(path: &Path) -> (Database, ChannelNotifier, UnboundedReceiver<Notice>) {
    let (notifier, rx) = ChannelNotifier::channel();
    let mut db = Database::new(DatabaseConfig::sqlite(path), Arc::new(notifier.clone()));
    try_bootstrap(&mut db).await.expect("bootstrap");
    (db, notifier, rx)
}

fn drain(rx: &mut UnboundedReceiver<Notice>) -> Vec<Notice> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

async fn save(
    db: &mut Database,
    notifier: &ChannelNotifier,
    kind: EntityKind,
    inputs: &[(&str, &str)],
) -> bool {
    let mut panel = EntityPanel::new(kind);
    for (column, text) in inputs {
        assert!(panel.set_field(column, *text), "unknown column {}", column);
    }
    panel.save(db, notifier).await
}

async fn count(db: &mut Database, table: &str) -> usize {
    table_contents(db, table).await.expect("dump").rows.len()
}

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tienda.db");

    let (mut db, _, _rx) = open(&path).await;
    try_bootstrap(&mut db).await.expect("second bootstrap");
    db.disconnect().await;

    // a fresh handle on the same file sees the same schema
    let (mut db, _, _rx) = open(&path).await;
    assert_eq!(list_tables(&mut db).await.unwrap(), EntityKind::ALL.to_vec());
}

#[tokio::test]
async fn store_walkthrough_enforces_foreign_keys() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, mut rx) = open(&dir.path().join("tienda.db")).await;

    assert!(
        save(
            &mut db,
            &notifier,
            EntityKind::Customer,
            &[("nombre", "Ana"), ("telefono", "555-1000"), ("direccion", "Main St 1")],
        )
        .await
    );
    assert!(
        save(
            &mut db,
            &notifier,
            EntityKind::Product,
            &[("nombre", "Widget"), ("descripcion", "desc"), ("precio", "9.99"), ("stock", "10")],
        )
        .await
    );
    assert!(
        save(
            &mut db,
            &notifier,
            EntityKind::Sale,
            &[("cliente_id", "1"), ("total", "9.99")],
        )
        .await
    );
    assert!(
        save(
            &mut db,
            &notifier,
            EntityKind::SaleLineItem,
            &[
                ("venta_id", "1"),
                ("producto_id", "1"),
                ("cantidad", "1"),
                ("precio_unitario", "9.99"),
            ],
        )
        .await
    );

    let customers = table_contents(&mut db, "Clientes").await.unwrap();
    assert_eq!(
        customers.rendered_rows(),
        vec![vec!["1", "Ana", "555-1000", "Main St 1"]]
    );

    // the storage default fills in the sale date
    let sales = table_contents(&mut db, "Ventas").await.unwrap();
    assert_eq!(sales.rows[0][0], Value::Int(1));
    assert!(!sales.rows[0][2].is_null());

    let saved = drain(&mut rx);
    assert_eq!(saved.len(), 4);
    assert!(saved.iter().all(|n| n.title == "Saved"));

    // the product is still referenced by the line item
    let mut products = EntityPanel::new(EntityKind::Product);
    products.refresh(&mut db).await;
    assert!(products.select(0));
    assert!(!products.delete(&mut db, &notifier).await);
    assert_eq!(count(&mut db, "Productos").await, 1);

    let notices = drain(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, Level::Error);
    assert_eq!(notices[0].title, "Database error");
    assert!(notices[0].message.contains("FOREIGN KEY"));
}

#[tokio::test]
async fn deleting_a_sale_with_items_keeps_both() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, mut rx) = open(&dir.path().join("tienda.db")).await;

    save(&mut db, &notifier, EntityKind::Product, &[("nombre", "Tuerca"), ("precio", "0.50"), ("stock", "100")]).await;
    save(&mut db, &notifier, EntityKind::Sale, &[("total", "1.00")]).await;
    save(
        &mut db,
        &notifier,
        EntityKind::SaleLineItem,
        &[("venta_id", "1"), ("producto_id", "1"), ("cantidad", "2"), ("precio_unitario", "0.50")],
    )
    .await;
    drain(&mut rx);

    let mut sales = EntityPanel::new(EntityKind::Sale);
    sales.refresh(&mut db).await;
    sales.select(0);
    assert!(!sales.delete(&mut db, &notifier).await);

    let notices = drain(&mut rx);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("FOREIGN KEY"));
    assert_eq!(count(&mut db, "Ventas").await, 1);
    assert_eq!(count(&mut db, "DetalleVentas").await, 1);
}

#[tokio::test]
async fn line_item_for_missing_sale_is_rejected() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, mut rx) = open(&dir.path().join("tienda.db")).await;

    let ok = save(
        &mut db,
        &notifier,
        EntityKind::SaleLineItem,
        &[("venta_id", "42"), ("producto_id", "42"), ("cantidad", "1"), ("precio_unitario", "1")],
    )
    .await;

    assert!(!ok);
    assert_eq!(count(&mut db, "DetalleVentas").await, 0);
    let notices = drain(&mut rx);
    assert_eq!(notices[0].title, "Database error");
    assert!(notices[0].message.contains("FOREIGN KEY"));
}

#[tokio::test]
async fn filter_matches_substrings() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, _rx) = open(&dir.path().join("tienda.db")).await;

    for name in ["Ana", "Mariana", "Luis"] {
        save(&mut db, &notifier, EntityKind::Customer, &[("nombre", name)]).await;
    }

    let mut panel = EntityPanel::new(EntityKind::Customer);
    panel.set_filter("ana");
    panel.apply_filter(&mut db).await;
    let names: Vec<String> = panel.rendered_rows().into_iter().map(|r| r[1].clone()).collect();
    assert_eq!(names, vec!["Ana", "Mariana"]);

    panel.set_filter("");
    panel.apply_filter(&mut db).await;
    assert_eq!(panel.rows().len(), 3);
}

#[tokio::test]
async fn update_without_changes_leaves_row_intact() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, mut rx) = open(&dir.path().join("tienda.db")).await;
    save(
        &mut db,
        &notifier,
        EntityKind::Product,
        &[("nombre", "Widget"), ("descripcion", "desc"), ("precio", "9.99"), ("stock", "10")],
    )
    .await;
    let before = table_contents(&mut db, "Productos").await.unwrap().rendered_rows();

    let mut panel = EntityPanel::new(EntityKind::Product);
    panel.refresh(&mut db).await;
    panel.select(0);
    assert!(panel.update(&mut db, &notifier).await);

    let after = table_contents(&mut db, "Productos").await.unwrap().rendered_rows();
    assert_eq!(before, after);
    assert_eq!(drain(&mut rx).last().map(|n| n.title.as_str()), Some("Updated"));
}

#[tokio::test]
async fn filter_keeps_surrounding_whitespace() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, _rx) = open(&dir.path().join("tienda.db")).await;

    for name in ["Ana Lopez", "Mariana"] {
        save(&mut db, &notifier, EntityKind::Customer, &[("nombre", name)]).await;
    }

    let mut panel = EntityPanel::new(EntityKind::Customer);
    panel.set_filter("Ana ");
    panel.apply_filter(&mut db).await;
    let names: Vec<String> = panel.rendered_rows().into_iter().map(|r| r[1].clone()).collect();
    assert_eq!(names, vec!["Ana Lopez"]);

    panel.set_filter("  ");
    panel.apply_filter(&mut db).await;
    assert!(panel.rows().is_empty());
}

#[tokio::test]
async fn excess_decimal_places_survive_an_unchanged_update() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, _rx) = open(&dir.path().join("tienda.db")).await;
    save(
        &mut db,
        &notifier,
        EntityKind::Product,
        &[("nombre", "W"), ("precio", "9.999"), ("stock", "1")],
    )
    .await;
    let before = table_contents(&mut db, "Productos").await.unwrap();
    assert_eq!(before.rendered_rows()[0][3], "10.00");

    let mut panel = EntityPanel::new(EntityKind::Product);
    panel.refresh(&mut db).await;
    panel.select(0);
    assert!(panel.update(&mut db, &notifier).await);

    let after = table_contents(&mut db, "Productos").await.unwrap();
    assert_eq!(before.rows, after.rows);
}

#[tokio::test]
async fn update_targets_the_selected_id_after_renaming() {
    let dir = tempdir().unwrap();
    let (mut db, notifier, _rx) = open(&dir.path().join("tienda.db")).await;
    for name in ["Bebidas", "Limpieza"] {
        save(&mut db, &notifier, EntityKind::Category, &[("nombre", name)]).await;
    }

    let mut panel = EntityPanel::new(EntityKind::Category);
    panel.refresh(&mut db).await;
    panel.select(0);
    panel.set_field("nombre", "Refrescos");
    assert!(panel.update(&mut db, &notifier).await);

    let names: Vec<String> = panel.rendered_rows().into_iter().map(|r| r[1].clone()).collect();
    assert_eq!(names, vec!["Refrescos", "Limpieza"]);
}
