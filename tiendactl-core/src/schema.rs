//! Entity descriptors for the five store tables.
//!
//! Every table the application touches is described here once: its storage
//! name, identifier column, mutable columns, filter column and foreign keys.
//! DDL and the CRUD statements are generated from these descriptors, so no
//! table name ever comes from user input.

use crate::config::Backend;

/// The five managed record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Product,
    Category,
    Sale,
    SaleLineItem,
}

impl EntityKind {
    /// All entities in dependency order (referenced tables first)
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Customer,
        EntityKind::Product,
        EntityKind::Category,
        EntityKind::Sale,
        EntityKind::SaleLineItem,
    ];

    /// Static descriptor for this entity
    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            EntityKind::Customer => &CUSTOMER,
            EntityKind::Product => &PRODUCT,
            EntityKind::Category => &CATEGORY,
            EntityKind::Sale => &SALE,
            EntityKind::SaleLineItem => &SALE_LINE_ITEM,
        }
    }

    /// Storage table name
    pub fn table(self) -> &'static str {
        self.descriptor().table
    }

    /// Resolve a table name against the known set (ASCII case-insensitive)
    pub fn from_table(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.table().eq_ignore_ascii_case(name))
    }

    /// Position in dependency order
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or_default()
    }
}

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Varchar(u16),
    Text,
    Integer,
    Decimal { precision: u8, scale: u8 },
    Timestamp,
}

impl ColumnKind {
    /// SQL type shared by MySQL and SQLite
    pub fn sql_type(self) -> String {
        match self {
            ColumnKind::Varchar(len) => format!("VARCHAR({})", len),
            ColumnKind::Text => "TEXT".to_string(),
            ColumnKind::Integer => "INT".to_string(),
            ColumnKind::Decimal { precision, scale } => {
                format!("DECIMAL({},{})", precision, scale)
            }
            ColumnKind::Timestamp => "DATETIME".to_string(),
        }
    }

    /// Free text columns keep input verbatim; everything else is parsed
    pub fn is_textual(self) -> bool {
        matches!(self, ColumnKind::Varchar(_) | ColumnKind::Text)
    }
}

/// One mutable attribute of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
    /// SQL default expression, applied when the input is left empty on insert
    pub default: Option<&'static str>,
    /// Referenced entity, keyed on its identifier column
    pub references: Option<EntityKind>,
}

impl Column {
    const fn new(name: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            default: None,
            references: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn default_sql(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    const fn references(mut self, kind: EntityKind) -> Self {
        self.references = Some(kind);
        self
    }

    fn ddl(&self) -> String {
        let mut def = format!("{} {}", self.name, self.kind.sql_type());
        if self.required {
            def.push_str(" NOT NULL");
        }
        if let Some(expr) = self.default {
            def.push_str(" DEFAULT ");
            def.push_str(expr);
        }
        def
    }
}

/// Storage layout and behavior of one entity
#[derive(Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub table: &'static str,
    /// Tab title
    pub title: &'static str,
    /// Name used in confirmations ("Customer saved")
    pub singular: &'static str,
    pub id_column: &'static str,
    pub columns: &'static [Column],
    /// Column matched by the filter box
    pub filter_column: &'static str,
}

const DECIMAL_10_2: ColumnKind = ColumnKind::Decimal {
    precision: 10,
    scale: 2,
};

static CUSTOMER: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Customer,
    table: "Clientes",
    title: "Customers",
    singular: "Customer",
    id_column: "cliente_id",
    columns: &[
        Column::new("nombre", "Name", ColumnKind::Varchar(100)).required(),
        Column::new("telefono", "Phone", ColumnKind::Varchar(15)),
        Column::new("direccion", "Address", ColumnKind::Varchar(150)),
    ],
    filter_column: "nombre",
};

static PRODUCT: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Product,
    table: "Productos",
    title: "Products",
    singular: "Product",
    id_column: "producto_id",
    columns: &[
        Column::new("nombre", "Name", ColumnKind::Varchar(100)).required(),
        Column::new("descripcion", "Description", ColumnKind::Text),
        Column::new("precio", "Price", DECIMAL_10_2).required(),
        Column::new("stock", "Stock", ColumnKind::Integer).required(),
    ],
    filter_column: "nombre",
};

static CATEGORY: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Category,
    table: "Categorias",
    title: "Categories",
    singular: "Category",
    id_column: "categoria_id",
    columns: &[
        Column::new("nombre", "Name", ColumnKind::Varchar(50)).required(),
        Column::new("descripcion", "Description", ColumnKind::Text),
    ],
    filter_column: "nombre",
};

static SALE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Sale,
    table: "Ventas",
    title: "Sales",
    singular: "Sale",
    id_column: "venta_id",
    columns: &[
        Column::new("cliente_id", "Customer ID", ColumnKind::Integer)
            .references(EntityKind::Customer),
        Column::new("fecha", "Date", ColumnKind::Timestamp).default_sql("CURRENT_TIMESTAMP"),
        Column::new("total", "Total", DECIMAL_10_2),
    ],
    filter_column: "cliente_id",
};

static SALE_LINE_ITEM: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::SaleLineItem,
    table: "DetalleVentas",
    title: "Sale Items",
    singular: "Sale item",
    id_column: "detalle_id",
    columns: &[
        Column::new("venta_id", "Sale ID", ColumnKind::Integer).references(EntityKind::Sale),
        Column::new("producto_id", "Product ID", ColumnKind::Integer)
            .references(EntityKind::Product),
        Column::new("cantidad", "Quantity", ColumnKind::Integer).required(),
        Column::new("precio_unitario", "Unit price", DECIMAL_10_2).required(),
    ],
    filter_column: "venta_id",
};

impl EntityDescriptor {
    /// Look up a mutable column by name
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Kind of the column at a result-set position (0 is the identifier)
    pub fn kind_at(&self, position: usize) -> Option<ColumnKind> {
        match position {
            0 => Some(ColumnKind::Integer),
            n => self.columns.get(n - 1).map(|col| col.kind),
        }
    }

    /// Storage column names, identifier first
    pub fn column_names(&self) -> Vec<&'static str> {
        std::iter::once(self.id_column)
            .chain(self.columns.iter().map(|col| col.name))
            .collect()
    }

    /// Display headers, identifier first
    pub fn headers(&self) -> Vec<&'static str> {
        std::iter::once("ID")
            .chain(self.columns.iter().map(|col| col.label))
            .collect()
    }

    /// Columns holding foreign keys
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&'static Column, EntityKind)> + '_ {
        self.columns
            .iter()
            .filter_map(|col| col.references.map(|target| (col, target)))
    }

    fn select_list(&self) -> String {
        self.column_names().join(", ")
    }

    /// Every row, ordered by identifier
    pub fn select_all_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {}",
            self.select_list(),
            self.table,
            self.id_column
        )
    }

    /// Rows whose filter column contains the bound pattern
    pub fn filter_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} LIKE ? ORDER BY {}",
            self.select_list(),
            self.table,
            self.filter_column,
            self.id_column
        )
    }

    /// INSERT for the given subset of columns
    pub fn insert_sql(&self, columns: &[&Column]) -> String {
        let names: Vec<&str> = columns.iter().map(|col| col.name).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            names.join(", "),
            placeholders
        )
    }

    /// UPDATE keyed on the identifier for the given subset of columns
    pub fn update_sql(&self, columns: &[&Column]) -> String {
        let assignments: Vec<String> = columns
            .iter()
            .map(|col| format!("{} = ?", col.name))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table,
            assignments.join(", "),
            self.id_column
        )
    }

    /// DELETE keyed on the identifier
    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?", self.table, self.id_column)
    }

    /// Idempotent CREATE TABLE for the backend's dialect
    pub fn create_table_sql(&self, backend: Backend) -> String {
        let id = match backend {
            Backend::Mysql => format!("{} INT AUTO_INCREMENT PRIMARY KEY", self.id_column),
            Backend::Sqlite => format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", self.id_column),
        };

        let mut lines = vec![id];
        lines.extend(self.columns.iter().map(Column::ddl));
        lines.extend(self.foreign_keys().map(|(col, target)| {
            let target = target.descriptor();
            format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                col.name, target.table, target.id_column
            )
        }));

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table,
            lines.join(",\n    ")
        )
    }
}
