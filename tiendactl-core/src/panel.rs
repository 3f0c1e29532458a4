//! Generic list/select/edit controller shared by every entity tab.
//!
//! An [`EntityPanel`] holds what one tab shows: the fetched rows, one input
//! string per mutable column, the filter text and the current selection.
//! Operations take the store and notifier explicitly so the same controller
//! runs against the real database or a test double.

use tracing::debug;

use crate::db::Store;
use crate::error::Result;
use crate::notice::{Notice, Notifier};
use crate::schema::{Column, EntityDescriptor, EntityKind};
use crate::value::{Row, Value};

pub struct EntityPanel {
    descriptor: &'static EntityDescriptor,
    rows: Vec<Row>,
    fields: Vec<String>,
    filter: String,
    selected: Option<usize>,
    selected_id: Option<i64>,
    focused_field: usize,
}

impl EntityPanel {
    pub fn new(kind: EntityKind) -> Self {
        let descriptor = kind.descriptor();
        Self {
            descriptor,
            rows: Vec::new(),
            fields: vec![String::new(); descriptor.columns.len()],
            filter: String::new(),
            selected: None,
            selected_id: None,
            focused_field: 0,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Displayed rows as text, one cell per column
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| self.render_row(row)).collect()
    }

    fn render_row(&self, row: &Row) -> Vec<String> {
        row.iter()
            .enumerate()
            .map(|(pos, value)| value.render(self.descriptor.kind_at(pos)))
            .collect()
    }

    // ---- inputs ----

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        self.fields.get_mut(index)
    }

    /// Set an input by column name; false if the column does not exist
    pub fn set_field(&mut self, column: &str, text: impl Into<String>) -> bool {
        match self.descriptor.columns.iter().position(|c| c.name == column) {
            Some(idx) => {
                self.fields[idx] = text.into();
                true
            }
            None => false,
        }
    }

    pub fn focused_field(&self) -> usize {
        self.focused_field
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut String> {
        self.fields.get_mut(self.focused_field)
    }

    pub fn focus_next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused_field = (self.focused_field + 1) % self.fields.len();
        }
    }

    pub fn focus_prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused_field = self
                .focused_field
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut String {
        &mut self.filter
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    // ---- selection ----

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_id
    }

    /// Select a displayed row, copying its values into the inputs
    pub fn select(&mut self, index: usize) -> bool {
        let Some(row) = self.rows.get(index) else {
            return false;
        };

        let rendered = self.render_row(row);
        let id = row.first().and_then(Value::as_id);
        for (field, value) in self.fields.iter_mut().zip(rendered.into_iter().skip(1)) {
            *field = value;
        }
        self.selected = Some(index);
        self.selected_id = id;
        true
    }

    pub fn select_next(&mut self) -> bool {
        let next = match self.selected {
            Some(idx) if idx + 1 < self.rows.len() => idx + 1,
            Some(idx) => idx,
            None => 0,
        };
        self.select(next)
    }

    pub fn select_prev(&mut self) -> bool {
        let prev = self.selected.map_or(0, |idx| idx.saturating_sub(1));
        self.select(prev)
    }

    fn reset_inputs(&mut self) {
        self.fields.iter_mut().for_each(String::clear);
        self.selected = None;
        self.selected_id = None;
    }

    // ---- operations ----

    /// Re-fetch every row, dropping the selection
    pub async fn refresh(&mut self, store: &mut dyn Store) {
        self.rows = store.fetch_all(&self.descriptor.select_all_sql(), &[]).await;
        self.selected = None;
        self.selected_id = None;
        debug!(table = self.descriptor.table, rows = self.rows.len(), "refreshed");
    }

    /// Show rows whose filter column contains the filter text; all rows when empty
    pub async fn apply_filter(&mut self, store: &mut dyn Store) {
        if self.filter.is_empty() {
            return self.refresh(store).await;
        }

        let pattern = Value::Text(format!("%{}%", self.filter));
        self.rows = store
            .fetch_all(&self.descriptor.filter_sql(), &[pattern])
            .await;
        self.selected = None;
        self.selected_id = None;
    }

    /// Insert the inputs as a new row
    pub async fn save(&mut self, store: &mut dyn Store, notifier: &dyn Notifier) -> bool {
        let (columns, params) = match self.bind_inputs() {
            Ok(bound) => bound,
            Err(err) => {
                notifier.notify(Notice::error("Database error", err.to_string()));
                return false;
            }
        };

        let sql = self.descriptor.insert_sql(&columns);
        if !store.execute(&sql, &params).await {
            return false;
        }

        self.reset_inputs();
        self.refresh(store).await;
        notifier.notify(Notice::info(
            "Saved",
            format!("{} saved.", self.descriptor.singular),
        ));
        true
    }

    /// Overwrite the selected row with the inputs
    pub async fn update(&mut self, store: &mut dyn Store, notifier: &dyn Notifier) -> bool {
        let Some(id) = self.selected_id else {
            notifier.notify(Notice::warning("Warning", "Select a record to update."));
            return false;
        };

        let (columns, mut params) = match self.bind_inputs() {
            Ok(bound) => bound,
            Err(err) => {
                notifier.notify(Notice::error("Database error", err.to_string()));
                return false;
            }
        };
        params.push(Value::Int(id));

        let sql = self.descriptor.update_sql(&columns);
        if !store.execute(&sql, &params).await {
            return false;
        }

        self.refresh(store).await;
        notifier.notify(Notice::info(
            "Updated",
            format!("{} updated.", self.descriptor.singular),
        ));
        true
    }

    /// Remove the selected row
    pub async fn delete(&mut self, store: &mut dyn Store, notifier: &dyn Notifier) -> bool {
        let Some(id) = self.selected_id else {
            notifier.notify(Notice::warning("Warning", "Select a record to delete."));
            return false;
        };

        if !store
            .execute(&self.descriptor.delete_sql(), &[Value::Int(id)])
            .await
        {
            return false;
        }

        self.refresh(store).await;
        notifier.notify(Notice::info(
            "Deleted",
            format!("{} deleted.", self.descriptor.singular),
        ));
        true
    }

    /// Empty the inputs and selection
    pub async fn clear(&mut self, store: &mut dyn Store, notifier: &dyn Notifier) {
        self.reset_inputs();
        self.refresh(store).await;
        notifier.notify(Notice::info("Cleared", "Fields cleared."));
    }

    /// Convert inputs to bound values. Empty inputs on columns with a
    /// storage default are left out so the default applies.
    fn bind_inputs(&self) -> Result<(Vec<&'static Column>, Vec<Value>)> {
        let mut columns = Vec::with_capacity(self.fields.len());
        let mut params = Vec::with_capacity(self.fields.len());

        for (column, input) in self.descriptor.columns.iter().zip(&self.fields) {
            if column.default.is_some() && input.trim().is_empty() {
                continue;
            }
            params.push(Value::parse(column, input)?);
            columns.push(column);
        }

        Ok((columns, params))
    }
}
