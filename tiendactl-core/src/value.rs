//! Cell values moving between input fields and the database.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Result, StoreError};
use crate::schema::{Column, ColumnKind};

/// Display/storage format for timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIMESTAMP_INPUT_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// A single fetched row, in select-list order
pub type Row = Vec<Value>;

/// One bound parameter or fetched cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Real(f64),
    Decimal(Decimal),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Convert field text for a column.
    ///
    /// Text columns keep the input verbatim. Other columns trim the input,
    /// map empty to NULL and reject anything that does not parse.
    pub fn parse(column: &Column, input: &str) -> Result<Value> {
        if column.kind.is_textual() {
            return Ok(Value::Text(input.to_string()));
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }

        match column.kind {
            ColumnKind::Integer => trimmed.parse::<i64>().map(Value::Int).map_err(|_| {
                StoreError::invalid_value(column.name, input, "not an integer")
            }),
            // rounded to the declared scale the way MySQL stores it, so
            // SQLite keeps exactly what is displayed
            ColumnKind::Decimal { scale, .. } => Decimal::from_str(trimmed)
                .map(|d| {
                    let mut d = d.round_dp_with_strategy(
                        u32::from(scale),
                        RoundingStrategy::MidpointAwayFromZero,
                    );
                    d.rescale(u32::from(scale));
                    Value::Decimal(d)
                })
                .map_err(|_| StoreError::invalid_value(column.name, input, "not a decimal number")),
            ColumnKind::Timestamp => parse_timestamp(trimmed)
                .map(Value::Timestamp)
                .ok_or_else(|| {
                    StoreError::invalid_value(column.name, input, "expected YYYY-MM-DD [HH:MM[:SS]]")
                }),
            ColumnKind::Varchar(_) | ColumnKind::Text => Ok(Value::Text(input.to_string())),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Interpret as a row identifier
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Value::Int(id) => Some(*id),
            Value::Text(text) => text.trim().parse().ok(),
            Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }

    /// Render for display, honoring the column's declared kind.
    ///
    /// SQLite hands decimals back as REAL or INTEGER, so the scale is
    /// reapplied here to keep `9.99` and `10.00` looking the same on
    /// either backend.
    pub fn render(&self, kind: Option<ColumnKind>) -> String {
        match (self, kind) {
            (Value::Null, _) => String::new(),
            (Value::Decimal(d), Some(ColumnKind::Decimal { scale, .. })) => {
                let mut d =
                    d.round_dp_with_strategy(scale as u32, RoundingStrategy::MidpointAwayFromZero);
                d.rescale(scale as u32);
                d.to_string()
            }
            (Value::Int(i), Some(ColumnKind::Decimal { scale, .. })) => {
                let mut d = Decimal::from(*i);
                d.rescale(scale as u32);
                d.to_string()
            }
            (Value::Real(f), Some(ColumnKind::Decimal { scale, .. })) => {
                format!("{:.*}", scale as usize, f)
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Timestamp(v) => write!(f, "{}", v.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// Accepts full timestamps or a bare date (midnight)
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityKind;

    fn column(kind: EntityKind, name: &str) -> &'static Column {
        kind.descriptor().column(name).unwrap()
    }

    #[test]
    fn text_is_kept_verbatim() {
        let col = column(EntityKind::Customer, "direccion");
        assert_eq!(
            Value::parse(col, "  Main St 1 ").unwrap(),
            Value::Text("  Main St 1 ".into())
        );
        assert_eq!(Value::parse(col, "").unwrap(), Value::Text(String::new()));
    }

    #[test]
    fn numeric_columns_parse_per_kind() {
        let stock = column(EntityKind::Product, "stock");
        let price = column(EntityKind::Product, "precio");

        assert_eq!(Value::parse(stock, " 10 ").unwrap(), Value::Int(10));
        assert_eq!(
            Value::parse(price, "9.99").unwrap(),
            Value::Decimal(Decimal::new(999, 2))
        );
    }

    #[test]
    fn decimals_are_rounded_to_column_scale() {
        let price = column(EntityKind::Product, "precio");

        assert_eq!(Value::parse(price, "9.999").unwrap().to_string(), "10.00");
        assert_eq!(Value::parse(price, "0.125").unwrap().to_string(), "0.13");
        assert_eq!(Value::parse(price, "-0.125").unwrap().to_string(), "-0.13");
        assert_eq!(Value::parse(price, "3").unwrap().to_string(), "3.00");
    }

    #[test]
    fn empty_numeric_input_is_null() {
        let customer = column(EntityKind::Sale, "cliente_id");
        assert!(Value::parse(customer, "   ").unwrap().is_null());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let price = column(EntityKind::Product, "precio");
        let err = Value::parse(price, "nine").unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { .. }));

        let stock = column(EntityKind::Product, "stock");
        assert!(Value::parse(stock, "1.5").is_err());
    }

    #[test]
    fn timestamps_accept_date_or_datetime() {
        let fecha = column(EntityKind::Sale, "fecha");
        let midnight = Value::parse(fecha, "2024-05-01").unwrap();
        assert_eq!(midnight.to_string(), "2024-05-01 00:00:00");

        let exact = Value::parse(fecha, "2024-05-01 13:45").unwrap();
        assert_eq!(exact.to_string(), "2024-05-01 13:45:00");

        assert!(Value::parse(fecha, "01/05/2024").is_err());
    }

    #[test]
    fn decimals_render_with_column_scale() {
        let kind = Some(ColumnKind::Decimal {
            precision: 10,
            scale: 2,
        });
        assert_eq!(Value::Real(9.99).render(kind), "9.99");
        assert_eq!(Value::Int(10).render(kind), "10.00");
        assert_eq!(Value::Decimal(Decimal::new(99, 1)).render(kind), "9.90");
        assert_eq!(Value::Null.render(kind), "");
    }

    #[test]
    fn ids_come_from_int_or_text() {
        assert_eq!(Value::Int(7).as_id(), Some(7));
        assert_eq!(Value::Text("12".into()).as_id(), Some(12));
        assert_eq!(Value::Null.as_id(), None);
    }
}
