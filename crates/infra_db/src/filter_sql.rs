//! Filter to SQL translation
//!
//! Renders a [`Filter`] tree as a parenthesised `WHERE` clause on a
//! `sqlx::QueryBuilder`. Every value is bound as a parameter. The rendered
//! SQL agrees with `Filter::matches`:
//!
//! - `Eq(col, Null)` is `col IS NULL`, `Neq(col, Null)` is `col IS NOT NULL`
//! - `Neq(col, v)` also matches rows where `col` is NULL
//! - a value whose kind does not match the column's kind never compares
//!   equal and never orders, so it renders as a constant
//! - text ordering uses the `"C"` collation, i.e. byte order

use sqlx::{Postgres, QueryBuilder};

use core_kernel::{FieldValue, Filter};
use domain_loads::LoadField;
use domain_receipts::ReceiptField;

/// Storage kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Decimal,
    Timestamp,
}

/// A filterable field backed by a table column
pub trait SqlColumn: Copy {
    fn column(self) -> &'static str;
    fn kind(self) -> ColumnKind;
}

impl SqlColumn for LoadField {
    fn column(self) -> &'static str {
        match self {
            LoadField::CurrentLocation => "current_location",
            LoadField::DestinationLocation => "destination_location",
            LoadField::Weight => "weight",
            LoadField::TruckLength => "truck_length",
            LoadField::ContactNumber => "contact_number",
            LoadField::CreatedAt => "created_at",
            LoadField::ReceiptStorageId => "receipt_storage_id",
        }
    }

    fn kind(self) -> ColumnKind {
        match self {
            LoadField::Weight | LoadField::TruckLength => ColumnKind::Decimal,
            LoadField::CreatedAt => ColumnKind::Timestamp,
            _ => ColumnKind::Text,
        }
    }
}

impl SqlColumn for ReceiptField {
    fn column(self) -> &'static str {
        match self {
            ReceiptField::StorageReference => "storage_reference",
            ReceiptField::CreatedAt => "created_at",
        }
    }

    fn kind(self) -> ColumnKind {
        match self {
            ReceiptField::StorageReference => ColumnKind::Text,
            ReceiptField::CreatedAt => ColumnKind::Timestamp,
        }
    }
}

fn value_kind(value: &FieldValue) -> Option<ColumnKind> {
    match value {
        FieldValue::Null => None,
        FieldValue::Text(_) => Some(ColumnKind::Text),
        FieldValue::Decimal(_) => Some(ColumnKind::Decimal),
        FieldValue::Timestamp(_) => Some(ColumnKind::Timestamp),
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Text(s) => qb.push_bind(s.clone()),
        FieldValue::Decimal(d) => qb.push_bind(*d),
        FieldValue::Timestamp(t) => qb.push_bind(*t),
        FieldValue::Null => qb.push("NULL"),
    };
}

fn push_comparison<F: SqlColumn>(
    qb: &mut QueryBuilder<'_, Postgres>,
    field: F,
    op: &str,
    value: &FieldValue,
) {
    if value_kind(value) != Some(field.kind()) {
        qb.push("FALSE");
        return;
    }
    qb.push(field.column());
    if field.kind() == ColumnKind::Text && op != "=" {
        qb.push(" COLLATE \"C\"");
    }
    qb.push(" ").push(op).push(" ");
    push_value(qb, value);
}

/// Appends `filter` to `qb` as a boolean SQL expression
pub fn push_filter<F: SqlColumn>(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter<F>) {
    match filter {
        Filter::All => {
            qb.push("TRUE");
        }
        Filter::Eq(field, FieldValue::Null) => {
            qb.push(field.column()).push(" IS NULL");
        }
        Filter::Neq(field, FieldValue::Null) => {
            qb.push(field.column()).push(" IS NOT NULL");
        }
        Filter::Eq(field, value) => push_comparison(qb, *field, "=", value),
        Filter::Neq(field, value) => {
            if value_kind(value) != Some(field.kind()) {
                qb.push("TRUE");
            } else {
                qb.push("(").push(field.column()).push(" IS NULL OR ");
                qb.push(field.column()).push(" <> ");
                push_value(qb, value);
                qb.push(")");
            }
        }
        Filter::Gte(field, value) => push_comparison(qb, *field, ">=", value),
        Filter::Lte(field, value) => push_comparison(qb, *field, "<=", value),
        Filter::And(left, right) => {
            qb.push("(");
            push_filter(qb, left);
            qb.push(" AND ");
            push_filter(qb, right);
            qb.push(")");
        }
        Filter::Or(left, right) => {
            qb.push("(");
            push_filter(qb, left);
            qb.push(" OR ");
            push_filter(qb, right);
            qb.push(")");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn render<F: SqlColumn>(filter: &Filter<F>) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("");
        push_filter(&mut qb, filter);
        qb.sql().to_string()
    }

    #[test]
    fn test_null_comparisons() {
        assert_eq!(
            render(&Filter::is_set(LoadField::ReceiptStorageId)),
            "receipt_storage_id IS NOT NULL"
        );
        assert_eq!(
            render(&Filter::eq(LoadField::ReceiptStorageId, FieldValue::Null)),
            "receipt_storage_id IS NULL"
        );
    }

    #[test]
    fn test_values_are_bound() {
        let filter = Filter::eq(LoadField::CurrentLocation, "Pune")
            .or(Filter::eq(LoadField::DestinationLocation, "Pune"))
            .and(Filter::gte(LoadField::CreatedAt, Utc::now()));
        assert_eq!(
            render(&filter),
            "((current_location = $1 OR destination_location = $2) AND created_at >= $3)"
        );
    }

    #[test]
    fn test_neq_includes_nulls() {
        assert_eq!(
            render(&Filter::neq(ReceiptField::StorageReference, "x")),
            "(storage_reference IS NULL OR storage_reference <> $1)"
        );
    }

    #[test]
    fn test_kind_mismatch_renders_constant() {
        assert_eq!(render(&Filter::eq(LoadField::Weight, "heavy")), "FALSE");
        assert_eq!(render(&Filter::neq(LoadField::Weight, "heavy")), "TRUE");
        assert_eq!(render(&Filter::gte(LoadField::CreatedAt, dec!(1))), "FALSE");
        assert_eq!(render(&Filter::lte(LoadField::CreatedAt, FieldValue::Null)), "FALSE");
    }

    #[test]
    fn test_text_ordering_uses_byte_collation() {
        assert_eq!(
            render(&Filter::gte(LoadField::CurrentLocation, "M")),
            "current_location COLLATE \"C\" >= $1"
        );
        assert_eq!(render::<LoadField>(&Filter::All), "TRUE");
    }
}
