//! Record filters
//!
//! The record store is queried with small predicate trees built from
//! `eq`, `neq`, `gte`, `lte`, `and` and `or` over named fields. Each table
//! declares its own field enum; records implement [`Filterable`] so the
//! in-memory stores can evaluate a filter directly, while the PostgreSQL
//! adapters translate the same tree into SQL.
//!
//! # Semantics
//!
//! - Values of different kinds never compare equal and never order.
//! - `Null` equals only `Null`, so `Filter::neq(field, FieldValue::Null)`
//!   reads as "field is set".
//! - `Gte`/`Lte` against a `Null` operand never match.
//!
//! ```rust
//! use core_kernel::{Filter, FieldValue};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Field { Origin, Destination }
//!
//! let filter = Filter::eq(Field::Origin, "Pune").or(Filter::eq(Field::Destination, "Pune"));
//! assert!(matches!(filter, Filter::Or(_, _)));
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A single field value as seen by the filter evaluator
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Compares two values of the same kind; `None` for mismatched kinds
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Some(Ordering::Equal),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Decimal(a), FieldValue::Decimal(b)) => Some(a.cmp(b)),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// A record whose fields can be read by name
pub trait Filterable<F> {
    /// Returns the current value of `field`
    fn field_value(&self, field: F) -> FieldValue;
}

/// Predicate tree over the fields `F` of one table
#[derive(Debug, Clone, PartialEq)]
pub enum Filter<F> {
    /// Matches every record
    All,
    Eq(F, FieldValue),
    Neq(F, FieldValue),
    Gte(F, FieldValue),
    Lte(F, FieldValue),
    And(Box<Filter<F>>, Box<Filter<F>>),
    Or(Box<Filter<F>>, Box<Filter<F>>),
}

impl<F> Default for Filter<F> {
    fn default() -> Self {
        Filter::All
    }
}

impl<F: Copy> Filter<F> {
    pub fn eq(field: F, value: impl Into<FieldValue>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn neq(field: F, value: impl Into<FieldValue>) -> Self {
        Filter::Neq(field, value.into())
    }

    pub fn gte(field: F, value: impl Into<FieldValue>) -> Self {
        Filter::Gte(field, value.into())
    }

    pub fn lte(field: F, value: impl Into<FieldValue>) -> Self {
        Filter::Lte(field, value.into())
    }

    /// Matches records where `field` holds any non-null value
    pub fn is_set(field: F) -> Self {
        Filter::Neq(field, FieldValue::Null)
    }

    /// Conjunction; `All` is the identity
    pub fn and(self, other: Filter<F>) -> Self {
        match (self, other) {
            (Filter::All, other) => other,
            (this, Filter::All) => this,
            (this, other) => Filter::And(Box::new(this), Box::new(other)),
        }
    }

    /// Disjunction; `All` absorbs the other side
    pub fn or(self, other: Filter<F>) -> Self {
        match (self, other) {
            (Filter::All, _) | (_, Filter::All) => Filter::All,
            (this, other) => Filter::Or(Box::new(this), Box::new(other)),
        }
    }

    /// Evaluates the filter against a record
    pub fn matches<R: Filterable<F>>(&self, record: &R) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => {
                record.field_value(*field).compare(value) == Some(Ordering::Equal)
            }
            Filter::Neq(field, value) => {
                record.field_value(*field).compare(value) != Some(Ordering::Equal)
            }
            Filter::Gte(field, value) => !value.is_null()
                && matches!(
                    record.field_value(*field).compare(value),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
            Filter::Lte(field, value) => !value.is_null()
                && matches!(
                    record.field_value(*field).compare(value),
                    Some(Ordering::Less | Ordering::Equal)
                ),
            Filter::And(left, right) => left.matches(record) && right.matches(record),
            Filter::Or(left, right) => left.matches(record) || right.matches(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        Name,
        Weight,
        Tag,
        At,
    }

    struct Row {
        name: &'static str,
        weight: Decimal,
        tag: Option<&'static str>,
        at: DateTime<Utc>,
    }

    impl Filterable<Field> for Row {
        fn field_value(&self, field: Field) -> FieldValue {
            match field {
                Field::Name => self.name.into(),
                Field::Weight => self.weight.into(),
                Field::Tag => self.tag.into(),
                Field::At => self.at.into(),
            }
        }
    }

    fn row() -> Row {
        Row {
            name: "Nagpur",
            weight: dec!(12.5),
            tag: None,
            at: Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_eq_and_neq() {
        let r = row();
        assert!(Filter::eq(Field::Name, "Nagpur").matches(&r));
        assert!(!Filter::eq(Field::Name, "Pune").matches(&r));
        assert!(Filter::neq(Field::Name, "Pune").matches(&r));
    }

    #[test]
    fn test_is_set_treats_null_as_unset() {
        let mut r = row();
        assert!(!Filter::is_set(Field::Tag).matches(&r));
        r.tag = Some("x");
        assert!(Filter::is_set(Field::Tag).matches(&r));
    }

    #[test]
    fn test_range_on_timestamps() {
        let r = row();
        let from = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        let filter = Filter::gte(Field::At, from).and(Filter::lte(Field::At, to));
        assert!(filter.matches(&r));

        let later = Filter::gte(Field::At, to);
        assert!(!later.matches(&r));
    }

    #[test]
    fn test_mismatched_kinds_never_match() {
        let r = row();
        assert!(!Filter::eq(Field::Weight, "12.5").matches(&r));
        assert!(!Filter::gte(Field::Weight, FieldValue::Null).matches(&r));
        assert!(Filter::gte(Field::Weight, dec!(12.5)).matches(&r));
    }

    #[test]
    fn test_all_is_identity_for_and_absorbing_for_or() {
        let eq = Filter::eq(Field::Name, "Nagpur");
        assert_eq!(Filter::All.and(eq.clone()), eq);
        assert_eq!(eq.clone().or(Filter::All), Filter::All);
    }

    #[test]
    fn test_or_matches_either_side() {
        let r = row();
        let filter = Filter::eq(Field::Name, "Pune").or(Filter::eq(Field::Name, "Nagpur"));
        assert!(filter.matches(&r));
    }
}
