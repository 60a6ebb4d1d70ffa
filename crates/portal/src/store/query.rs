//! Query description and result ordering shared by all store backends.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use super::{CollectionPath, Document, Fields};

/// Sort direction for an order-by clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Single-field ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Field to order by.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

/// A collection query: equality filters and an optional ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Collection to read.
    pub collection: CollectionPath,
    /// `field == value` constraints, all of which must hold.
    pub filters: Vec<(String, Value)>,
    /// Result ordering; insertion order when `None`.
    pub order_by: Option<OrderBy>,
}

impl Query {
    /// Query every document of a collection.
    #[must_use]
    pub const fn collection(collection: CollectionPath) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
        }
    }

    /// Add an equality filter.
    #[must_use]
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_owned(), value.into()));
        self
    }

    /// Set the result ordering.
    #[must_use]
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_owned(),
            direction,
        });
        self
    }

    /// Whether a document's fields satisfy every filter.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| fields.get(field) == Some(expected))
    }

    /// The filters as a JSON object, for containment queries.
    #[must_use]
    pub fn filter_object(&self) -> Fields {
        self.filters.iter().cloned().collect()
    }

    /// Order documents that are already in insertion order.
    ///
    /// Ascending ties keep insertion order; descending ties come out newest
    /// insertion first.
    pub fn sort(&self, docs: &mut [Document]) {
        let Some(order) = &self.order_by else {
            return;
        };
        docs.sort_by(|a, b| compare_values(a.fields.get(&order.field), b.fields.get(&order.field)));
        if order.direction == Direction::Descending {
            docs.reverse();
        }
    }
}

/// Compare two field values for ordering.
///
/// Missing and `null` values sort first. Numbers compare numerically, RFC 3339
/// timestamps chronologically, other strings lexically. Mixed types order by a
/// fixed type rank.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(tx), Some(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => type_rank(x).cmp(&type_rank(y)),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::encode;

    fn doc(id: &str, value: &Value) -> Document {
        Document {
            id: id.to_owned(),
            fields: encode(value).unwrap(),
        }
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_timestamps_compare_chronologically() {
        // Lexical order would put "...00Z" after "...00.500Z".
        let earlier = json!("2025-01-01T00:00:00Z");
        let later = json!("2025-01-01T00:00:00.500Z");
        assert_eq!(
            compare_values(Some(&earlier), Some(&later)),
            Ordering::Less
        );
    }

    #[test]
    fn test_missing_sorts_first() {
        let v = json!("a");
        assert_eq!(compare_values(None, Some(&v)), Ordering::Less);
        assert_eq!(compare_values(Some(&Value::Null), None), Ordering::Equal);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            compare_values(Some(&json!(9)), Some(&json!(10.5))),
            Ordering::Less
        );
    }

    #[test]
    fn test_descending_sort_puts_later_ties_first() {
        let mut docs = vec![
            doc("a", &json!({"n": 1})),
            doc("b", &json!({"n": 2})),
            doc("c", &json!({"n": 2})),
        ];
        let query = Query::collection(CollectionPath::root("x")).order_by("n", Direction::Descending);
        query.sort(&mut docs);
        assert_eq!(ids(&docs), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_matches_equality_filters() {
        let query = Query::collection(CollectionPath::root("orders")).where_eq("customerId", "c1");
        assert!(query.matches(&encode(&json!({"customerId": "c1"})).unwrap()));
        assert!(!query.matches(&encode(&json!({"customerId": "c2"})).unwrap()));
        assert!(!query.matches(&encode(&json!({})).unwrap()));
    }
}
