//! # Listing Queries
//!
//! A [`Query`] is the listing half of the remote collection API:
//!
//! ```text
//! SELECT * FROM <collection> [WHERE field = value] ORDER BY <field> [DESC]
//! ```
//!
//! Records are compared through their `serde_json` representation, so a query
//! can name any serialized field.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Equality filter plus ordering for a collection listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Option<(String, Value)>,
    pub order_by: String,
    pub direction: Direction,
}

impl Query {
    /// `SELECT * ORDER BY field ASC`.
    pub fn ordered_by(field: impl Into<String>) -> Self {
        Self {
            filter: None,
            order_by: field.into(),
            direction: Direction::Asc,
        }
    }

    /// Adds `WHERE field = value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = Direction::Desc;
        self
    }

    /// True if the record passes the filter. Unserializable records never match.
    pub fn matches<T: Serialize>(&self, record: &T) -> bool {
        let Some((field, expected)) = &self.filter else {
            return true;
        };
        match serde_json::to_value(record) {
            Ok(row) => row.get(field) == Some(expected),
            Err(_) => false,
        }
    }

    /// Filters and sorts `records`. The sort is stable, so ties keep
    /// insertion order.
    pub fn apply<T: Serialize + Clone>(&self, records: &[T]) -> Vec<T> {
        let mut rows: Vec<(Value, T)> = records
            .iter()
            .filter(|r| self.matches(*r))
            .map(|r| {
                let key = serde_json::to_value(r)
                    .ok()
                    .and_then(|v| v.get(&self.order_by).cloned())
                    .unwrap_or(Value::Null);
                (key, r.clone())
            })
            .collect();

        rows.sort_by(|(a, _), (b, _)| {
            let ord = compare_values(a, b);
            match self.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
        rows.into_iter().map(|(_, r)| r).collect()
    }
}

fn rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON scalars: nulls first, then booleans, numbers, strings.
/// Arrays and objects compare equal among themselves.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct Row {
        id: u32,
        name: String,
        city: Option<String>,
    }

    fn row(id: u32, name: &str, city: Option<&str>) -> Row {
        Row {
            id,
            name: name.into(),
            city: city.map(Into::into),
        }
    }

    #[test]
    fn orders_by_string_field() {
        let rows = vec![row(1, "Zeta", None), row(2, "Acme", None), row(3, "Mid", None)];
        let names: Vec<_> = Query::ordered_by("name")
            .apply(&rows)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["Acme", "Mid", "Zeta"]);
    }

    #[test]
    fn descending_numeric_order() {
        let rows = vec![row(2, "b", None), row(10, "a", None), row(1, "c", None)];
        let ids: Vec<_> = Query::ordered_by("id")
            .descending()
            .apply(&rows)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, [10, 2, 1]);
    }

    #[test]
    fn equality_filter_and_nulls_first() {
        let rows = vec![
            row(1, "a", Some("Lisbon")),
            row(2, "b", None),
            row(3, "c", Some("Porto")),
            row(4, "d", Some("Lisbon")),
        ];
        let lisbon = Query::ordered_by("id").where_eq("city", "Lisbon").apply(&rows);
        assert_eq!(lisbon.iter().map(|r| r.id).collect::<Vec<_>>(), [1, 4]);

        let by_city = Query::ordered_by("city").apply(&rows);
        assert_eq!(by_city[0].id, 2);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let rows = vec![row(5, "same", None), row(3, "same", None), row(9, "same", None)];
        let ids: Vec<_> = Query::ordered_by("name")
            .apply(&rows)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, [5, 3, 9]);
    }
}
