use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single scalar cell of a row.
///
/// Rows coming back from the cleaning service are loosely typed JSON, so every
/// cell is normalised into one of these variants on the way in. Nested arrays
/// and objects are kept as `Text` holding their JSON encoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// An ordered table: one `Row` per record, no declared schema.
pub type Dataset = Vec<Row>;

/// Parses a cell string as a finite number.
///
/// Surrounding whitespace is ignored. Blank strings, non-numeric text and
/// non-finite results (`inf`, `NaN`) all yield `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Value {
    /// A value is present unless it is null or the empty string.
    pub fn is_present(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Numeric reading of this value, if it has one. Booleans read as `1`/`0`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => parse_number(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::Text(s),
            nested => Value::Text(nested.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// One record, keyed by column name.
///
/// Keys keep their insertion order; rows need not share the same keys.
/// A repeated key in the input replaces the earlier value in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Row {
            fields: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Sets a column, replacing an earlier value for the same key in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Value for a column; `None` when the row does not carry the key.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut row = Row::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_parsing_is_strict_about_finiteness() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("-.5"), Some(-0.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn presence_ignores_null_and_empty_text() {
        assert!(!Value::Null.is_present());
        assert!(!Value::from("").is_present());
        assert!(Value::from(" ").is_present());
        assert!(Value::from(0.0).is_present());
        assert!(Value::from(false).is_present());
    }

    #[test]
    fn display_matches_cell_text() {
        assert_eq!(Value::from(10.0).to_string(), "10");
        assert_eq!(Value::from(10.5).to_string(), "10.5");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn row_keeps_key_order_through_json() {
        let row: Row = serde_json::from_str(r#"{"b": 1, "a": "x", "c": null, "b": 2}"#).unwrap();
        let keys: Vec<&str> = row.columns().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(row.get("b"), Some(&Value::Number(2.0)));
        assert_eq!(row.get("c"), Some(&Value::Null));
        assert_eq!(row.get("zzz"), None);

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"b":2.0,"a":"x","c":null}"#);
    }

    #[test]
    fn booleans_read_as_one_and_zero() {
        assert_eq!(Value::from(true).as_number(), Some(1.0));
        assert_eq!(Value::from(false).as_number(), Some(0.0));
        assert_eq!(Value::Null.as_number(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn nested_json_is_kept_as_text() {
        let row: Row = serde_json::from_str(r#"{"tags": [1, 2]}"#).unwrap();
        assert_eq!(row.get("tags"), Some(&Value::Text("[1,2]".to_string())));
    }
}
