use crate::row::{Row, parse_number};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown filter operator: {0:?}")]
    UnknownOperator(String),

    #[error("no filter at position {0}")]
    NoSuchFilter(usize),

    #[error("filter must look like column:operator:value, got {0:?}")]
    BadExpression(String),
}

/// Comparison applied by a [`Filter`].
///
/// The set is closed: anything else is rejected when the filter is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::Contains,
    ];

    /// Symbol shown in the filter picker.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "≠",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => "≥",
            Operator::LessOrEqual => "≤",
            Operator::Contains => "contains",
        }
    }

    /// Test a lowercased cell against a lowercased target.
    fn test(self, cell: &str, target: &str) -> bool {
        match self {
            Operator::Equals => cell == target,
            Operator::NotEquals => cell != target,
            Operator::Contains => cell.contains(target),
            Operator::GreaterThan => compare(cell, target, |a, b| a > b),
            Operator::LessThan => compare(cell, target, |a, b| a < b),
            Operator::GreaterOrEqual => compare(cell, target, |a, b| a >= b),
            Operator::LessOrEqual => compare(cell, target, |a, b| a <= b),
        }
    }
}

// Ordering operators only hold when both sides are numbers.
fn compare(cell: &str, target: &str, op: impl Fn(f64, f64) -> bool) -> bool {
    match (parse_number(cell), parse_number(target)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" | "equals" => Operator::Equals,
            "≠" | "!=" | "<>" | "ne" | "not-equals" => Operator::NotEquals,
            ">" | "gt" | "greater-than" => Operator::GreaterThan,
            "<" | "lt" | "less-than" => Operator::LessThan,
            "≥" | ">=" | "gte" | "greater-or-equal" => Operator::GreaterOrEqual,
            "≤" | "<=" | "lte" | "less-or-equal" => Operator::LessOrEqual,
            "contains" => Operator::Contains,
            _ => return Err(FilterError::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

impl TryFrom<String> for Operator {
    type Error = FilterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.symbol().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `column operator value` predicate.
///
/// Matching is case-insensitive: both the cell text and `value` are lowercased
/// before comparison, and a missing cell reads as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
}

impl Filter {
    pub fn new(
        column: impl Into<String>,
        operator: &str,
        value: impl Into<String>,
    ) -> Result<Self, FilterError> {
        Ok(Filter {
            column: column.into(),
            operator: operator.parse()?,
            value: value.into(),
        })
    }

    pub fn matches(&self, row: &Row) -> bool {
        let cell = row
            .get(&self.column)
            .map(|v| v.to_string().to_lowercase())
            .unwrap_or_default();
        self.operator.test(&cell, &self.value.to_lowercase())
    }
}

/// Parses `column:operator:value`; the value may itself contain colons.
impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(column), Some(op), Some(value)) => Filter::new(column.trim(), op, value),
            _ => Err(FilterError::BadExpression(s.to_string())),
        }
    }
}

/// Rows that pass every filter, in their original order.
pub fn apply_filters<'a>(rows: &'a [Row], filters: &[Filter]) -> Vec<&'a Row> {
    rows.iter()
        .filter(|row| filters.iter().all(|f| f.matches(row)))
        .collect()
}
