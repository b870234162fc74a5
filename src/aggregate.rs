use crate::chart::ChartKind;
use crate::columns::ColumnSet;
use crate::row::{Row, Value};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Label used for rows that have no value in the group or value column.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Reduction applied to each group's numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregation {
    #[default]
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Median,
    #[serde(rename = "Distinct Count", alias = "DistinctCount")]
    DistinctCount,
}

impl Aggregation {
    pub const ALL: [Aggregation; 7] = [
        Aggregation::Count,
        Aggregation::Sum,
        Aggregation::Avg,
        Aggregation::Min,
        Aggregation::Max,
        Aggregation::Median,
        Aggregation::DistinctCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Count => "Count",
            Aggregation::Sum => "Sum",
            Aggregation::Avg => "Avg",
            Aggregation::Min => "Min",
            Aggregation::Max => "Max",
            Aggregation::Median => "Median",
            Aggregation::DistinctCount => "Distinct Count",
        }
    }

    /// Reduce a group's readings to one number.
    ///
    /// An empty slice reduces to `0.0` for every function.
    pub fn reduce(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            Aggregation::Count => values.len() as f64,
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Avg => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Median => {
                let sorted = sorted(values);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 1 {
                    sorted[mid]
                } else {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                }
            }
            Aggregation::DistinctCount => {
                let mut sorted = sorted(values);
                sorted.dedup_by(|a, b| a == b);
                sorted.len() as f64
            }
        }
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| c.is_alphanumeric()).collect();
        Aggregation::ALL
            .into_iter()
            .find(|a| {
                let name: String = a.name().chars().filter(|c| !c.is_whitespace()).collect();
                name.eq_ignore_ascii_case(&wanted)
            })
            .or_else(|| wanted.eq_ignore_ascii_case("mean").then_some(Aggregation::Avg))
            .ok_or_else(|| format!("unknown aggregation: {}", s))
    }
}

/// What the chart should show: the grouping key, the optional value column,
/// the reduction, and the chart surface.
///
/// An empty column name is treated the same as no selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationSpec {
    pub group_column: Option<String>,
    pub value_column: Option<String>,
    pub aggregation: Aggregation,
    pub chart: ChartKind,
}

impl AggregationSpec {
    pub fn group(&self) -> Option<&str> {
        self.group_column.as_deref().filter(|c| !c.is_empty())
    }

    pub fn value(&self) -> Option<&str> {
        self.value_column.as_deref().filter(|c| !c.is_empty())
    }

    /// True when `other` would produce different chart data.
    ///
    /// The chart surface does not change the data shape, so it is ignored.
    pub fn data_differs(&self, other: &AggregationSpec) -> bool {
        self.group() != other.group()
            || self.value() != other.value()
            || self.aggregation != other.aggregation
    }
}

/// Result of grouping filtered rows.
#[derive(Clone, Debug, PartialEq)]
pub enum Grouping {
    /// Row counts per group, one series per distinct value of a categorical
    /// value column.
    Categorical {
        labels: Vec<String>,
        series: Vec<(String, Vec<f64>)>,
    },
    /// One reduced number per group.
    Numeric {
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

impl Grouping {
    pub fn labels(&self) -> &[String] {
        match self {
            Grouping::Categorical { labels, .. } | Grouping::Numeric { labels, .. } => labels,
        }
    }
}

fn label_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_LABEL.to_string(),
        Some(v) => v.to_string(),
    }
}

/// Partition rows by `group_column` and reduce each partition.
///
/// A numeric value column (per `columns`) takes the numeric branch: each
/// group collects the readings that parse as numbers, skipping the rest, and
/// reduces them with `aggregation`. With no value column every row
/// contributes an implicit `1`. A categorical value column instead counts rows
/// per (group, value) pair. Groups and series keep first-seen order.
pub fn group_rows(
    rows: &[&Row],
    group_column: &str,
    value_column: Option<&str>,
    aggregation: Aggregation,
    columns: &ColumnSet,
) -> Grouping {
    match value_column {
        Some(value_column) if !columns.is_numeric(value_column) => {
            group_categorical(rows, group_column, value_column)
        }
        _ => group_numeric(rows, group_column, value_column, aggregation),
    }
}

fn group_categorical(rows: &[&Row], group_column: &str, value_column: &str) -> Grouping {
    let mut labels: IndexSet<String> = IndexSet::new();
    let mut series: IndexMap<String, HashMap<String, usize>> = IndexMap::new();

    for row in rows {
        let x = label_of(row.get(group_column));
        let y = label_of(row.get(value_column));
        labels.insert(x.clone());
        *series.entry(y).or_default().entry(x).or_insert(0) += 1;
    }

    let labels: Vec<String> = labels.into_iter().collect();
    let series = series
        .into_iter()
        .map(|(name, counts)| {
            let data = labels
                .iter()
                .map(|x| counts.get(x).copied().unwrap_or(0) as f64)
                .collect();
            (name, data)
        })
        .collect();

    Grouping::Categorical { labels, series }
}

fn group_numeric(
    rows: &[&Row],
    group_column: &str,
    value_column: Option<&str>,
    aggregation: Aggregation,
) -> Grouping {
    let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();

    for row in rows {
        let readings = groups.entry(label_of(row.get(group_column))).or_default();
        match value_column {
            Some(column) => {
                if let Some(n) = row.get(column).and_then(Value::as_number) {
                    readings.push(n);
                }
            }
            None => readings.push(1.0),
        }
    }

    let (labels, values): (Vec<String>, Vec<f64>) = groups
        .into_iter()
        .map(|(label, readings)| (label, aggregation.reduce(&readings)))
        .unzip();

    Grouping::Numeric { labels, values }
}
