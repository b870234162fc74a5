use crate::row::Row;
use serde::Serialize;
use indexmap::IndexMap;

/// Share of present values that must read as numbers, as `numerator / denominator`.
///
/// Kept as an integer ratio so the 60% boundary is exact.
pub const NUMERIC_COVERAGE: (usize, usize) = (3, 5);

/// Columns observed in a dataset and which of them hold numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSet {
    /// Every key seen in any row, in first-seen order.
    pub columns: Vec<String>,
    /// The numeric subset, in the same order as `columns`.
    pub numeric: Vec<String>,
}

impl ColumnSet {
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }
}

#[derive(Default)]
struct Tally {
    present: usize,
    numeric: usize,
}

/// Derive the column set of a dataset and classify numeric columns.
///
/// A column is numeric when at least 60% of its present values (anything but
/// null, missing or `""`) have a numeric reading. Columns with no present
/// values are never numeric.
pub fn infer_columns(rows: &[Row]) -> ColumnSet {
    let mut tallies: IndexMap<&str, Tally> = IndexMap::new();

    for row in rows {
        for (column, value) in row.iter() {
            let tally = tallies.entry(column).or_default();
            if !value.is_present() {
                continue;
            }
            tally.present += 1;
            if value.as_number().is_some() {
                tally.numeric += 1;
            }
        }
    }

    let (num, den) = NUMERIC_COVERAGE;
    let numeric = tallies
        .iter()
        .filter(|(_, t)| t.present > 0 && t.numeric * den >= t.present * num)
        .map(|(c, _)| c.to_string())
        .collect();

    ColumnSet {
        columns: tallies.keys().map(|c| c.to_string()).collect(),
        numeric,
    }
}
