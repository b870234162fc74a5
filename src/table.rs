use crate::row::{Row, Value};
use serde::Serialize;

/// Placeholder shown for null or missing cells.
pub const MISSING_CELL: &str = "-";

/// Dataset laid out for display: a `#` column of 1-based row numbers
/// followed by every known column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn build(rows: &[Row], columns: &[String]) -> Self {
        let mut headers = Vec::with_capacity(columns.len() + 1);
        headers.push("#".to_string());
        headers.extend(columns.iter().cloned());

        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut cells = Vec::with_capacity(columns.len() + 1);
                cells.push((i + 1).to_string());
                cells.extend(columns.iter().map(|c| match row.get(c) {
                    None | Some(Value::Null) => MISSING_CELL.to_string(),
                    Some(v) => v.to_string(),
                }));
                cells
            })
            .collect();

        TableView { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_numbered_and_gaps_marked() {
        let rows = vec![
            Row::from_iter([("a", Value::from("x")), ("b", Value::Number(2.5))]),
            Row::from_iter([("a", Value::Null)]),
        ];
        let columns = vec!["a".to_string(), "b".to_string()];
        let view = TableView::build(&rows, &columns);

        assert_eq!(view.headers, vec!["#", "a", "b"]);
        assert_eq!(view.rows[0], vec!["1", "x", "2.5"]);
        assert_eq!(view.rows[1], vec!["2", "-", "-"]);
    }

    #[test]
    fn empty_text_is_shown_as_is() {
        let rows = vec![Row::from_iter([("a", "")])];
        let view = TableView::build(&rows, &["a".to_string()]);
        assert_eq!(view.rows[0], vec!["1", ""]);
    }
}
