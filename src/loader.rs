use crate::row::{Dataset, Row, Value};
use csv::ReaderBuilder;
use thiserror::Error;

/// Reasons pasted CSV text cannot be turned into rows.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("No CSV Data Provided")]
    Empty,

    #[error("line {line}: expected {expected} fields, found {found}")]
    Malformed {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse pasted CSV text into a dataset.
///
/// The first record supplies the column names. Every other record becomes one
/// `Row` with `Value::Text` cells. Blank lines are skipped, but a record of
/// empty fields such as `,` is kept. Any record whose width differs from the
/// header aborts the whole parse.
///
/// # Examples
/// ```
/// use sheetlens::loader::parse_csv;
///
/// let rows = parse_csv("region,sales\nA,10\n\nB,20\n").unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].get("sales").unwrap().to_string(), "20");
/// ```
pub fn parse_csv(text: &str) -> Result<Dataset, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;

        if record.len() != headers.len() {
            return Err(InputError::Malformed {
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, field)| (h.as_str(), Value::from(field)))
            .collect();
        rows.push(row);
    }

    log::debug!("parsed {} CSV rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}
