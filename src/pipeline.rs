use crate::aggregate::{AggregationSpec, group_rows};
use crate::chart::{ChartSeries, Palette, project};
use crate::columns::{ColumnSet, infer_columns};
use crate::filter::{Filter, apply_filters};
use crate::row::Row;

/// Run the whole chart pipeline from scratch.
///
/// rows → inferred columns → filtered rows → grouped aggregates → chart.
/// Returns `None` when no group column is selected or no row survives the
/// filters.
///
/// # Examples
/// ```
/// use sheetlens::aggregate::{Aggregation, AggregationSpec};
/// use sheetlens::chart::IndexPalette;
/// use sheetlens::loader::parse_csv;
/// use sheetlens::pipeline::compute;
///
/// let rows = parse_csv("region,sales\nA,10\nA,20\nB,x").unwrap();
/// let spec = AggregationSpec {
///     group_column: Some("region".into()),
///     value_column: Some("sales".into()),
///     aggregation: Aggregation::Sum,
///     ..Default::default()
/// };
/// let chart = compute(&rows, &[], &spec, &mut IndexPalette).unwrap();
/// assert_eq!(chart.labels, vec!["A", "B"]);
/// assert_eq!(chart.datasets[0].data, vec![30.0, 0.0]);
/// ```
pub fn compute(
    rows: &[Row],
    filters: &[Filter],
    spec: &AggregationSpec,
    palette: &mut dyn Palette,
) -> Option<ChartSeries> {
    let columns = infer_columns(rows);
    compute_with_columns(rows, &columns, filters, spec, palette)
}

/// Same as [`compute`] but reuses an already inferred column set.
pub fn compute_with_columns(
    rows: &[Row],
    columns: &ColumnSet,
    filters: &[Filter],
    spec: &AggregationSpec,
    palette: &mut dyn Palette,
) -> Option<ChartSeries> {
    let group = spec.group()?;
    let filtered = apply_filters(rows, filters);
    if filtered.is_empty() {
        return None;
    }

    let grouping = group_rows(&filtered, group, spec.value(), spec.aggregation, columns);
    Some(project(grouping, spec, palette))
}
