use crate::aggregate::{Aggregation, AggregationSpec};
use crate::chart::{ChartKind, ChartSeries, Palette};
use crate::columns::{ColumnSet, infer_columns};
use crate::filter::{Filter, FilterError};
use crate::pipeline::compute_with_columns;
use crate::row::{Dataset, Row};
use serde::{Deserialize, Serialize};

/// Column statistics returned by the cleaning service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub describe: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<serde_json::Map<String, serde_json::Value>>,
}

/// One user's working state: the dataset, its filters and the chart choice.
///
/// Every mutation that can change the chart data marks the cached chart
/// stale; [`Session::chart`] recomputes at most once per change.
pub struct Session {
    dataset: Dataset,
    columns: ColumnSet,
    filters: Vec<Filter>,
    spec: AggregationSpec,
    summary: Option<Summary>,
    palette: Box<dyn Palette + Send>,
    chart: Option<ChartSeries>,
    stale: bool,
}

impl Session {
    pub fn new(palette: Box<dyn Palette + Send>) -> Self {
        Session {
            dataset: Vec::new(),
            columns: ColumnSet::default(),
            filters: Vec::new(),
            spec: AggregationSpec::default(),
            summary: None,
            palette,
            chart: None,
            stale: true,
        }
    }

    pub fn dataset(&self) -> &[Row] {
        &self.dataset
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn spec(&self) -> &AggregationSpec {
        &self.spec
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Replace the dataset. Filters and chart settings are kept.
    pub fn set_dataset(&mut self, rows: Dataset) {
        self.columns = infer_columns(&rows);
        self.dataset = rows;
        self.stale = true;
        log::info!(
            "session dataset replaced: {} rows, {} columns ({} numeric)",
            self.dataset.len(),
            self.columns.columns.len(),
            self.columns.numeric.len()
        );
    }

    pub fn set_summary(&mut self, summary: Option<Summary>) {
        self.summary = summary;
    }

    /// Append an empty `column = ""` filter for the user to fill in.
    pub fn add_filter(&mut self) -> usize {
        self.filters.push(Filter::default());
        self.stale = true;
        self.filters.len() - 1
    }

    pub fn remove_filter(&mut self, index: usize) -> Result<Filter, FilterError> {
        if index >= self.filters.len() {
            return Err(FilterError::NoSuchFilter(index));
        }
        self.stale = true;
        Ok(self.filters.remove(index))
    }

    fn filter_mut(&mut self, index: usize) -> Result<&mut Filter, FilterError> {
        if index >= self.filters.len() {
            return Err(FilterError::NoSuchFilter(index));
        }
        self.stale = true;
        Ok(&mut self.filters[index])
    }

    pub fn set_filter_column(&mut self, index: usize, column: &str) -> Result<(), FilterError> {
        self.filter_mut(index)?.column = column.to_string();
        Ok(())
    }

    /// Change a filter's operator. Unknown operators leave the filter as it was.
    pub fn set_filter_operator(&mut self, index: usize, operator: &str) -> Result<(), FilterError> {
        let operator = operator.parse()?;
        self.filter_mut(index)?.operator = operator;
        Ok(())
    }

    pub fn set_filter_value(&mut self, index: usize, value: &str) -> Result<(), FilterError> {
        self.filter_mut(index)?.value = value.to_string();
        Ok(())
    }

    pub fn set_group_column(&mut self, column: Option<&str>) {
        self.update_spec(|spec| spec.group_column = column.map(str::to_string));
    }

    pub fn set_value_column(&mut self, column: Option<&str>) {
        self.update_spec(|spec| spec.value_column = column.map(str::to_string));
    }

    pub fn set_aggregation(&mut self, aggregation: Aggregation) {
        self.update_spec(|spec| spec.aggregation = aggregation);
    }

    pub fn set_chart_kind(&mut self, chart: ChartKind) {
        self.update_spec(|spec| spec.chart = chart);
    }

    /// Replace filters and spec in one go, keeping the cache if nothing that
    /// feeds the chart data changed.
    pub fn replace_view(&mut self, filters: Vec<Filter>, spec: AggregationSpec) {
        if filters != self.filters {
            self.filters = filters;
            self.stale = true;
        }
        self.update_spec(|current| *current = spec);
    }

    fn update_spec(&mut self, edit: impl FnOnce(&mut AggregationSpec)) {
        let before = self.spec.clone();
        edit(&mut self.spec);
        if before.data_differs(&self.spec) {
            self.stale = true;
        }
    }

    /// Current chart data, recomputed only if something it depends on changed.
    pub fn chart(&mut self) -> Option<&ChartSeries> {
        if self.stale {
            log::debug!(
                "recomputing chart: {} rows, {} filters, spec {:?}",
                self.dataset.len(),
                self.filters.len(),
                self.spec
            );
            self.chart = compute_with_columns(
                &self.dataset,
                &self.columns,
                &self.filters,
                &self.spec,
                self.palette.as_mut(),
            );
            self.stale = false;
        }
        self.chart.as_ref()
    }
}
