use sheetlens::aggregate::{Aggregation, AggregationSpec};
use sheetlens::chart::{ChartKind, IndexPalette, NUMERIC_SERIES_COLOR};
use sheetlens::filter::Filter;
use sheetlens::loader::parse_csv;
use sheetlens::pipeline::compute;
use sheetlens::row::Row;

fn spec(group: &str, value: Option<&str>, aggregation: Aggregation) -> AggregationSpec {
    AggregationSpec {
        group_column: Some(group.to_string()),
        value_column: value.map(str::to_string),
        aggregation,
        chart: ChartKind::Bar,
    }
}

fn regions() -> Vec<Row> {
    parse_csv("region,sales\nA,10\nA,20\nB,x\n").unwrap()
}

#[test]
fn sum_gives_zero_for_groups_without_numbers() {
    let rows = regions();
    let chart = compute(
        &rows,
        &[],
        &spec("region", Some("sales"), Aggregation::Sum),
        &mut IndexPalette,
    )
    .unwrap();

    assert_eq!(chart.labels, vec!["A", "B"]);
    assert_eq!(chart.datasets.len(), 1);
    assert_eq!(chart.datasets[0].label, "Sum(sales)");
    assert_eq!(chart.datasets[0].data, vec![30.0, 0.0]);
    assert_eq!(chart.datasets[0].background_color, NUMERIC_SERIES_COLOR);
}

#[test]
fn filter_narrows_groups() {
    let rows = regions();
    let filters = [Filter::new("region", "=", "a").unwrap()];
    let chart = compute(
        &rows,
        &filters,
        &spec("region", Some("sales"), Aggregation::Avg),
        &mut IndexPalette,
    )
    .unwrap();

    assert_eq!(chart.labels, vec!["A"]);
    assert_eq!(chart.datasets[0].data, vec![15.0]);
}

#[test]
fn count_without_value_column() {
    let rows = regions();
    let chart = compute(
        &rows,
        &[],
        &spec("region", None, Aggregation::Sum),
        &mut IndexPalette,
    )
    .unwrap();

    assert_eq!(chart.datasets[0].label, "Count");
    assert_eq!(chart.datasets[0].data, vec![2.0, 1.0]);
}

#[test]
fn categorical_values_become_one_dataset_each() {
    let rows = parse_csv("team,result\nred,win\nblue,loss\nred,loss\nred,win\n").unwrap();
    let chart = compute(
        &rows,
        &[],
        &spec("team", Some("result"), Aggregation::Count),
        &mut IndexPalette,
    )
    .unwrap();

    assert_eq!(chart.labels, vec!["red", "blue"]);
    let labels: Vec<_> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["win", "loss"]);
    assert_eq!(chart.datasets[0].data, vec![2.0, 0.0]);
    assert_eq!(chart.datasets[1].data, vec![1.0, 1.0]);
    assert_ne!(
        chart.datasets[0].background_color,
        chart.datasets[1].background_color
    );
}

#[test]
fn same_inputs_give_same_chart() {
    let rows = regions();
    let s = spec("region", Some("sales"), Aggregation::Median);
    let first = compute(&rows, &[], &s, &mut IndexPalette);
    let second = compute(&rows, &[], &s, &mut IndexPalette);
    assert_eq!(first, second);
}

#[test]
fn no_chart_without_group_column() {
    let rows = regions();
    let mut s = spec("region", Some("sales"), Aggregation::Sum);
    s.group_column = None;
    assert!(compute(&rows, &[], &s, &mut IndexPalette).is_none());

    s.group_column = Some(String::new());
    assert!(compute(&rows, &[], &s, &mut IndexPalette).is_none());
}

#[test]
fn no_chart_when_every_row_is_filtered_out() {
    let rows = regions();
    let filters = [Filter::new("region", "=", "zzz").unwrap()];
    let s = spec("region", None, Aggregation::Count);
    assert!(compute(&rows, &filters, &s, &mut IndexPalette).is_none());
    assert!(compute(&[], &[], &s, &mut IndexPalette).is_none());
}

#[test]
fn chart_serializes_with_background_color_key() {
    let rows = regions();
    let chart = compute(
        &rows,
        &[],
        &spec("region", None, Aggregation::Count),
        &mut IndexPalette,
    )
    .unwrap();
    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["labels"][1], "B");
    assert_eq!(json["datasets"][0]["backgroundColor"], NUMERIC_SERIES_COLOR);
}

#[test]
fn record_of_empty_cells_counts_under_empty_label() {
    let rows = parse_csv("region,sales\nA,10\n,\nB,20\n").unwrap();
    assert_eq!(rows.len(), 3);

    let chart = compute(
        &rows,
        &[],
        &spec("region", None, Aggregation::Count),
        &mut IndexPalette,
    )
    .unwrap();
    assert_eq!(chart.labels, vec!["A", "", "B"]);
    assert_eq!(chart.datasets[0].data, vec![1.0, 1.0, 1.0]);
}
