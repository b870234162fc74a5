#![cfg(feature = "web")]

use sheetlens::chart::{ChartDataset, ChartKind, ChartSeries};
use sheetlens::graph::{GraphOptions, parse_color, render_svg};

fn series() -> ChartSeries {
    ChartSeries {
        labels: vec!["North".into(), "South".into(), "East".into()],
        datasets: vec![
            ChartDataset {
                label: "web".into(),
                data: vec![3.0, 1.0, 2.0],
                background_color: "#4e79a7".into(),
            },
            ChartDataset {
                label: "shop".into(),
                data: vec![0.0, 4.0, 1.0],
                background_color: "#f28e2b".into(),
            },
        ],
    }
}

#[test]
fn bar_chart_draws_rectangles() {
    let svg = render_svg(&series(), ChartKind::Bar, &GraphOptions::default()).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<rect"));
    assert!(svg.contains("width=\"800\""));
}

#[test]
fn line_chart_draws_polylines() {
    let svg = render_svg(&series(), ChartKind::Line, &GraphOptions::default()).unwrap();
    assert!(svg.contains("<polyline"));
    assert!(svg.contains("<circle"));
}

#[test]
fn pie_chart_draws_slices() {
    let svg = render_svg(&series(), ChartKind::Pie, &GraphOptions::default()).unwrap();
    assert!(svg.contains("<polygon"));
}

#[test]
fn pie_chart_with_nothing_positive_is_blank() {
    let mut series = series();
    series.datasets[0].data = vec![0.0, 0.0, 0.0];
    let svg = render_svg(&series, ChartKind::Pie, &GraphOptions::default()).unwrap();
    assert!(!svg.contains("<polygon"));
}

#[test]
fn options_set_canvas_size() {
    let options = GraphOptions {
        title: "Sales".into(),
        width: 400,
        height: 300,
    };
    let svg = render_svg(&series(), ChartKind::Bar, &options).unwrap();
    assert!(svg.contains("width=\"400\""));
    assert!(svg.contains("height=\"300\""));
}

#[test]
fn dataset_colors_reach_the_svg() {
    assert_eq!(parse_color("#4e79a7").0, 0x4e);
    let svg = render_svg(&series(), ChartKind::Bar, &GraphOptions::default()).unwrap();
    assert!(svg.to_uppercase().contains("#4E79A7"));
}
