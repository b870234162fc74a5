#![cfg(not(tarpaulin_include))]

use clap::Parser;
use log::{debug, info};
use sheetlens::aggregate::{Aggregation, AggregationSpec};
use sheetlens::chart::{ChartKind, ChartSeries, IndexPalette};
use sheetlens::columns::infer_columns;
use sheetlens::filter::{Filter, apply_filters};
use sheetlens::loader::parse_csv;
use sheetlens::pipeline::compute_with_columns;
use sheetlens::table::TableView;
use std::io::{self, Read};
use std::path::PathBuf;

/// Aggregate a CSV file from the command line
#[derive(Debug, Parser)]
#[command(name = "sheetlens")]
#[command(about = "Filter, group and aggregate CSV data")]
#[command(version)]
struct Args {
    /// CSV file to read; standard input when omitted
    input: Option<PathBuf>,

    /// Filter as column:operator:value, may be repeated
    #[arg(short, long = "filter")]
    filters: Vec<Filter>,

    /// Column to group rows by
    #[arg(short, long)]
    group: Option<String>,

    /// Column to aggregate; rows are counted when omitted
    #[arg(short, long)]
    value: Option<String>,

    /// Aggregation function
    #[arg(short, long, default_value = "Count")]
    agg: Aggregation,

    /// Chart type used for --svg
    #[arg(long, default_value = "Bar")]
    chart: ChartKind,

    /// Print chart data as JSON instead of a text table
    #[arg(long)]
    json: bool,

    /// Write the chart as SVG to this path
    #[arg(long)]
    svg: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let rows = parse_csv(&text)?;
    let columns = infer_columns(&rows);
    info!(
        "loaded {} rows, columns {:?}, numeric {:?}",
        rows.len(),
        columns.columns,
        columns.numeric
    );

    if args.group.is_none() {
        // Nothing to chart: show the filtered rows instead
        let kept: Vec<_> = apply_filters(&rows, &args.filters)
            .into_iter()
            .cloned()
            .collect();
        let table = TableView::build(&kept, &columns.columns);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&kept)?);
        } else {
            print_grid(&table.headers, &table.rows);
        }
        return Ok(());
    }

    let spec = AggregationSpec {
        group_column: args.group.clone(),
        value_column: args.value.clone(),
        aggregation: args.agg,
        chart: args.chart,
    };
    let Some(series) =
        compute_with_columns(&rows, &columns, &args.filters, &spec, &mut IndexPalette)
    else {
        eprintln!("no rows match the given filters");
        return Ok(());
    };
    debug!("chart has {} groups", series.labels.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else {
        print_series(&series);
    }

    if let Some(path) = &args.svg {
        write_svg(&series, args.chart, path)?;
    }

    Ok(())
}

fn print_series(series: &ChartSeries) {
    let mut headers = vec![String::new()];
    headers.extend(series.datasets.iter().map(|d| d.label.clone()));

    let rows: Vec<Vec<String>> = series
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut cells = vec![label.clone()];
            cells.extend(
                series
                    .datasets
                    .iter()
                    .map(|d| d.data.get(i).map(|v| format!("{}", v)).unwrap_or_default()),
            );
            cells
        })
        .collect();

    print_grid(&headers, &rows);
}

fn print_grid(headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers).trim_end());
    for row in rows {
        println!("{}", line(row).trim_end());
    }
}

#[cfg(feature = "web")]
fn write_svg(
    series: &ChartSeries,
    kind: ChartKind,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use sheetlens::graph::{GraphOptions, render_svg};

    let title = series
        .datasets
        .first()
        .map_or_else(|| "Chart".to_string(), |d| d.label.clone());
    let options = GraphOptions {
        title,
        ..GraphOptions::default()
    };
    std::fs::write(path, render_svg(series, kind, &options)?)?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(not(feature = "web"))]
fn write_svg(
    _series: &ChartSeries,
    _kind: ChartKind,
    _path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("SVG output needs the `web` feature".into())
}
