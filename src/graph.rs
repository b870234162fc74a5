#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use crate::chart::{ChartKind, ChartSeries, IndexPalette, Palette};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::f64::consts::{FRAC_PI_2, TAU};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Color used when a dataset color cannot be parsed.
const FALLBACK_COLOR: RGBAColor = RGBAColor(54, 162, 235, 0.6);

/// Configuration options for chart rendering
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            width: 800,
            height: 350,
        }
    }
}

/// Renders chart data as an SVG document
///
/// Bar charts draw one bar per dataset side by side within each group, line
/// charts draw one line per dataset, and pie charts draw the first dataset as
/// slices labelled with their group.
///
/// # Arguments
/// * `series` - Labels and datasets to draw
/// * `kind` - Which chart surface to use
/// * `options` - Title and pixel dimensions
///
/// # Returns
/// * A Result containing the SVG markup or a drawing error
///
/// # Examples
/// ```
/// use sheetlens::chart::{ChartDataset, ChartKind, ChartSeries};
/// use sheetlens::graph::{GraphOptions, render_svg};
///
/// let series = ChartSeries {
///     labels: vec!["A".into(), "B".into()],
///     datasets: vec![ChartDataset {
///         label: "Count".into(),
///         data: vec![2.0, 1.0],
///         background_color: "#4e79a7".into(),
///     }],
/// };
/// let svg = render_svg(&series, ChartKind::Bar, &GraphOptions::default()).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub fn render_svg(
    series: &ChartSeries,
    kind: ChartKind,
    options: &GraphOptions,
) -> Result<String, Box<dyn Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        match kind {
            ChartKind::Bar => draw_bars(&root, series, options)?,
            ChartKind::Line => draw_lines(&root, series, options)?,
            ChartKind::Pie => draw_pie(&root, series, options)?,
        }

        root.present()?;
    }
    Ok(svg)
}

fn draw_bars(
    root: &Area<'_>,
    series: &ChartSeries,
    options: &GraphOptions,
) -> Result<(), Box<dyn Error>> {
    let n = series.labels.len().max(1);
    let (min_y, max_y) = value_range(series);

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5..n as f64 - 0.5, min_y..max_y)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(&series.labels, *x))
        .draw()?;

    // Bars of one group share 80% of the slot
    let width = 0.8 / series.datasets.len().max(1) as f64;
    for (j, dataset) in series.datasets.iter().enumerate() {
        let color = parse_color(&dataset.background_color);
        let offset = -0.4 + j as f64 * width;

        chart
            .draw_series(dataset.data.iter().enumerate().map(|(i, &v)| {
                let x0 = i as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + width, v)], color.filled())
            }))?
            .label(dataset.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_lines(
    root: &Area<'_>,
    series: &ChartSeries,
    options: &GraphOptions,
) -> Result<(), Box<dyn Error>> {
    let n = series.labels.len().max(1);
    let (min_y, max_y) = value_range(series);

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5..n as f64 - 0.5, min_y..max_y)?;

    chart
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(&series.labels, *x))
        .draw()?;

    for dataset in &series.datasets {
        let color = parse_color(&dataset.background_color);
        let points: Vec<(f64, f64)> = dataset
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(dataset.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_pie(
    root: &Area<'_>,
    series: &ChartSeries,
    options: &GraphOptions,
) -> Result<(), Box<dyn Error>> {
    let area = root.titled(&options.title, ("sans-serif", 24).into_font())?;

    let Some(dataset) = series.datasets.first() else {
        return Ok(());
    };
    let total: f64 = dataset.data.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = (w.min(h) as f64 / 2.0 - 20.0).max(10.0);

    // Slices need distinct fills even when the dataset carries a single color
    let mut palette = IndexPalette;
    let mut start = -FRAC_PI_2;
    for (i, (label, &value)) in series.labels.iter().zip(&dataset.data).enumerate() {
        if value <= 0.0 {
            continue;
        }
        let sweep = value / total * TAU;
        let color = parse_color(&palette.color(i));

        area.draw(&Polygon::new(
            slice_points(center, radius, start, sweep),
            color.filled(),
        ))?;
        area.draw(&Text::new(
            label.clone(),
            polar(center, radius * 0.65, start + sweep / 2.0),
            ("sans-serif", 14).into_font(),
        ))?;

        start += sweep;
    }

    Ok(())
}

fn polar(center: (i32, i32), r: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (r * angle.cos()).round() as i32,
        center.1 + (r * angle.sin()).round() as i32,
    )
}

fn slice_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for s in 0..=steps {
        let angle = start + sweep * s as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}

/// Y range covering every value and zero, with a little headroom.
fn value_range(series: &ChartSeries) -> (f64, f64) {
    let values = series.datasets.iter().flat_map(|d| d.data.iter().copied());
    let (min, max) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max - min < f64::EPSILON {
        return (min, min + 1.0);
    }
    let pad = (max - min) * 0.05;
    (if min < 0.0 { min - pad } else { min }, max + pad)
}

fn category_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if i < 0.0 || (x - i).abs() > 1e-6 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Parses `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)` colors.
pub fn parse_color(text: &str) -> RGBAColor {
    let s = text.trim();

    if let Some(hex) = s.strip_prefix('#') {
        let full: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return FALLBACK_COLOR,
        };
        return match u32::from_str_radix(&full, 16) {
            Ok(v) => RGBAColor((v >> 16) as u8, ((v >> 8) & 0xff) as u8, (v & 0xff) as u8, 1.0),
            Err(_) => FALLBACK_COLOR,
        };
    }

    let body = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|b| b.strip_suffix(')'));
    let Some(body) = body else {
        return FALLBACK_COLOR;
    };

    let parts: Result<Vec<f64>, _> = body.split(',').map(|p| p.trim().parse::<f64>()).collect();
    match parts.as_deref() {
        Ok([r, g, b]) => RGBAColor(*r as u8, *g as u8, *b as u8, 1.0),
        Ok([r, g, b, a]) => RGBAColor(*r as u8, *g as u8, *b as u8, a.clamp(0.0, 1.0)),
        _ => FALLBACK_COLOR,
    }
}
