use crate::aggregate::{AggregationSpec, Grouping};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fill used for the single dataset of a numeric chart.
pub const NUMERIC_SERIES_COLOR: &str = "rgba(54, 162, 235, 0.6)";

/// Rendering surface. All kinds consume the same [`ChartSeries`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie];
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown chart type: {}", s))
    }
}

/// One named series of numbers, aligned with [`ChartSeries::labels`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
}

/// Chart-ready data: group labels plus one or more datasets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Picks a fill color for the n-th dataset of a categorical chart.
pub trait Palette {
    fn color(&mut self, index: usize) -> String;
}

/// Deterministic palette cycling through a fixed list.
#[derive(Clone, Debug, Default)]
pub struct IndexPalette;

const INDEX_COLORS: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

impl Palette for IndexPalette {
    fn color(&mut self, index: usize) -> String {
        INDEX_COLORS[index % INDEX_COLORS.len()].to_string()
    }
}

/// Random `#rrggbb` colors.
#[derive(Debug)]
pub struct RandomPalette<R> {
    rng: R,
}

impl<R: Rng> RandomPalette<R> {
    pub fn new(rng: R) -> Self {
        RandomPalette { rng }
    }
}

impl RandomPalette<rand::rngs::StdRng> {
    pub fn from_entropy() -> Self {
        use rand::SeedableRng;
        RandomPalette::new(rand::rngs::StdRng::from_entropy())
    }
}

impl<R: Rng> Palette for RandomPalette<R> {
    fn color(&mut self, _index: usize) -> String {
        format!("#{:06x}", self.rng.gen_range(0..0x0100_0000u32))
    }
}

/// Shape a grouping into chart datasets.
///
/// Categorical groupings yield one dataset per value-column value, colored by
/// `palette`. Numeric groupings yield a single dataset labelled
/// `Agg(column)`, or `Count` when no value column is selected.
pub fn project(grouping: Grouping, spec: &AggregationSpec, palette: &mut dyn Palette) -> ChartSeries {
    match grouping {
        Grouping::Categorical { labels, series } => {
            let datasets = series
                .into_iter()
                .enumerate()
                .map(|(i, (label, data))| ChartDataset {
                    label,
                    data,
                    background_color: palette.color(i),
                })
                .collect();
            ChartSeries { labels, datasets }
        }
        Grouping::Numeric { labels, values } => {
            let label = match spec.value() {
                Some(column) => format!("{}({})", spec.aggregation, column),
                None => "Count".to_string(),
            };
            ChartSeries {
                labels,
                datasets: vec![ChartDataset {
                    label,
                    data: values,
                    background_color: NUMERIC_SERIES_COLOR.to_string(),
                }],
            }
        }
    }
}
