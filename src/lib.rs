/*!
# sheetlens

Paste CSV into a browser, send it through an external cleaning service, and
explore the cleaned rows as a table, a statistics summary and a chart.

## Architecture

### Frontend Layer
- **Technologies**: HTML, CSS, plain JavaScript
- **Key Components**:
  - CSV input box and upload button
  - Data table and statistics summary
  - Filter editor, group/value/aggregation/chart selectors
  - Chart surface fed with server-rendered SVG

### Backend Layer
- **Technologies**: Rust, axum, reqwest
- **Core Components**:
  - Column Inference - Derives the column set and flags numeric columns
  - Filter Evaluation - Keeps rows matching every active condition
  - Grouping & Aggregation - Partitions rows by a column and reduces each group
  - Chart Projection - Turns groups into labels and colored datasets
  - Cleaning Client - Forwards rows to the external cleaning/summary service

## Modules

- **row**: Dynamic cell values and ordered rows
- **loader**: CSV text to rows
- **columns**: Column set and numeric classification
- **filter**: Filter conditions and their evaluation
- **aggregate**: Aggregation functions and grouping
- **chart**: Chart kinds, palettes and chart data projection
- **pipeline**: The whole rows-to-chart computation
- **session**: Per-user state with a memoized chart
- **table**: Tabular display of a dataset
- **graph**: SVG rendering of chart data (feature `web`)
- **backend**: HTTP client for the cleaning service (feature `web`)
- **config**: Server settings (feature `web`)
- **app**: Routing and handlers (feature `web`)

## REST API Endpoints

- `/api/file/cleanrawdata` - Cleans rows given as JSON
- `/api/csv` - Parses CSV text, then cleans it
- `/api/table` - Current dataset laid out for display
- `/api/summary` - Statistics from the last cleaning call
- `/api/chart` - Chart data for a group/value/aggregation choice
- `/api/chart/svg` - Same, rendered as SVG
*/

pub mod aggregate;
#[cfg(feature = "web")]
pub mod app;
pub mod backend;
pub mod chart;
pub mod columns;
pub mod config;
pub mod filter;
pub mod graph;
pub mod loader;
pub mod pipeline;
pub mod row;
pub mod session;
pub mod table;

pub use aggregate::{Aggregation, AggregationSpec, Grouping, group_rows};
pub use chart::{ChartDataset, ChartKind, ChartSeries, IndexPalette, Palette, RandomPalette};
pub use columns::{ColumnSet, infer_columns};
pub use filter::{Filter, FilterError, Operator, apply_filters};
pub use loader::{InputError, parse_csv};
pub use pipeline::compute;
pub use row::{Dataset, Row, Value};
pub use session::Session;
