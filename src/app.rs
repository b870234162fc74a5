use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::aggregate::AggregationSpec;
use crate::backend::{CleanResponse, CleaningClient, ServiceError};
use crate::chart::{ChartKind, ChartSeries, RandomPalette};
use crate::columns::ColumnSet;
use crate::config::Config;
use crate::filter::Filter;
use crate::graph::{GraphOptions, render_svg};
use crate::loader::{InputError, parse_csv};
use crate::row::Dataset;
use crate::session::{Session, Summary};
use crate::table::TableView;

pub struct AppState {
    session: Mutex<Session>,
    client: CleaningClient,
}

impl AppState {
    pub fn new(client: CleaningClient, session: Session) -> Self {
        AppState {
            session: Mutex::new(session),
            client,
        }
    }
}

/// Rows may arrive bare or wrapped as `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum UploadBody {
    Rows(Dataset),
    Wrapped { data: Dataset },
}

impl UploadBody {
    fn into_rows(self) -> Dataset {
        match self {
            UploadBody::Rows(rows) | UploadBody::Wrapped { data: rows } => rows,
        }
    }
}

#[derive(Serialize)]
struct Envelope<T> {
    message: &'static str,
    data: T,
}

#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ChartRequest {
    #[serde(flatten)]
    spec: AggregationSpec,
    #[serde(default)]
    filters: Vec<Filter>,
}

#[derive(Serialize)]
struct ChartResponse {
    chart: ChartKind,
    data: Option<ChartSeries>,
}

#[derive(Serialize)]
struct TableResponse {
    #[serde(flatten)]
    columns: ColumnSet,
    #[serde(flatten)]
    table: TableView,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("chart rendering failed: {0}")]
    Render(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            AppError::Input(InputError::Empty) => {
                (StatusCode::BAD_REQUEST, "No CSV Data Provided", None)
            }
            AppError::Input(e) => (
                StatusCode::BAD_REQUEST,
                "Invalid CSV format!",
                Some(e.to_string()),
            ),
            AppError::Service(e) => (StatusCode::BAD_GATEWAY, "Server error", Some(e.to_string())),
            AppError::Render(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error",
                Some(e.clone()),
            ),
        };
        (
            status,
            Json(ErrorBody {
                message,
                error: detail,
            }),
        )
            .into_response()
    }
}

/// Build the router over shared state.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/file/cleanrawdata", post(clean_rows))
        .route("/api/file/sendrawdata", post(clean_rows))
        .route("/api/csv", post(clean_csv))
        .route("/api/table", get(get_table))
        .route("/api/summary", get(get_summary))
        .route("/api/chart", post(post_chart))
        .route("/api/chart/svg", post(post_chart_svg))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = CleaningClient::new(&config.backend_url, config.timeout())?;
    let session = Session::new(Box::new(RandomPalette::from_entropy()));
    let app_state = Arc::new(AppState::new(client, session));

    let app = router(app_state, &config.static_dir);

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    info!("Cleaning service at {}", config.backend_url);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn clean_rows(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UploadBody>,
) -> Result<Json<Envelope<CleanResponse>>, AppError> {
    forward(&state, body.into_rows()).await
}

async fn clean_csv(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Envelope<CleanResponse>>, AppError> {
    let rows = parse_csv(&body).inspect_err(|e| info!("rejected CSV upload: {}", e))?;
    forward(&state, rows).await
}

// A failed call leaves the previous dataset and summary in place.
async fn forward(state: &AppState, rows: Dataset) -> Result<Json<Envelope<CleanResponse>>, AppError> {
    info!("Forwarding {} rows to the cleaning service", rows.len());

    let reply = state
        .client
        .clean(&rows)
        .await
        .inspect_err(|e| error!("Cleaning request failed: {}", e))?;

    {
        let mut session = state.session.lock();
        session.set_summary(Some(reply.summary()));
        session.set_dataset(reply.cleaned_data.clone());
    }

    Ok(Json(Envelope {
        message: "Raw data summary",
        data: reply,
    }))
}

async fn get_table(State(state): State<Arc<AppState>>) -> Json<TableResponse> {
    let session = state.session.lock();
    let columns = session.columns().clone();
    let table = TableView::build(session.dataset(), &columns.columns);
    Json(TableResponse { columns, table })
}

async fn get_summary(State(state): State<Arc<AppState>>) -> Json<Summary> {
    let session = state.session.lock();
    Json(session.summary().cloned().unwrap_or_default())
}

fn apply_view(state: &AppState, request: ChartRequest) -> (ChartKind, Option<ChartSeries>) {
    let mut session = state.session.lock();
    session.replace_view(request.filters, request.spec);
    let kind = session.spec().chart;
    (kind, session.chart().cloned())
}

async fn post_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChartRequest>,
) -> Json<ChartResponse> {
    let (chart, data) = apply_view(&state, request);
    Json(ChartResponse { chart, data })
}

async fn post_chart_svg(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChartRequest>,
) -> Result<Response, AppError> {
    let (kind, series) = apply_view(&state, request);
    let Some(series) = series else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let title = series
        .datasets
        .first()
        .map_or_else(|| "Chart".to_string(), |d| d.label.clone());
    let options = GraphOptions {
        title,
        ..GraphOptions::default()
    };
    let svg = render_svg(&series, kind, &options).map_err(|e| AppError::Render(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
