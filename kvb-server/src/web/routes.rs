//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::domain::{
    Departure, LineDetails, LineId, ScheduleLinks, StationDetails, StationId, StationList,
};
use crate::scrape::{PageSource, ScrapeError};

use super::cors::{CorsConfig, cors};
use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: PageSource>(state: AppState<S>) -> Router {
    let cors_config = CorsConfig { debug: state.debug };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/stations/", get(station_list::<S>))
        .route("/stations/:station_id/", get(station_details::<S>))
        .route(
            "/stations/:station_id/lines/:line_id/",
            get(line_details::<S>),
        )
        .route("/stations/:station_id/departures/", get(departures::<S>))
        .route("/stations/:station_id/schedules/", get(schedules::<S>))
        .route("/api/stations/search", get(search_stations::<S>))
        .with_state(state)
        .layer(middleware::from_fn_with_state(cors_config, cors))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Server time and the list of endpoints.
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        datetime: http_date(chrono::Utc::now()),
        methods: Methods::default(),
    })
}

async fn station_list<S: PageSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<Arc<StationList>>, AppError> {
    Ok(Json(state.kvb.station_list().await?))
}

async fn station_details<S: PageSource>(
    State(state): State<AppState<S>>,
    Path(station_id): Path<u32>,
) -> Result<Json<Arc<StationDetails>>, AppError> {
    let station = station_id_from_path(station_id)?;
    Ok(Json(state.kvb.station_details(station).await?))
}

async fn line_details<S: PageSource>(
    State(state): State<AppState<S>>,
    Path((station_id, line_id)): Path<(u32, u32)>,
) -> Result<Json<Arc<LineDetails>>, AppError> {
    let station = station_id_from_path(station_id)?;
    let line = LineId::new(line_id).ok_or_else(|| AppError::BadRequest {
        message: format!("Invalid line id: {line_id}"),
    })?;
    Ok(Json(state.kvb.line_details(station, line).await?))
}

async fn departures<S: PageSource>(
    State(state): State<AppState<S>>,
    Path(station_id): Path<u32>,
) -> Result<Json<Vec<Departure>>, AppError> {
    let station = station_id_from_path(station_id)?;
    Ok(Json(state.kvb.departures(station).await?))
}

async fn schedules<S: PageSource>(
    State(state): State<AppState<S>>,
    Path(station_id): Path<u32>,
) -> Result<Json<ScheduleLinks>, AppError> {
    let station = station_id_from_path(station_id)?;
    Ok(Json(state.kvb.schedule_links(station)?))
}

/// Search stations by name.
async fn search_stations<S: PageSource>(
    State(state): State<AppState<S>>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let stations = state
        .kvb
        .snapshot()
        .search(&req.q, limit)
        .into_iter()
        .map(StationSearchResult::from)
        .collect();

    Json(StationSearchResponse { stations })
}

fn station_id_from_path(station_id: u32) -> Result<StationId, AppError> {
    StationId::new(station_id).ok_or_else(|| AppError::BadRequest {
        message: format!("Invalid station id: {station_id}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
}

impl From<ScrapeError> for AppError {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::UnknownStation(_) => AppError::NotFound {
                message: e.to_string(),
            },
            ScrapeError::Transport { .. }
            | ScrapeError::UpstreamStatus { .. }
            | ScrapeError::MalformedPage { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
