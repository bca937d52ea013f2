use axum::{
    Router,
    routing::get,
    extract::{Query, State, Json},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::api::config_api::ConfigApi;
use crate::core::{PollScheduler, SchedulerStatus};
use crate::error::Error;
use crate::interfaces::SampleHistory;
use crate::observability::metrics::gather_text;
use crate::types::{PollConfig, Sample, Symbol};

pub struct ApiState {
    pub config_api: ConfigApi,
    pub scheduler: Arc<PollScheduler>,
    pub history: Arc<dyn SampleHistory>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/config", get(get_config).put(update_config))
        .route("/status", get(get_status))
        .route("/samples/latest", get(latest_sample))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidConfig(_) | Error::InvalidPrice(_) => StatusCode::BAD_REQUEST,
            Error::ConfigNotFound | Error::SampleNotFound(_) => StatusCode::NOT_FOUND,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn get_config(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<PollConfig>, Error> {
    Ok(Json(state.config_api.read_config().await?))
}

#[derive(Deserialize)]
struct ConfigRequest {
    symbol: String,
    #[serde(alias = "interval")]
    interval_seconds: i64,
}

async fn update_config(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<ConfigRequest>,
) -> Result<Json<PollConfig>, Error> {
    let applied = state.config_api.update_config(&req.symbol, req.interval_seconds).await?;
    Ok(Json(applied))
}

async fn get_status(
    State(state): State<Arc<ApiState>>,
) -> Json<SchedulerStatus> {
    Json(state.scheduler.status())
}

#[derive(Deserialize)]
struct LatestQuery {
    symbol: Option<String>,
}

/// Latest stored sample for `?symbol=`, or for the bound symbol by default.
async fn latest_sample(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<Sample>, Error> {
    let symbol = match query.symbol {
        Some(raw) => Symbol::parse(&raw)?,
        None => state.scheduler.current_config()
            .map(|config| config.symbol)
            .ok_or(Error::ConfigNotFound)?,
    };

    state.history.latest(&symbol)
        .await?
        .map(Json)
        .ok_or_else(|| Error::SampleNotFound(symbol.to_string()))
}

async fn metrics() -> Result<Response, Error> {
    let body = gather_text()?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response())
}
