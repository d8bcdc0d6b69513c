//! JSON HTTP surface over the history service.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::{AppError, UpstreamError};
use crate::history::{HistoryError, HistoryService};

mod routes;

#[derive(Clone)]
pub struct AppState {
    pub history: Arc<HistoryService>,
}

pub fn router(history: Arc<HistoryService>) -> Router {
    let state = AppState { history };

    Router::new()
        .route("/health", get(routes::health))
        .route("/players", post(routes::register_player))
        .route("/players/{puuid}/matches", get(routes::list_matches))
        .route("/players/{puuid}/rank-history", get(routes::rank_history))
        .route("/players/{puuid}/dashboard", get(routes::dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::PlayerNotFound(who) => ApiError::NotFound(format!("player {who}")),
            HistoryError::Upstream(UpstreamError::NotFound) => {
                ApiError::NotFound("player unknown upstream".into())
            }
            HistoryError::Upstream(e) => ApiError::Unavailable(e.to_string()),
            HistoryError::App(e @ (AppError::InvalidRegion(_) | AppError::InvalidRank(_))) => {
                ApiError::BadRequest(e.to_string())
            }
            HistoryError::App(e) => {
                error!(error = ?e, "🌐 ❌ Request failed");
                ApiError::Internal("internal server error".into())
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        HistoryError::App(err).into()
    }
}
