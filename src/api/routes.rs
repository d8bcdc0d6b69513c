use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::history::views::{DashboardView, MatchPage, PlayerView, RankHistory};
use crate::rank::QueueType;
use crate::riot::Platform;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterPlayer {
    pub game_name: String,
    pub tag_line: String,
    pub platform: String,
}

pub async fn register_player(
    State(state): State<AppState>,
    Json(body): Json<RegisterPlayer>,
) -> Result<(StatusCode, Json<PlayerView>), ApiError> {
    let game_name = body.game_name.trim();
    let tag_line = body.tag_line.trim().trim_start_matches('#');
    if game_name.is_empty() || tag_line.is_empty() {
        return Err(ApiError::BadRequest(
            "game_name and tag_line are required".into(),
        ));
    }
    let platform: Platform = body.platform.parse()?;

    let player = state
        .history
        .register_player(game_name, tag_line, platform)
        .await?;
    Ok((StatusCode::CREATED, Json(player)))
}

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub queue: Option<String>,
}

pub async fn list_matches(
    State(state): State<AppState>,
    Path(puuid): Path<String>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchPage>, ApiError> {
    let queue = params.queue.as_deref().map(ranked_queue).transpose()?;
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let page = state
        .history
        .match_page(&puuid, params.page.unwrap_or(0), page_size, queue)
        .await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct RankHistoryParams {
    pub queue: Option<String>,
}

pub async fn rank_history(
    State(state): State<AppState>,
    Path(puuid): Path<String>,
    Query(params): Query<RankHistoryParams>,
) -> Result<Json<RankHistory>, ApiError> {
    let queue = params
        .queue
        .as_deref()
        .map(ranked_queue)
        .transpose()?
        .unwrap_or(QueueType::SoloDuo);

    let history = state.history.rank_history(&puuid, queue).await?;
    Ok(Json(history))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(puuid): Path<String>,
) -> Result<Json<DashboardView>, ApiError> {
    let dashboard = state.history.dashboard(&puuid).await?;
    Ok(Json(dashboard))
}

fn ranked_queue(raw: &str) -> Result<QueueType, ApiError> {
    match raw.parse::<QueueType>() {
        Ok(queue) if queue != QueueType::Other => Ok(queue),
        _ => Err(ApiError::BadRequest(format!(
            "queue must be solo or flex, got {raw}"
        ))),
    }
}
