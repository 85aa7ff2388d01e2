//! HTTP request handlers.

use super::AppState;
use crate::api::Monitor;
use crate::history::{compute_summary, SummaryStats};
use crate::poller::{FetchOutcome, Period, RECENT_LIMIT};
use crate::prefs::Preferences;
use crate::view::{build_overview, chart_model, ChartModel, CARD_SIZES};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Health
// ============================================================================

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.poller.board().await;
    Json(serde_json::json!({
        "status": "ok",
        "paused": state.poller.is_paused(),
        "monitors": board.monitors.len(),
        "lastUpdate": board.last_update,
    }))
}

// ============================================================================
// Overview
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub last: Option<usize>,
    #[serde(default)]
    pub q: String,
}

pub async fn handle_overview(
    State(state): State<AppState>,
    Query(params): Query<OverviewQuery>,
) -> impl IntoResponse {
    let last = params.last.unwrap_or(RECENT_LIMIT);
    if !CARD_SIZES.contains(&last) {
        return (
            StatusCode::BAD_REQUEST,
            format!("last must be one of {:?}", CARD_SIZES),
        )
            .into_response();
    }

    let paused = state.poller.is_paused();
    let board = state.poller.board().await;
    Json(build_overview(&board, last, &params.q, paused)).into_response()
}

// ============================================================================
// Monitor detail
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub monitor: Monitor,
    pub period: Period,
    pub summary: SummaryStats,
    pub chart: ChartModel,
}

pub async fn handle_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let monitor = match state.poller.monitor(id).await {
        Ok(Some(m)) => m,
        Ok(None) => return (StatusCode::NOT_FOUND, "Monitor not found").into_response(),
        Err(e) => return (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    };

    state.poller.ensure_loaded(id).await;

    let board = state.poller.board().await;
    let Some(history) = board.history(id) else {
        return (StatusCode::NOT_FOUND, "Monitor not found").into_response();
    };

    let slice = history.display();
    Json(DetailResponse {
        monitor,
        period: history.period,
        summary: compute_summary(slice),
        chart: chart_model(slice),
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct SetPeriodRequest {
    pub period: String,
}

#[derive(Debug, Serialize)]
pub struct SetPeriodResponse {
    pub period: Period,
    pub reloaded: bool,
    pub samples: usize,
}

pub async fn handle_set_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SetPeriodRequest>,
) -> impl IntoResponse {
    let period: Period = match req.period.parse() {
        Ok(p) => p,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };

    match state.poller.monitor(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return (StatusCode::NOT_FOUND, "Monitor not found").into_response(),
        Err(e) => return (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }

    let outcome = state.poller.set_period(id, period).await;
    if outcome == Some(FetchOutcome::Failed) {
        let board = state.poller.board().await;
        let message = board
            .last_error
            .clone()
            .unwrap_or_else(|| "Failed to fetch history".to_string());
        return (StatusCode::BAD_GATEWAY, message).into_response();
    }

    let board = state.poller.board().await;
    let samples = board.history(id).map_or(0, |h| h.display().len());
    Json(SetPeriodResponse {
        period,
        reloaded: outcome.is_some(),
        samples,
    })
    .into_response()
}

// ============================================================================
// Auto refresh
// ============================================================================

pub async fn handle_pause(State(state): State<AppState>) -> impl IntoResponse {
    state.poller.pause();
    Json(serde_json::json!({ "paused": true }))
}

pub async fn handle_resume(State(state): State<AppState>) -> impl IntoResponse {
    state.poller.resume();
    Json(serde_json::json!({ "paused": false }))
}

// ============================================================================
// Preferences
// ============================================================================

pub async fn handle_get_preferences(State(state): State<AppState>) -> impl IntoResponse {
    Json(*state.prefs.lock().await)
}

pub async fn handle_put_preferences(
    State(state): State<AppState>,
    Json(update): Json<Preferences>,
) -> impl IntoResponse {
    let mut prefs = state.prefs.lock().await;
    match update.save(&state.config.prefs_path) {
        Ok(()) => {
            *prefs = update;
            Json(update).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to save preferences: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
