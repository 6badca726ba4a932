//! HTTP API: onboarding, reading submission, summary, and CSV export.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use water_core::summary::UsageSummary;
use water_core::{AccountKind, MeterKind};

use crate::leaderboard::{self, DistrictRank, UserRank};
use crate::store::{ProfileStore, StoreError, UserProfile};
use crate::submit::{SubmissionReceipt, SubmissionService, SubmitError};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SubmissionService>,
    pub store: Arc<dyn ProfileStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:user_id/readings", post(submit_reading))
        .route("/users/:user_id/summary", get(user_summary))
        .route("/users/:user_id/history.csv", get(history_csv))
        .route("/leaderboard", get(leaderboard_rankings))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub district: String,
    pub account: AccountKind,
    #[serde(default)]
    pub water_goal_liters: Option<f64>,
    #[serde(default)]
    pub monthly_budget_rwf: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitReadingRequest {
    pub meter: MeterKind,
    /// Numeric string as produced by the vision service or manual entry.
    pub reading: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub user_id: String,
    pub eco_points: u64,
    pub summary: UsageSummary,
    /// Whether the estimated bill exceeds the configured monthly budget;
    /// absent when no budget is set.
    pub over_budget: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub users: Vec<UserRank>,
    pub districts: Vec<DistrictRank>,
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), (StatusCode, String)> {
    if let Some(goal) = req.water_goal_liters {
        // The goal is a threshold divisor for points and alerting; zero or
        // negative values make every reading alert.
        if !(goal > 0.0 && goal.is_finite()) {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("water_goal_liters must be a positive number, got {goal}"),
            ));
        }
    }
    let profile = UserProfile {
        user_id: req.user_id,
        email: req.email,
        display_name: req.display_name,
        district: req.district,
        account: req.account,
        eco_points: 0,
        water_goal_liters: req.water_goal_liters,
        monthly_budget_rwf: req.monthly_budget_rwf,
        history: Vec::new(),
        created_at: OffsetDateTime::now_utc(),
    };
    state
        .store
        .create(profile.clone())
        .await
        .map_err(store_error_response)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn submit_reading(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<SubmitReadingRequest>,
) -> Result<Json<SubmissionReceipt>, (StatusCode, String)> {
    state
        .service
        .submit(&user_id, req.meter, &req.reading)
        .await
        .map(Json)
        .map_err(submit_error_response)
}

async fn user_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    let profile = load_profile(&state, &user_id).await?;
    let summary = UsageSummary::from_history(&profile.history, profile.account);
    let over_budget = profile
        .monthly_budget_rwf
        .map(|budget| summary.estimated_bill_rwf > budget);
    Ok(Json(SummaryResponse {
        user_id: profile.user_id.clone(),
        eco_points: profile.eco_points,
        summary,
        over_budget,
    }))
}

async fn leaderboard_rankings(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, (StatusCode, String)> {
    let profiles = state.store.list().await.map_err(store_error_response)?;
    Ok(Json(LeaderboardResponse {
        users: leaderboard::rank_users(&profiles),
        districts: leaderboard::rank_districts(&profiles),
    }))
}

async fn history_csv(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = load_profile(&state, &user_id).await?;
    let csv = crate::export::history_csv_string(&profile.history)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

async fn load_profile(
    state: &AppState,
    user_id: &str,
) -> Result<UserProfile, (StatusCode, String)> {
    state
        .store
        .get(user_id)
        .await
        .map_err(store_error_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("user \"{user_id}\" not found"),
            )
        })
}

fn store_error_response(e: StoreError) -> (StatusCode, String) {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

fn submit_error_response(e: SubmitError) -> (StatusCode, String) {
    let status = match &e {
        SubmitError::Unrecognized(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::Rejected(_) => StatusCode::CONFLICT,
        SubmitError::UnknownUser(_) => StatusCode::NOT_FOUND,
        SubmitError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
