//! Self-reflection routes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::AuthUser;
use crate::server::state::AppState;
use crate::services::{MoodSummary, NewReflection, ReflectionUpdate};
use crate::storage::{AnalysisStatus, Mood, SelfReflection};

const DEFAULT_SUMMARY_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<u32>,
    mood: Option<Mood>,
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    days: Option<u32>,
}

async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<SelfReflection>>>, ApiError> {
    let Query(query) = query?;
    let reflections = state
        .reflections()
        .list(user.id(), query.limit, query.mood)
        .await?;
    Ok(Json(ApiResponse::success(reflections)))
}

async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<NewReflection>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SelfReflection>>), ApiError> {
    let Json(input) = payload?;
    let reflection = state.reflections().create(user.id(), input).await?;
    let response = if reflection.analysis_status == AnalysisStatus::Failed {
        ApiResponse::success_with_message(
            reflection,
            "Saved; AI analysis is unavailable, retry later",
        )
    } else {
        ApiResponse::success(reflection)
    };
    Ok((StatusCode::CREATED, Json(response)))
}

async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<MoodSummary>>, ApiError> {
    let Query(query) = query?;
    let summary = state
        .reflections()
        .mood_summary(
            user.id(),
            query.days.unwrap_or(DEFAULT_SUMMARY_DAYS),
            state.now(),
        )
        .await?;
    Ok(Json(ApiResponse::success(summary)))
}

async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SelfReflection>>, ApiError> {
    let reflection = state.reflections().get(user.id(), &id).await?;
    Ok(Json(ApiResponse::success(reflection)))
}

async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ReflectionUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<SelfReflection>>, ApiError> {
    let Json(changes) = payload?;
    let reflection = state.reflections().update(user.id(), &id, changes).await?;
    Ok(Json(ApiResponse::success(reflection)))
}

async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.reflections().delete(user.id(), &id).await?;
    Ok(Json(ApiResponse::message("Reflection deleted")))
}

async fn analyze(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SelfReflection>>, ApiError> {
    let reflection = state.reflections().analyze(user.id(), &id).await?;
    Ok(Json(ApiResponse::success(reflection)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reflections", get(list).post(create))
        .route("/api/reflections/summary", get(summary))
        .route(
            "/api/reflections/{id}",
            get(get_one).put(update).patch(update).delete(delete),
        )
        .route("/api/reflections/{id}/analyze", post(analyze))
}
