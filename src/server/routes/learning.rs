//! Learning library routes. Reads are public, writes need `x-user-id`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::AuthUser;
use crate::server::state::AppState;
use crate::services::{LearningInput, LearningQuery};
use crate::storage::LearningContent;

async fn list(
    State(state): State<AppState>,
    query: Result<Query<LearningQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<LearningContent>>>, ApiError> {
    let Query(query) = query?;
    let content = state.learning().list(query).await?;
    Ok(Json(ApiResponse::success(content)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LearningContent>>, ApiError> {
    let content = state.learning().get(&id).await?;
    Ok(Json(ApiResponse::success(content)))
}

async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<LearningInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LearningContent>>), ApiError> {
    let Json(input) = payload?;
    let content = state.learning().create(user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(content))))
}

async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<LearningInput>, JsonRejection>,
) -> Result<Json<ApiResponse<LearningContent>>, ApiError> {
    let Json(input) = payload?;
    let content = state.learning().update(user.id(), &id, input).await?;
    Ok(Json(ApiResponse::success(content)))
}

async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.learning().delete(user.id(), &id).await?;
    Ok(Json(ApiResponse::message("Learning content deleted")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/learning", get(list).post(create))
        .route("/api/learning/{id}", get(get_one).put(update).delete(delete))
}
