//! Habit routes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::AuthUser;
use crate::server::state::AppState;
use crate::services::{HabitStats, HabitUpdate, NewHabit};
use crate::storage::{Habit, HabitLog};

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    include_archived: bool,
}

#[derive(Debug, Deserialize)]
struct CheckInQuery {
    count: Option<u32>,
}

async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Habit>>>, ApiError> {
    let Query(query) = query?;
    let habits = state
        .habits()
        .list(user.id(), query.include_archived)
        .await?;
    Ok(Json(ApiResponse::success(habits)))
}

async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<NewHabit>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Habit>>), ApiError> {
    let Json(input) = payload?;
    let habit = state.habits().create(user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(habit))))
}

async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Habit>>, ApiError> {
    let habit = state.habits().get(user.id(), &id).await?;
    Ok(Json(ApiResponse::success(habit)))
}

async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<HabitUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Habit>>, ApiError> {
    let Json(changes) = payload?;
    let habit = state.habits().update(user.id(), &id, changes).await?;
    Ok(Json(ApiResponse::success(habit)))
}

async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.habits().delete(user.id(), &id).await?;
    Ok(Json(ApiResponse::message("Habit deleted")))
}

async fn check_in(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<(String, NaiveDate)>, PathRejection>,
    query: Result<Query<CheckInQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<HabitLog>>, ApiError> {
    let Path((id, date)) = path?;
    let Query(query) = query?;
    let log = state
        .habits()
        .check_in(user.id(), &id, date, query.count.unwrap_or(1), state.today())
        .await?;
    Ok(Json(ApiResponse::success(log)))
}

async fn undo_check_in(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<(String, NaiveDate)>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Path((id, date)) = path?;
    state.habits().undo_check_in(user.id(), &id, date).await?;
    Ok(Json(ApiResponse::message("Check-in removed")))
}

async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<HabitStats>>, ApiError> {
    let stats = state.habits().stats(user.id(), &id, state.today()).await?;
    Ok(Json(ApiResponse::success(stats)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/habits", get(list).post(create))
        .route("/api/habits/{id}", get(get_one).put(update).delete(delete))
        .route(
            "/api/habits/{id}/check-ins/{date}",
            post(check_in).delete(undo_check_in),
        )
        .route("/api/habits/{id}/stats", get(stats))
}
