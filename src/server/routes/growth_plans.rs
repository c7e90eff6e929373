//! Growth plan routes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;

use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::AuthUser;
use crate::server::state::AppState;
use crate::services::{GeneratePlanRequest, GrowthPlanInput, GrowthPlanPatch, GrowthPlanView};
use crate::storage::PlanStatus;

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<PlanStatus>,
}

#[derive(Debug, Deserialize)]
struct GoalUpdate {
    completed: bool,
}

async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<GrowthPlanView>>>, ApiError> {
    let Query(query) = query?;
    let plans = state.growth_plans().list(user.id(), query.status).await?;
    Ok(Json(ApiResponse::success(plans)))
}

async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<GrowthPlanInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<GrowthPlanView>>), ApiError> {
    let Json(input) = payload?;
    let plan = state.growth_plans().create(user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(plan))))
}

async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<GrowthPlanView>>), ApiError> {
    let Json(request) = payload?;
    let plan = state.growth_plans().generate(user.id(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(plan, "Draft plan generated")),
    ))
}

async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GrowthPlanView>>, ApiError> {
    let plan = state.growth_plans().get(user.id(), &id).await?;
    Ok(Json(ApiResponse::success(plan)))
}

async fn replace(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<GrowthPlanInput>, JsonRejection>,
) -> Result<Json<ApiResponse<GrowthPlanView>>, ApiError> {
    let Json(input) = payload?;
    let plan = state.growth_plans().replace(user.id(), &id, input).await?;
    Ok(Json(ApiResponse::success(plan)))
}

async fn patch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<GrowthPlanPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<GrowthPlanView>>, ApiError> {
    let Json(changes) = payload?;
    let plan = state.growth_plans().patch(user.id(), &id, changes).await?;
    Ok(Json(ApiResponse::success(plan)))
}

async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.growth_plans().delete(user.id(), &id).await?;
    Ok(Json(ApiResponse::message("Growth plan deleted")))
}

async fn set_goal(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<(String, usize)>, PathRejection>,
    payload: Result<Json<GoalUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<GrowthPlanView>>, ApiError> {
    let Path((id, index)) = path?;
    let Json(update) = payload?;
    let plan = state
        .growth_plans()
        .set_goal_completed(user.id(), &id, index, update.completed)
        .await?;
    Ok(Json(ApiResponse::success(plan)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/growth-plans", get(list).post(create))
        .route("/api/growth-plans/generate", post(generate))
        .route(
            "/api/growth-plans/{id}",
            get(get_one).put(replace).patch(patch).delete(delete),
        )
        .route("/api/growth-plans/{id}/goals/{index}", put(set_goal))
}
