//! AI insight routes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::image::GeneratedImage;
use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::AuthUser;
use crate::server::state::AppState;
use crate::services::{HadithInsight, QuranInsight};

#[derive(Debug, Deserialize)]
struct HadithRequest {
    topic: String,
}

#[derive(Debug, Deserialize)]
struct ImagePrompt {
    prompt: String,
}

async fn daily(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<QuranInsight>>, ApiError> {
    let settings = state.personalization().get(user.id()).await?;
    let insight = state
        .insights()
        .quran_insight(state.today(), &settings)
        .await?;
    Ok(Json(ApiResponse::success(insight)))
}

async fn verse(
    State(state): State<AppState>,
    user: AuthUser,
    reference: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<QuranInsight>>, ApiError> {
    let Path(reference) = reference?;
    let settings = state.personalization().get(user.id()).await?;
    let insight = state.insights().verse_insight(&reference, &settings).await?;
    Ok(Json(ApiResponse::success(insight)))
}

async fn hadith(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<HadithRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<HadithInsight>>, ApiError> {
    let Json(request) = payload?;
    let settings = state.personalization().get(user.id()).await?;
    let insight = state
        .insights()
        .hadith_insight(&request.topic, &settings)
        .await?;
    Ok(Json(ApiResponse::success(insight)))
}

async fn image(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ImagePrompt>, JsonRejection>,
) -> Result<Json<ApiResponse<GeneratedImage>>, ApiError> {
    let Json(request) = payload?;
    let image = state.insights().insight_image(&request.prompt).await?;
    tracing::debug!(user_id = %user.id(), "Served insight image");
    Ok(Json(ApiResponse::success(image)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/insights/daily", get(daily))
        .route("/api/insights/verse/{reference}", get(verse))
        .route("/api/insights/hadith", post(hadith))
        .route("/api/insights/image", post(image))
}
