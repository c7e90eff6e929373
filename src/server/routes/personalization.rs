//! Personalization routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::AuthUser;
use crate::server::state::AppState;
use crate::services::{SettingsInput, SettingsPatch};
use crate::storage::PersonalizationSettings;

type SettingsResponse = Result<Json<ApiResponse<PersonalizationSettings>>, ApiError>;

async fn get_settings(State(state): State<AppState>, user: AuthUser) -> SettingsResponse {
    let settings = state.personalization().get(user.id()).await?;
    Ok(Json(ApiResponse::success(settings)))
}

async fn upsert(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<SettingsInput>, JsonRejection>,
) -> SettingsResponse {
    let Json(input) = payload?;
    let settings = state.personalization().upsert(user.id(), input).await?;
    Ok(Json(ApiResponse::success(settings)))
}

async fn patch(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<SettingsPatch>, JsonRejection>,
) -> SettingsResponse {
    let Json(changes) = payload?;
    let settings = state.personalization().patch(user.id(), changes).await?;
    Ok(Json(ApiResponse::success(settings)))
}

async fn reset(State(state): State<AppState>, user: AuthUser) -> SettingsResponse {
    let settings = state.personalization().reset(user.id()).await?;
    Ok(Json(ApiResponse::success_with_message(
        settings,
        "Settings reset to defaults",
    )))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/personalization",
        get(get_settings).put(upsert).patch(patch).delete(reset),
    )
}
