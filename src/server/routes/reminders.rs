//! Daily reminder route.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

use crate::reminder::DailyReminder;
use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::{reminder_cache_key, AuthUser};
use crate::server::state::AppState;

async fn daily(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<DailyReminder>>, ApiError> {
    let cache_key = reminder_cache_key(&headers, &user)?;
    let settings = state.personalization().get(user.id()).await?;
    let reminder = state
        .reminder_service()
        .daily_reminder(&cache_key, &settings)
        .await;
    Ok(Json(ApiResponse::success(reminder)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/reminders/daily", get(daily))
}
