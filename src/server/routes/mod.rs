//! Route tables, one module per area.

mod calendar;
mod growth_plans;
mod habits;
mod health;
mod insights;
mod learning;
mod personalization;
mod reflections;
mod reminders;

use axum::Router;

use super::state::AppState;

pub use calendar::{Conversion, MonthView};
pub use health::HealthStatus;

/// Every route, without middleware or state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(calendar::router())
        .merge(insights::router())
        .merge(reminders::router())
        .merge(reflections::router())
        .merge(growth_plans::router())
        .merge(personalization::router())
        .merge(learning::router())
        .merge(habits::router())
}
