//! HTTP API.
//!
//! This module provides:
//! - [`AppState`]: shared clients, storage and clock
//! - [`ApiError`] and the [`ApiResponse`] envelope
//! - [`AuthUser`]: the `x-user-id` extractor
//! - [`router`] and [`HttpServer`]: the axum application and its runner
//!
//! # Example
//!
//! ```no_run
//! use barakah::config::Config;
//! use barakah::server::HttpServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! HttpServer::new(config).run().await?;
//! # Ok(())
//! # }
//! ```

mod app;
mod error;
mod extract;
mod routes;
mod state;

pub use app::{router, HttpServer};
pub use error::{ApiError, ApiResponse};
pub use extract::{
    reminder_cache_key, AuthUser, MAX_SESSION_ID_LENGTH, SESSION_ID_HEADER, USER_ID_HEADER,
};
pub use routes::{Conversion, HealthStatus, MonthView};
pub use state::AppState;
