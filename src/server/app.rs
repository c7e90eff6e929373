//! HTTP server orchestration.

use axum::http::{header, HeaderName, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;

use super::extract::{SESSION_ID_HEADER, USER_ID_HEADER};
use super::routes::routes;
use super::state::AppState;

/// Build the application router over a ready state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(SESSION_ID_HEADER),
        ]);

    routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP server owning the configuration until it runs.
#[derive(Debug)]
pub struct HttpServer {
    config: Config,
}

impl HttpServer {
    /// Creates a server for the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Opens storage, builds the clients and serves until Ctrl-C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Storage initialization or migration fails
    /// - A provider client cannot be built
    /// - The bind address cannot be bound
    pub async fn run(self) -> Result<(), AppError> {
        let bind_address = self.config.bind_address.clone();
        let state = AppState::from_config(self.config).await?;
        tracing::info!(
            image_enabled = state.image.is_some(),
            model = %state.config.model,
            "Application state ready"
        );

        let listener = TcpListener::bind(&bind_address)
            .await
            .map_err(|e| AppError::Server {
                message: format!("failed to bind {bind_address}: {e}"),
            })?;
        tracing::info!(address = %bind_address, "Listening");

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Server {
                message: e.to_string(),
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
