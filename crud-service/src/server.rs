//! HTTP server with graceful shutdown

use axum::{extract::DefaultBodyLimit, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::Result,
    handlers::CrudHandlers,
    manager::EntityManager,
    middleware::{request_id_layer, request_id_propagation_layer, sensitive_headers_layer},
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mount the CRUD routes of `manager` under `crud.base_path`
    pub fn mount<M: EntityManager>(&self, manager: Arc<M>) -> Router {
        let routes = CrudHandlers::new(manager)
            .with_options(self.config.crud.options())
            .router();

        match normalize_base_path(&self.config.crud.base_path) {
            Some(base) => Router::new().nest(&base, routes),
            None => routes,
        }
    }

    /// Run the server with the given router
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.apply_middleware(app);
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Wrap `app` in the configured middleware stack
    ///
    /// Layers added later wrap the earlier ones, so the list below runs from
    /// innermost to outermost.
    pub fn apply_middleware(&self, app: Router) -> Router {
        let middleware = &self.config.middleware;
        let mut app = app;

        if middleware.catch_panic {
            app = app.layer(CatchPanicLayer::new());
        }

        // Oversized bodies fail extraction, so both declared and streamed
        // lengths come back as the JSON 413 error
        app = app
            .layer(DefaultBodyLimit::max(middleware.body_limit_bytes()))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            );

        if middleware.request_tracking.mask_sensitive_headers {
            app = app.layer(sensitive_headers_layer());
        }

        if middleware.request_tracking.request_id_enabled {
            app = app
                .layer(request_id_propagation_layer())
                .layer(request_id_layer());
        }

        app = app.layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            self.config.service.timeout(),
        ));

        if middleware.compression {
            app = app.layer(CompressionLayer::new());
        }

        match self.build_cors_layer() {
            Some(cors) => app.layer(cors),
            None => app,
        }
    }

    /// Log middleware configuration for debugging
    fn log_middleware_config(&self) {
        let middleware = &self.config.middleware;
        let enabled = |on: bool| if on { "enabled" } else { "disabled" };

        tracing::info!("Middleware configuration:");
        tracing::info!("  - Panic recovery: {}", enabled(middleware.catch_panic));
        tracing::info!(
            "  - Request ID tracking: {}",
            enabled(middleware.request_tracking.request_id_enabled)
        );
        tracing::info!(
            "  - Sensitive header masking: {}",
            enabled(middleware.request_tracking.mask_sensitive_headers)
        );
        tracing::info!("  - Request body limit: {} MB", middleware.body_limit_mb);
        tracing::info!("  - Compression: {}", enabled(middleware.compression));
        tracing::info!("  - CORS mode: {}", middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
        tracing::info!("  - CRUD base path: {}", self.config.crud.base_path);
    }

    /// Build CORS layer based on configuration
    fn build_cors_layer(&self) -> Option<CorsLayer> {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                Some(CorsLayer::permissive())
            }
            "restrictive" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                Some(CorsLayer::new())
            }
            "disabled" => {
                tracing::debug!("CORS disabled");
                None
            }
            other => {
                tracing::warn!("Unknown CORS mode: {}, defaulting to permissive", other);
                Some(CorsLayer::permissive())
            }
        }
    }
}

/// `"/e/"` becomes `"/e"`; the root yields `None` since axum cannot nest there
fn normalize_base_path(base_path: &str) -> Option<String> {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
