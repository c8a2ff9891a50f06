//! API Server - HTTP server for the send endpoint

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::batch::BatchDispatcher;
use crate::config::AppConfig;
use crate::error::{BulkMailError, Result};
use crate::smtp::TransportBuilder;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    allowed_origins: Vec<HeaderValue>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server
    ///
    /// # Errors
    /// Returns error if an allowed origin is not a valid header value.
    pub fn new(config: &AppConfig, transport_builder: Arc<dyn TransportBuilder>) -> Result<Self> {
        let allowed_origins = config
            .server
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|e| {
                    BulkMailError::Config(format!("invalid CORS origin '{}': {}", origin, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let state = Arc::new(AppState {
            dispatcher: BatchDispatcher::new(config.dispatch_options()),
            transport_builder,
        });

        Ok(Self {
            state,
            allowed_origins,
            addr: config.server.listen_addr.clone(),
        })
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let origins = if self.allowed_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(self.allowed_origins.clone())
        };

        let cors = CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::POST])
            .allow_headers([CONTENT_TYPE]);

        let api_routes = Router::new().route("/send-emails", post(handlers::send_emails));

        Router::new()
            .route("/health", get(handlers::health))
            .nest("/api", api_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);
        info!(
            "Batch size {}, delay {:?} between batches",
            self.state.dispatcher.options().batch_size,
            self.state.dispatcher.options().batch_delay
        );

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
