use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{CommandQueueService, IdentityDirectory};
use domain::store::CommandStore;
use shared::clock::Clock;
use shared::pagination::PageRequest;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, require_auth, trace_id};
use crate::routes::{commands, health};

#[derive(Clone)]
pub struct AppState {
    pub queue: CommandQueueService,
    pub identity: Arc<dyn IdentityDirectory>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn CommandStore>,
        identity: Arc<dyn IdentityDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let queue = CommandQueueService::new(store, identity.clone(), clock.clone());
        Self {
            queue,
            identity,
            clock,
            config: Arc::new(config),
        }
    }

    /// Page window for a listing request, bounded by the queue config.
    pub fn page_request(&self, skip: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageRequest::from_query(
            skip,
            limit,
            self.config.queue.default_page_limit,
            self.config.queue.max_page_limit,
        )
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Operator and controller routes (require API key authentication)
    let protected_routes = Router::new()
        .route(
            "/api/v1/commands",
            post(commands::enqueue_command).get(commands::list_commands),
        )
        .route("/api/v1/commands/:id", get(commands::get_command))
        .route(
            "/api/v1/commands/controller/:controller_id",
            get(commands::list_pending_for_controller),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Lifecycle writes and hard deletes (require admin API key)
    let admin_routes = Router::new()
        .route(
            "/api/v1/commands/:id",
            patch(commands::acknowledge_command).delete(commands::delete_command),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
