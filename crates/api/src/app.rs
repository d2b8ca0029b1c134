use axum::{
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{OrderQuery, SpendWindowEvaluator, UserAttributeStore};
use persistence::repositories::{OrderRepository, UserAttributeRepository};
use shared::money::PriceFormat;

use crate::config::{Config, ConfigValidationError};
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, require_auth, trace_id};
use crate::routes::{checkout, health, spend_limits};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub attributes: Arc<dyn UserAttributeStore>,
    pub evaluator: Arc<SpendWindowEvaluator>,
    pub price_format: Arc<PriceFormat>,
}

impl AppState {
    /// State backed by the PostgreSQL repositories.
    pub fn new(config: Config, pool: PgPool) -> Result<Self, ConfigValidationError> {
        let attributes = Arc::new(UserAttributeRepository::new(pool.clone()));
        let orders = Arc::new(OrderRepository::new(pool.clone()));
        Self::with_collaborators(config, pool, attributes, orders)
    }

    /// State with explicit attribute and order collaborators.
    pub fn with_collaborators(
        config: Config,
        pool: PgPool,
        attributes: Arc<dyn UserAttributeStore>,
        orders: Arc<dyn OrderQuery>,
    ) -> Result<Self, ConfigValidationError> {
        let timezone = config.spend_limit.timezone()?;
        let evaluator =
            SpendWindowEvaluator::new(attributes.clone(), orders).with_timezone(timezone);
        let price_format = config.spend_limit.price_format();

        Ok(Self {
            pool,
            config: Arc::new(config),
            attributes,
            evaluator: Arc::new(evaluator),
            price_format: Arc::new(price_format),
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, ConfigValidationError> {
    Ok(router(AppState::new(config, pool)?))
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    // Empty origin list allows any origin (development)
    let cors = if config.security.cors_origins.is_empty() {
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

    // Storefront routes (require API key authentication)
    let protected_routes = Router::new()
        .route(
            "/api/v1/customers/:customer_id/checkout-decision",
            get(checkout::get_checkout_decision),
        )
        .route(
            "/api/v1/customers/:customer_id/spend-evaluation",
            get(checkout::get_spend_evaluation),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/customers/:customer_id/spend-limit",
            get(spend_limits::get_spend_limit).put(spend_limits::update_spend_limit),
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
