use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::config::Config;
use crate::handlers::{
    admin, api, auth, cors_layer, health_check, metrics_handler, request_validation_middleware,
    security_headers_middleware,
};
use crate::observability::{observability_middleware, Metrics};
use crate::repositories::InMemoryStore;
use crate::services::{FeedbackService, ItemsService, RatingsService};

/// Shared application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub items_service: Arc<ItemsService>,
    pub ratings_service: Arc<RatingsService>,
    pub feedback_service: Arc<FeedbackService>,
    pub metrics: Arc<Metrics>,
    pub admin_email: String,
}

impl FromRef<AppState> for Arc<Metrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

impl AppState {
    /// Wire all services to one store
    pub fn new(store: Arc<InMemoryStore>, metrics: Arc<Metrics>, admin_email: String) -> Self {
        Self {
            items_service: Arc::new(ItemsService::new_with_metrics(
                store.clone(),
                metrics.clone(),
            )),
            ratings_service: Arc::new(RatingsService::new_with_metrics(
                store.clone(),
                store.clone(),
                metrics.clone(),
            )),
            feedback_service: Arc::new(FeedbackService::new_with_metrics(store, metrics.clone())),
            metrics,
            admin_email,
        }
    }
}

/// Build the state from configuration, seeding the store when enabled
pub fn build_state(config: &Config, metrics: Arc<Metrics>) -> AppState {
    let store = if config.app.seed_data {
        Arc::new(InMemoryStore::seeded())
    } else {
        info!("Seed data disabled, starting with an empty catalog");
        Arc::new(InMemoryStore::new())
    };

    AppState::new(store, metrics, config.app.admin_email.clone())
}

/// Build the application router with all routes and middleware
pub fn create_app(state: AppState, config: &Config) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        // Health and metrics endpoints
        .route("/", get(health_check))
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Mock auth
        .route("/auth/token", post(auth::login))
        .route("/auth/me", get(auth::current_user))
        // Items: public reads, admin writes
        .route("/items", get(api::list_items).post(admin::create_item))
        .route(
            "/items/:item_id",
            get(api::get_item)
                .patch(admin::update_item)
                .delete(admin::delete_item),
        )
        // Ratings and feedback (authenticated)
        .route("/ratings", post(api::create_rating))
        .route("/ratings/item/:item_id", get(api::ratings_for_item))
        .route("/feedback", post(api::create_feedback))
        .route("/feedback/item/:item_id", get(api::feedback_for_item))
        // Moderation (admin)
        .route(
            "/admin/feedback/:feedback_id/status",
            patch(admin::moderate_feedback),
        )
        .with_state(state)
        // Add middleware layers (last added runs first)
        .layer(DefaultBodyLimit::max(config.server.max_request_size))
        .layer(middleware::from_fn_with_state(
            config.server.max_request_size,
            request_validation_middleware,
        ))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors_layer(&config.app))
        .layer(middleware::from_fn_with_state(
            metrics,
            observability_middleware,
        ))
}
