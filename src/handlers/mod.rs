pub mod admin;
pub mod api;
pub mod auth;
pub mod errors;
pub mod health;
pub mod metrics;
pub mod middleware;

pub use errors::{auth_error_to_response, service_error_to_response, ApiError};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use middleware::{cors_layer, request_validation_middleware, security_headers_middleware};
