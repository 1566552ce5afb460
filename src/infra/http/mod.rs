pub mod api;
mod middleware;

pub use api::ApiState;

use axum::{Router, middleware as axum_middleware};

use middleware::{log_responses, set_request_context};

/// Build the full router: data endpoints plus request-id and response
/// logging middleware.
pub fn build_router(state: ApiState) -> Router {
    api::build_api_router()
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .with_state(state)
}
