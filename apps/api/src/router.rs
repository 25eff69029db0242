use std::sync::Arc;

use axum::{routing::get, Router};

use availability_cell::router::availability_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Healthcare portal API is running!" }))
        .nest("/schedule", availability_routes(state))
}
