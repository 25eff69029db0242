use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/doctors/{doctor_id}/availability",
            get(handlers::get_schedule),
        )
        .route(
            "/doctors/{doctor_id}/availability/summary",
            get(handlers::get_day_summary),
        )
        .route(
            "/doctors/{doctor_id}/availability/save",
            post(handlers::save_schedule),
        )
        .route(
            "/doctors/{doctor_id}/availability/day",
            patch(handlers::toggle_day),
        )
        .route(
            "/doctors/{doctor_id}/availability/{slot_id}",
            delete(handlers::delete_slot),
        )
        .with_state(state)
}
