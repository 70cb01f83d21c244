//! API Routes
//!
//! Configures the Axum router for the admin inspection endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, status_handler, task_handler, tasks_handler, AppState};

/// Creates the admin router.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /tasks` - Housekeeping task status
/// - `GET /tasks/:name` - A single task by name
/// - `GET /status` - Cached bot status
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/tasks", get(tasks_handler))
        .route("/tasks/:name", get(task_handler))
        .route("/status", get(status_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
