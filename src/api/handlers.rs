//! API Handlers
//!
//! HTTP request handlers for the admin inspection endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{HousekeepingError, Result};
use crate::models::{HealthResponse, StatusResponse, TasksResponse};
use crate::tasks::{Scheduler, Services, TaskStatus};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Scheduler owning the housekeeping tasks
    pub scheduler: Arc<Scheduler>,
    /// Collaborators shared with the housekeeping loops
    pub services: Services,
}

impl AppState {
    pub fn new(scheduler: Arc<Scheduler>, services: Services) -> Self {
        Self {
            scheduler,
            services,
        }
    }
}

/// Handler for GET /tasks
///
/// Lists every housekeeping task with its running flag and statistics.
pub async fn tasks_handler(State(state): State<AppState>) -> Json<TasksResponse> {
    Json(TasksResponse::new(state.scheduler.status().await))
}

/// Handler for GET /tasks/:name
///
/// Returns a single housekeeping task by name.
pub async fn task_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TaskStatus>> {
    state
        .scheduler
        .status()
        .await
        .into_iter()
        .find(|task| task.name == name)
        .map(Json)
        .ok_or_else(|| HousekeepingError::NotFound(format!("task {}", name)))
}

/// Handler for GET /status
///
/// Returns the cached bot status, computing it if the cache was cleared.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let services = &state.services;
    let status = services
        .status
        .get_or_compute(services.registry.as_ref(), services.clock.now())
        .await;

    Json(StatusResponse::from(status))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
