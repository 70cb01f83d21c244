//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::session::BotStatus;
use crate::tasks::TaskStatus;

/// Response body for the tasks endpoint (GET /tasks)
#[derive(Debug, Clone, Serialize)]
pub struct TasksResponse {
    /// Number of tracked tasks
    pub total: usize,
    /// Number of tasks still running
    pub running: usize,
    pub tasks: Vec<TaskStatus>,
}

impl TasksResponse {
    pub fn new(tasks: Vec<TaskStatus>) -> Self {
        Self {
            total: tasks.len(),
            running: tasks.iter().filter(|t| t.running).count(),
            tasks,
        }
    }
}

/// Response body for the status endpoint (GET /status)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub online_players: usize,
    pub active_matches: usize,
    /// When the cached status was computed, ISO 8601
    pub generated_at: String,
}

impl From<BotStatus> for StatusResponse {
    fn from(status: BotStatus) -> Self {
        Self {
            online_players: status.online_players,
            active_matches: status.active_matches,
            generated_at: status.generated_at.to_rfc3339(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
