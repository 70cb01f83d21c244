//! API Module
//!
//! HTTP handlers and routing for the admin inspection API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /tasks` - Housekeeping task status
//! - `GET /tasks/:name` - A single task by name
//! - `GET /status` - Cached bot status

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
