//! Status Refresh
//!
//! Periodically drops the cached bot status so the next reader recomputes it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::session::StatusCache;
use crate::tasks::{PeriodicTask, Services};

pub struct StatusRefresh {
    status: Arc<StatusCache>,
}

impl StatusRefresh {
    pub fn new(services: &Services) -> Self {
        Self {
            status: services.status.clone(),
        }
    }
}

#[async_trait]
impl PeriodicTask for StatusRefresh {
    fn name(&self) -> &'static str {
        "status-refresh"
    }

    async fn tick(&self) -> Result<usize> {
        Ok(usize::from(self.status.clear().await))
    }
}
