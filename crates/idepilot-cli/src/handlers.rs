//! Bus handlers exposed by the backend

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use idepilot_bus::{BusError, BusResult, Command, CommandHandler, Query, QueryHandler};
use idepilot_domain::{ContextService, ProjectService};

/// `context.refresh`: re-capture the workspace snapshot
pub struct RefreshContextHandler {
    context: Arc<ContextService>,
    project_dir: PathBuf,
}

impl RefreshContextHandler {
    pub fn new(context: Arc<ContextService>, project_dir: PathBuf) -> Self {
        Self {
            context,
            project_dir,
        }
    }

    fn project_id(&self) -> String {
        self.project_dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "workspace".to_string())
    }
}

#[async_trait]
impl CommandHandler for RefreshContextHandler {
    fn command_name(&self) -> &str {
        "context.refresh"
    }

    async fn handle(&self, _command: Command) -> BusResult<serde_json::Value> {
        let snapshot = self
            .context
            .capture(&self.project_id(), &self.project_dir)
            .map_err(|err| BusError::HandlerFailed {
                name: "context.refresh".to_string(),
                message: err.to_string(),
            })?;
        Ok(json!({
            "snapshot_id": snapshot.id,
            "files": snapshot.file_count,
            "total_size": snapshot.total_size,
        }))
    }
}

/// `project.status`: list the synced projects
pub struct ProjectStatusHandler {
    projects: Arc<ProjectService>,
}

impl ProjectStatusHandler {
    pub fn new(projects: Arc<ProjectService>) -> Self {
        Self { projects }
    }
}

#[async_trait]
impl QueryHandler for ProjectStatusHandler {
    fn query_name(&self) -> &str {
        "project.status"
    }

    async fn handle(&self, _query: Query) -> BusResult<serde_json::Value> {
        Ok(serde_json::to_value(self.projects.projects())?)
    }
}
