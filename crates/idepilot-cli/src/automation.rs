//! Application-level automation service

use std::sync::Arc;

use serde::Serialize;

use idepilot_domain::{ContextService, Project, ProjectService};
use idepilot_ide::DebugConnectionProvider;

/// Snapshot of what the wired system currently knows
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub project: Option<Project>,
    pub latest_snapshot_files: Option<usize>,
    pub ide_reachable: bool,
    pub ide_browser: Option<String>,
}

/// Top-level service combining the IDE connection with the domain services.
/// Constructed last in the bootstrap; everything it needs is injected.
pub struct AutomationService {
    ide: Arc<dyn DebugConnectionProvider>,
    projects: Arc<ProjectService>,
    context: Arc<ContextService>,
}

impl AutomationService {
    pub fn new(
        ide: Arc<dyn DebugConnectionProvider>,
        projects: Arc<ProjectService>,
        context: Arc<ContextService>,
    ) -> Self {
        Self {
            ide,
            projects,
            context,
        }
    }

    /// Summarize the wired system: the synced project, its latest snapshot,
    /// and whether the IDE's debug port answers. The IDE being down is a
    /// reportable state, not an error.
    pub async fn status(&self) -> SystemStatus {
        let project = self.projects.projects().into_iter().next();
        let latest_snapshot_files = project
            .as_ref()
            .and_then(|project| self.context.latest(&project.id))
            .map(|snapshot| snapshot.file_count);
        let (ide_reachable, ide_browser) = match self.ide.version().await {
            Ok(version) => (true, Some(version.browser)),
            Err(_) => (false, None),
        };
        SystemStatus {
            project,
            latest_snapshot_files,
            ide_reachable,
            ide_browser,
        }
    }
}
