//! Domain services
//!
//! [`ProjectService`] keeps the project entity in sync with its git working
//! copy; [`ContextService`] captures workspace snapshots through the scanner.
//! Both are constructed by the registry with their collaborators injected.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use idepilot_files::{ScanProfile, WorkspaceScanner};
use idepilot_vcs::GitClient;

use crate::entities::{Project, WorkspaceSnapshot};
use crate::error::{DomainError, DomainResult};
use crate::repository::{ProjectRepository, SnapshotRepository};

/// Syncs and serves the project entity
pub struct ProjectService {
    projects: Arc<ProjectRepository>,
    git: Arc<GitClient>,
}

impl ProjectService {
    pub fn new(projects: Arc<ProjectRepository>, git: Arc<GitClient>) -> Self {
        Self { projects, git }
    }

    /// Rebuild the project entity from the working copy and store it.
    pub fn sync_project(&self) -> DomainResult<Project> {
        let status = self.git.status()?;
        let root = self.git.root().to_path_buf();
        let name = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "workspace".to_string());

        let project = Project {
            id: name.clone(),
            name,
            root_path: root,
            branch: status.branch,
            is_clean: status.is_clean,
            synced_at: Utc::now(),
        };
        self.projects.save(&project.id, project.clone());
        info!(project = %project.id, branch = %project.branch, "project synced from working copy");
        Ok(project)
    }

    pub fn project(&self, id: &str) -> DomainResult<Project> {
        self.projects.find(id).ok_or(DomainError::NotFound {
            entity: "project",
            id: id.to_string(),
        })
    }

    pub fn projects(&self) -> Vec<Project> {
        self.projects.list()
    }
}

/// Captures and serves workspace snapshots
pub struct ContextService {
    scanner: Arc<WorkspaceScanner>,
    profile: Arc<ScanProfile>,
    snapshots: Arc<SnapshotRepository>,
}

impl ContextService {
    pub fn new(
        scanner: Arc<WorkspaceScanner>,
        profile: Arc<ScanProfile>,
        snapshots: Arc<SnapshotRepository>,
    ) -> Self {
        Self {
            scanner,
            profile,
            snapshots,
        }
    }

    /// Scan `root` with the configured profile and store the snapshot.
    pub fn capture(&self, project_id: &str, root: &Path) -> DomainResult<WorkspaceSnapshot> {
        let files = self.scanner.scan(root, &self.profile)?;
        let snapshot = WorkspaceSnapshot::new(project_id, files);
        self.snapshots.save(&snapshot.id, snapshot.clone());
        info!(
            project = project_id,
            files = snapshot.file_count,
            "workspace snapshot captured"
        );
        Ok(snapshot)
    }

    /// The most recent snapshot for a project, if any.
    pub fn latest(&self, project_id: &str) -> Option<WorkspaceSnapshot> {
        self.snapshots
            .list()
            .into_iter()
            .filter(|snapshot| snapshot.project_id == project_id)
            .max_by_key(|snapshot| snapshot.captured_at)
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}
