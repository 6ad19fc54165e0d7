//! Domain entities

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use idepilot_files::ScannedFile;

/// The project under automation, as last synced from its working copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier, derived from the workspace directory name
    pub id: String,
    pub name: String,
    pub root_path: PathBuf,
    pub branch: String,
    pub is_clean: bool,
    pub synced_at: DateTime<Utc>,
}

/// A captured view of the project's source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub id: String,
    pub project_id: String,
    pub captured_at: DateTime<Utc>,
    pub file_count: usize,
    pub total_size: u64,
    pub files: Vec<ScannedFile>,
}

impl WorkspaceSnapshot {
    pub fn new(project_id: &str, files: Vec<ScannedFile>) -> Self {
        let captured_at = Utc::now();
        Self {
            id: format!("{}-{}", project_id, captured_at.timestamp_millis()),
            project_id: project_id.to_string(),
            captured_at,
            file_count: files.len(),
            total_size: files.iter().map(|file| file.size).sum(),
            files,
        }
    }
}
