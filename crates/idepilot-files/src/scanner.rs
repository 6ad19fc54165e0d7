//! Gitignore-aware workspace scanner

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FilesResult;
use crate::profile::ScanProfile;

/// One file selected by a scan, with its path relative to the scan root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
}

/// Walks a workspace and collects the files a [`ScanProfile`] selects.
///
/// Respects `.gitignore` and skips hidden entries; unreadable entries are
/// logged and skipped rather than failing the whole scan.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceScanner;

impl WorkspaceScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, root: &Path, profile: &ScanProfile) -> FilesResult<Vec<ScannedFile>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(root).build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().map_or(false, |kind| kind.is_file()) {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if !profile.matches(relative) {
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable metadata");
                    continue;
                }
            };
            if !profile.allows_size(metadata.len()) {
                continue;
            }
            files.push(ScannedFile {
                path: relative.to_path_buf(),
                size: metadata.len(),
                extension: relative
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_string()),
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(root = %root.display(), files = files.len(), "workspace scan complete");
        Ok(files)
    }
}
