//! Narrow git client over the working copy
//!
//! Reopens the repository per operation so the client itself stays `Sync` and
//! can live in the service container; `git2::Repository` is not shareable
//! across threads.

use std::path::{Path, PathBuf};

use git2::{Repository, Status, StatusOptions};
use serde::Serialize;
use tracing::debug;

use crate::error::{VcsError, VcsResult};

/// Branch name reported for a repository with no commits yet
const UNBORN_BRANCH: &str = "(no branch)";

/// Summary of the working copy's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    pub branch: String,
    pub staged: usize,
    pub modified: usize,
    pub untracked: usize,
    pub conflicted: usize,
    pub is_clean: bool,
}

/// Read-only client for the git repository containing the project
pub struct GitClient {
    root: PathBuf,
}

impl GitClient {
    /// Discover the repository containing `path`.
    pub fn discover<P: AsRef<Path>>(path: P) -> VcsResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "discovering git repository");
        let repo = Repository::discover(path).map_err(|_| VcsError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        let root = repo
            .workdir()
            .ok_or_else(|| VcsError::InvalidState {
                message: "repository has no working directory".to_string(),
            })?
            .to_path_buf();
        debug!(root = %root.display(), "git repository discovered");
        Ok(Self { root })
    }

    /// Whether `path` is inside a git repository.
    pub fn is_repository<P: AsRef<Path>>(path: P) -> bool {
        Repository::discover(path).is_ok()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open(&self) -> VcsResult<Repository> {
        Repository::open(&self.root).map_err(|_| VcsError::RepositoryNotFound {
            path: self.root.display().to_string(),
        })
    }

    /// Short name of the checked-out branch. Repositories without commits
    /// and detached heads get descriptive placeholders instead of errors.
    pub fn current_branch(&self) -> VcsResult<String> {
        let repo = self.open()?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(err)
                if err.code() == git2::ErrorCode::UnbornBranch
                    || err.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(UNBORN_BRANCH.to_string());
            }
            Err(err) => return Err(err.into()),
        };
        if !head.is_branch() {
            return Ok("(detached)".to_string());
        }
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    /// Count staged, modified, untracked, and conflicted entries.
    pub fn status(&self) -> VcsResult<RepoStatus> {
        let repo = self.open()?;
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .exclude_submodules(true);
        let statuses = repo.statuses(Some(&mut options))?;

        let mut staged = 0;
        let mut modified = 0;
        let mut untracked = 0;
        let mut conflicted = 0;
        for entry in statuses.iter() {
            let status = entry.status();
            if status.intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_DELETED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE,
            ) {
                staged += 1;
            }
            if status.intersects(
                Status::WT_MODIFIED
                    | Status::WT_DELETED
                    | Status::WT_RENAMED
                    | Status::WT_TYPECHANGE,
            ) {
                modified += 1;
            }
            if status.contains(Status::WT_NEW) {
                untracked += 1;
            }
            if status.contains(Status::CONFLICTED) {
                conflicted += 1;
            }
        }

        let is_clean = staged == 0 && modified == 0 && untracked == 0 && conflicted == 0;
        let status = RepoStatus {
            branch: self.current_branch()?,
            staged,
            modified,
            untracked,
            conflicted,
            is_clean,
        };
        debug!(
            branch = %status.branch,
            staged, modified, untracked,
            "working copy status read"
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn init_repo() -> (tempfile::TempDir, GitClient) {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let client = GitClient::discover(dir.path()).unwrap();
        (dir, client)
    }

    #[test]
    fn discover_fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GitClient::discover(dir.path()),
            Err(VcsError::RepositoryNotFound { .. })
        ));
        assert!(!GitClient::is_repository(dir.path()));
    }

    #[test]
    fn fresh_repository_is_clean_and_unborn() {
        let (_dir, client) = init_repo();
        assert_eq!(client.current_branch().unwrap(), UNBORN_BRANCH);

        let status = client.status().unwrap();
        assert!(status.is_clean);
        assert_eq!(status.untracked, 0);
    }

    #[test]
    fn untracked_files_make_the_working_copy_dirty() {
        let (dir, client) = init_repo();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let status = client.status().unwrap();
        assert_eq!(status.untracked, 1);
        assert!(!status.is_clean);
    }

    #[test]
    fn root_points_at_the_working_directory() {
        let (dir, client) = init_repo();
        assert_eq!(
            client.root().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
