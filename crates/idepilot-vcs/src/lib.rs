//! IdePilot VCS integration
//!
//! Narrow read-only view of the git repository containing the automated
//! project: repository discovery, current branch, and working-copy status
//! counts. Porcelain output is never parsed; everything goes through libgit2.

pub mod client;
pub mod error;

pub use client::{GitClient, RepoStatus};
pub use error::{VcsError, VcsResult};
