//! IdePilot workspace scanning
//!
//! Filesystem side of project-context capture: a [`ScanProfile`] decides
//! which files matter (include/exclude globs, size cap) and the
//! [`WorkspaceScanner`] walks the tree honoring `.gitignore`.

pub mod error;
pub mod profile;
pub mod scanner;

pub use error::{FilesError, FilesResult};
pub use profile::ScanProfile;
pub use scanner::{ScannedFile, WorkspaceScanner};
