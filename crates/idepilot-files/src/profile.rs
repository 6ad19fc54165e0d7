//! Scan profiles: which files a workspace scan should consider
//!
//! A profile is the pluggable strategy side of scanning: include/exclude glob
//! sets plus a size cap. The scanner itself stays mechanism-only.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::FilesResult;

/// Default size cap for scanned files (1 MiB)
const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

const SOURCE_INCLUDE: [&str; 9] = [
    "**/*.rs",
    "**/*.ts",
    "**/*.js",
    "**/*.py",
    "**/*.go",
    "**/*.java",
    "**/*.json",
    "**/*.toml",
    "**/*.md",
];

const SOURCE_EXCLUDE: [&str; 4] = [
    "**/target/**",
    "**/node_modules/**",
    "**/dist/**",
    "**/.git/**",
];

/// File-selection strategy for workspace scans
#[derive(Debug, Clone)]
pub struct ScanProfile {
    include: GlobSet,
    exclude: GlobSet,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    pub max_file_size: u64,
}

impl ScanProfile {
    pub fn new(include: &[&str], exclude: &[&str], max_file_size: u64) -> FilesResult<Self> {
        Ok(Self {
            include: build_glob_set(include)?,
            exclude: build_glob_set(exclude)?,
            include_patterns: include.iter().map(|p| (*p).to_string()).collect(),
            exclude_patterns: exclude.iter().map(|p| (*p).to_string()).collect(),
            max_file_size,
        })
    }

    /// The default profile: common source and config files, minus build
    /// output and vendored dependencies.
    pub fn source_code() -> FilesResult<Self> {
        Self::new(&SOURCE_INCLUDE, &SOURCE_EXCLUDE, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }

    pub fn allows_size(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    pub fn include_patterns(&self) -> &[String] {
        &self.include_patterns
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }
}

fn build_glob_set(patterns: &[&str]) -> FilesResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
