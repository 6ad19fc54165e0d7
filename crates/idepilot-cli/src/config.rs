//! Application configuration
//!
//! Defaults, an optional `idepilot.toml` next to the invocation, and
//! `IDEPILOT_*` environment variables, with CLI flags applied on top.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppResult;

/// Where the automated IDE's debug endpoint lives
#[derive(Debug, Clone, Deserialize)]
pub struct IdeSection {
    pub host: String,
    pub port: u16,
}

/// Full application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory of the project under automation
    pub project_dir: PathBuf,
    pub ide: IdeSection,
}

impl AppConfig {
    /// Load configuration, applying the given CLI overrides last.
    pub fn load(project_dir: Option<PathBuf>, ide_port: Option<u16>) -> AppResult<Self> {
        let settings = Config::builder()
            .set_default("project_dir", ".")?
            .set_default("ide.host", "127.0.0.1")?
            .set_default("ide.port", 9222_i64)?
            .add_source(File::with_name("idepilot").required(false))
            .add_source(Environment::with_prefix("IDEPILOT").separator("__"))
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        if let Some(dir) = project_dir {
            config.project_dir = dir;
        }
        if let Some(port) = ide_port {
            config.ide.port = port;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let config = AppConfig::load(None, None).unwrap();
        assert_eq!(config.project_dir, PathBuf::from("."));
        assert_eq!(config.ide.host, "127.0.0.1");
        assert_eq!(config.ide.port, 9222);
    }

    #[test]
    fn cli_overrides_win() {
        let config = AppConfig::load(Some(PathBuf::from("/tmp/project")), Some(9333)).unwrap();
        assert_eq!(config.project_dir, PathBuf::from("/tmp/project"));
        assert_eq!(config.ide.port, 9333);
    }
}
