//! HTTP client for the IDE's remote-debugging endpoint
//!
//! The IDE is treated as an opaque browser: the client only discovers the
//! version metadata and the attachable page targets the debug port exposes.
//! What happens over the returned websocket endpoint is out of scope here.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::DebugPortConfig;
use crate::error::{IdeError, IdeResult};

/// Target type reported by the debug port for attachable pages
const PAGE_TARGET: &str = "page";

/// Response of `/json/version`
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser", default)]
    pub browser: String,
    #[serde(rename = "User-Agent", default)]
    pub user_agent: String,
    #[serde(rename = "webSocketDebuggerUrl", default)]
    pub web_socket_debugger_url: Option<String>,
}

/// One attachable target from `/json/list`
#[derive(Debug, Clone, Deserialize)]
pub struct DebugTarget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub target_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "webSocketDebuggerUrl", default)]
    pub web_socket_debugger_url: Option<String>,
}

impl DebugTarget {
    /// Whether this target is a page something can attach to.
    pub fn is_attachable_page(&self) -> bool {
        self.target_type == PAGE_TARGET && self.web_socket_debugger_url.is_some()
    }
}

/// Provider of an attachable connection into the running IDE
#[async_trait]
pub trait DebugConnectionProvider: Send + Sync {
    async fn version(&self) -> IdeResult<BrowserVersion>;

    async fn targets(&self) -> IdeResult<Vec<DebugTarget>>;

    /// The first attachable page target, i.e. the IDE workbench window.
    async fn workbench_target(&self) -> IdeResult<DebugTarget>;
}

/// Reqwest-backed client for a local debug port
pub struct IdeDebugClient {
    http: reqwest::Client,
    config: DebugPortConfig,
}

impl IdeDebugClient {
    pub fn new(config: DebugPortConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &DebugPortConfig {
        &self.config
    }
}

#[async_trait]
impl DebugConnectionProvider for IdeDebugClient {
    async fn version(&self) -> IdeResult<BrowserVersion> {
        let url = format!("{}/json/version", self.config.base_url());
        debug!(url = %url, "querying debug port version");
        let version = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<BrowserVersion>()
            .await?;
        Ok(version)
    }

    async fn targets(&self) -> IdeResult<Vec<DebugTarget>> {
        let url = format!("{}/json/list", self.config.base_url());
        debug!(url = %url, "listing debug targets");
        let targets = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<DebugTarget>>()
            .await?;
        Ok(targets)
    }

    async fn workbench_target(&self) -> IdeResult<DebugTarget> {
        let targets = self.targets().await?;
        if targets.is_empty() {
            return Err(IdeError::UnexpectedResponse {
                message: "debug port exposes no targets".to_string(),
            });
        }
        targets
            .into_iter()
            .find(DebugTarget::is_attachable_page)
            .ok_or(IdeError::NoWorkbenchTarget)
    }
}
