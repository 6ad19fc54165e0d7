//! IdePilot IDE integration
//!
//! Treats the automated IDE as an opaque browser reachable through its
//! remote-debugging port: discover the endpoint's version metadata and the
//! attachable workbench page target. Scripting against the page is handled
//! elsewhere; this crate only provides the connection.

pub mod client;
pub mod config;
pub mod error;

pub use client::{BrowserVersion, DebugConnectionProvider, DebugTarget, IdeDebugClient};
pub use config::DebugPortConfig;
pub use error::{IdeError, IdeResult};
