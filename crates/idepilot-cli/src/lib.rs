//! IdePilot application layer
//!
//! Owns configuration, the canonical service wiring table, the top-level
//! automation service, and the bus handlers the backend exposes. The binary
//! in `main.rs` is a thin shell over [`bootstrap::build_registry`].

pub mod automation;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;

pub use automation::{AutomationService, SystemStatus};
pub use config::{AppConfig, IdeSection};
pub use error::{AppError, AppResult};
