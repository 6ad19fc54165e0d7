//! IdePilot message buses
//!
//! Thin dispatch plumbing used across the backend:
//! - [`EventBus`]: topic-keyed publish/subscribe, fire-and-forget
//! - [`CommandBus`]: name-keyed request/response with completion events
//! - [`QueryBus`]: name-keyed request/response for side-effect-free reads
//!
//! Handlers are registered once per name; registration and dispatch failures
//! are typed errors, never panics.

pub mod command;
pub mod error;
pub mod event;
pub mod query;

pub use command::{Command, CommandBus, CommandHandler, COMMAND_COMPLETED_TOPIC, COMMAND_FAILED_TOPIC};
pub use error::{BusError, BusResult};
pub use event::{BusEvent, EventBus};
pub use query::{Query, QueryBus, QueryHandler};
