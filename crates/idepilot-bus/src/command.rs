//! Name-keyed command dispatch

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{BusError, BusResult};
use crate::event::{BusEvent, EventBus};

/// Topic the command bus publishes to after a successful dispatch
pub const COMMAND_COMPLETED_TOPIC: &str = "command.completed";
/// Topic the command bus publishes to after a failed dispatch
pub const COMMAND_FAILED_TOPIC: &str = "command.failed";

/// A command routed to the handler registered under its name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub payload: serde_json::Value,
}

impl Command {
    pub fn new(name: &str, payload: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            payload,
        }
    }
}

/// Handles commands dispatched under a single name
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// The command name this handler answers to
    fn command_name(&self) -> &str;

    async fn handle(&self, command: Command) -> BusResult<serde_json::Value>;
}

/// Request/response dispatcher with completion events.
///
/// Exactly one handler per command name. The outcome of every dispatch is
/// published on the event bus so observers can follow command traffic without
/// being in the dispatch path.
pub struct CommandBus {
    handlers: RwLock<HashMap<String, Arc<dyn CommandHandler>>>,
    events: Arc<EventBus>,
}

impl CommandBus {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn register(&self, handler: Arc<dyn CommandHandler>) -> BusResult<()> {
        let name = handler.command_name().to_string();
        let mut handlers = self.handlers.write().unwrap();
        if handlers.contains_key(&name) {
            return Err(BusError::DuplicateHandler { name });
        }
        debug!(command = %name, "command handler registered");
        handlers.insert(name, handler);
        Ok(())
    }

    pub async fn dispatch(&self, command: Command) -> BusResult<serde_json::Value> {
        let handler = {
            let handlers = self.handlers.read().unwrap();
            handlers.get(&command.name).cloned()
        }
        .ok_or_else(|| BusError::HandlerNotFound {
            name: command.name.clone(),
        })?;

        let name = command.name.clone();
        debug!(command = %name, "dispatching command");
        let result = handler.handle(command).await;

        match &result {
            Ok(value) => {
                self.events.publish(BusEvent::new(
                    COMMAND_COMPLETED_TOPIC,
                    json!({ "command": name, "result": value }),
                ));
            }
            Err(err) => {
                self.events.publish(BusEvent::new(
                    COMMAND_FAILED_TOPIC,
                    json!({ "command": name, "error": err.to_string() }),
                ));
            }
        }
        result
    }

    /// Registered command names, sorted.
    pub fn handler_names(&self) -> Vec<String> {
        let handlers = self.handlers.read().unwrap();
        let mut names: Vec<String> = handlers.keys().cloned().collect();
        names.sort();
        names
    }
}
