//! Name-keyed query dispatch

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BusError, BusResult};

/// A read-only request routed to the handler registered under its name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub name: String,
    pub payload: serde_json::Value,
}

impl Query {
    pub fn new(name: &str, payload: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            payload,
        }
    }
}

/// Handles queries dispatched under a single name
#[async_trait]
pub trait QueryHandler: Send + Sync {
    /// The query name this handler answers to
    fn query_name(&self) -> &str;

    async fn handle(&self, query: Query) -> BusResult<serde_json::Value>;
}

/// Request/response dispatcher for reads. Unlike the command bus it publishes
/// no events; queries are side-effect free.
pub struct QueryBus {
    handlers: RwLock<HashMap<String, Arc<dyn QueryHandler>>>,
}

impl QueryBus {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, handler: Arc<dyn QueryHandler>) -> BusResult<()> {
        let name = handler.query_name().to_string();
        let mut handlers = self.handlers.write().unwrap();
        if handlers.contains_key(&name) {
            return Err(BusError::DuplicateHandler { name });
        }
        debug!(query = %name, "query handler registered");
        handlers.insert(name, handler);
        Ok(())
    }

    pub async fn dispatch(&self, query: Query) -> BusResult<serde_json::Value> {
        let handler = {
            let handlers = self.handlers.read().unwrap();
            handlers.get(&query.name).cloned()
        }
        .ok_or_else(|| BusError::HandlerNotFound {
            name: query.name.clone(),
        })?;
        handler.handle(query).await
    }

    /// Registered query names, sorted.
    pub fn handler_names(&self) -> Vec<String> {
        let handlers = self.handlers.read().unwrap();
        let mut names: Vec<String> = handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for QueryBus {
    fn default() -> Self {
        Self::new()
    }
}
