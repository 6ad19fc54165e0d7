//! Name-keyed singleton container
//!
//! Constructed service instances are stored type-erased under their service
//! name; lookups downcast back to the concrete type. Cloning the container is
//! cheap and shares the underlying store.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::error::{DiError, DiResult};

/// A type-erased, shareable service instance
pub type BoxedService = Arc<dyn Any + Send + Sync>;

/// Thread-safe store of constructed singletons, keyed by service name
#[derive(Clone, Default)]
pub struct ServiceContainer {
    services: Arc<RwLock<HashMap<String, BoxedService>>>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a constructed instance under `name`, replacing any previous one.
    pub fn insert(&self, name: &str, service: BoxedService) {
        let mut services = self.services.write().unwrap();
        services.insert(name.to_string(), service);
        debug!(service = name, "service instance cached");
    }

    /// Typed lookup. Fails with [`DiError::ServiceNotRegistered`] for unknown
    /// names and [`DiError::InvalidServiceType`] when the cached instance is
    /// not a `T`.
    pub fn get<T>(&self, name: &str) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let services = self.services.read().unwrap();
        let service = services
            .get(name)
            .ok_or_else(|| DiError::ServiceNotRegistered {
                name: name.to_string(),
            })?;
        service
            .clone()
            .downcast::<T>()
            .map_err(|_| DiError::InvalidServiceType {
                name: name.to_string(),
            })
    }

    /// Untyped lookup; `None` for unknown names.
    pub fn get_raw(&self, name: &str) -> Option<BoxedService> {
        let services = self.services.read().unwrap();
        services.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let services = self.services.read().unwrap();
        services.contains_key(name)
    }

    /// Names of every cached service, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let services = self.services.read().unwrap();
        let mut names: Vec<String> = services.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        let services = self.services.read().unwrap();
        services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut services = self.services.write().unwrap();
        services.clear();
        info!("service container cleared");
    }
}
