//! Service registry: declaration, order resolution, and construction
//!
//! The registry owns the canonical list of service definitions, drives the
//! [`ServiceOrderResolver`] to decide registration order, and invokes each
//! service's factory in that order with its already-constructed dependencies.
//! A failure while resolving the order aborts the bootstrap; a failure while
//! constructing an individual service is logged and skipped so one broken
//! integration cannot keep the rest of the system from starting.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::container::{BoxedService, ServiceContainer};
use crate::error::{DiError, DiResult};
use crate::resolver::{ResolvedOrder, ServiceOrderResolver};

/// Future returned by a service factory
pub type ServiceFuture = Pin<Box<dyn Future<Output = DiResult<BoxedService>> + Send>>;

/// Future returned by the post-initialization hook
pub type PostInitFuture = Pin<Box<dyn Future<Output = DiResult<()>> + Send>>;

type FactoryFn = Box<dyn Fn(ResolvedDependencies) -> ServiceFuture + Send + Sync>;
type PostInitFn = Box<dyn Fn(ServiceContainer) -> PostInitFuture + Send + Sync>;

/// The already-constructed dependency instances handed to a factory
#[derive(Default)]
pub struct ResolvedDependencies {
    services: HashMap<String, BoxedService>,
}

impl ResolvedDependencies {
    pub fn new(services: HashMap<String, BoxedService>) -> Self {
        Self { services }
    }

    /// Typed access to a dependency by name.
    pub fn get<T>(&self, name: &str) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let service = self
            .services
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

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// A declared service: name, dependency names, category, and the factory
/// invoked once to construct its singleton instance.
pub struct ServiceDefinition {
    name: String,
    dependencies: Vec<String>,
    category: String,
    factory: FactoryFn,
}

impl ServiceDefinition {
    pub fn new<F>(name: &str, dependencies: &[&str], category: &str, factory: F) -> Self
    where
        F: Fn(ResolvedDependencies) -> ServiceFuture + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            dependencies: dependencies.iter().map(|d| (*d).to_string()).collect(),
            category: category.to_string(),
            factory: Box::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A service whose factory failed during registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedService {
    pub name: String,
    pub category: String,
    pub error: String,
}

/// Outcome of [`ServiceRegistry::register_all`]
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    /// Services constructed and cached, in registration order
    pub registered: Vec<String>,
    /// Services whose factories failed; registration continued past them
    pub failed: Vec<FailedService>,
    /// Effective category sequence the plan followed
    pub category_order: Vec<String>,
}

impl BootstrapReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns service definitions and performs the ordered bootstrap.
#[derive(Default)]
pub struct ServiceRegistry {
    definitions: Vec<ServiceDefinition>,
    index: HashMap<String, usize>,
    resolver: ServiceOrderResolver,
    container: ServiceContainer,
    post_init: Option<PostInitFn>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the preferred category ordering for the registration plan.
    pub fn set_category_order(&mut self, categories: &[&str]) {
        self.resolver.set_category_order(categories);
    }

    /// Declare a service exactly once. Redeclaring a name is an error; the
    /// definition list is the canonical wiring table.
    pub fn declare(&mut self, definition: ServiceDefinition) -> DiResult<()> {
        if self.index.contains_key(definition.name()) {
            return Err(DiError::DuplicateDefinition {
                name: definition.name().to_string(),
            });
        }
        let dependencies: Vec<&str> = definition
            .dependencies
            .iter()
            .map(String::as_str)
            .collect();
        self.resolver
            .add_service(&definition.name, &dependencies, &definition.category);
        self.index
            .insert(definition.name.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    pub fn declare_all(
        &mut self,
        definitions: impl IntoIterator<Item = ServiceDefinition>,
    ) -> DiResult<()> {
        for definition in definitions {
            self.declare(definition)?;
        }
        Ok(())
    }

    /// Best-effort hook run after every category has been processed, e.g. to
    /// prime a project-context singleton. A failure here is logged, never
    /// propagated.
    pub fn set_post_init<F>(&mut self, hook: F)
    where
        F: Fn(ServiceContainer) -> PostInitFuture + Send + Sync + 'static,
    {
        self.post_init = Some(Box::new(hook));
    }

    /// Resolve the registration plan and construct every declared service in
    /// plan order, awaiting each factory sequentially.
    ///
    /// Resolution failures (missing dependencies, cycles) are fatal and
    /// returned as errors. Construction failures are recorded in the report
    /// and skipped; a service depending on a failed one fails in turn with an
    /// error naming the unavailable dependency.
    pub async fn register_all(&self) -> DiResult<BootstrapReport> {
        let resolved = self.resolver.resolve_order()?;
        info!(
            services = resolved.ordered_services.len(),
            groups = resolved.registration_plan.len(),
            "service registration started"
        );

        let mut registered: Vec<String> = Vec::new();
        let mut failed: Vec<FailedService> = Vec::new();

        for group in &resolved.registration_plan {
            debug!(
                category = %group.category,
                services = group.services.len(),
                "registering category"
            );
            for name in &group.services {
                if self.container.contains(name) {
                    registered.push(name.clone());
                    continue;
                }
                match self.construct(name).await {
                    Ok(service) => {
                        self.container.insert(name, service);
                        registered.push(name.clone());
                        debug!(service = %name, category = %group.category, "service registered");
                    }
                    Err(err) => {
                        warn!(
                            service = %name,
                            category = %group.category,
                            error = %err,
                            "service construction failed, continuing registration"
                        );
                        failed.push(FailedService {
                            name: name.clone(),
                            category: group.category.clone(),
                            error: err.to_string(),
                        });
                    }
                }
            }
        }

        if let Some(hook) = &self.post_init {
            if let Err(err) = hook(self.container.clone()).await {
                warn!(error = %err, "post-initialization failed");
            }
        }

        info!(
            registered = registered.len(),
            failed = failed.len(),
            "service registration complete"
        );
        Ok(BootstrapReport {
            registered,
            failed,
            category_order: resolved.category_order,
        })
    }

    async fn construct(&self, name: &str) -> DiResult<BoxedService> {
        let index = self
            .index
            .get(name)
            .ok_or_else(|| DiError::ServiceNotRegistered {
                name: name.to_string(),
            })?;
        let definition = &self.definitions[*index];

        let mut resolved: HashMap<String, BoxedService> = HashMap::new();
        for dependency in &definition.dependencies {
            let service =
                self.container
                    .get_raw(dependency)
                    .ok_or_else(|| DiError::ConstructionFailed {
                        name: name.to_string(),
                        message: format!("dependency '{dependency}' is unavailable"),
                    })?;
            resolved.insert(dependency.clone(), service);
        }

        (definition.factory)(ResolvedDependencies::new(resolved)).await
    }

    /// Typed lookup of a constructed singleton.
    pub fn get<T>(&self, name: &str) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.container.get(name)
    }

    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    pub fn resolver(&self) -> &ServiceOrderResolver {
        &self.resolver
    }

    /// Resolve without constructing anything, for plan inspection.
    pub fn plan(&self) -> DiResult<ResolvedOrder> {
        self.resolver.resolve_order()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Full teardown: definitions, resolver state, and cached instances.
    pub fn clear(&mut self) {
        self.definitions.clear();
        self.index.clear();
        self.resolver.clear();
        self.container.clear();
        info!("service registry cleared");
    }
}
