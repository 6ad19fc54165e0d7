//! The canonical service wiring table
//!
//! Every concrete service the backend runs is declared here exactly once,
//! with its dependency names and category. The registry resolves the
//! registration plan from these declarations and constructs services in plan
//! order; a single broken integration (say, no git repository at the project
//! directory) is skipped rather than aborting the bootstrap.

use std::sync::Arc;

use tracing::info;

use idepilot_bus::{CommandBus, EventBus, QueryBus};
use idepilot_di::{
    BoxedService, DiError, DiResult, PostInitFuture, ServiceContainer, ServiceDefinition,
    ServiceRegistry,
};
use idepilot_domain::{
    ContextService, ProjectRepository, ProjectService, SnapshotRepository,
};
use idepilot_files::{ScanProfile, WorkspaceScanner};
use idepilot_ide::{DebugPortConfig, IdeDebugClient};
use idepilot_vcs::GitClient;

use crate::automation::AutomationService;
use crate::config::AppConfig;
use crate::handlers::{ProjectStatusHandler, RefreshContextHandler};

/// Preferred registration phases, coarse strata ordered bottom-up
pub const CATEGORY_ORDER: [&str; 7] = [
    "infrastructure",
    "repositories",
    "external",
    "strategies",
    "domain",
    "application",
    "handlers",
];

/// Build the registry with every service declared and the post-init hook set.
pub fn build_registry(config: &AppConfig) -> DiResult<ServiceRegistry> {
    let mut registry = ServiceRegistry::new();
    registry.set_category_order(&CATEGORY_ORDER);
    registry.declare_all(service_definitions(config))?;
    registry.set_post_init(|container: ServiceContainer| -> PostInitFuture {
        Box::pin(prime_project_context(container))
    });
    Ok(registry)
}

fn construction_error(name: &str, err: impl std::fmt::Display) -> DiError {
    DiError::ConstructionFailed {
        name: name.to_string(),
        message: err.to_string(),
    }
}

fn service_definitions(config: &AppConfig) -> Vec<ServiceDefinition> {
    let project_dir = config.project_dir.clone();
    let debug_port = DebugPortConfig::new(&config.ide.host, config.ide.port);

    vec![
        // infrastructure
        ServiceDefinition::new("event_bus", &[], "infrastructure", |_deps| {
            Box::pin(async { Ok(Arc::new(EventBus::new()) as BoxedService) })
        }),
        ServiceDefinition::new("command_bus", &["event_bus"], "infrastructure", |deps| {
            Box::pin(async move {
                let events = deps.get::<EventBus>("event_bus")?;
                Ok(Arc::new(CommandBus::new(events)) as BoxedService)
            })
        }),
        ServiceDefinition::new("query_bus", &[], "infrastructure", |_deps| {
            Box::pin(async { Ok(Arc::new(QueryBus::new()) as BoxedService) })
        }),
        // repositories
        ServiceDefinition::new("project_repository", &[], "repositories", |_deps| {
            Box::pin(async { Ok(Arc::new(ProjectRepository::new()) as BoxedService) })
        }),
        ServiceDefinition::new("snapshot_repository", &[], "repositories", |_deps| {
            Box::pin(async { Ok(Arc::new(SnapshotRepository::new()) as BoxedService) })
        }),
        // external
        ServiceDefinition::new("ide_connection", &[], "external", move |_deps| {
            let debug_port = debug_port.clone();
            Box::pin(async move { Ok(Arc::new(IdeDebugClient::new(debug_port)) as BoxedService) })
        }),
        ServiceDefinition::new("git_client", &[], "external", {
            let project_dir = project_dir.clone();
            move |_deps| {
                let project_dir = project_dir.clone();
                Box::pin(async move {
                    let client = GitClient::discover(&project_dir)
                        .map_err(|err| construction_error("git_client", err))?;
                    Ok(Arc::new(client) as BoxedService)
                })
            }
        }),
        ServiceDefinition::new("workspace_scanner", &[], "external", |_deps| {
            Box::pin(async { Ok(Arc::new(WorkspaceScanner::new()) as BoxedService) })
        }),
        // strategies
        ServiceDefinition::new("scan_profile", &[], "strategies", |_deps| {
            Box::pin(async {
                let profile = ScanProfile::source_code()
                    .map_err(|err| construction_error("scan_profile", err))?;
                Ok(Arc::new(profile) as BoxedService)
            })
        }),
        // domain
        ServiceDefinition::new(
            "project_service",
            &["project_repository", "git_client"],
            "domain",
            |deps| {
                Box::pin(async move {
                    let projects = deps.get::<ProjectRepository>("project_repository")?;
                    let git = deps.get::<GitClient>("git_client")?;
                    Ok(Arc::new(ProjectService::new(projects, git)) as BoxedService)
                })
            },
        ),
        ServiceDefinition::new(
            "context_service",
            &["workspace_scanner", "scan_profile", "snapshot_repository"],
            "domain",
            |deps| {
                Box::pin(async move {
                    let scanner = deps.get::<WorkspaceScanner>("workspace_scanner")?;
                    let profile = deps.get::<ScanProfile>("scan_profile")?;
                    let snapshots = deps.get::<SnapshotRepository>("snapshot_repository")?;
                    Ok(Arc::new(ContextService::new(scanner, profile, snapshots)) as BoxedService)
                })
            },
        ),
        // application
        ServiceDefinition::new(
            "automation_service",
            &["ide_connection", "project_service", "context_service"],
            "application",
            |deps| {
                Box::pin(async move {
                    let ide = deps.get::<IdeDebugClient>("ide_connection")?;
                    let projects = deps.get::<ProjectService>("project_service")?;
                    let context = deps.get::<ContextService>("context_service")?;
                    Ok(Arc::new(AutomationService::new(ide, projects, context)) as BoxedService)
                })
            },
        ),
        // handlers
        ServiceDefinition::new(
            "refresh_context_handler",
            &["command_bus", "context_service"],
            "handlers",
            {
                let project_dir = project_dir.clone();
                move |deps| {
                    let project_dir = project_dir.clone();
                    Box::pin(async move {
                        let commands = deps.get::<CommandBus>("command_bus")?;
                        let context = deps.get::<ContextService>("context_service")?;
                        let handler = Arc::new(RefreshContextHandler::new(context, project_dir));
                        commands
                            .register(handler.clone())
                            .map_err(|err| construction_error("refresh_context_handler", err))?;
                        Ok(handler as BoxedService)
                    })
                }
            },
        ),
        ServiceDefinition::new(
            "project_status_handler",
            &["query_bus", "project_service"],
            "handlers",
            |deps| {
                Box::pin(async move {
                    let queries = deps.get::<QueryBus>("query_bus")?;
                    let projects = deps.get::<ProjectService>("project_service")?;
                    let handler = Arc::new(ProjectStatusHandler::new(projects));
                    queries
                        .register(handler.clone())
                        .map_err(|err| construction_error("project_status_handler", err))?;
                    Ok(handler as BoxedService)
                })
            },
        ),
    ]
}

/// Best-effort post-initialization: sync the project from git and capture an
/// initial workspace snapshot. Failures are logged by the registry, never
/// propagated.
async fn prime_project_context(container: ServiceContainer) -> DiResult<()> {
    let projects = container.get::<ProjectService>("project_service")?;
    let context = container.get::<ContextService>("context_service")?;
    let project = projects
        .sync_project()
        .map_err(|err| construction_error("project_context", err))?;
    context
        .capture(&project.id, &project.root_path)
        .map_err(|err| construction_error("project_context", err))?;
    info!(project = %project.id, "project context primed");
    Ok(())
}
