//! Registration orchestration: ordered construction and partial-failure tolerance

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use idepilot_di::{
    BoxedService, DiError, DiResult, ServiceContainer, ServiceDefinition, ServiceRegistry,
};

#[derive(Debug)]
struct Recorded {
    name: &'static str,
}

fn recorded(name: &'static str, dependencies: &[&str], category: &str) -> ServiceDefinition {
    ServiceDefinition::new(name, dependencies, category, move |_deps| {
        Box::pin(async move { Ok(Arc::new(Recorded { name }) as BoxedService) })
    })
}

fn failing(name: &'static str, dependencies: &[&str], category: &str) -> ServiceDefinition {
    ServiceDefinition::new(name, dependencies, category, move |_deps| {
        Box::pin(async move {
            let result: DiResult<BoxedService> = Err(DiError::ConstructionFailed {
                name: name.to_string(),
                message: "factory exploded".to_string(),
            });
            result
        })
    })
}

#[tokio::test]
async fn one_broken_factory_does_not_abort_the_bootstrap() {
    let mut registry = ServiceRegistry::new();
    registry.set_category_order(&["infrastructure"]);
    registry
        .declare_all([
            recorded("alpha", &[], "infrastructure"),
            recorded("beta", &[], "infrastructure"),
            failing("gamma", &[], "infrastructure"),
            recorded("delta", &[], "infrastructure"),
            recorded("epsilon", &[], "infrastructure"),
        ])
        .unwrap();

    let report = registry.register_all().await.unwrap();

    assert_eq!(report.registered.len(), 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "gamma");
    assert!(!report.is_complete());

    for name in ["alpha", "beta", "delta", "epsilon"] {
        let service = registry.get::<Recorded>(name).unwrap();
        assert_eq!(service.name, name);
    }
    assert!(matches!(
        registry.get::<Recorded>("gamma"),
        Err(DiError::ServiceNotRegistered { .. })
    ));
}

#[tokio::test]
async fn a_service_depending_on_a_failed_one_fails_attributably() {
    let mut registry = ServiceRegistry::new();
    registry
        .declare_all([
            failing("store", &[], "repositories"),
            recorded("consumer", &["store"], "domain"),
        ])
        .unwrap();

    let report = registry.register_all().await.unwrap();
    assert_eq!(report.registered.len(), 0);
    assert_eq!(report.failed.len(), 2);

    let consumer = report
        .failed
        .iter()
        .find(|failure| failure.name == "consumer")
        .unwrap();
    assert!(
        consumer.error.contains("store"),
        "error should name the unavailable dependency: {}",
        consumer.error
    );
}

#[tokio::test]
async fn dependencies_are_constructed_before_their_dependents() {
    let mut registry = ServiceRegistry::new();
    registry.set_category_order(&["infrastructure", "domain"]);
    registry
        .declare_all([
            // declared out of order on purpose
            recorded("svc", &["db"], "domain"),
            recorded("db", &[], "infrastructure"),
        ])
        .unwrap();

    let report = registry.register_all().await.unwrap();
    assert_eq!(report.registered, vec!["db", "svc"]);
}

#[tokio::test]
async fn factories_receive_their_resolved_dependencies() {
    let mut registry = ServiceRegistry::new();
    registry
        .declare(recorded("base", &[], "infrastructure"))
        .unwrap();
    registry
        .declare(ServiceDefinition::new(
            "wrapper",
            &["base"],
            "domain",
            |deps| {
                Box::pin(async move {
                    let base = deps.get::<Recorded>("base")?;
                    Ok(Arc::new(format!("wraps {}", base.name)) as BoxedService)
                })
            },
        ))
        .unwrap();

    registry.register_all().await.unwrap();
    let wrapper = registry.get::<String>("wrapper").unwrap();
    assert_eq!(wrapper.as_str(), "wraps base");
}

#[tokio::test]
async fn singletons_are_constructed_once_across_repeated_bootstraps() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = constructions.clone();

    let mut registry = ServiceRegistry::new();
    registry
        .declare(ServiceDefinition::new(
            "counted",
            &[],
            "infrastructure",
            move |_deps| {
                let counter = counter.clone();
                Box::pin(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(Recorded { name: "counted" }) as BoxedService)
                })
            },
        ))
        .unwrap();

    registry.register_all().await.unwrap();
    registry.register_all().await.unwrap();
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn duplicate_declaration_is_rejected() {
    let mut registry = ServiceRegistry::new();
    registry
        .declare(recorded("db", &[], "infrastructure"))
        .unwrap();
    assert!(matches!(
        registry.declare(recorded("db", &[], "infrastructure")),
        Err(DiError::DuplicateDefinition { .. })
    ));
}

#[tokio::test]
async fn resolution_failure_is_fatal_to_the_bootstrap() {
    let mut registry = ServiceRegistry::new();
    registry
        .declare(recorded("svc", &["ghost"], "domain"))
        .unwrap();
    assert!(matches!(
        registry.register_all().await,
        Err(DiError::MissingDependencies { .. })
    ));
}

#[tokio::test]
async fn post_init_failure_does_not_abort_registration() {
    let mut registry = ServiceRegistry::new();
    registry
        .declare(recorded("db", &[], "infrastructure"))
        .unwrap();
    registry.set_post_init(|_container: ServiceContainer| {
        Box::pin(async {
            let result: DiResult<()> = Err(DiError::ConstructionFailed {
                name: "post_init".to_string(),
                message: "priming failed".to_string(),
            });
            result
        })
    });

    let report = registry.register_all().await.unwrap();
    assert_eq!(report.registered, vec!["db"]);
}

#[tokio::test]
async fn post_init_runs_against_the_populated_container() {
    let primed = Arc::new(AtomicUsize::new(0));
    let observer = primed.clone();

    let mut registry = ServiceRegistry::new();
    registry
        .declare(recorded("db", &[], "infrastructure"))
        .unwrap();
    registry.set_post_init(move |container: ServiceContainer| {
        let observer = observer.clone();
        Box::pin(async move {
            container.get::<Recorded>("db")?;
            observer.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    });

    registry.register_all().await.unwrap();
    assert_eq!(primed.load(Ordering::SeqCst), 1);
}
