//! Registration plan construction and category ordering

use std::collections::HashMap;

use idepilot_di::resolver::ServiceOrderResolver;
use idepilot_di::DiError;

#[test]
fn plan_groups_infrastructure_before_domain() {
    let mut resolver = ServiceOrderResolver::new();
    resolver.set_category_order(&["infra", "domain"]);
    resolver.add_service("db", &[], "infra");
    resolver.add_service("svc", &["db"], "domain");

    let resolved = resolver.resolve_order().unwrap();
    let plan = &resolved.registration_plan;
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].category, "infra");
    assert_eq!(plan[0].services, vec!["db"]);
    assert_eq!(plan[1].category, "domain");
    assert_eq!(plan[1].services, vec!["svc"]);
    assert_eq!(plan[1].dependencies, vec!["db"]);
}

#[test]
fn flattened_plan_is_a_valid_topological_order() {
    let mut resolver = ServiceOrderResolver::new();
    resolver.set_category_order(&["infrastructure", "external", "domain", "application"]);
    resolver.add_service("event_bus", &[], "infrastructure");
    resolver.add_service("command_bus", &["event_bus"], "infrastructure");
    resolver.add_service("git_client", &[], "external");
    resolver.add_service("scanner", &[], "external");
    resolver.add_service("project_service", &["git_client"], "domain");
    resolver.add_service("context_service", &["scanner"], "domain");
    resolver.add_service(
        "automation",
        &["command_bus", "project_service", "context_service"],
        "application",
    );

    let resolved = resolver.resolve_order().unwrap();
    let flattened: Vec<&str> = resolved
        .registration_plan
        .iter()
        .flat_map(|group| group.services.iter().map(String::as_str))
        .collect();
    assert_eq!(flattened.len(), 7);

    let position: HashMap<&str, usize> = flattened
        .iter()
        .enumerate()
        .map(|(index, name)| (*name, index))
        .collect();
    for name in &flattened {
        for dep in resolver.graph().dependencies_of(name) {
            assert!(
                position[dep.as_str()] < position[name],
                "{dep} must precede {name}"
            );
        }
    }
}

#[test]
fn resolution_queue_fails_fast_on_cycles() {
    let mut resolver = ServiceOrderResolver::new();
    resolver.add_service("a", &["b"], "infra");
    resolver.add_service("b", &["a"], "infra");

    assert!(matches!(
        resolver.resolution_queue(),
        Err(DiError::CircularDependencies { .. })
    ));
}

#[test]
fn resolution_queue_returns_flat_plan_order() {
    let mut resolver = ServiceOrderResolver::new();
    resolver.set_category_order(&["infra", "domain"]);
    resolver.add_service("svc", &["db"], "domain");
    resolver.add_service("db", &[], "infra");

    let queue = resolver.resolution_queue().unwrap();
    assert_eq!(queue, vec!["db", "svc"]);
}

#[test]
fn clear_resets_services_but_keeps_preferred_order() {
    let mut resolver = ServiceOrderResolver::new();
    resolver.set_category_order(&["infra", "domain"]);
    resolver.add_service("db", &[], "infra");
    resolver.clear();
    assert!(resolver.is_empty());

    resolver.add_service("svc", &[], "domain");
    let resolved = resolver.resolve_order().unwrap();
    assert_eq!(resolved.category_order[0], "infra");
    assert_eq!(resolved.category_order[1], "domain");
}

#[test]
fn plan_serializes_for_diagnostics() {
    let mut resolver = ServiceOrderResolver::new();
    resolver.add_service("db", &[], "infra");
    let resolved = resolver.resolve_order().unwrap();

    let rendered = serde_json::to_value(&resolved).unwrap();
    assert_eq!(rendered["ordered_services"][0], "db");
    assert_eq!(rendered["registration_plan"][0]["category"], "infra");
    assert_eq!(rendered["stats"]["nodes"], 1);
}
