//! Application-context wiring tests.

use pretty_assertions::assert_eq;
use relation_engine::DenseFactory;
use relation_graph::{Graph, GraphManagerExt};
use relation_registry::{Domain, DomainKind, Entity, NoopCompiler, RejectReason, Relation};
use relation_workbench::{Workbench, DEFAULT_NAME};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn domain(name: &str) -> Domain {
    Domain::new(name, DomainKind::Sum, "A", "B", &NoopCompiler).unwrap()
}

fn relation(name: &str) -> Relation {
    Relation::with_dimensions(name, 2, 2, &DenseFactory).unwrap()
}

#[test]
fn default_objects_are_seeded() {
    init_logging();
    let workbench = Workbench::with_defaults();
    let default_rel = workbench.default_relation().unwrap();
    assert_eq!(default_rel.rows_native(), Some(1));
    assert!(workbench.default_graph().is_some());
}

#[test]
fn entity_types_share_one_namespace() {
    init_logging();
    let mut workbench = Workbench::with_defaults();
    workbench.domains.insert(domain("StateSet")).unwrap();

    let rejected = workbench.relations.insert(relation("StateSet")).unwrap_err();
    assert_eq!(rejected.reason, RejectReason::DuplicateName);

    // The program namespace is the same one again.
    assert!(workbench
        .namespace()
        .borrow()
        .contains("StateSet"));
}

#[test]
fn graphs_are_namespaced_apart_from_relations() {
    init_logging();
    let mut workbench = Workbench::with_defaults();
    workbench.relations.insert(relation("twin")).unwrap();

    // Same name, different world: no collision.
    assert!(workbench.graphs.insert(Graph::new("twin")).is_ok());
    assert!(workbench.relations.exists("twin"));
    assert!(workbench.graphs.exists("twin"));

    // The graph-side copy helper sees only graph names.
    assert!(workbench.graphs.duplicate_graph("twin", "twin-copy"));
    assert!(!workbench.relations.exists("twin-copy"));
}

#[test]
fn persistence_filter_skips_hidden_and_default_objects() {
    init_logging();
    let mut workbench = Workbench::with_defaults();
    workbench.relations.insert(relation("keep")).unwrap();
    workbench.relations.insert(relation("secret")).unwrap();
    workbench
        .relations
        .get_by_name_mut("secret")
        .unwrap()
        .set_hidden(true);

    let names = Workbench::persistable_names(&workbench.relations);
    assert_eq!(names, vec!["keep".to_string()]);
    assert!(!names.contains(&DEFAULT_NAME.to_string()));
}

#[test]
fn steal_all_between_context_managers() {
    init_logging();
    let mut workbench = Workbench::with_defaults();
    let mut scratch = relation_registry::RelationManager::with_namespace(workbench.namespace());
    scratch.insert(relation("result1")).unwrap();
    scratch.insert(relation("result2")).unwrap();

    let moved = workbench.relations.steal_all(&mut scratch);
    assert_eq!(moved, 2);
    assert!(scratch.is_empty());
    assert!(workbench.relations.exists("result1"));
    assert!(workbench.relations.exists("result2"));
}

#[test]
fn default_relation_rename_is_refused_on_collision() {
    init_logging();
    let mut workbench = Workbench::with_defaults();
    workbench.relations.insert(relation("taken")).unwrap();
    assert!(!workbench.relations.rename(DEFAULT_NAME, "taken"));
    assert_eq!(
        workbench.default_relation().unwrap().name(),
        DEFAULT_NAME
    );
}
