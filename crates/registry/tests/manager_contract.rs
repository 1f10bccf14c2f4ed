//! Manager/namespace contract tests.

use pretty_assertions::assert_eq;
use relation_engine::DenseFactory;
use relation_registry::{
    Domain, DomainKind, DomainManager, Entity, Manager, ManagerObserver, Namespace, NoopCompiler,
    RejectReason, Relation, RelationManager,
};
use std::cell::Cell;
use std::rc::Rc;

fn domain(name: &str) -> Domain {
    Domain::new(name, DomainKind::Product, "A", "B", &NoopCompiler).unwrap()
}

fn relation(name: &str) -> Relation {
    Relation::with_dimensions(name, 2, 2, &DenseFactory).unwrap()
}

fn changed_counter(manager: &mut Manager<impl Entity>) -> Rc<Cell<usize>> {
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    manager.register_observer(ManagerObserver::changed(move || {
        counter.set(counter.get() + 1);
    }));
    hits
}

#[test]
fn insert_updates_map_and_namespace_together() {
    let mut manager = DomainManager::new();
    let namespace = manager.namespace();
    assert!(manager.insert(domain("a")).is_ok());
    assert!(manager.exists("a"));
    assert!(namespace.borrow().contains("a"));

    assert!(manager.delete_by_name("a"));
    assert!(!manager.exists("a"));
    assert!(!namespace.borrow().contains("a"));
}

#[test]
fn duplicate_names_are_refused_across_managers_sharing_a_namespace() {
    let namespace = Namespace::shared();
    let mut domains = DomainManager::with_namespace(namespace.clone());
    let mut relations = RelationManager::with_namespace(namespace);

    assert!(domains.insert(domain("shared")).is_ok());
    let rejected = relations.insert(relation("shared")).unwrap_err();
    assert_eq!(rejected.reason, RejectReason::DuplicateName);
    // The refused entity comes back intact.
    assert_eq!(rejected.entity.name(), "shared");
    assert!(!relations.exists("shared"));
}

#[test]
fn namespace_filter_rejections_hand_the_entity_back() {
    let mut manager = DomainManager::new();
    assert!(manager
        .namespace()
        .borrow_mut()
        .set_filter(Box::new(|name| !name.contains(' '))));
    let rejected = manager.insert(domain("bad name")).unwrap_err();
    assert_eq!(rejected.reason, RejectReason::InvalidName);
    assert!(manager.is_empty());
}

#[test]
fn manager_and_namespace_agree_after_mixed_mutations() {
    let namespace = Namespace::shared();
    let mut a = DomainManager::with_namespace(namespace.clone());
    let mut b = DomainManager::with_namespace(namespace.clone());

    for name in ["p", "q", "r"] {
        a.insert(domain(name)).ok();
    }
    let stolen = a.steal("q").unwrap();
    b.insert(stolen).ok();
    a.delete_by_name("p");
    a.rename("r", "s");

    for name in ["p", "q", "r", "s"] {
        let in_managers = a.exists(name) || b.exists(name);
        assert_eq!(
            in_managers,
            namespace.borrow().contains(name),
            "disagreement on {name}"
        );
    }
}

#[test]
fn steal_all_moves_disjoint_sets_completely() {
    let namespace = Namespace::shared();
    let mut a = DomainManager::with_namespace(namespace.clone());
    let mut b = DomainManager::with_namespace(namespace);
    a.insert(domain("a1")).ok();
    b.insert(domain("b1")).ok();
    b.insert(domain("b2")).ok();
    b.insert(domain("b3")).ok();

    let moved = a.steal_all(&mut b);
    assert_eq!(moved, 3);
    assert!(b.is_empty());
    assert_eq!(a.len(), 4);
    for name in ["a1", "b1", "b2", "b3"] {
        assert!(a.exists(name));
    }
}

#[test]
fn steal_all_skips_overlapping_names() {
    // Distinct namespaces so the same name can live in both managers.
    let mut a = DomainManager::new();
    let mut b = DomainManager::new();
    a.insert(domain("shared")).ok();
    b.insert(domain("shared")).ok();
    b.insert(domain("only-b")).ok();

    let moved = a.steal_all(&mut b);
    assert_eq!(moved, 1);
    assert_eq!(b.len(), 1);
    assert!(b.exists("shared"));
    assert!(a.exists("only-b"));
}

#[test]
fn steal_all_fires_one_changed_per_manager() {
    let namespace = Namespace::shared();
    let mut a = DomainManager::with_namespace(namespace.clone());
    let mut b = DomainManager::with_namespace(namespace);
    for name in ["x", "y", "z"] {
        b.insert(domain(name)).ok();
    }
    let a_hits = changed_counter(&mut a);
    let b_hits = changed_counter(&mut b);

    a.steal_all(&mut b);
    assert_eq!(a_hits.get(), 1);
    assert_eq!(b_hits.get(), 1);
}

#[test]
fn steal_all_pushes_back_when_the_target_namespace_refuses() {
    // A relation holds "taken" in the namespace the target manager uses;
    // the source manager runs on a namespace of its own.
    let shared = Namespace::shared();
    let mut a = DomainManager::with_namespace(shared.clone());
    let mut foreign = RelationManager::with_namespace(shared);
    foreign.insert(relation("taken")).ok();

    let mut b = DomainManager::new();
    b.insert(domain("taken")).ok();
    b.insert(domain("free")).ok();

    let moved = a.steal_all(&mut b);
    assert_eq!(moved, 1);
    assert!(a.exists("free"));
    // The refused entity went back instead of being lost.
    assert!(b.exists("taken"));
    assert!(foreign.exists("taken"));
}

#[test]
fn notification_coalescing_under_block() {
    let mut manager = DomainManager::new();
    let hits = changed_counter(&mut manager);

    manager.block_notify();
    for name in ["a", "b", "c"] {
        manager.insert(domain(name)).ok();
    }
    manager.unblock_notify();
    assert_eq!(hits.get(), 1);

    for name in ["d", "e", "f"] {
        manager.insert(domain(name)).ok();
    }
    assert_eq!(hits.get(), 4);
}

#[test]
fn nested_blocks_coalesce_to_one_delivery() {
    let mut manager = DomainManager::new();
    let hits = changed_counter(&mut manager);

    manager.block_notify();
    manager.block_notify();
    manager.insert(domain("a")).ok();
    manager.unblock_notify();
    assert_eq!(hits.get(), 0);
    manager.unblock_notify();
    assert_eq!(hits.get(), 1);
    // Saturating: an extra unblock neither underflows nor re-fires.
    manager.unblock_notify();
    assert_eq!(hits.get(), 1);
}

#[test]
fn rename_collision_leaves_the_relation_untouched() {
    let namespace = Namespace::shared();
    let mut relations = RelationManager::with_namespace(namespace);
    relations.insert(relation("r")).ok();
    relations.insert(relation("s")).ok();

    assert!(!relations.rename("r", "s"));
    assert!(relations.exists("r"));
    assert_eq!(relations.get_by_name("r").unwrap().name(), "r");
    assert_eq!(relations.len(), 2);
}

#[test]
fn rename_to_self_is_a_quiet_success() {
    let mut relations = RelationManager::new();
    relations.insert(relation("r")).ok();
    let hits = changed_counter(&mut relations);
    assert!(relations.rename("r", "r"));
    assert_eq!(hits.get(), 0);
}

#[test]
fn rename_moves_map_key_and_namespace_entry() {
    let mut relations = RelationManager::new();
    let namespace = relations.namespace();
    relations.insert(relation("old")).ok();

    assert!(relations.rename("old", "new"));
    assert!(!relations.exists("old"));
    assert_eq!(relations.get_by_name("new").unwrap().name(), "new");
    assert!(!namespace.borrow().contains("old"));
    assert!(namespace.borrow().contains("new"));
}

#[test]
fn delete_with_filter_scenario() {
    let mut manager = DomainManager::new();
    manager.insert(domain("a")).ok();
    manager.insert(domain("b")).ok();
    let hits = changed_counter(&mut manager);

    let removed = manager.delete_with_filter(|entity| entity.name() == "a");
    assert_eq!(removed, 1);
    assert_eq!(hits.get(), 1);
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.names(), vec!["b".to_string()]);
}

#[test]
fn delete_with_filter_without_matches_stays_silent() {
    let mut manager = DomainManager::new();
    manager.insert(domain("a")).ok();
    let hits = changed_counter(&mut manager);
    assert_eq!(manager.delete_with_filter(|_| false), 0);
    assert_eq!(hits.get(), 0);
}

#[test]
fn drop_notifies_and_detaches_from_the_shared_namespace() {
    let namespace = Namespace::shared();
    let deleted = Rc::new(Cell::new(false));
    let changed = Rc::new(Cell::new(0));
    {
        let mut manager = DomainManager::with_namespace(namespace.clone());
        manager.insert(domain("a")).ok();
        manager.insert(domain("b")).ok();
        let deleted_flag = deleted.clone();
        let changed_hits = changed.clone();
        manager.register_observer(ManagerObserver {
            on_delete: Some(Box::new(move || deleted_flag.set(true))),
            changed: Some(Box::new(move || {
                changed_hits.set(changed_hits.get() + 1);
            })),
        });
    }
    assert!(deleted.get());
    // Exactly the final teardown `changed`.
    assert_eq!(changed.get(), 1);
    assert!(namespace.borrow().is_empty());
}

#[test]
fn iteration_sees_every_entity_once() {
    let mut manager = DomainManager::new();
    for name in ["a", "b", "c"] {
        manager.insert(domain(name)).ok();
    }
    let mut seen: Vec<&str> = manager.iter().map(|(name, _)| name).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec!["a", "b", "c"]);
}
