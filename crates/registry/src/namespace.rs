use crate::entity::EntityKind;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Predicate deciding whether a name may enter the namespace.
pub type NameFilter = Box<dyn Fn(&str) -> bool>;

/// Namespace shared by several managers.
pub type SharedNamespace = Rc<RefCell<Namespace>>;

/// Registry of names across independently-typed collections.
///
/// At most one entry per name; a name is insertable only when the filter
/// (if any) accepts it and no entry with that name exists. Sharing between
/// managers is plain `Rc` ownership — the namespace is dropped when the
/// last manager holding it goes away.
#[derive(Default)]
pub struct Namespace {
    entries: HashMap<String, EntityKind>,
    filter: Option<NameFilter>,
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh namespace behind a shared handle.
    #[must_use]
    pub fn shared() -> SharedNamespace {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Replace the validity filter.
    ///
    /// Fails without replacing when any currently-registered name would be
    /// rejected by the new predicate — filters may only be tightened in ways
    /// that keep existing members valid.
    pub fn set_filter(&mut self, filter: NameFilter) -> bool {
        if self.entries.keys().any(|name| !filter(name)) {
            return false;
        }
        self.filter = Some(filter);
        true
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    #[must_use]
    pub fn is_valid_name(&self, name: &str) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(name))
    }

    /// Valid per the filter and not yet registered.
    #[must_use]
    pub fn is_insertable(&self, name: &str) -> bool {
        self.is_valid_name(name) && !self.entries.contains_key(name)
    }

    /// Register a name; false when the filter rejects it or it is taken.
    pub fn add(&mut self, name: &str, owner: EntityKind) -> bool {
        if !self.is_insertable(name) {
            return false;
        }
        self.entries.insert(name.to_string(), owner);
        true
    }

    /// Idempotent removal.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Re-index a member whose name changed externally.
    ///
    /// When the new name collides with a different member, the re-indexed
    /// member is removed from the namespace and false is returned; the
    /// caller owns the now-orphaned object and is responsible for
    /// destroying it.
    pub fn name_changed(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return self.entries.contains_key(old);
        }
        let Some(owner) = self.entries.get(old).copied() else {
            log::warn!("name_changed: '{old}' is not registered; ignored");
            return false;
        };
        if self.entries.contains_key(new) {
            self.entries.remove(old);
            return false;
        }
        self.entries.remove(old);
        self.entries.insert(new.to_string(), owner);
        true
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<EntityKind> {
        self.entries.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_is_unique_per_name() {
        let mut ns = Namespace::new();
        assert!(ns.add("r", EntityKind::Relation));
        assert!(!ns.add("r", EntityKind::Domain));
        assert_eq!(ns.get_by_name("r"), Some(EntityKind::Relation));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut ns = Namespace::new();
        ns.add("r", EntityKind::Relation);
        assert!(ns.remove_by_name("r"));
        assert!(!ns.remove_by_name("r"));
    }

    #[test]
    fn filter_rejects_new_names_only() {
        let mut ns = Namespace::new();
        ns.add("ok", EntityKind::Domain);
        assert!(ns.set_filter(Box::new(|name| !name.is_empty())));
        assert!(!ns.add("", EntityKind::Domain));
        assert!(ns.add("ok2", EntityKind::Domain));
    }

    #[test]
    fn filter_replacement_fails_when_members_would_be_invalid() {
        let mut ns = Namespace::new();
        ns.add("long-name", EntityKind::Function);
        assert!(!ns.set_filter(Box::new(|name| name.len() <= 4)));
        // The old (absent) filter still applies.
        assert!(ns.is_valid_name("long-name"));
        assert!(ns.add("another-long-name", EntityKind::Function));
    }

    #[test]
    fn name_changed_reindexes() {
        let mut ns = Namespace::new();
        ns.add("a", EntityKind::Relation);
        assert!(ns.name_changed("a", "b"));
        assert!(!ns.contains("a"));
        assert_eq!(ns.get_by_name("b"), Some(EntityKind::Relation));
    }

    #[test]
    fn name_changed_collision_drops_the_member() {
        let mut ns = Namespace::new();
        ns.add("a", EntityKind::Relation);
        ns.add("b", EntityKind::Domain);
        assert!(!ns.name_changed("a", "b"));
        // The renamed-away member is gone; the collision target survives.
        assert!(!ns.contains("a"));
        assert_eq!(ns.get_by_name("b"), Some(EntityKind::Domain));
    }

    #[test]
    fn name_changed_to_same_name_is_a_no_op() {
        let mut ns = Namespace::new();
        ns.add("a", EntityKind::Relation);
        assert!(ns.name_changed("a", "a"));
        assert_eq!(ns.len(), 1);
    }
}
