use crate::entity::Entity;
use crate::error::RejectReason;
use crate::namespace::{Namespace, SharedNamespace};
use crate::observer::{NotifyGate, ObserverId, ObserverList};
use std::collections::HashMap;
use std::fmt;

/// Observer record for a manager: both slots optional.
pub struct ManagerObserver {
    /// Fired once, just before the manager itself is torn down.
    pub on_delete: Option<Box<dyn FnMut()>>,
    /// Fired after any mutating batch, coalesced across suppressed regions.
    pub changed: Option<Box<dyn FnMut()>>,
}

impl ManagerObserver {
    /// Observer with only the `changed` slot filled.
    pub fn changed(f: impl FnMut() + 'static) -> Self {
        Self {
            on_delete: None,
            changed: Some(Box::new(f)),
        }
    }
}

impl Default for ManagerObserver {
    fn default() -> Self {
        Self {
            on_delete: None,
            changed: None,
        }
    }
}

/// An entity handed back by a refusing manager.
pub struct Rejected<E> {
    pub entity: E,
    pub reason: RejectReason,
}

impl<E> fmt::Debug for Rejected<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Owns every entity of one kind, keyed by name.
///
/// The map is the canonical ownership store; inserting moves the entity in,
/// stealing moves it back out. Every insert/delete/steal/rename updates the
/// (possibly shared) namespace in the same call, so the two always agree on
/// the set of names present.
pub struct Manager<E: Entity> {
    entities: HashMap<String, E>,
    namespace: SharedNamespace,
    observers: ObserverList<ManagerObserver>,
    gate: NotifyGate,
}

impl<E: Entity> Manager<E> {
    /// Manager over a fresh private namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::with_namespace(Namespace::shared())
    }

    /// Manager over a namespace shared with other managers.
    #[must_use]
    pub fn with_namespace(namespace: SharedNamespace) -> Self {
        Self {
            entities: HashMap::new(),
            namespace,
            observers: ObserverList::new(),
            gate: NotifyGate::new(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> SharedNamespace {
        self.namespace.clone()
    }

    /// Take ownership of an entity.
    ///
    /// Refused when the namespace rejects the name (filter or duplicate);
    /// the entity is handed back inside the error. Fires `changed` on
    /// success, subject to the notify gate.
    pub fn insert(&mut self, entity: E) -> Result<(), Rejected<E>> {
        let name = entity.name().to_string();
        {
            let mut ns = self.namespace.borrow_mut();
            if !ns.is_valid_name(&name) {
                drop(ns);
                return Err(Rejected {
                    entity,
                    reason: RejectReason::InvalidName,
                });
            }
            if !ns.add(&name, E::kind()) {
                drop(ns);
                return Err(Rejected {
                    entity,
                    reason: RejectReason::DuplicateName,
                });
            }
        }
        self.entities.insert(name, entity);
        self.emit_changed();
        Ok(())
    }

    /// Remove and destroy; fires `changed` if something was removed.
    pub fn delete_by_name(&mut self, name: &str) -> bool {
        match self.entities.remove(name) {
            Some(entity) => {
                self.namespace.borrow_mut().remove_by_name(name);
                drop(entity);
                self.emit_changed();
                true
            }
            None => false,
        }
    }

    /// Remove without destroying; the caller takes ownership back.
    pub fn steal(&mut self, name: &str) -> Option<E> {
        let entity = self.entities.remove(name)?;
        self.namespace.borrow_mut().remove_by_name(name);
        self.emit_changed();
        Some(entity)
    }

    /// Move every entity of `victim` not already named here into `self`.
    ///
    /// Notifications on both managers are suppressed for the duration and
    /// fire at most once each at the end. Returns the count actually moved.
    /// Should an insert be refused despite the pre-check (possible only when
    /// the two managers use different namespaces and a foreign entry holds
    /// the name), the entity is pushed back into `victim` rather than lost.
    pub fn steal_all(&mut self, victim: &mut Manager<E>) -> usize {
        let names = victim.names();
        self.block_notify();
        victim.block_notify();
        let mut moved = 0;
        for name in names {
            if self.exists(&name) {
                continue;
            }
            let Some(entity) = victim.steal(&name) else {
                continue;
            };
            match self.insert(entity) {
                Ok(()) => moved += 1,
                Err(rejected) => {
                    log::warn!(
                        "steal_all: namespace refused '{name}' ({}); returning it to the source",
                        rejected.reason
                    );
                    if victim.insert(rejected.entity).is_err() {
                        log::warn!("steal_all: source manager also refused '{name}'; dropped");
                    }
                }
            }
        }
        self.unblock_notify();
        victim.unblock_notify();
        moved
    }

    /// Rename an entity, keeping map key and namespace index in sync.
    ///
    /// No-op success when the names are equal. Fails leaving everything
    /// unchanged when the entity is unknown or the namespace refuses the
    /// new name. If the namespace reports a collision after the swap (it
    /// cannot in a single-threaded call, since insertability was just
    /// checked), the renamed entity is destroyed outright and observers
    /// are notified anyway — long-standing behavior that callers depend
    /// on, kept as is.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if !self.entities.contains_key(old) {
            return false;
        }
        if old == new {
            return true;
        }
        if !self.namespace.borrow().is_insertable(new) {
            return false;
        }
        let mut entity = self.entities.remove(old).expect("presence checked above");
        entity.set_name(new.to_string());
        self.entities.insert(new.to_string(), entity);
        if !self.namespace.borrow_mut().name_changed(old, new) {
            log::warn!("rename: namespace collision on '{new}'; destroying '{old}'");
            self.entities.remove(new);
            self.emit_changed();
            return false;
        }
        self.emit_changed();
        true
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&E> {
        self.entities.get(name)
    }

    /// Mutable access for in-place payload edits.
    ///
    /// Renaming through this reference desynchronizes the namespace; use
    /// [`Manager::rename`].
    #[must_use]
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut E> {
        self.entities.get_mut(name)
    }

    /// All registered names; ordering unspecified.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &E)> {
        self.entities.iter().map(|(name, e)| (name.as_str(), e))
    }

    /// Remove and destroy every entity the predicate accepts, under one
    /// suppressed region; fires `changed` once iff at least one went.
    pub fn delete_with_filter(&mut self, mut predicate: impl FnMut(&E) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entities
            .iter()
            .filter(|(_, entity)| predicate(entity))
            .map(|(name, _)| name.clone())
            .collect();
        self.block_notify();
        let mut removed = 0;
        for name in &doomed {
            if self.delete_by_name(name) {
                removed += 1;
            }
        }
        self.unblock_notify();
        removed
    }

    pub fn register_observer(&mut self, observer: ManagerObserver) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn block_notify(&mut self) {
        self.gate.block();
    }

    /// Saturating at zero; delivers a coalesced `changed` when the gate
    /// opens with pending mutations.
    pub fn unblock_notify(&mut self) {
        if self.gate.unblock() {
            self.fire_changed();
        }
    }

    fn emit_changed(&mut self) {
        if self.gate.note() {
            self.fire_changed();
        }
    }

    fn fire_changed(&mut self) {
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.changed.as_mut() {
                callback();
            }
        });
    }

    fn fire_on_delete(&mut self) {
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.on_delete.as_mut() {
                callback();
            }
        });
    }
}

impl<E: Entity> Default for Manager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Drop for Manager<E> {
    /// Teardown order: `on_delete` to observers, then destroy every entity
    /// (detaching each name from the shared namespace) under a blocked
    /// gate, then one final `changed`. The namespace reference is released
    /// when the field drops.
    fn drop(&mut self) {
        self.fire_on_delete();
        self.gate.block();
        {
            let mut ns = self.namespace.borrow_mut();
            for name in self.entities.keys() {
                ns.remove_by_name(name);
            }
        }
        self.entities.clear();
        let _ = self.gate.unblock();
        self.fire_changed();
    }
}
