use crate::entity::{Entity, EntityKind};
use crate::observer::{ObserverId, ObserverList};
use num_bigint::BigUint;
use relation_engine::{same_dimension, EngineError, RelHandle, RelationFactory};

/// Observer record for a single relation.
///
/// The callback receives the relation's current backend handle, so
/// observers stay correct when a mutation replaced the handle wholesale.
pub struct RelationObserver {
    /// Fired after any mutation of the relation's bits or dimensions.
    pub changed: Option<Box<dyn FnMut(&RelHandle)>>,
}

impl RelationObserver {
    pub fn changed(f: impl FnMut(&RelHandle) + 'static) -> Self {
        Self {
            changed: Some(Box::new(f)),
        }
    }
}

/// A named binary relation over an opaque engine handle.
///
/// Bit mutations go through the entity so its `changed` observers fire;
/// adapters such as [`RelationProxy`](crate::RelationProxy) rely on that
/// signal to rebind their addressing.
pub struct Relation {
    name: String,
    hidden: bool,
    handle: RelHandle,
    observers: ObserverList<RelationObserver>,
}

impl Relation {
    pub fn new(name: impl Into<String>, handle: RelHandle) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            handle,
            observers: ObserverList::new(),
        }
    }

    /// Convenience constructor over a factory with native dimensions.
    pub fn with_dimensions(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        factory: &dyn RelationFactory,
    ) -> Result<Self, EngineError> {
        let handle = factory.create(&BigUint::from(rows), &BigUint::from(cols))?;
        Ok(Self::new(name, handle))
    }

    #[must_use]
    pub fn handle(&self) -> RelHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn rows(&self) -> BigUint {
        self.handle.borrow().rows()
    }

    #[must_use]
    pub fn cols(&self) -> BigUint {
        self.handle.borrow().cols()
    }

    #[must_use]
    pub fn rows_native(&self) -> Option<usize> {
        self.handle.borrow().rows_native()
    }

    #[must_use]
    pub fn cols_native(&self) -> Option<usize> {
        self.handle.borrow().cols_native()
    }

    #[must_use]
    pub fn bit(&self, row: usize, col: usize) -> bool {
        self.handle.borrow().bit(row, col)
    }

    #[must_use]
    pub fn bit_big(&self, row: &BigUint, col: &BigUint) -> bool {
        self.handle.borrow().bit_big(row, col)
    }

    pub fn set_bit(&mut self, row: usize, col: usize) {
        self.handle.borrow_mut().set_bit(row, col);
        self.fire_changed();
    }

    pub fn clear_bit(&mut self, row: usize, col: usize) {
        self.handle.borrow_mut().clear_bit(row, col);
        self.fire_changed();
    }

    pub fn set_bit_big(&mut self, row: &BigUint, col: &BigUint) {
        self.handle.borrow_mut().set_bit_big(row, col);
        self.fire_changed();
    }

    pub fn clear_bit_big(&mut self, row: &BigUint, col: &BigUint) {
        self.handle.borrow_mut().clear_bit_big(row, col);
        self.fire_changed();
    }

    pub fn clear_all(&mut self) {
        self.handle.borrow_mut().clear_all();
        self.fire_changed();
    }

    /// Replace the backing handle, e.g. with an evaluation result of a
    /// different dimension.
    pub fn replace_handle(&mut self, handle: RelHandle) {
        self.handle = handle;
        self.fire_changed();
    }

    #[must_use]
    pub fn same_dimension(&self, other: &Relation) -> bool {
        same_dimension(&*self.handle.borrow(), &*other.handle.borrow())
    }

    /// Deep copy of the bits under a new name; observers are not carried.
    #[must_use]
    pub fn duplicate(&self, name: impl Into<String>) -> Relation {
        Relation::new(name, self.handle.borrow().duplicate())
    }

    pub fn register_observer(&mut self, observer: RelationObserver) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn fire_changed(&mut self) {
        let handle = self.handle.clone();
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.changed.as_mut() {
                callback(&handle);
            }
        });
    }
}

impl Entity for Relation {
    fn kind() -> EntityKind {
        EntityKind::Relation
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn hidden(&self) -> bool {
        self.hidden
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relation_engine::DenseFactory;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn bit_mutation_fires_changed() {
        let mut rel = Relation::with_dimensions("r", 2, 2, &DenseFactory).unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        rel.register_observer(RelationObserver::changed(move |_| {
            counter.set(counter.get() + 1);
        }));
        rel.set_bit(0, 1);
        rel.clear_bit(0, 1);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn unregistered_observer_stays_quiet() {
        let mut rel = Relation::with_dimensions("r", 2, 2, &DenseFactory).unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let id = rel.register_observer(RelationObserver::changed(move |_| {
            counter.set(counter.get() + 1);
        }));
        assert!(rel.unregister_observer(id));
        rel.set_bit(0, 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn duplicate_shares_nothing() {
        let mut rel = Relation::with_dimensions("r", 2, 2, &DenseFactory).unwrap();
        rel.set_bit(1, 1);
        let copy = rel.duplicate("copy");
        rel.clear_bit(1, 1);
        assert!(copy.bit(1, 1));
        assert!(rel.same_dimension(&copy));
    }
}
