use crate::observer::ObserverId;
use crate::relation::{Relation, RelationObserver};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use relation_engine::RelHandle;
use std::cell::RefCell;
use std::rc::Rc;

struct Binding {
    handle: RelHandle,
    rows: usize,
    cols: usize,
}

impl Binding {
    fn of(handle: RelHandle) -> Self {
        let (rows, cols) = {
            let backend = handle.borrow();
            (
                backend.rows_native().unwrap_or(0),
                backend.cols_native().unwrap_or(0),
            )
        };
        Self { handle, rows, cols }
    }
}

/// Bit-addressable view over one relation.
///
/// Binds the relation's handle and native dimensions at construction and
/// rebinds automatically when the relation fires `changed`. Holding a proxy
/// across a dimension change without letting that signal run leaves the
/// binding stale — the resync is the only correction applied. Reads outside
/// the binding are false; writes outside it warn and do nothing.
///
/// Writes go straight to the backend and do not fire the relation's own
/// observers; batch converters notify once at the end instead.
pub struct RelationProxy {
    binding: Rc<RefCell<Binding>>,
    observer: ObserverId,
}

impl RelationProxy {
    /// Bind to a relation, registering the rebind observer on it.
    pub fn bind(relation: &mut Relation) -> Self {
        let binding = Rc::new(RefCell::new(Binding::of(relation.handle())));
        let weak = Rc::downgrade(&binding);
        let observer = relation.register_observer(RelationObserver::changed(move |handle| {
            if let Some(binding) = weak.upgrade() {
                *binding.borrow_mut() = Binding::of(handle.clone());
            }
        }));
        Self { binding, observer }
    }

    /// Drop the proxy and remove its observer from the relation.
    pub fn unbind(self, relation: &mut Relation) {
        relation.unregister_observer(self.observer);
    }

    /// Bound row count (0 when the relation exceeds native addressing).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.binding.borrow().rows
    }

    /// Bound column count (0 when the relation exceeds native addressing).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.binding.borrow().cols
    }

    /// Re-read the dimensions of the bound handle by hand.
    pub fn resync(&self) {
        let mut binding = self.binding.borrow_mut();
        let handle = binding.handle.clone();
        *binding = Binding::of(handle);
    }

    #[must_use]
    pub fn get_bit(&self, row: usize, col: usize) -> bool {
        let binding = self.binding.borrow();
        if row >= binding.rows || col >= binding.cols {
            return false;
        }
        let bit = binding.handle.borrow().bit(row, col);
        bit
    }

    pub fn set_bit(&self, row: usize, col: usize) {
        let binding = self.binding.borrow();
        if row >= binding.rows || col >= binding.cols {
            log::warn!(
                "proxy set_bit ({row}, {col}) outside binding {} x {}; ignored",
                binding.rows,
                binding.cols
            );
            return;
        }
        binding.handle.borrow_mut().set_bit(row, col);
    }

    pub fn clear_bit(&self, row: usize, col: usize) {
        let binding = self.binding.borrow();
        if row >= binding.rows || col >= binding.cols {
            log::warn!(
                "proxy clear_bit ({row}, {col}) outside binding {} x {}; ignored",
                binding.rows,
                binding.cols
            );
            return;
        }
        binding.handle.borrow_mut().clear_bit(row, col);
    }

    #[must_use]
    pub fn get_bit_big(&self, row: &BigUint, col: &BigUint) -> bool {
        match (row.to_usize(), col.to_usize()) {
            (Some(row), Some(col)) => self.get_bit(row, col),
            _ => false,
        }
    }

    pub fn set_bit_big(&self, row: &BigUint, col: &BigUint) {
        if let (Some(row), Some(col)) = (row.to_usize(), col.to_usize()) {
            self.set_bit(row, col);
        } else {
            log::warn!("proxy set_bit ({row}, {col}) beyond native addressing; ignored");
        }
    }

    pub fn clear_bit_big(&self, row: &BigUint, col: &BigUint) {
        if let (Some(row), Some(col)) = (row.to_usize(), col.to_usize()) {
            self.clear_bit(row, col);
        } else {
            log::warn!("proxy clear_bit ({row}, {col}) beyond native addressing; ignored");
        }
    }

    /// Row-major rectangle of bits; cells outside the binding read false.
    #[must_use]
    pub fn get_bits_rect(&self, row: usize, col: usize, height: usize, width: usize) -> Vec<bool> {
        let mut out = Vec::with_capacity(height * width);
        for dr in 0..height {
            for dc in 0..width {
                out.push(self.get_bit(row + dr, col + dc));
            }
        }
        out
    }

    /// Rectangle read anchored at big-integer coordinates; an anchor beyond
    /// native addressing reads all false.
    #[must_use]
    pub fn get_bits_rect_big(
        &self,
        row: &BigUint,
        col: &BigUint,
        height: usize,
        width: usize,
    ) -> Vec<bool> {
        match (row.to_usize(), col.to_usize()) {
            (Some(row), Some(col)) => self.get_bits_rect(row, col, height, width),
            _ => vec![false; height * width],
        }
    }
}
