use crate::error::Result;
use num_bigint::BigUint;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a relation implementation.
///
/// The core is single-threaded and cooperative; entities and adapters share
/// one backend through `Rc`/`RefCell` without locking.
pub type RelHandle = Rc<RefCell<dyn RelationBackend>>;

/// Opaque bit-level relation implementation.
///
/// Row/column counts are arbitrary-precision; the `*_native` probes report
/// whether a dimension fits native addressing. Coordinates passed to the
/// native-flavor bit accessors must already be in range — out-of-range reads
/// are `false` and out-of-range writes are ignored with a warning.
pub trait RelationBackend {
    fn rows(&self) -> BigUint;
    fn cols(&self) -> BigUint;

    /// Row count as a native integer, `None` when it exceeds native addressing.
    fn rows_native(&self) -> Option<usize>;
    /// Column count as a native integer, `None` when it exceeds native addressing.
    fn cols_native(&self) -> Option<usize>;

    fn bit(&self, row: usize, col: usize) -> bool;
    fn set_bit(&mut self, row: usize, col: usize);
    fn clear_bit(&mut self, row: usize, col: usize);

    fn bit_big(&self, row: &BigUint, col: &BigUint) -> bool;
    fn set_bit_big(&mut self, row: &BigUint, col: &BigUint);
    fn clear_bit_big(&mut self, row: &BigUint, col: &BigUint);

    /// Clear every bit, keeping the dimensions.
    fn clear_all(&mut self);

    /// Deep copy into a fresh handle.
    fn duplicate(&self) -> RelHandle;
}

/// Creates relation backends with the requested dimensions.
pub trait RelationFactory {
    fn create(&self, rows: &BigUint, cols: &BigUint) -> Result<RelHandle>;
}

/// True when both relations have identical row and column counts.
#[must_use]
pub fn same_dimension(a: &dyn RelationBackend, b: &dyn RelationBackend) -> bool {
    a.rows() == b.rows() && a.cols() == b.cols()
}

/// True when both dimensions fit native addressing.
#[must_use]
pub fn fits_native(backend: &dyn RelationBackend) -> bool {
    backend.rows_native().is_some() && backend.cols_native().is_some()
}
