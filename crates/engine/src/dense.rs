use crate::backend::{RelHandle, RelationBackend, RelationFactory};
use crate::error::{EngineError, Result};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::cell::RefCell;
use std::rc::Rc;

/// Word-packed bit matrix; the reference relation backend.
///
/// Stands in for the external decision-diagram engine. Dimensions are
/// native-sized; the big-integer accessors work for any coordinate that
/// fits native addressing and treat the rest as out of range.
#[derive(Debug, Clone)]
pub struct DenseRelation {
    rows: usize,
    cols: usize,
    words: Vec<u64>,
}

impl DenseRelation {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::EmptyDimension);
        }
        let bits = rows
            .checked_mul(cols)
            .ok_or_else(|| EngineError::DimensionTooLarge {
                rows: rows.to_string(),
                cols: cols.to_string(),
            })?;
        Ok(Self {
            rows,
            cols,
            words: vec![0; (bits + 63) / 64],
        })
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_handle(self) -> RelHandle {
        Rc::new(RefCell::new(self))
    }

    fn index(&self, row: usize, col: usize) -> Option<(usize, u64)> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let bit = row * self.cols + col;
        Some((bit / 64, 1u64 << (bit % 64)))
    }

    /// Number of set bits.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl RelationBackend for DenseRelation {
    fn rows(&self) -> BigUint {
        BigUint::from(self.rows)
    }

    fn cols(&self) -> BigUint {
        BigUint::from(self.cols)
    }

    fn rows_native(&self) -> Option<usize> {
        Some(self.rows)
    }

    fn cols_native(&self) -> Option<usize> {
        Some(self.cols)
    }

    fn bit(&self, row: usize, col: usize) -> bool {
        self.index(row, col)
            .map(|(word, mask)| self.words[word] & mask != 0)
            .unwrap_or(false)
    }

    fn set_bit(&mut self, row: usize, col: usize) {
        match self.index(row, col) {
            Some((word, mask)) => self.words[word] |= mask,
            None => log::warn!(
                "set_bit ({row}, {col}) outside {} x {} relation; ignored",
                self.rows,
                self.cols
            ),
        }
    }

    fn clear_bit(&mut self, row: usize, col: usize) {
        match self.index(row, col) {
            Some((word, mask)) => self.words[word] &= !mask,
            None => log::warn!(
                "clear_bit ({row}, {col}) outside {} x {} relation; ignored",
                self.rows,
                self.cols
            ),
        }
    }

    fn bit_big(&self, row: &BigUint, col: &BigUint) -> bool {
        match (row.to_usize(), col.to_usize()) {
            (Some(row), Some(col)) => self.bit(row, col),
            _ => false,
        }
    }

    fn set_bit_big(&mut self, row: &BigUint, col: &BigUint) {
        match (row.to_usize(), col.to_usize()) {
            (Some(row), Some(col)) => self.set_bit(row, col),
            _ => log::warn!("set_bit ({row}, {col}) beyond native addressing; ignored"),
        }
    }

    fn clear_bit_big(&mut self, row: &BigUint, col: &BigUint) {
        match (row.to_usize(), col.to_usize()) {
            (Some(row), Some(col)) => self.clear_bit(row, col),
            _ => log::warn!("clear_bit ({row}, {col}) beyond native addressing; ignored"),
        }
    }

    fn clear_all(&mut self) {
        self.words.fill(0);
    }

    fn duplicate(&self) -> RelHandle {
        Rc::new(RefCell::new(self.clone()))
    }
}

/// Factory producing [`DenseRelation`] backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseFactory;

impl RelationFactory for DenseFactory {
    fn create(&self, rows: &BigUint, cols: &BigUint) -> Result<RelHandle> {
        let (rows, cols) = match (rows.to_usize(), cols.to_usize()) {
            (Some(rows), Some(cols)) => (rows, cols),
            _ => {
                return Err(EngineError::DimensionTooLarge {
                    rows: rows.to_string(),
                    cols: cols.to_string(),
                })
            }
        };
        Ok(DenseRelation::new(rows, cols)?.into_handle())
    }
}
