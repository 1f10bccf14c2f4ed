//! # Relation Engine
//!
//! Boundary crate in front of the bit-level relation implementation.
//!
//! The workbench core never looks inside a relation's representation: it
//! holds an opaque [`RelHandle`] and talks to it through the
//! [`RelationBackend`] trait (dimensions, bit access, duplication). New
//! relations come from a [`RelationFactory`].
//!
//! ```text
//! Relation entity ──┐
//! RelationProxy ────┼──> RelHandle (Rc<RefCell<dyn RelationBackend>>)
//! Graph converter ──┘          │
//!                              └─ DenseRelation (reference backend)
//! ```
//!
//! [`DenseRelation`] is a plain word-packed bit matrix standing in for the
//! real engine, which addresses dimensions beyond native integers; the trait
//! therefore carries both native and big-integer coordinate flavors.

mod backend;
mod dense;
mod error;

pub use backend::{fits_native, same_dimension, RelHandle, RelationBackend, RelationFactory};
pub use dense::{DenseFactory, DenseRelation};
pub use error::{EngineError, Result};
