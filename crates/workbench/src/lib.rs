//! # Relation Workbench
//!
//! The application context: one shared namespace across the domain,
//! function, program, and relation managers, an isolated graph manager,
//! and the always-present `"$"` default relation and graph.
//!
//! ```text
//! Workbench
//!     ├─ Namespace (shared) ── domains / functions / programs / relations
//!     ├─ GraphManager (private namespace)
//!     ├─ DefinitionCompiler + RelationFactory handles
//!     └─ "$" default relation (1x1) and "$" default graph
//! ```
//!
//! Constructed once at startup and passed by reference to whatever needs
//! it; there is no global instance.

mod context;

pub use context::{Workbench, DEFAULT_NAME};
