//! # Relation Graph
//!
//! Directed multigraph with per-node and per-edge layout state, used to
//! render binary relations pictorially.
//!
//! ## Architecture
//!
//! ```text
//! Relation (n x n bits)
//!     │
//!     ├──> update_from_rel ──> Graph
//!     │                          ├─ Node table (permanent IDs, display names)
//!     │                          ├─ Edge table (petgraph DiGraphMap keyed by ID pair)
//!     │                          │    └─ reciprocal pairs share one block
//!     │                          └─ layout state + observers
//!     │
//!     └──< rel_new_from_xgraph <──┘      (row = target - 1, col = source - 1)
//! ```
//!
//! Internal node IDs are monotonic from 1 and never reused within a graph's
//! lifetime; display names are renumbered to stay contiguous in ID order
//! after deletions. Graphs are owned by a [`GraphManager`] over a private
//! namespace, deliberately disjoint from the relation/domain/function
//! namespace — a graph and a relation may share a name, and downstream
//! merge-on-load logic relies on exactly that.

mod convert;
mod graph;
mod manager;
mod types;

pub use convert::{
    circular_positions, mark_edges_from_relation, mark_nodes_from_vector, rel_new_from_xgraph,
    update_from_rel,
};
pub use graph::Graph;
pub use manager::{GraphManager, GraphManagerExt};
pub use types::{
    Edge, EdgeFlags, EdgeShared, GraphObserver, MarkKind, Node, NodeId, NodeLayout, Point,
    SharedBlock, DEFAULT_NODE_RADIUS,
};
