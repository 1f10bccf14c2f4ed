//! # Relation Registry
//!
//! Object-identity and lifecycle management for the workbench's named
//! entities: domains, functions, programs, and relations.
//!
//! ## Architecture
//!
//! ```text
//! Namespace (shared, Rc<RefCell>)
//!     │  name ──> owning entity kind
//!     │
//!     ├──> Manager<Domain>     ─┐
//!     ├──> Manager<Function>    ├─ one generic manager, the map owns
//!     ├──> Manager<Program>     │  the entities; insert/steal move them
//!     └──> Manager<Relation>   ─┘
//!
//! Relation ──> RelHandle (relation-engine)
//!     └──> RelationProxy (bit-addressable view, rebinds on `changed`)
//! ```
//!
//! Every name-affecting operation goes through a manager, which keeps its
//! map and the shared namespace in lockstep. Observers are plain callback
//! slots; `block_notify`/`unblock_notify` nest and coalesce `changed` into
//! one delivery per top-level mutating call.

mod compile;
mod defs;
mod domain;
mod entity;
mod error;
mod function;
mod manager;
mod namespace;
mod observer;
mod program;
mod proxy;
mod relation;

pub use compile::{CompiledExpr, DefinitionCompiler, NoopCompiler};
pub use defs::{argument_count, base_name, split_domain_def};
pub use domain::{Domain, DomainKind};
pub use entity::{Entity, EntityKind};
pub use error::{CompileError, RejectReason};
pub use function::Function;
pub use manager::{Manager, ManagerObserver, Rejected};
pub use namespace::{NameFilter, Namespace, SharedNamespace};
pub use observer::{NotifyGate, ObserverId, ObserverList};
pub use program::Program;
pub use proxy::RelationProxy;
pub use relation::{Relation, RelationObserver};

pub type DomainManager = Manager<Domain>;
pub type FunctionManager = Manager<Function>;
pub type ProgramManager = Manager<Program>;
pub type RelationManager = Manager<Relation>;
