use serde::{Deserialize, Serialize};

/// Kind tag recorded in the namespace for every registered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Domain,
    Function,
    Program,
    Relation,
    Graph,
}

/// A named object a [`Manager`](crate::Manager) can own.
///
/// Ownership is the manager's map: an entity outside any map is unowned,
/// and moving it between maps is the transfer-of-ownership ("steal") path.
pub trait Entity {
    fn kind() -> EntityKind
    where
        Self: Sized;

    fn name(&self) -> &str;

    /// Hidden entities are excluded from persistence and default listings.
    fn hidden(&self) -> bool;

    /// Rename the record in place.
    ///
    /// Owned entities must be renamed through `Manager::rename`, which keeps
    /// the map key and the namespace index in sync; calling this directly on
    /// an owned entity is a contract violation.
    fn set_name(&mut self, name: String);
}
