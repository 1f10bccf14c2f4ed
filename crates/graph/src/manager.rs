use crate::graph::Graph;
use relation_registry::Manager;

/// Manager owning graphs by name.
///
/// Runs over its own private namespace: graph names are deliberately
/// disjoint from the relation/domain/function/program namespace, so a graph
/// and a relation may share a name. The persistence and UI layers treat the
/// name match as the only link between the two worlds — keep it that way.
pub type GraphManager = Manager<Graph>;

/// Graph-specific manager operations.
pub trait GraphManagerExt {
    /// Deep-copy `source` under `new_name`.
    ///
    /// Fails when the source is unknown or the name collides inside this
    /// manager.
    fn duplicate_graph(&mut self, source: &str, new_name: &str) -> bool;
}

impl GraphManagerExt for GraphManager {
    fn duplicate_graph(&mut self, source: &str, new_name: &str) -> bool {
        if !self.namespace().borrow().is_insertable(new_name) {
            return false;
        }
        let Some(graph) = self.get_by_name(source) else {
            return false;
        };
        let copy = graph.duplicate(new_name);
        self.insert(copy).is_ok()
    }
}
