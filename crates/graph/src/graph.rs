use crate::types::{
    Edge, EdgeFlags, EdgeShared, GraphObserver, MarkKind, Node, NodeId, NodeLayout, Point,
    SharedBlock,
};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use relation_registry::{Entity, EntityKind, NotifyGate, ObserverId, ObserverList};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Directed multigraph with layout state.
///
/// Node payloads live in an ID-keyed table; the topology (and the edge
/// payloads) live in a `DiGraphMap` keyed by the same permanent IDs, so
/// there is exactly one edge per ordered `(from, to)` pair and self-loops
/// are allowed. The non-silent mutators fire `changed`; the `*_silent`
/// variants are for batching multi-step operations under one outer
/// notification.
pub struct Graph {
    name: String,
    hidden: bool,
    correspondence: bool,
    visible: bool,
    nodes: HashMap<NodeId, Node>,
    topology: DiGraphMap<NodeId, Edge>,
    next_id: u32,
    changed_gate: NotifyGate,
    layout_gate: NotifyGate,
    observers: ObserverList<GraphObserver>,
}

impl Graph {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            correspondence: false,
            visible: true,
            nodes: HashMap::new(),
            topology: DiGraphMap::new(),
            next_id: 1,
            changed_gate: NotifyGate::new(),
            layout_gate: NotifyGate::new(),
            observers: ObserverList::new(),
        }
    }

    /// Marks graphs representing a correspondence rather than an
    /// endorelation. Never set by any current code path.
    #[must_use]
    pub fn is_correspondence(&self) -> bool {
        self.correspondence
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.emit_layout_changed();
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All node IDs, ascending.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn node_by_display_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.display_name == name)
            .map(|node| node.id)
    }

    pub fn create_node(&mut self) -> NodeId {
        let id = self.create_node_silent();
        self.emit_changed();
        id
    }

    /// Create a node without firing `changed`.
    pub fn create_node_silent(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        let display = self.max_numeric_display_name() + 1;
        self.nodes.insert(
            id,
            Node {
                id,
                display_name: display.to_string(),
                selected: false,
                layout: NodeLayout::default(),
            },
        );
        self.topology.add_node(id);
        id
    }

    pub fn delete_node(&mut self, id: NodeId) -> bool {
        self.delete_node_inner(id, false)
    }

    /// Delete a node without firing `changed`.
    pub fn delete_node_silent(&mut self, id: NodeId) -> bool {
        self.delete_node_inner(id, true)
    }

    fn delete_node_inner(&mut self, id: NodeId, silent: bool) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        // Both directions tested explicitly; the edge table is directed.
        let mut incident: Vec<(NodeId, NodeId)> =
            self.topology.edges(id).map(|(a, b, _)| (a, b)).collect();
        for source in self
            .topology
            .neighbors_directed(id, Direction::Incoming)
            .collect::<Vec<_>>()
        {
            if !incident.contains(&(source, id)) {
                incident.push((source, id));
            }
        }
        for (from, to) in incident {
            self.delete_edge_inner(from, to, true);
        }
        self.fire_on_delete_node(id);
        self.topology.remove_node(id);
        self.nodes.remove(&id);
        self.renumber_after_delete(id);
        if !silent {
            self.emit_changed();
        }
        true
    }

    /// Keep display names contiguous in ID order after a deletion: the
    /// survivors above the deleted ID continue counting from the numeric
    /// maximum among the survivors below it.
    fn renumber_after_delete(&mut self, deleted: NodeId) {
        let base = self
            .nodes
            .values()
            .filter(|node| node.id < deleted)
            .filter_map(|node| node.display_name.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let mut trailing: Vec<NodeId> = self
            .nodes
            .keys()
            .copied()
            .filter(|id| *id > deleted)
            .collect();
        trailing.sort_unstable();
        for (offset, id) in trailing.into_iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.display_name = (base + 1 + offset as u64).to_string();
            }
        }
    }

    fn max_numeric_display_name(&self) -> u64 {
        self.nodes
            .values()
            .filter_map(|node| node.display_name.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    #[must_use]
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.topology.edge_weight(from, to)
    }

    #[must_use]
    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.topology.contains_edge(from, to)
    }

    /// All edge keys, ascending by `(from, to)`.
    #[must_use]
    pub fn edge_keys(&self) -> Vec<(NodeId, NodeId)> {
        let mut keys: Vec<(NodeId, NodeId)> =
            self.topology.all_edges().map(|(a, b, _)| (a, b)).collect();
        keys.sort_unstable();
        keys
    }

    pub fn create_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        self.create_edge_inner(from, to, false)
    }

    /// Create an edge without firing `changed`.
    pub fn create_edge_silent(&mut self, from: NodeId, to: NodeId) -> bool {
        self.create_edge_inner(from, to, true)
    }

    fn create_edge_inner(&mut self, from: NodeId, to: NodeId, silent: bool) -> bool {
        if !self.nodes.contains_key(&from) || !self.nodes.contains_key(&to) {
            log::warn!("create_edge: endpoint not in graph '{}'", self.name);
            return false;
        }
        if self.topology.contains_edge(from, to) {
            return false;
        }
        // A reciprocal edge shares its block; the new path starts as the
        // reverse of the reciprocal's current one.
        let (shared, path, way_back) = match self.topology.edge_weight(to, from) {
            Some(reciprocal) => {
                let mut path = reciprocal.path.clone();
                path.reverse();
                (reciprocal.shared.clone(), path, Some((to, from)))
            }
            None => (Rc::new(RefCell::new(EdgeShared::default())), Vec::new(), None),
        };
        if way_back.is_some() {
            shared.borrow_mut().two_way = true;
            if let Some(reciprocal) = self.topology.edge_weight_mut(to, from) {
                reciprocal.way_back = Some((from, to));
            }
        }
        self.topology.add_edge(
            from,
            to,
            Edge {
                from,
                to,
                way_back,
                shared,
                flags: EdgeFlags::default(),
                path,
            },
        );
        if !silent {
            self.emit_changed();
        }
        true
    }

    pub fn delete_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        self.delete_edge_inner(from, to, false)
    }

    /// Delete an edge without firing `changed`.
    pub fn delete_edge_silent(&mut self, from: NodeId, to: NodeId) -> bool {
        self.delete_edge_inner(from, to, true)
    }

    fn delete_edge_inner(&mut self, from: NodeId, to: NodeId, silent: bool) -> bool {
        if !self.topology.contains_edge(from, to) {
            return false;
        }
        self.fire_on_delete_edge(from, to);
        let edge = self
            .topology
            .remove_edge(from, to)
            .expect("presence checked above");
        // The survivor keeps the shared block; only its back-reference and
        // the two-way flag are cleared.
        if let Some((back_from, back_to)) = edge.way_back {
            if let Some(reciprocal) = self.topology.edge_weight_mut(back_from, back_to) {
                reciprocal.way_back = None;
                reciprocal.shared.borrow_mut().two_way = false;
            }
        }
        if !silent {
            self.emit_changed();
        }
        true
    }

    /// Remove every node and edge without firing `changed`; internal IDs
    /// keep counting upward afterwards.
    pub(crate) fn clear_silent(&mut self) {
        let mut ids = self.node_ids();
        // Highest first: no survivor ever has a larger ID, so no renumbering.
        ids.reverse();
        for id in ids {
            self.delete_node_silent(id);
        }
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    pub fn set_node_position(&mut self, id: NodeId, position: Point) -> bool {
        self.update_node_layout(id, |layout| {
            let changed = layout.position != position;
            layout.position = position;
            changed
        })
    }

    pub fn set_node_radius(&mut self, id: NodeId, radius: f64) -> bool {
        self.update_node_layout(id, |layout| {
            let changed = layout.radius != radius;
            layout.radius = radius;
            changed
        })
    }

    pub fn set_node_visible(&mut self, id: NodeId, visible: bool) -> bool {
        self.update_node_layout(id, |layout| {
            let changed = layout.visible != visible;
            layout.visible = visible;
            changed
        })
    }

    pub fn set_node_highlighted(&mut self, id: NodeId, highlighted: bool) -> bool {
        self.update_node_layout(id, |layout| {
            let changed = layout.highlighted != highlighted;
            layout.highlighted = highlighted;
            changed
        })
    }

    pub fn set_node_mark(&mut self, id: NodeId, mark: MarkKind, value: bool) -> bool {
        self.update_node_layout(id, |layout| {
            let slot = match mark {
                MarkKind::First => &mut layout.marked_first,
                MarkKind::Second => &mut layout.marked_second,
            };
            let changed = *slot != value;
            *slot = value;
            changed
        })
    }

    fn update_node_layout(&mut self, id: NodeId, f: impl FnOnce(&mut NodeLayout) -> bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if f(&mut node.layout) {
            self.emit_layout_changed();
        }
        true
    }

    /// Replace a node's whole layout record; fires unconditionally.
    pub fn assign_node_layout(&mut self, id: NodeId, layout: NodeLayout) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.layout = layout;
        self.emit_layout_changed();
        true
    }

    /// Selection is plain UI state; no layout event.
    pub fn set_node_selected(&mut self, id: NodeId, selected: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn set_edge_visible(&mut self, from: NodeId, to: NodeId, visible: bool) -> bool {
        self.update_edge_flags(from, to, |flags| {
            let changed = flags.visible != visible;
            flags.visible = visible;
            changed
        })
    }

    pub fn set_edge_highlighted(&mut self, from: NodeId, to: NodeId, highlighted: bool) -> bool {
        self.update_edge_flags(from, to, |flags| {
            let changed = flags.highlighted != highlighted;
            flags.highlighted = highlighted;
            changed
        })
    }

    pub fn set_edge_mark(&mut self, from: NodeId, to: NodeId, mark: MarkKind, value: bool) -> bool {
        self.update_edge_flags(from, to, |flags| {
            let slot = match mark {
                MarkKind::First => &mut flags.marked_first,
                MarkKind::Second => &mut flags.marked_second,
            };
            let changed = *slot != value;
            *slot = value;
            changed
        })
    }

    fn update_edge_flags(
        &mut self,
        from: NodeId,
        to: NodeId,
        f: impl FnOnce(&mut EdgeFlags) -> bool,
    ) -> bool {
        let Some(edge) = self.topology.edge_weight_mut(from, to) else {
            return false;
        };
        if f(&mut edge.flags) {
            self.emit_layout_changed();
        }
        true
    }

    /// Replace an edge's whole flag set; fires unconditionally.
    pub fn assign_edge_flags(&mut self, from: NodeId, to: NodeId, flags: EdgeFlags) -> bool {
        let Some(edge) = self.topology.edge_weight_mut(from, to) else {
            return false;
        };
        edge.flags = flags;
        self.emit_layout_changed();
        true
    }

    /// Replace an edge's bend path; fires unconditionally.
    pub fn set_edge_path(&mut self, from: NodeId, to: NodeId, path: Vec<Point>) -> bool {
        let Some(edge) = self.topology.edge_weight_mut(from, to) else {
            return false;
        };
        edge.path = path;
        self.emit_layout_changed();
        true
    }

    /// Apply a bend path to both directions: the reciprocal edge, when
    /// present, stores the reversed point sequence.
    pub fn set_edge_path_both(&mut self, from: NodeId, to: NodeId, path: Vec<Point>) -> bool {
        let Some(edge) = self.topology.edge_weight_mut(from, to) else {
            return false;
        };
        edge.path = path.clone();
        let way_back = edge.way_back;
        if let Some((back_from, back_to)) = way_back {
            if let Some(reciprocal) = self.topology.edge_weight_mut(back_from, back_to) {
                reciprocal.path = path.into_iter().rev().collect();
            }
        }
        self.emit_layout_changed();
        true
    }

    /// Reset every layout record to its default; fires unconditionally.
    pub fn reset_layout(&mut self) {
        for node in self.nodes.values_mut() {
            node.layout = NodeLayout::default();
        }
        for (_, _, edge) in self.topology.all_edges_mut() {
            edge.flags = EdgeFlags::default();
            edge.path.clear();
        }
        self.visible = true;
        self.emit_layout_changed();
    }

    // ------------------------------------------------------------------
    // Copying
    // ------------------------------------------------------------------

    /// Deep copy under a new name: node IDs are preserved and reciprocal
    /// edge pairs keep sharing one (fresh) block. Observers do not carry
    /// over.
    #[must_use]
    pub fn duplicate(&self, name: impl Into<String>) -> Graph {
        let mut copy = Graph::new(name);
        copy.hidden = self.hidden;
        copy.correspondence = self.correspondence;
        copy.visible = self.visible;
        copy.next_id = self.next_id;
        for (id, node) in &self.nodes {
            copy.nodes.insert(*id, node.clone());
            copy.topology.add_node(*id);
        }
        let mut blocks: HashMap<(NodeId, NodeId), SharedBlock> = HashMap::new();
        for (from, to) in self.edge_keys() {
            let edge = self.topology.edge_weight(from, to).expect("key just listed");
            let shared = match edge.way_back.and_then(|key| blocks.get(&key).cloned()) {
                Some(block) => block,
                None => {
                    let block: SharedBlock = Rc::new(RefCell::new(edge.shared.borrow().clone()));
                    blocks.insert((from, to), block.clone());
                    block
                }
            };
            copy.topology.add_edge(
                from,
                to,
                Edge {
                    from,
                    to,
                    way_back: edge.way_back,
                    shared,
                    flags: edge.flags,
                    path: edge.path.clone(),
                },
            );
        }
        copy
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn register_observer(&mut self, observer: GraphObserver) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn block_notify(&mut self) {
        self.changed_gate.block();
        self.layout_gate.block();
    }

    pub fn unblock_notify(&mut self) {
        if self.changed_gate.unblock() {
            self.fire_changed();
        }
        if self.layout_gate.unblock() {
            self.fire_layout_changed();
        }
    }

    /// Explicitly mark the graph changed; batch rebuilds that mutate
    /// through the silent variants use this for their single notification.
    pub fn notify_changed(&mut self) {
        self.emit_changed();
    }

    fn emit_changed(&mut self) {
        if self.changed_gate.note() {
            self.fire_changed();
        }
    }

    fn emit_layout_changed(&mut self) {
        if self.layout_gate.note() {
            self.fire_layout_changed();
        }
    }

    fn fire_changed(&mut self) {
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.changed.as_mut() {
                callback();
            }
        });
    }

    fn fire_layout_changed(&mut self) {
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.layout_changed.as_mut() {
                callback();
            }
        });
    }

    fn fire_on_delete_node(&mut self, id: NodeId) {
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.on_delete_node.as_mut() {
                callback(id);
            }
        });
    }

    fn fire_on_delete_edge(&mut self, from: NodeId, to: NodeId) {
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.on_delete_edge.as_mut() {
                callback(from, to);
            }
        });
    }

    fn fire_on_delete(&mut self) {
        self.observers.for_each(|observer| {
            if let Some(callback) = observer.on_delete.as_mut() {
                callback();
            }
        });
    }
}

impl Entity for Graph {
    fn kind() -> EntityKind {
        EntityKind::Graph
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

impl Drop for Graph {
    fn drop(&mut self) {
        self.fire_on_delete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn node_ids_start_at_one_and_grow() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        let b = graph.create_node();
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);
        assert_eq!(graph.node(a).unwrap().display_name(), "1");
        assert_eq!(graph.node(b).unwrap().display_name(), "2");
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        graph.delete_node(a);
        let b = graph.create_node();
        assert_eq!(b.index(), 2);
    }

    #[test]
    fn create_edge_requires_both_endpoints() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        let mut other = Graph::new("other");
        other.create_node();
        other.create_node();
        let stranger = other.create_node();
        assert!(!graph.contains_node(stranger));
        assert!(!graph.create_edge(a, stranger));
        assert!(graph.create_edge(a, a));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn duplicate_edges_are_refused() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        let b = graph.create_node();
        assert!(graph.create_edge(a, b));
        assert!(!graph.create_edge(a, b));
    }

    #[test]
    fn self_loop_owns_a_private_block() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        assert!(graph.create_edge(a, a));
        let edge = graph.edge(a, a).unwrap();
        assert_eq!(edge.way_back(), None);
        assert!(!edge.shared().borrow().two_way);
    }

    #[test]
    fn layout_setter_fires_only_on_change() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = hits.clone();
        graph.register_observer(GraphObserver::layout_changed(move || {
            counter.set(counter.get() + 1);
        }));
        assert!(graph.set_node_visible(a, true));
        assert_eq!(hits.get(), 0);
        assert!(graph.set_node_visible(a, false));
        assert_eq!(hits.get(), 1);
        // Whole-record assignment fires even when nothing differs.
        let layout = *graph.node(a).unwrap().layout();
        graph.assign_node_layout(a, layout);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn path_both_reverses_on_the_reciprocal() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        let b = graph.create_node();
        graph.create_edge(a, b);
        graph.create_edge(b, a);
        let bend = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        assert!(graph.set_edge_path_both(a, b, bend.clone()));
        assert_eq!(graph.edge(a, b).unwrap().path(), bend.as_slice());
        assert_eq!(
            graph.edge(b, a).unwrap().path(),
            vec![Point::new(3.0, 4.0), Point::new(1.0, 2.0)].as_slice()
        );
    }

    #[test]
    fn reciprocal_creation_starts_with_the_reversed_path() {
        let mut graph = Graph::new("g");
        let a = graph.create_node();
        let b = graph.create_node();
        graph.create_edge(a, b);
        graph.set_edge_path(a, b, vec![Point::new(5.0, 0.0), Point::new(6.0, 0.0)]);
        graph.create_edge(b, a);
        assert_eq!(
            graph.edge(b, a).unwrap().path(),
            vec![Point::new(6.0, 0.0), Point::new(5.0, 0.0)].as_slice()
        );
    }
}
