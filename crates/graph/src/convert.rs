//! Graph ↔ relation conversion and relation-driven marking.
//!
//! Bit coordinates and display names are transposed relative to each other:
//! the edge from → to corresponds to the bit at row = to − 1,
//! col = from − 1, both directions of the conversion.

use crate::graph::Graph;
use crate::types::{EdgeFlags, MarkKind, NodeId, NodeLayout, Point, DEFAULT_NODE_RADIUS};
use num_bigint::BigUint;
use relation_engine::RelationFactory;
use relation_registry::{Entity, Relation};
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Rebuild a graph's node/edge set from a square relation's bit pattern.
///
/// Fails loudly (logs and returns false, graph untouched) when the relation
/// is not square or too large to address with native integers. Nodes and
/// edges that correspond 1:1 by display name between the old and rebuilt
/// graph keep their prior layout; brand-new nodes take the default circular
/// layout. One `changed` fires at the end.
pub fn update_from_rel(graph: &mut Graph, relation: &Relation) -> bool {
    let (rows, cols) = match (relation.rows_native(), relation.cols_native()) {
        (Some(rows), Some(cols)) => (rows, cols),
        _ => {
            log::warn!(
                "update_from_rel: relation too large for native addressing; graph '{}' unchanged",
                graph.name()
            );
            return false;
        }
    };
    if rows != cols {
        log::warn!(
            "update_from_rel: relation is {rows} x {cols}, not square; graph '{}' unchanged",
            graph.name()
        );
        return false;
    }

    // Name -> layout mapping, built before clearing.
    let mut node_layouts: HashMap<String, NodeLayout> = HashMap::new();
    for id in graph.node_ids() {
        if let Some(node) = graph.node(id) {
            node_layouts.insert(node.display_name().to_string(), *node.layout());
        }
    }
    let mut edge_states: HashMap<(String, String), (EdgeFlags, Vec<Point>)> = HashMap::new();
    for (from, to) in graph.edge_keys() {
        let (Some(from_node), Some(to_node)) = (graph.node(from), graph.node(to)) else {
            continue;
        };
        let key = (
            from_node.display_name().to_string(),
            to_node.display_name().to_string(),
        );
        if let Some(edge) = graph.edge(from, to) {
            edge_states.insert(key, (edge.flags(), edge.path().to_vec()));
        }
    }

    graph.block_notify();
    graph.clear_silent();

    let ids: Vec<NodeId> = (0..rows).map(|_| graph.create_node_silent()).collect();
    for row in 0..rows {
        for col in 0..cols {
            if relation.bit(row, col) {
                graph.create_edge_silent(ids[col], ids[row]);
            }
        }
    }

    let circle = circular_positions(rows);
    for (i, id) in ids.iter().enumerate() {
        let display = (i + 1).to_string();
        match node_layouts.get(&display) {
            Some(layout) => graph.assign_node_layout(*id, *layout),
            None => graph.assign_node_layout(
                *id,
                NodeLayout {
                    position: circle[i],
                    ..NodeLayout::default()
                },
            ),
        };
    }
    for ((from_name, to_name), (flags, path)) in &edge_states {
        let (Some(from), Some(to)) = (
            graph.node_by_display_name(from_name),
            graph.node_by_display_name(to_name),
        ) else {
            continue;
        };
        if graph.contains_edge(from, to) {
            graph.assign_edge_flags(from, to, *flags);
            if !path.is_empty() {
                graph.set_edge_path(from, to, path.clone());
            }
        }
    }

    graph.notify_changed();
    graph.unblock_notify();
    true
}

/// Build an n×n relation from a graph's edge set.
///
/// Every edge from → to sets the bit at (row = to − 1, col = from − 1).
/// Returns `None` (logged) when the backend cannot be created.
#[must_use]
pub fn rel_new_from_xgraph(
    graph: &Graph,
    name: &str,
    factory: &dyn RelationFactory,
) -> Option<Relation> {
    let n = graph.node_count();
    let handle = match factory.create(&BigUint::from(n), &BigUint::from(n)) {
        Ok(handle) => handle,
        Err(err) => {
            log::warn!("rel_new_from_xgraph: backend creation failed for '{name}': {err}");
            return None;
        }
    };
    for (from, to) in graph.edge_keys() {
        let (Some(from_ix), Some(to_ix)) = (display_number(graph, from), display_number(graph, to))
        else {
            log::warn!("rel_new_from_xgraph: non-numeric display name in graph; edge skipped");
            continue;
        };
        if to_ix - 1 < n && from_ix - 1 < n {
            handle.borrow_mut().set_bit(to_ix - 1, from_ix - 1);
        }
    }
    Some(Relation::new(name, handle))
}

/// Mark every edge according to the relation bit at its transposed
/// coordinate; coordinates beyond the relation's dimension read as false.
pub fn mark_edges_from_relation(graph: &mut Graph, relation: &Relation, mark: MarkKind) {
    let rows = relation.rows_native().unwrap_or(0);
    let cols = relation.cols_native().unwrap_or(0);
    let keys = graph.edge_keys();
    graph.block_notify();
    for (from, to) in keys {
        let bit = match (display_number(graph, from), display_number(graph, to)) {
            (Some(from_ix), Some(to_ix)) => {
                let (row, col) = (to_ix - 1, from_ix - 1);
                row < rows && col < cols && relation.bit(row, col)
            }
            _ => false,
        };
        graph.set_edge_mark(from, to, mark, bit);
    }
    graph.unblock_notify();
}

/// Mark every node according to the vector bit at (display name − 1, 0);
/// rows beyond the vector's dimension read as false.
pub fn mark_nodes_from_vector(graph: &mut Graph, vector: &Relation, mark: MarkKind) {
    let rows = vector.rows_native().unwrap_or(0);
    let cols = vector.cols_native().unwrap_or(0);
    let ids = graph.node_ids();
    graph.block_notify();
    for id in ids {
        let bit = match display_number(graph, id) {
            Some(ix) => ix - 1 < rows && cols > 0 && vector.bit(ix - 1, 0),
            None => false,
        };
        graph.set_node_mark(id, mark, bit);
    }
    graph.unblock_notify();
}

/// Default layout service: positions on a circle sized to the node count.
#[must_use]
pub fn circular_positions(count: usize) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let spacing = DEFAULT_NODE_RADIUS * 3.0;
    let ring = ((count as f64) * spacing / TAU).max(spacing * 2.0);
    let center = ring + spacing;
    (0..count)
        .map(|i| {
            let angle = TAU * (i as f64) / (count as f64) - FRAC_PI_2;
            Point::new(center + ring * angle.cos(), center + ring * angle.sin())
        })
        .collect()
}

fn display_number(graph: &Graph, id: NodeId) -> Option<usize> {
    let number: usize = graph.node(id)?.display_name().parse().ok()?;
    if number == 0 {
        return None;
    }
    Some(number)
}
