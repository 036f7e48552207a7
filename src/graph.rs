use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::item::{Item, ItemId};

/// Builds the "sorts before" digraph over `items`: an edge `u -> v` means
/// `u` is known to sort before `v`. Node positions match item positions.
fn before_graph(items: &[Item]) -> (DiGraph<(), ()>, Vec<NodeIndex>) {
    let mut g: DiGraph<(), ()> = DiGraph::new();
    let mut nodes = Vec::with_capacity(items.len());
    for _ in items {
        nodes.push(g.add_node(()));
    }
    for (v, item) in items.iter().enumerate() {
        for &earlier in &item.before {
            if let Some(u) = position_of(items, earlier) {
                g.add_edge(nodes[u], nodes[v], ());
            }
        }
        for &later in &item.after {
            if let Some(w) = position_of(items, later) {
                g.add_edge(nodes[v], nodes[w], ());
            }
        }
    }
    (g, nodes)
}

fn position_of(items: &[Item], id: ItemId) -> Option<usize> {
    items.iter().position(|it| it.id == id)
}

/// True when recording the answer would close a cycle through relations
/// recorded earlier, i.e. the user is reversing a transitive judgment.
/// Ids not present in `items` are treated as unrelated.
pub fn would_contradict(
    items: &[Item],
    pivot_id: ItemId,
    compare_id: ItemId,
    pivot_is_bigger: bool,
) -> bool {
    let (Some(p), Some(c)) = (position_of(items, pivot_id), position_of(items, compare_id)) else {
        return false;
    };
    let (g, nodes) = before_graph(items);
    // The new fact is compare-before-pivot when the pivot is bigger; it
    // contradicts any existing path in the opposite direction.
    let (from, to) = if pivot_is_bigger { (p, c) } else { (c, p) };
    has_path_connecting(&g, nodes[from], nodes[to], None)
}

/// One deterministic topological order of the recorded relations, as an
/// audit over a committed list. `Err` carries an item caught in a relation
/// cycle, should contradictory facts ever have been recorded.
pub fn derived_order(items: &[Item]) -> Result<Vec<ItemId>, ItemId> {
    let (g, _) = before_graph(items);
    match toposort(&g, None) {
        Ok(order) => Ok(order.into_iter().map(|ix| items[ix.index()].id).collect()),
        Err(cycle) => Err(items[cycle.node_id().index()].id),
    }
}
