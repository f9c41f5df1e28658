//! Greedy and Welsh-Powell coloring.
//!
//! # Algorithm
//! Visit nodes in a fixed order; give each node the smallest color not
//! used by an already-colored neighbour. Welsh-Powell is the same rule
//! over nodes sorted by static degree (descending, ties by ID ascending).
//!
//! Both use at most `max_degree + 1` colors: a node has at most
//! `max_degree` colored neighbours when it is visited.
//!
//! # Complexity
//! O(n + m log n) with `BTreeSet` adjacency.
//!
//! # Reference
//! Welsh & Powell (1967), "An upper bound for the chromatic number of a
//! graph and its application to timetabling problems"

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::smallest_free_color;
use crate::graph::{ConflictGraph, NodeIndex};
use crate::models::{Color, Coloring};

/// Insertion order, or a seeded permutation of it.
///
/// The same seed always yields the same order for the same graph.
pub fn insertion_order(graph: &ConflictGraph, seed: Option<u64>) -> Vec<NodeIndex> {
    let mut order: Vec<NodeIndex> = (0..graph.node_count()).collect();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    }
    order
}

/// Static degree descending, ties by contest ID ascending.
pub fn welsh_powell_order(graph: &ConflictGraph) -> Vec<NodeIndex> {
    let mut order: Vec<NodeIndex> = (0..graph.node_count()).collect();
    order.sort_by(|&a, &b| {
        graph
            .degree_of(b)
            .cmp(&graph.degree_of(a))
            .then_with(|| graph.id(a).cmp(graph.id(b)))
    });
    order
}

/// Greedy coloring over `order`.
///
/// Nodes missing from `order` are colored afterwards in insertion order;
/// repeated entries are ignored.
pub fn color_in_order(graph: &ConflictGraph, order: &[NodeIndex]) -> Coloring {
    let n = graph.node_count();
    let mut colors: Vec<Option<Color>> = vec![None; n];

    let remaining = 0..n;
    for node in order.iter().copied().chain(remaining) {
        if node >= n || colors[node].is_some() {
            continue;
        }
        let used = graph
            .neighbor_indices(node)
            .iter()
            .filter_map(|&neighbor| colors[neighbor]);
        colors[node] = Some(smallest_free_color(used));
    }

    Coloring::from_colors(colors.into_iter().map(Option::unwrap_or_default).collect())
}

/// Plain greedy coloring in insertion (or seeded) order.
pub fn greedy(graph: &ConflictGraph, seed: Option<u64>) -> Coloring {
    color_in_order(graph, &insertion_order(graph, seed))
}

/// Welsh-Powell coloring.
pub fn welsh_powell(graph: &ConflictGraph) -> Coloring {
    color_in_order(graph, &welsh_powell_order(graph))
}
