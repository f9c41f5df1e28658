//! DSatur coloring.
//!
//! # Algorithm
//! 1. Pick the uncolored node with the highest saturation degree (number
//!    of distinct colors among its colored neighbours).
//! 2. Ties: higher static degree, then contest ID ascending.
//! 3. Give it the smallest color its neighbours do not use.
//! 4. Add that color to the saturation set of each uncolored neighbour.
//!
//! # Complexity
//! O(n²) for the linear-scan selection plus O(m log n) set updates.
//!
//! # Reference
//! Brélaz (1979), "New methods to color the vertices of a graph"

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::smallest_free_color;
use crate::graph::{ConflictGraph, NodeIndex};
use crate::models::{Color, Coloring};

/// Colors `graph` with DSatur.
pub fn dsatur(graph: &ConflictGraph) -> Coloring {
    let n = graph.node_count();
    let mut colors: Vec<Option<Color>> = vec![None; n];
    let mut saturation: Vec<BTreeSet<Color>> = vec![BTreeSet::new(); n];

    while let Some(node) = select_node(graph, &colors, &saturation) {
        let color = smallest_free_color(saturation[node].iter().copied());
        colors[node] = Some(color);

        for &neighbor in graph.neighbor_indices(node) {
            if colors[neighbor].is_none() {
                saturation[neighbor].insert(color);
            }
        }
    }

    Coloring::from_colors(colors.into_iter().map(Option::unwrap_or_default).collect())
}

fn select_node(
    graph: &ConflictGraph,
    colors: &[Option<Color>],
    saturation: &[BTreeSet<Color>],
) -> Option<NodeIndex> {
    (0..colors.len())
        .filter(|&node| colors[node].is_none())
        .min_by(|&a, &b| compare(graph, saturation, a, b))
}

/// `Less` = `a` is colored first.
fn compare(
    graph: &ConflictGraph,
    saturation: &[BTreeSet<Color>],
    a: NodeIndex,
    b: NodeIndex,
) -> Ordering {
    saturation[b]
        .len()
        .cmp(&saturation[a].len())
        .then_with(|| graph.degree_of(b).cmp(&graph.degree_of(a)))
        .then_with(|| graph.id(a).cmp(graph.id(b)))
}
