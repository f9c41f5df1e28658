//! Coloring (color assignment) model.
//!
//! A coloring assigns every node of a [`ConflictGraph`] a non-negative
//! color index. It is proper when no edge joins two nodes of the same
//! color. Colors are stored densely by node index, so a coloring is only
//! meaningful together with the graph it was computed for.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, ScheduleError};
use crate::graph::{ConflictGraph, NodeIndex};

/// Abstract color index. Colors are later mapped to concrete slots.
pub type Color = usize;

/// A color per graph node, indexed by [`NodeIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    colors: Vec<Color>,
}

impl Coloring {
    /// Creates an empty coloring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a coloring from per-node colors.
    pub fn from_colors(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Number of colored nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no node is colored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color of a node.
    #[inline]
    pub fn get(&self, node: NodeIndex) -> Option<Color> {
        self.colors.get(node).copied()
    }

    /// Colors by node index.
    #[inline]
    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    /// Iterates `(node, color)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, Color)> + '_ {
        self.colors.iter().copied().enumerate()
    }

    /// Appends the color of the next node, returning that node's index.
    pub(crate) fn push(&mut self, color: Color) -> NodeIndex {
        self.colors.push(color);
        self.colors.len() - 1
    }

    /// Set of distinct colors in use.
    pub fn palette(&self) -> BTreeSet<Color> {
        self.colors.iter().copied().collect()
    }

    /// Number of distinct colors (the coloring's width).
    pub fn width(&self) -> usize {
        self.palette().len()
    }

    /// Largest color index in use.
    pub fn max_color(&self) -> Option<Color> {
        self.colors.iter().copied().max()
    }

    /// Nodes grouped by color, each group in ascending node order.
    pub fn classes(&self) -> BTreeMap<Color, Vec<NodeIndex>> {
        let mut classes: BTreeMap<Color, Vec<NodeIndex>> = BTreeMap::new();
        for (node, color) in self.iter() {
            classes.entry(color).or_default().push(node);
        }
        classes
    }

    /// First edge whose endpoints share a color, in ascending node order.
    pub fn first_conflict(&self, graph: &ConflictGraph) -> Option<(NodeIndex, NodeIndex)> {
        graph
            .edge_indices()
            .find(|&(a, b)| self.get(a).is_some() && self.get(a) == self.get(b))
    }

    /// Whether every graph node is colored and no edge is monochromatic.
    pub fn is_proper(&self, graph: &ConflictGraph) -> bool {
        self.len() == graph.node_count() && self.first_conflict(graph).is_none()
    }

    /// Checks properness, reporting the offending edge on failure.
    pub fn verify(&self, graph: &ConflictGraph) -> Result<()> {
        if self.len() != graph.node_count() {
            return Err(ScheduleError::IncompleteColoring {
                colored: self.len(),
                nodes: graph.node_count(),
            });
        }
        match self.first_conflict(graph) {
            Some((a, b)) => Err(ScheduleError::ImproperColoring {
                first: graph.id(a).to_string(),
                second: graph.id(b).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Color of the contest with the given ID.
    pub fn color_of(&self, graph: &ConflictGraph, id: &str) -> Option<Color> {
        graph.node_index(id).and_then(|node| self.get(node))
    }

    /// Contest ID → color, for consumers that key by identifier.
    pub fn to_map(&self, graph: &ConflictGraph) -> BTreeMap<String, Color> {
        self.iter()
            .filter(|&(node, _)| node < graph.node_count())
            .map(|(node, color)| (graph.id(node).to_string(), color))
            .collect()
    }
}
