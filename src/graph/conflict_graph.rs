//! Conflict graph.
//!
//! Undirected simple graph over contests. Nodes are dense indices in
//! insertion order; an edge joins two contests for which the conflict
//! predicate holds.
//!
//! # Invariants
//! - Adjacency is symmetric and irreflexive (no self-loops).
//! - Each unordered pair appears at most once.
//! - Edges are only ever added, never removed.
//!
//! # Complexity
//! `build` is O(n²) predicate evaluations, `add_node` is O(n).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::ConflictPredicate;
use crate::error::{Result, ScheduleError};
use crate::models::Contest;
use crate::validation::{validate_contests, validate_insert};

/// Dense node index (insertion order).
pub type NodeIndex = usize;

/// Conflict graph over contests.
///
/// # Example
/// ```
/// use u_contest::graph::{ConflictGraph, TimeOverlap};
/// use u_contest::models::Contest;
///
/// let contests = vec![
///     Contest::new("A", 0, 60),
///     Contest::new("B", 30, 90),
///     Contest::new("C", 100, 160),
/// ];
/// let graph = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// assert!(graph.has_edge("A", "B"));
/// assert_eq!(graph.degree("C"), 0);
/// ```
///
/// # Serialization
/// Only contests and adjacency are written. Deserialization rebuilds the
/// ID index and rejects records that break the invariants above.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord", into = "GraphRecord")]
pub struct ConflictGraph {
    contests: Vec<Contest>,
    index: HashMap<String, NodeIndex>,
    adjacency: Vec<BTreeSet<NodeIndex>>,
    edge_count: usize,
}

/// Serialized form of [`ConflictGraph`].
#[derive(Serialize, Deserialize)]
struct GraphRecord {
    contests: Vec<Contest>,
    adjacency: Vec<BTreeSet<NodeIndex>>,
}

impl From<ConflictGraph> for GraphRecord {
    fn from(graph: ConflictGraph) -> Self {
        Self {
            contests: graph.contests,
            adjacency: graph.adjacency,
        }
    }
}

impl TryFrom<GraphRecord> for ConflictGraph {
    type Error = ScheduleError;

    fn try_from(record: GraphRecord) -> Result<Self> {
        validate_contests(&record.contests)?;

        let n = record.contests.len();
        if record.adjacency.len() != n {
            return Err(ScheduleError::config(format!(
                "adjacency has {} rows for {} contests",
                record.adjacency.len(),
                n
            )));
        }

        let mut edge_count = 0;
        for (node, neighbors) in record.adjacency.iter().enumerate() {
            for &neighbor in neighbors {
                if neighbor >= n {
                    return Err(ScheduleError::config(format!(
                        "node {} lists unknown neighbour {}",
                        node, neighbor
                    )));
                }
                if neighbor == node {
                    return Err(ScheduleError::config(format!("node {} has a self-loop", node)));
                }
                if !record.adjacency[neighbor].contains(&node) {
                    return Err(ScheduleError::config(format!(
                        "edge {}-{} is not symmetric",
                        node, neighbor
                    )));
                }
                if node < neighbor {
                    edge_count += 1;
                }
            }
        }

        let index = record
            .contests
            .iter()
            .enumerate()
            .map(|(i, contest)| (contest.id.clone(), i))
            .collect();

        Ok(Self {
            contests: record.contests,
            index,
            adjacency: record.adjacency,
            edge_count,
        })
    }
}

impl ConflictGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph by evaluating `predicate` on every pair.
    ///
    /// # Errors
    /// `InvalidContest` listing every malformed interval, empty ID and
    /// duplicate ID in `contests`.
    pub fn build(contests: &[Contest], predicate: &dyn ConflictPredicate) -> Result<Self> {
        validate_contests(contests)?;

        let n = contests.len();
        let mut graph = Self {
            contests: contests.to_vec(),
            index: HashMap::with_capacity(n),
            adjacency: vec![BTreeSet::new(); n],
            edge_count: 0,
        };

        for (i, contest) in contests.iter().enumerate() {
            graph.index.insert(contest.id.clone(), i);
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if predicate.conflicts(&contests[i], &contests[j]) {
                    graph.link(i, j);
                }
            }
        }

        log::debug!(
            "built conflict graph: {} contests, {} conflicts ({})",
            n,
            graph.edge_count,
            predicate.name()
        );

        Ok(graph)
    }

    /// Adds one contest and its conflict edges.
    ///
    /// Existing nodes and edges are left untouched.
    ///
    /// # Errors
    /// `InvalidContest` if the interval is malformed or the ID is taken;
    /// the graph is unchanged in that case.
    pub fn add_node(
        &mut self,
        contest: Contest,
        predicate: &dyn ConflictPredicate,
    ) -> Result<NodeIndex> {
        validate_insert(self, &contest)?;

        let neighbors = self.conflicts_with(&contest, predicate);
        let node = self.contests.len();

        self.index.insert(contest.id.clone(), node);
        self.contests.push(contest);
        self.adjacency.push(BTreeSet::new());
        for neighbor in neighbors {
            self.link(node, neighbor);
        }

        Ok(node)
    }

    /// Nodes that `contest` would conflict with, without inserting it.
    pub fn conflicts_with(
        &self,
        contest: &Contest,
        predicate: &dyn ConflictPredicate,
    ) -> BTreeSet<NodeIndex> {
        self.contests
            .iter()
            .enumerate()
            .filter(|(_, existing)| existing.id != contest.id && predicate.conflicts(contest, existing))
            .map(|(node, _)| node)
            .collect()
    }

    fn link(&mut self, a: NodeIndex, b: NodeIndex) {
        if a == b {
            return;
        }
        if self.adjacency[a].insert(b) {
            self.adjacency[b].insert(a);
            self.edge_count += 1;
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.contests.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contests.is_empty()
    }

    /// Whether a contest with this ID is in the graph.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Node index of a contest ID.
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Contest ID of a node.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn id(&self, node: NodeIndex) -> &str {
        &self.contests[node].id
    }

    /// Contest stored at a node.
    pub fn contest(&self, node: NodeIndex) -> Option<&Contest> {
        self.contests.get(node)
    }

    /// All contests in insertion order.
    pub fn contests(&self) -> &[Contest] {
        &self.contests
    }

    /// All contest IDs in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.contests.iter().map(|c| c.id.as_str())
    }

    /// Neighbour indices of a node.
    ///
    /// # Panics
    /// If `node` is out of range.
    #[inline]
    pub fn neighbor_indices(&self, node: NodeIndex) -> &BTreeSet<NodeIndex> {
        &self.adjacency[node]
    }

    /// IDs conflicting with `id`. Empty if isolated or unknown.
    pub fn neighbors(&self, id: &str) -> BTreeSet<&str> {
        match self.node_index(id) {
            Some(node) => self.adjacency[node].iter().map(|&n| self.id(n)).collect(),
            None => BTreeSet::new(),
        }
    }

    /// Number of conflicts of `id`. Zero if unknown.
    pub fn degree(&self, id: &str) -> usize {
        self.node_index(id)
            .map(|node| self.adjacency[node].len())
            .unwrap_or(0)
    }

    /// Number of conflicts of a node.
    #[inline]
    pub fn degree_of(&self, node: NodeIndex) -> usize {
        self.adjacency[node].len()
    }

    /// Largest degree in the graph (0 for an empty graph).
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Whether `a` and `b` conflict.
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(a), Some(b)) => self.adjacency[a].contains(&b),
            _ => false,
        }
    }

    /// Edges as `(a, b)` with `a < b`, in ascending order.
    pub fn edge_indices(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, neighbors)| {
            neighbors
                .range((a + 1)..)
                .map(move |&b| (a, b))
        })
    }

    /// Edges as ID pairs, each pair ordered lexicographically, sorted.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .edge_indices()
            .map(|(a, b)| {
                let (x, y) = (self.id(a), self.id(b));
                if x <= y {
                    (x, y)
                } else {
                    (y, x)
                }
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Edge density: `edges / (n * (n - 1) / 2)`, 0.0 below two nodes.
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        let max_edges = (n * (n - 1)) as f64 / 2.0;
        self.edge_count as f64 / max_edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{OverlapWithSharedTag, TimeOverlap};
    use crate::validation::ValidationErrorKind;

    fn sample_contests() -> Vec<Contest> {
        vec![
            Contest::new("A", 0, 60),
            Contest::new("B", 30, 90),
            Contest::new("C", 100, 160),
        ]
    }

    #[test]
    fn test_build_edges() {
        let g = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edges(), vec![("A", "B")]);
        assert!(g.has_edge("B", "A"));
        assert!(!g.has_edge("A", "C"));
    }

    #[test]
    fn test_neighbors_and_degree() {
        let g = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        assert_eq!(g.neighbors("A").into_iter().collect::<Vec<_>>(), vec!["B"]);
        assert!(g.neighbors("C").is_empty());
        assert!(g.neighbors("missing").is_empty());
        assert_eq!(g.degree("B"), 1);
        assert_eq!(g.degree("missing"), 0);
        assert_eq!(g.max_degree(), 1);
    }

    #[test]
    fn test_build_rejects_invalid_interval() {
        let contests = vec![Contest::new("A", 60, 0)];
        let err = ConflictGraph::build(&contests, &TimeOverlap).unwrap_err();
        match err {
            ScheduleError::InvalidContest(errors) => {
                assert_eq!(errors[0].kind, ValidationErrorKind::InvalidInterval)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let contests = vec![Contest::new("A", 0, 60), Contest::new("A", 0, 60)];
        assert!(matches!(
            ConflictGraph::build(&contests, &TimeOverlap),
            Err(ScheduleError::InvalidContest(_))
        ));
    }

    #[test]
    fn test_add_node() {
        let mut g = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        let node = g.add_node(Contest::new("D", 50, 120), &TimeOverlap).unwrap();
        assert_eq!(node, 3);
        assert_eq!(
            g.neighbors("D").into_iter().collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert_eq!(g.edge_count(), 4);
        // Existing edge kept
        assert!(g.has_edge("A", "B"));
    }

    #[test]
    fn test_add_node_rejects_duplicate_without_mutation() {
        let mut g = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        assert!(g.add_node(Contest::new("A", 0, 10), &TimeOverlap).is_err());
        assert!(g.add_node(Contest::new("E", 10, 10), &TimeOverlap).is_err());
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_conflicts_with_is_read_only() {
        let g = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        let would = g.conflicts_with(&Contest::new("D", 80, 110), &TimeOverlap);
        assert_eq!(would.into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn test_policy_changes_edges() {
        let contests = vec![
            Contest::new("A", 0, 60).with_tag("div1"),
            Contest::new("B", 30, 90).with_tag("div2"),
            Contest::new("C", 30, 90).with_tag("div1"),
        ];
        let overlap = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
        let tagged = ConflictGraph::build(&contests, &OverlapWithSharedTag).unwrap();
        assert_eq!(overlap.edge_count(), 3);
        assert_eq!(tagged.edges(), vec![("A", "C")]);
    }

    #[test]
    fn test_symmetric_no_self_loops() {
        let contests: Vec<Contest> = (0..6)
            .map(|i| Contest::new(format!("C{i}"), i * 10, i * 10 + 25))
            .collect();
        let g = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
        for node in 0..g.node_count() {
            assert!(!g.neighbor_indices(node).contains(&node));
            for &other in g.neighbor_indices(node) {
                assert!(g.neighbor_indices(other).contains(&node));
            }
        }
        assert_eq!(g.edge_indices().count(), g.edge_count());
    }

    #[test]
    fn test_density() {
        assert_eq!(ConflictGraph::new().density(), 0.0);
        let contests: Vec<Contest> = (0..4).map(|i| Contest::new(format!("K{i}"), 0, 10)).collect();
        let complete = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
        assert!((complete.density() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_serde_roundtrip_rebuilds_index() {
        let g = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert!(!json.contains("index"));

        let back: ConflictGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.node_count(), 3);
        assert_eq!(back.edge_count(), 1);
        assert_eq!(back.node_index("C"), Some(2));
        assert!(back.has_edge("A", "B"));
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> serde_json::Result<ConflictGraph> {
        let g = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        let mut value = serde_json::to_value(&g).unwrap();
        edit(&mut value);
        serde_json::from_value(value)
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_neighbor() {
        assert!(tampered(|v| v["adjacency"][2] = serde_json::json!([7])).is_err());
    }

    #[test]
    fn test_deserialize_rejects_asymmetric_edge() {
        // C lists A, but A does not list C.
        assert!(tampered(|v| v["adjacency"][2] = serde_json::json!([0])).is_err());
    }

    #[test]
    fn test_deserialize_rejects_self_loop() {
        assert!(tampered(|v| v["adjacency"][2] = serde_json::json!([2])).is_err());
    }

    #[test]
    fn test_deserialize_rejects_row_count_mismatch() {
        assert!(tampered(|v| v["adjacency"] = serde_json::json!([[1], [0]])).is_err());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        assert!(tampered(|v| v["contests"][2]["id"] = serde_json::json!("A")).is_err());
    }

    #[test]
    fn test_deserialize_rejects_invalid_interval() {
        assert!(tampered(|v| v["contests"][0]["end"] = serde_json::json!(-5)).is_err());
    }
}
