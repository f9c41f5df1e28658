//! Exact minimum coloring by iterative deepening.
//!
//! # Algorithm
//! For k = 1, 2, … search for a proper k-coloring with depth-first search:
//! - **Branching**: the uncolored node with the fewest remaining candidate
//!   colors; ties by higher degree, then contest ID ascending.
//! - **Value order**: candidate colors ascending, never more than one
//!   above the highest color already in use (colors are interchangeable,
//!   so the other branches are symmetric copies).
//! - **Forward checking**: after an assignment the color is removed from
//!   every uncolored neighbour's domain; an emptied domain rejects the
//!   assignment immediately.
//!
//! The first k that succeeds is the chromatic number, since every smaller
//! k has been refuted by exhaustive search.
//!
//! The search uses an explicit frame stack and a trail of domain
//! removals instead of recursion, so memory stays O(n·k + m) and the
//! budget is charged on every step.
//!
//! # Reference
//! Haralick & Elliott (1980), "Increasing tree search efficiency for
//! constraint satisfaction problems"

use std::cmp::Ordering;

use super::budget::{BudgetTracker, SearchBudget, SearchStats};
use crate::error::{Result, ScheduleError};
use crate::graph::{ConflictGraph, NodeIndex};
use crate::models::{Color, Coloring};

/// Result of a successful exact search.
#[derive(Debug, Clone)]
pub struct ExactColoring {
    /// A coloring of minimum width.
    pub coloring: Coloring,
    /// Minimum number of colors (equals the coloring's width).
    pub chromatic_number: usize,
    /// Search counters.
    pub stats: SearchStats,
}

/// Finds a minimum-width coloring within `budget`.
///
/// # Errors
/// `UnsolvableWithinBudget` when the budget runs out before the chromatic
/// number is established. The error carries the color count that was
/// being attempted; every smaller count has already been refuted.
///
/// # Example
/// ```
/// use u_contest::coloring::{backtracking, SearchBudget};
/// use u_contest::graph::{ConflictGraph, TimeOverlap};
/// use u_contest::models::Contest;
///
/// let contests: Vec<Contest> = (0..4)
///     .map(|i| Contest::new(format!("K{i}"), 0, 60))
///     .collect();
/// let graph = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
///
/// let exact = backtracking::solve(&graph, &SearchBudget::default()).unwrap();
/// assert_eq!(exact.chromatic_number, 4);
/// assert_eq!(exact.stats.refuted_up_to, 3);
/// ```
pub fn solve(graph: &ConflictGraph, budget: &SearchBudget) -> Result<ExactColoring> {
    let mut tracker = BudgetTracker::start(budget);
    let mut stats = SearchStats::default();

    if graph.is_empty() {
        return Ok(ExactColoring {
            coloring: Coloring::new(),
            chromatic_number: 0,
            stats,
        });
    }

    let mut k = 1;
    loop {
        log::trace!("exact search: trying {} colors", k);

        let mut search = KColorSearch::new(graph, k);
        let outcome = search.run(&mut tracker, &mut stats);

        stats.steps = tracker.steps();
        stats.elapsed = tracker.elapsed();

        match outcome {
            Ok(Some(colors)) => {
                log::debug!(
                    "exact search: chromatic number {} after {} steps ({} backtracks, {} prunings)",
                    k,
                    stats.steps,
                    stats.backtracks,
                    stats.prunings
                );
                return Ok(ExactColoring {
                    coloring: Coloring::from_colors(colors),
                    chromatic_number: k,
                    stats,
                });
            }
            Ok(None) => {
                stats.refuted_up_to = k;
                k += 1;
            }
            Err(BudgetExhausted) => {
                log::debug!(
                    "exact search: budget exhausted at k={} after {} steps",
                    k,
                    stats.steps
                );
                return Err(ScheduleError::UnsolvableWithinBudget {
                    steps: stats.steps,
                    colors: k,
                });
            }
        }
    }
}

struct BudgetExhausted;

/// One decision level of the search.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeIndex,
    /// Next color to try at this level.
    next_color: Color,
    /// Color currently assigned at this level, if any.
    assigned: Option<Color>,
    /// Highest color used by the ancestors of this level.
    highest_before: Option<Color>,
    /// Trail length when this level was entered.
    trail_start: usize,
}

impl Frame {
    fn new(node: NodeIndex, highest_before: Option<Color>, trail_start: usize) -> Self {
        Self {
            node,
            next_color: 0,
            assigned: None,
            highest_before,
            trail_start,
        }
    }

    /// Exclusive upper bound on colors worth trying here.
    fn ceiling(&self, k: usize) -> Color {
        self.highest_before.map_or(1, |h| h + 2).min(k)
    }
}

/// Search for a proper coloring with exactly `k` available colors.
struct KColorSearch<'a> {
    graph: &'a ConflictGraph,
    k: usize,
    colors: Vec<Option<Color>>,
    domains: Vec<Vec<bool>>,
    domain_sizes: Vec<usize>,
    /// Removed `(node, color)` candidates, undone in reverse.
    trail: Vec<(NodeIndex, Color)>,
    frames: Vec<Frame>,
}

impl<'a> KColorSearch<'a> {
    fn new(graph: &'a ConflictGraph, k: usize) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            k,
            colors: vec![None; n],
            domains: vec![vec![true; k]; n],
            domain_sizes: vec![k; n],
            trail: Vec::with_capacity(n * k.min(n)),
            frames: Vec::with_capacity(n),
        }
    }

    fn run(
        &mut self,
        tracker: &mut BudgetTracker,
        stats: &mut SearchStats,
    ) -> std::result::Result<Option<Vec<Color>>, BudgetExhausted> {
        let Some(first) = self.select_node() else {
            return Ok(Some(Vec::new()));
        };
        self.frames.push(Frame::new(first, None, 0));

        while let Some(&frame) = self.frames.last() {
            if !tracker.tick() {
                return Err(BudgetExhausted);
            }

            let depth = self.frames.len() - 1;

            if frame.assigned.is_some() {
                self.undo_to(frame.trail_start);
                self.colors[frame.node] = None;
                self.frames[depth].assigned = None;
            }

            let ceiling = frame.ceiling(self.k);
            let candidate =
                (frame.next_color..ceiling).find(|&color| self.domains[frame.node][color]);

            let Some(color) = candidate else {
                self.frames.pop();
                stats.backtracks += 1;
                continue;
            };

            self.frames[depth].next_color = color + 1;
            self.frames[depth].assigned = Some(color);
            self.colors[frame.node] = Some(color);

            if !self.forward_check(frame.node, color) {
                stats.prunings += 1;
                continue;
            }

            match self.select_node() {
                Some(next) => {
                    let highest = frame.highest_before.max(Some(color));
                    self.frames
                        .push(Frame::new(next, highest, self.trail.len()));
                }
                None => {
                    return Ok(Some(
                        self.colors
                            .iter()
                            .map(|c| c.unwrap_or_default())
                            .collect(),
                    ));
                }
            }
        }

        Ok(None)
    }

    /// Removes `color` from uncolored neighbours. `false` on a wipe-out.
    fn forward_check(&mut self, node: NodeIndex, color: Color) -> bool {
        let graph = self.graph;
        for &neighbor in graph.neighbor_indices(node) {
            if self.colors[neighbor].is_some() || !self.domains[neighbor][color] {
                continue;
            }
            self.domains[neighbor][color] = false;
            self.domain_sizes[neighbor] -= 1;
            self.trail.push((neighbor, color));
            if self.domain_sizes[neighbor] == 0 {
                return false;
            }
        }
        true
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((node, color)) = self.trail.pop() {
                self.domains[node][color] = true;
                self.domain_sizes[node] += 1;
            }
        }
    }

    /// Smallest remaining domain, then highest degree, then ID ascending.
    fn select_node(&self) -> Option<NodeIndex> {
        (0..self.colors.len())
            .filter(|&node| self.colors[node].is_none())
            .min_by(|&a, &b| self.compare(a, b))
    }

    fn compare(&self, a: NodeIndex, b: NodeIndex) -> Ordering {
        self.domain_sizes[a]
            .cmp(&self.domain_sizes[b])
            .then_with(|| self.graph.degree_of(b).cmp(&self.graph.degree_of(a)))
            .then_with(|| self.graph.id(a).cmp(self.graph.id(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TimeOverlap;
    use crate::models::Contest;

    fn complete_graph(n: i64) -> ConflictGraph {
        let contests: Vec<Contest> = (0..n).map(|i| Contest::new(format!("K{i}"), 0, 10)).collect();
        ConflictGraph::build(&contests, &TimeOverlap).unwrap()
    }

    #[test]
    fn test_example_confirms_width_two() {
        let contests = vec![
            Contest::new("A", 0, 60),
            Contest::new("B", 30, 90),
            Contest::new("C", 100, 160),
        ];
        let g = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
        let exact = solve(&g, &SearchBudget::steps(10)).unwrap();
        assert_eq!(exact.chromatic_number, 2);
        assert_eq!(exact.coloring.width(), 2);
        assert_eq!(exact.stats.refuted_up_to, 1);
        assert!(exact.stats.steps <= 10);
        assert!(exact.coloring.is_proper(&g));
    }

    #[test]
    fn test_complete_graph_refutes_smaller_k() {
        let g = complete_graph(5);
        let exact = solve(&g, &SearchBudget::default()).unwrap();
        assert_eq!(exact.chromatic_number, 5);
        assert_eq!(exact.stats.refuted_up_to, 4);
        assert!(exact.coloring.is_proper(&g));
    }

    /// P0..P4 conflict with their ring neighbours only.
    #[derive(Debug)]
    struct Ring;

    impl crate::graph::ConflictPredicate for Ring {
        fn name(&self) -> &'static str {
            "ring"
        }

        fn conflicts(&self, a: &Contest, b: &Contest) -> bool {
            let ia: i64 = a.id[1..].parse().unwrap();
            let ib: i64 = b.id[1..].parse().unwrap();
            (ia - ib).rem_euclid(5) == 1 || (ib - ia).rem_euclid(5) == 1
        }
    }

    #[test]
    fn test_odd_cycle_needs_three() {
        let contests: Vec<Contest> = (0..5).map(|i| Contest::new(format!("P{i}"), 0, 10)).collect();
        let g = ConflictGraph::build(&contests, &Ring).unwrap();
        assert_eq!(g.edge_count(), 5);

        let exact = solve(&g, &SearchBudget::default()).unwrap();
        assert_eq!(exact.chromatic_number, 3);
    }

    #[test]
    fn test_budget_exhaustion() {
        let g = complete_graph(6);
        let err = solve(&g, &SearchBudget::steps(3)).unwrap_err();
        match err {
            ScheduleError::UnsolvableWithinBudget { steps, colors } => {
                // k=1 is refuted in two steps; k=2 is refused its second.
                assert_eq!(steps, 3);
                assert_eq!(colors, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reported_steps_never_exceed_budget() {
        let g = complete_graph(7);
        for max in 0..40 {
            match solve(&g, &SearchBudget::steps(max)) {
                Ok(exact) => assert!(exact.stats.steps <= max),
                Err(ScheduleError::UnsolvableWithinBudget { steps, .. }) => assert_eq!(steps, max),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_graph() {
        let exact = solve(&ConflictGraph::new(), &SearchBudget::steps(0)).unwrap();
        assert_eq!(exact.chromatic_number, 0);
        assert!(exact.coloring.is_empty());
    }

    #[test]
    fn test_isolated_nodes_use_one_color() {
        let contests: Vec<Contest> = (0..4)
            .map(|i| Contest::new(format!("S{i}"), i * 100, i * 100 + 10))
            .collect();
        let g = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
        let exact = solve(&g, &SearchBudget::default()).unwrap();
        assert_eq!(exact.chromatic_number, 1);
        assert_eq!(exact.coloring.as_slice(), &[0, 0, 0, 0]);
    }
}
