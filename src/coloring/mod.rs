//! Graph coloring strategies.
//!
//! Four interchangeable strategies behind one [`ColoringEngine`]:
//!
//! | Strategy | Width guarantee | Cost |
//! |----------|-----------------|------|
//! | Greedy | ≤ Δ + 1 | O(n + m log n) |
//! | Welsh-Powell | ≤ Δ + 1 | O(n log n + m log n) |
//! | DSatur | heuristic, exact on bipartite graphs | O(n² + m log n) |
//! | Backtracking | minimum (chromatic number) | exponential, budgeted |
//!
//! Every coloring returned by the engine has been checked against the
//! graph; an improper result is an error, never a silent output.

pub mod backtracking;
mod budget;
pub mod dsatur;
pub mod greedy;

pub use backtracking::ExactColoring;
pub use budget::{SearchBudget, SearchStats};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::{Result, ScheduleError};
use crate::graph::{ConflictGraph, NodeIndex};
use crate::models::{Color, Coloring};

/// Coloring strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// First-fit in insertion (or seeded) order.
    Greedy,
    /// First-fit by static degree descending.
    WelshPowell,
    /// First-fit by saturation degree.
    #[default]
    #[serde(rename = "dsatur")]
    DSatur,
    /// Exact minimum via budgeted search.
    Backtracking,
}

impl Algorithm {
    /// All strategies, cheapest first.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Greedy,
        Algorithm::WelshPowell,
        Algorithm::DSatur,
        Algorithm::Backtracking,
    ];

    /// Stable machine name.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::WelshPowell => "welsh_powell",
            Algorithm::DSatur => "dsatur",
            Algorithm::Backtracking => "backtracking",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Greedy => "Greedy",
            Algorithm::WelshPowell => "Welsh-Powell",
            Algorithm::DSatur => "DSatur",
            Algorithm::Backtracking => "Backtracking",
        }
    }

    /// Whether the strategy guarantees a minimum-width coloring.
    pub fn is_exact(&self) -> bool {
        matches!(self, Algorithm::Backtracking)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Algorithm::Greedy),
            "welsh_powell" | "welsh-powell" | "welshpowell" => Ok(Algorithm::WelshPowell),
            "dsatur" => Ok(Algorithm::DSatur),
            "backtracking" | "exact" => Ok(Algorithm::Backtracking),
            other => Err(ScheduleError::config(format!("unknown algorithm '{other}'"))),
        }
    }
}

/// Colors conflict graphs with a chosen strategy.
///
/// # Example
/// ```
/// use u_contest::coloring::{Algorithm, ColoringEngine};
/// use u_contest::graph::{ConflictGraph, TimeOverlap};
/// use u_contest::models::Contest;
///
/// let contests = vec![
///     Contest::new("A", 0, 60),
///     Contest::new("B", 30, 90),
///     Contest::new("C", 100, 160),
/// ];
/// let graph = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
///
/// let coloring = ColoringEngine::new(Algorithm::Greedy).color(&graph).unwrap();
/// assert_eq!(coloring.width(), 2);
/// assert_ne!(coloring.color_of(&graph, "A"), coloring.color_of(&graph, "B"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColoringEngine {
    algorithm: Algorithm,
    ordering_seed: Option<u64>,
    budget: SearchBudget,
}

impl ColoringEngine {
    /// Creates an engine for `algorithm` with the default budget.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ordering_seed: None,
            budget: SearchBudget::default(),
        }
    }

    /// Shuffles the greedy visiting order with a fixed seed.
    ///
    /// Only [`Algorithm::Greedy`] has a free ordering choice; the others
    /// ignore the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ordering_seed = Some(seed);
        self
    }

    /// Sets the exact-search budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Selected strategy.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Exact-search budget.
    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Greedy ordering seed.
    pub fn ordering_seed(&self) -> Option<u64> {
        self.ordering_seed
    }

    /// Colors `graph`.
    ///
    /// # Errors
    /// - `UnsolvableWithinBudget` if backtracking runs out of budget.
    /// - `ImproperColoring` if a strategy produced an improper result.
    pub fn color(&self, graph: &ConflictGraph) -> Result<Coloring> {
        let started = Instant::now();

        let coloring = match self.algorithm {
            Algorithm::Greedy => greedy::greedy(graph, self.ordering_seed),
            Algorithm::WelshPowell => greedy::welsh_powell(graph),
            Algorithm::DSatur => dsatur::dsatur(graph),
            Algorithm::Backtracking => backtracking::solve(graph, &self.budget)?.coloring,
        };

        coloring.verify(graph)?;

        log::debug!(
            "{} coloring: {} contests, width {} in {:?}",
            self.algorithm,
            graph.node_count(),
            coloring.width(),
            started.elapsed()
        );

        Ok(coloring)
    }

    /// Exact search with its counters.
    ///
    /// Runs backtracking regardless of the selected strategy.
    pub fn solve_exact(&self, graph: &ConflictGraph) -> Result<ExactColoring> {
        let exact = backtracking::solve(graph, &self.budget)?;
        exact.coloring.verify(graph)?;
        Ok(exact)
    }

    /// Greedy coloring over an explicit contest order.
    ///
    /// Contests missing from `order` are colored afterwards in insertion
    /// order.
    ///
    /// # Errors
    /// `UnknownContest` for an ID that is not in the graph.
    pub fn color_in_order(&self, graph: &ConflictGraph, order: &[&str]) -> Result<Coloring> {
        let nodes = order
            .iter()
            .map(|id| {
                graph
                    .node_index(id)
                    .ok_or_else(|| ScheduleError::UnknownContest((*id).to_string()))
            })
            .collect::<Result<Vec<NodeIndex>>>()?;

        let coloring = greedy::color_in_order(graph, &nodes);
        coloring.verify(graph)?;
        Ok(coloring)
    }
}

/// Smallest color not in `used`.
pub(crate) fn smallest_free_color<I>(used: I) -> Color
where
    I: IntoIterator<Item = Color>,
{
    let mut taken: Vec<Color> = used.into_iter().collect();
    taken.sort_unstable();
    taken.dedup();
    taken
        .iter()
        .enumerate()
        .find(|&(expected, &color)| expected != color)
        .map_or(taken.len(), |(expected, _)| expected)
}
