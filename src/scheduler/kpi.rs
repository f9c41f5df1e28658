//! Schedule quality metrics (KPIs) and algorithm comparison.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Density | e / (n(n-1)/2) |
//! | Width | Distinct colors (= slots used) |
//! | Slot utilization | Slots used / slots available |
//! | Avg Contests per Slot | n / width |
//! | Avg Priority per Slot | Σ priority / width |
//! | Max Degree | Largest number of conflicts of one contest |
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated
//! timetabling"

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::coloring::{Algorithm, ColoringEngine, SearchBudget};
use crate::error::ScheduleError;
use crate::graph::ConflictGraph;
use crate::models::ScheduleResult;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Number of contests.
    pub contests: usize,
    /// Number of conflicts.
    pub conflicts: usize,
    /// Conflict density (0.0..1.0).
    pub density: f64,
    /// Number of colors.
    pub width: usize,
    /// Number of distinct slots in use.
    pub slots_used: usize,
    /// Slots in the window.
    pub slots_available: usize,
    /// Fraction of window slots in use (0.0..1.0).
    pub slot_utilization: f64,
    /// Mean contests per used slot.
    pub avg_contests_per_slot: f64,
    /// Total priority divided by used slots.
    pub avg_priority_per_slot: f64,
    /// Largest conflict count of a single contest.
    pub max_degree: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    ///
    /// All averages are 0.0 for an empty schedule.
    pub fn calculate(result: &ScheduleResult) -> Self {
        let graph = result.graph();
        let contests = graph.node_count();
        let width = result.width();
        let slots_used = result.slot_map().used_slots().len();
        let slots_available = result.slot_config().slot_count();

        let total_priority: f64 = graph.contests().iter().map(|c| c.priority).sum();

        let (avg_contests_per_slot, avg_priority_per_slot) = if width == 0 {
            (0.0, 0.0)
        } else {
            (
                contests as f64 / width as f64,
                total_priority / width as f64,
            )
        };

        let slot_utilization = if slots_available == 0 {
            0.0
        } else {
            slots_used as f64 / slots_available as f64
        };

        Self {
            contests,
            conflicts: graph.edge_count(),
            density: graph.density(),
            width,
            slots_used,
            slots_available,
            slot_utilization,
            avg_contests_per_slot,
            avg_priority_per_slot,
            max_degree: graph.max_degree(),
        }
    }

    /// Whether the schedule stays within `max_width` slots and at most
    /// `max_contests_per_slot` contests share a slot on average.
    pub fn meets_thresholds(&self, max_width: usize, max_contests_per_slot: f64) -> bool {
        self.width <= max_width && self.avg_contests_per_slot <= max_contests_per_slot
    }
}

/// One strategy's result in an [`AlgorithmComparison`].
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    /// Strategy.
    pub algorithm: Algorithm,
    /// Width, or the error the strategy failed with.
    pub outcome: Result<usize, ScheduleError>,
    /// Wall-clock time.
    pub elapsed: Duration,
}

impl AlgorithmRun {
    /// Width if the run succeeded.
    pub fn width(&self) -> Option<usize> {
        self.outcome.as_ref().ok().copied()
    }
}

/// Side-by-side run of several strategies on one graph.
///
/// # Example
/// ```
/// use u_contest::coloring::{Algorithm, SearchBudget};
/// use u_contest::graph::{ConflictGraph, TimeOverlap};
/// use u_contest::models::Contest;
/// use u_contest::scheduler::AlgorithmComparison;
///
/// let contests = vec![
///     Contest::new("A", 0, 60),
///     Contest::new("B", 30, 90),
///     Contest::new("C", 100, 160),
/// ];
/// let graph = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
///
/// let cmp = AlgorithmComparison::run(&graph, &Algorithm::ALL, SearchBudget::default(), None);
/// assert_eq!(cmp.runs().len(), 4);
/// assert_eq!(cmp.best().and_then(|run| run.width()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct AlgorithmComparison {
    runs: Vec<AlgorithmRun>,
}

impl AlgorithmComparison {
    /// Colors `graph` with each of `algorithms` in turn.
    pub fn run(
        graph: &ConflictGraph,
        algorithms: &[Algorithm],
        budget: SearchBudget,
        seed: Option<u64>,
    ) -> Self {
        let runs = algorithms
            .iter()
            .map(|&algorithm| {
                let mut engine = ColoringEngine::new(algorithm).with_budget(budget);
                if let Some(seed) = seed {
                    engine = engine.with_seed(seed);
                }

                let started = Instant::now();
                let outcome = engine.color(graph).map(|coloring| coloring.width());
                let elapsed = started.elapsed();

                if let Err(err) = &outcome {
                    log::warn!("{} failed during comparison: {}", algorithm, err);
                }

                AlgorithmRun {
                    algorithm,
                    outcome,
                    elapsed,
                }
            })
            .collect();

        Self { runs }
    }

    /// All runs in the requested order.
    pub fn runs(&self) -> &[AlgorithmRun] {
        &self.runs
    }

    /// Narrowest successful run; the earlier one on ties.
    pub fn best(&self) -> Option<&AlgorithmRun> {
        self.runs
            .iter()
            .filter_map(|run| run.width().map(|width| (width, run)))
            .min_by_key(|&(width, _)| width)
            .map(|(_, run)| run)
    }
}
