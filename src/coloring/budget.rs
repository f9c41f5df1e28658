//! Exploration budget for exact search.
//!
//! The budget is the only cancellation primitive in the crate. It is
//! charged once per search step, so the exact solver can be preempted at
//! any node of the search tree, not just between color counts.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How often (in steps) the wall clock is sampled.
const CLOCK_CHECK_INTERVAL: u64 = 64;

/// Limits on the exact search.
///
/// A `None` limit is unbounded. With both limits `None` the search runs
/// until it finds the chromatic number.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use u_contest::coloring::SearchBudget;
///
/// let budget = SearchBudget::steps(50_000).with_time_limit(Duration::from_millis(200));
/// assert_eq!(budget.max_steps, Some(50_000));
/// assert_eq!(budget.time_limit_ms, Some(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum number of search steps across all color counts.
    pub max_steps: Option<u64>,
    /// Wall-clock limit (ms).
    pub time_limit_ms: Option<u64>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_steps: Some(1_000_000),
            time_limit_ms: None,
        }
    }
}

impl SearchBudget {
    /// Budget limited to `max_steps` search steps.
    pub fn steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            time_limit_ms: None,
        }
    }

    /// Budget without any limit.
    pub fn unlimited() -> Self {
        Self {
            max_steps: None,
            time_limit_ms: None,
        }
    }

    /// Adds a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Wall-clock limit as a `Duration`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// Counts steps against a [`SearchBudget`].
#[derive(Debug, Clone)]
pub(crate) struct BudgetTracker {
    max_steps: Option<u64>,
    time_limit: Option<Duration>,
    started: Instant,
    steps: u64,
}

impl BudgetTracker {
    pub(crate) fn start(budget: &SearchBudget) -> Self {
        Self {
            max_steps: budget.max_steps,
            time_limit: budget.time_limit(),
            started: Instant::now(),
            steps: 0,
        }
    }

    /// Charges one step. Returns `false` once the budget is spent.
    ///
    /// A refused step is not counted, so [`steps`](Self::steps) never
    /// exceeds `max_steps`.
    #[inline]
    pub(crate) fn tick(&mut self) -> bool {
        let next = self.steps.saturating_add(1);

        if let Some(max) = self.max_steps {
            if next > max {
                return false;
            }
        }

        if let Some(limit) = self.time_limit {
            if next % CLOCK_CHECK_INTERVAL == 0 && self.started.elapsed() > limit {
                return false;
            }
        }

        self.steps = next;
        true
    }

    #[inline]
    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Counters reported by the exact search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Steps charged against the budget.
    pub steps: u64,
    /// Decision levels abandoned after all their colors failed.
    pub backtracks: u64,
    /// Assignments rejected because forward checking emptied a domain.
    pub prunings: u64,
    /// Largest color count proven infeasible (0 if none was tried).
    pub refuted_up_to: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}
