//! Contest scheduler: the external entry point.
//!
//! # Algorithm
//!
//! 1. Build the conflict graph with the configured predicate.
//! 2. Color it with the configured strategy (falling back to a second
//!    strategy if the first one exhausts its budget and a fallback is set).
//! 3. Map colors to slots by priority.
//!
//! Later arrivals go through [`ContestScheduler::update`], which patches the
//! existing schedule without moving any committed contest. A full recolor
//! only happens on an explicit [`ContestScheduler::reoptimize`].

use std::sync::Arc;

use super::{DayPlan, SchedulerConfig, SlotAssigner, DEFAULT_MAX_SLOTS_PER_DAY};
use crate::coloring::{Algorithm, ColoringEngine, SearchBudget};
use crate::dynamic::{DynamicUpdater, InsertKind};
use crate::error::{Result, ScheduleError};
use crate::graph::{ConflictGraph, ConflictPolicy, ConflictPredicate, TimeOverlap};
use crate::models::{Color, Coloring, Contest, ScheduleResult, ScheduleStatus, SlotConfig};

/// Outcome of [`ContestScheduler::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Inserted contest.
    pub id: String,
    /// Color given to it.
    pub color: Color,
    /// Slot given to it.
    pub slot: usize,
    /// Whether the schedule needed one more slot.
    pub introduced_color: bool,
    /// Number of committed contests it conflicts with.
    pub conflicts: usize,
}

/// Schedules contests into slots.
///
/// # Example
/// ```
/// use u_contest::coloring::Algorithm;
/// use u_contest::models::{Contest, SlotConfig};
/// use u_contest::scheduler::ContestScheduler;
///
/// let contests = vec![
///     Contest::new("A", 0, 60),
///     Contest::new("B", 30, 90),
///     Contest::new("C", 100, 160),
/// ];
///
/// let scheduler = ContestScheduler::new(SlotConfig::new(0, 600, 100))
///     .with_algorithm(Algorithm::DSatur);
/// let mut result = scheduler.schedule(&contests).unwrap();
/// assert_eq!(result.width(), 2);
/// assert_ne!(result.slot_of("A"), result.slot_of("B"));
///
/// let report = scheduler.update(&mut result, Contest::new("D", 50, 120)).unwrap();
/// assert!(report.introduced_color);
/// assert_eq!(result.width(), 3);
/// ```
#[derive(Clone)]
pub struct ContestScheduler {
    slot_config: SlotConfig,
    engine: ColoringEngine,
    predicate: Arc<dyn ConflictPredicate>,
    fallback: Option<Algorithm>,
    max_slots_per_day: usize,
}

impl ContestScheduler {
    /// Creates a scheduler with DSatur and pure time-overlap conflicts.
    pub fn new(slot_config: SlotConfig) -> Self {
        Self {
            slot_config,
            engine: ColoringEngine::default(),
            predicate: Arc::new(TimeOverlap),
            fallback: None,
            max_slots_per_day: DEFAULT_MAX_SLOTS_PER_DAY,
        }
    }

    /// Builds a scheduler from a configuration record.
    ///
    /// # Errors
    /// `InvalidConfig` if the slot geometry or day size is unusable.
    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        config.validate()?;

        let mut engine = ColoringEngine::new(config.algorithm).with_budget(config.budget);
        if let Some(seed) = config.ordering_seed {
            engine = engine.with_seed(seed);
        }

        Ok(Self {
            slot_config: config.slots,
            engine,
            predicate: Arc::new(config.policy),
            fallback: config.fallback,
            max_slots_per_day: config.max_slots_per_day,
        })
    }

    /// Sets the coloring strategy, keeping seed and budget.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.engine = self.engine_for(algorithm);
        self
    }

    /// Sets a custom conflict predicate.
    pub fn with_predicate<P: ConflictPredicate + 'static>(mut self, predicate: P) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Selects a built-in conflict predicate.
    pub fn with_policy(self, policy: ConflictPolicy) -> Self {
        self.with_predicate(policy)
    }

    /// Sets the exact-search budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.engine = self.engine.with_budget(budget);
        self
    }

    /// Seeds the greedy visiting order.
    pub fn with_ordering_seed(mut self, seed: u64) -> Self {
        self.engine = self.engine.with_seed(seed);
        self
    }

    /// Strategy to use when the primary one exhausts its budget.
    pub fn with_fallback(mut self, fallback: Algorithm) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Slots per day for [`ContestScheduler::day_plan`].
    pub fn with_max_slots_per_day(mut self, max_slots_per_day: usize) -> Self {
        self.max_slots_per_day = max_slots_per_day;
        self
    }

    /// Configured coloring engine.
    pub fn engine(&self) -> &ColoringEngine {
        &self.engine
    }

    /// Configured slot geometry.
    pub fn slot_config(&self) -> &SlotConfig {
        &self.slot_config
    }

    /// Configured conflict predicate.
    pub fn predicate(&self) -> &dyn ConflictPredicate {
        self.predicate.as_ref()
    }

    /// Schedules `contests`.
    ///
    /// Empty input is not an error: the result is empty and its
    /// [`ScheduleResult::notice`] reports `EmptyInput`.
    ///
    /// # Errors
    /// - `InvalidConfig` for an unusable slot geometry.
    /// - `InvalidContest` for malformed or duplicate contests.
    /// - `UnsolvableWithinBudget` if exact search ran out and no fallback
    ///   is set.
    /// - `CapacityExceeded` if the coloring needs more slots than exist.
    pub fn schedule(&self, contests: &[Contest]) -> Result<ScheduleResult> {
        self.slot_config.validate()?;

        if contests.is_empty() {
            log::info!("no contests to schedule");
            return Ok(ScheduleResult::empty(self.slot_config));
        }

        let graph = ConflictGraph::build(contests, self.predicate.as_ref())?;
        let (coloring, algorithm) = self.color(&graph)?;
        let slots = SlotAssigner::assign(&graph, &coloring, &self.slot_config)?;

        log::info!(
            "scheduled {} contests into {} of {} slots ({})",
            graph.node_count(),
            slots.len(),
            self.slot_config.slot_count(),
            algorithm
        );

        Ok(ScheduleResult::new(
            graph,
            coloring,
            slots,
            self.slot_config,
            algorithm,
        ))
    }

    /// Adds one contest to a committed schedule.
    ///
    /// Committed contests keep their colors and slots. If the newcomer
    /// needs a new color, that color takes the lowest free slot.
    ///
    /// # Errors
    /// - `InvalidContest` for a malformed interval or a taken ID.
    /// - `CapacityExceeded` if a new slot is needed and none is free.
    ///
    /// `previous` is unchanged on error.
    pub fn update(&self, previous: &mut ScheduleResult, contest: Contest) -> Result<UpdateReport> {
        let config = previous.slot_config;
        config.validate()?;

        let updater = DynamicUpdater::new();
        let preview = updater.preview(
            &previous.graph,
            &previous.coloring,
            &contest,
            self.predicate.as_ref(),
        )?;

        if preview.introduces_color && previous.slots.get(preview.color).is_none() {
            let available = config.slot_count();
            if previous.slots.next_free_slot(available).is_none() {
                log::warn!(
                    "cannot add '{}': all {} slots are taken",
                    contest.id,
                    available
                );
                return Err(ScheduleError::CapacityExceeded {
                    required: previous.width() + 1,
                    available,
                });
            }
        }

        let id = contest.id.clone();
        let outcome = updater.insert(
            &mut previous.graph,
            &mut previous.coloring,
            contest,
            self.predicate.as_ref(),
        )?;
        let slot = SlotAssigner::extend(&mut previous.slots, outcome.color, &config)?;

        if previous.status == ScheduleStatus::EmptyInput {
            previous.status = ScheduleStatus::Scheduled;
            previous.algorithm = Some(self.engine.algorithm());
        }

        log::info!("added '{}' to slot {} (color {})", id, slot, outcome.color);

        Ok(UpdateReport {
            id,
            color: outcome.color,
            slot,
            introduced_color: outcome.kind == InsertKind::NewColor,
            conflicts: preview.neighbors.len(),
        })
    }

    /// Recolors the whole schedule and reassigns every slot.
    ///
    /// Committed contests may move. `previous` is only replaced on success.
    pub fn reoptimize(&self, previous: &mut ScheduleResult) -> Result<()> {
        if previous.is_empty() {
            return Ok(());
        }

        let width_before = previous.width();
        let (coloring, algorithm) = self.color(&previous.graph)?;
        let slots = SlotAssigner::assign(&previous.graph, &coloring, &previous.slot_config)?;

        log::info!(
            "reoptimized {} contests: width {} -> {}",
            previous.len(),
            width_before,
            coloring.width()
        );

        previous.coloring = coloring;
        previous.slots = slots;
        previous.algorithm = Some(algorithm);
        Ok(())
    }

    /// Groups the used slots of `result` into days.
    pub fn day_plan(&self, result: &ScheduleResult) -> Result<DayPlan> {
        DayPlan::from_result(result, self.max_slots_per_day)
    }

    fn color(&self, graph: &ConflictGraph) -> Result<(Coloring, Algorithm)> {
        match self.engine.color(graph) {
            Ok(coloring) => Ok((coloring, self.engine.algorithm())),
            Err(err @ ScheduleError::UnsolvableWithinBudget { .. }) => {
                let Some(fallback) = self.fallback else {
                    return Err(err);
                };
                log::warn!("{}; falling back to {}", err, fallback);
                Ok((self.engine_for(fallback).color(graph)?, fallback))
            }
            Err(err) => Err(err),
        }
    }

    /// Engine for `algorithm` sharing this scheduler's seed and budget.
    fn engine_for(&self, algorithm: Algorithm) -> ColoringEngine {
        let mut engine = ColoringEngine::new(algorithm).with_budget(*self.engine.budget());
        if let Some(seed) = self.engine.ordering_seed() {
            engine = engine.with_seed(seed);
        }
        engine
    }
}

impl Default for ContestScheduler {
    fn default() -> Self {
        Self::new(SlotConfig::default())
    }
}

impl std::fmt::Debug for ContestScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContestScheduler")
            .field("slot_config", &self.slot_config)
            .field("engine", &self.engine)
            .field("predicate", &self.predicate.name())
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OverlapWithSharedTag;

    fn sample() -> Vec<Contest> {
        vec![
            Contest::new("A", 0, 60),
            Contest::new("B", 30, 90),
            Contest::new("C", 100, 160),
        ]
    }

    fn scheduler() -> ContestScheduler {
        ContestScheduler::new(SlotConfig::new(0, 300, 100))
    }

    #[test]
    fn test_schedule_sample() {
        let result = scheduler().with_algorithm(Algorithm::Greedy).schedule(&sample()).unwrap();
        assert_eq!(result.status(), ScheduleStatus::Scheduled);
        assert_eq!(result.algorithm(), Some(Algorithm::Greedy));
        assert_eq!(result.color_of("A"), Some(0));
        assert_eq!(result.color_of("B"), Some(1));
        assert_eq!(result.color_of("C"), Some(0));
        // Class {A, C} outranks {B} on ID
        assert_eq!(result.slot_of("A"), Some(0));
        assert_eq!(result.slot_of("B"), Some(1));
        assert!(result.is_consistent());
    }

    #[test]
    fn test_empty_input() {
        let result = scheduler().schedule(&[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.status(), ScheduleStatus::EmptyInput);
        assert_eq!(result.notice(), Some(ScheduleError::EmptyInput));
    }

    #[test]
    fn test_invalid_slot_config() {
        let err = ContestScheduler::new(SlotConfig::new(0, 0, 10))
            .schedule(&sample())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));
    }

    #[test]
    fn test_capacity_exceeded() {
        let err = ContestScheduler::new(SlotConfig::new(0, 100, 100))
            .schedule(&sample())
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::CapacityExceeded {
                required: 2,
                available: 1
            }
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_policy_changes_width() {
        let contests = vec![
            Contest::new("A", 0, 60).with_tag("div1"),
            Contest::new("B", 30, 90).with_tag("div2"),
        ];
        let overlap = scheduler().schedule(&contests).unwrap();
        let tagged = scheduler()
            .with_predicate(OverlapWithSharedTag)
            .schedule(&contests)
            .unwrap();
        assert_eq!(overlap.width(), 2);
        assert_eq!(tagged.width(), 1);
    }

    #[test]
    fn test_update_reuses_slot() {
        let s = scheduler();
        let mut result = s.schedule(&sample()).unwrap();
        let before: Vec<_> = result.entries();
        let report = s.update(&mut result, Contest::new("E", 120, 200)).unwrap();
        assert!(!report.introduced_color);
        assert_eq!(report.conflicts, 1);
        assert_eq!(result.width(), 2);
        // Committed contests did not move
        assert_eq!(&result.entries()[..3], &before[..]);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_update_takes_lowest_free_slot() {
        let s = scheduler();
        let mut result = s.schedule(&sample()).unwrap();
        let report = s.update(&mut result, Contest::new("D", 50, 120)).unwrap();
        assert!(report.introduced_color);
        assert_eq!(report.slot, 2);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_update_capacity_checked_before_mutation() {
        let s = ContestScheduler::new(SlotConfig::new(0, 200, 100));
        let mut result = s.schedule(&sample()).unwrap();
        let err = s.update(&mut result, Contest::new("D", 50, 120)).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::CapacityExceeded {
                required: 3,
                available: 2
            }
        );
        assert_eq!(result.len(), 3);
        assert!(result.graph().node_index("D").is_none());
        assert!(result.is_consistent());
    }

    #[test]
    fn test_update_rejects_duplicate() {
        let s = scheduler();
        let mut result = s.schedule(&sample()).unwrap();
        let err = s.update(&mut result, Contest::new("A", 0, 10)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidContest(_)));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_update_empty_schedule() {
        let s = scheduler();
        let mut result = s.schedule(&[]).unwrap();
        let report = s.update(&mut result, Contest::new("A", 0, 10)).unwrap();
        assert_eq!(report.slot, 0);
        assert_eq!(result.status(), ScheduleStatus::Scheduled);
        assert!(result.notice().is_none());
    }

    #[test]
    fn test_fallback_on_budget_exhaustion() {
        let contests: Vec<Contest> = (0..5).map(|i| Contest::new(format!("K{i}"), 0, 10)).collect();
        let s = ContestScheduler::new(SlotConfig::new(0, 1000, 100))
            .with_algorithm(Algorithm::Backtracking)
            .with_budget(SearchBudget::steps(2));

        let err = s.schedule(&contests).unwrap_err();
        assert!(matches!(err, ScheduleError::UnsolvableWithinBudget { .. }));

        let result = s.with_fallback(Algorithm::DSatur).schedule(&contests).unwrap();
        assert_eq!(result.algorithm(), Some(Algorithm::DSatur));
        assert_eq!(result.width(), 5);
    }

    #[test]
    fn test_reoptimize() {
        // X1..X4 form a path; greedy in this order needs 3 colors
        let contests = vec![
            Contest::new("X1", 0, 20),
            Contest::new("X4", 60, 80),
            Contest::new("X2", 15, 40),
            Contest::new("X3", 35, 65),
        ];
        let greedy = ContestScheduler::new(SlotConfig::new(0, 1000, 100))
            .with_algorithm(Algorithm::Greedy);
        let mut result = greedy.schedule(&contests).unwrap();
        assert_eq!(result.width(), 3);

        greedy
            .clone()
            .with_algorithm(Algorithm::Backtracking)
            .reoptimize(&mut result)
            .unwrap();
        assert_eq!(result.width(), 2);
        assert_eq!(result.algorithm(), Some(Algorithm::Backtracking));
        assert!(result.is_consistent());
    }

    #[test]
    fn test_reoptimize_failure_keeps_previous() {
        let contests: Vec<Contest> = (0..5).map(|i| Contest::new(format!("K{i}"), 0, 10)).collect();
        let s = ContestScheduler::new(SlotConfig::new(0, 1000, 100));
        let mut result = s.schedule(&contests).unwrap();
        let before = result.entries();

        let exact = s
            .clone()
            .with_algorithm(Algorithm::Backtracking)
            .with_budget(SearchBudget::steps(1));
        assert!(exact.reoptimize(&mut result).is_err());
        assert_eq!(result.entries(), before);
    }

    #[test]
    fn test_from_config() {
        let config: SchedulerConfig = serde_json::from_str(
            r#"{"algorithm":"welsh_powell","slots":{"window_ms":300,"slot_duration_ms":100}}"#,
        )
        .unwrap();
        let s = ContestScheduler::from_config(&config).unwrap();
        assert_eq!(s.engine().algorithm(), Algorithm::WelshPowell);
        assert_eq!(s.slot_config().slot_count(), 3);
        assert_eq!(s.predicate().name(), "time_overlap");
        assert!(s.schedule(&sample()).is_ok());
    }

    #[test]
    fn test_deterministic_serialization() {
        let s = scheduler().with_algorithm(Algorithm::Greedy).with_ordering_seed(5);
        let a = serde_json::to_string(&s.schedule(&sample()).unwrap().entries()).unwrap();
        let b = serde_json::to_string(&s.schedule(&sample()).unwrap().entries()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_whole_result_serializes_identically() {
        let contests: Vec<Contest> = (0..12)
            .map(|i| Contest::new(format!("R{i:02}"), i * 15, i * 15 + 40).with_priority(i as f64))
            .collect();
        let s = ContestScheduler::new(SlotConfig::new(0, 1_000, 100)).with_algorithm(Algorithm::DSatur);

        let a = serde_json::to_string(&s.schedule(&contests).unwrap()).unwrap();
        let b = serde_json::to_string(&s.schedule(&contests).unwrap()).unwrap();
        assert_eq!(a, b);

        let mut back: ScheduleResult = serde_json::from_str(&a).unwrap();
        assert!(back.is_consistent());
        assert_eq!(back.slot_of("R05"), s.schedule(&contests).unwrap().slot_of("R05"));

        let report = s.update(&mut back, Contest::new("late", 5_000, 5_100)).unwrap();
        assert!(!report.introduced_color);
        assert!(back.is_consistent());
    }

    #[test]
    fn test_truncated_record_rejected_before_update() {
        let result = scheduler().schedule(&sample()).unwrap();
        let mut value = serde_json::to_value(&result).unwrap();
        value["graph"]["adjacency"] = serde_json::json!([[1]]);
        assert!(serde_json::from_value::<ScheduleResult>(value).is_err());
    }

    #[test]
    fn test_schedule_at_end_of_time_range() {
        let start = i64::MAX - 1_000;
        let contests = vec![
            Contest::new("A", i64::MAX - 300, i64::MAX - 100),
            Contest::new("B", i64::MAX - 200, i64::MAX),
            Contest::new("C", start, start + 100),
        ];
        let s = ContestScheduler::new(SlotConfig::new(start, 1_000, 100));
        let result = s.schedule(&contests).unwrap();

        assert_eq!(result.width(), 2);
        assert_ne!(result.slot_of("A"), result.slot_of("B"));
        for id in ["A", "B", "C"] {
            let slot = result.slot_window_of(id).unwrap();
            assert_eq!(slot.start_ms(), start + 100 * slot.index as i64);
            assert_eq!(slot.end_ms() - slot.start_ms(), 100);
        }
        assert_eq!(s.slot_config().slot(9).unwrap().end_ms(), i64::MAX);
    }

    #[test]
    fn test_window_past_time_range_rejected() {
        let s = ContestScheduler::new(SlotConfig::new(i64::MAX - 50, 100, 10));
        let err = s.schedule(&sample()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_shows_predicate_name() {
        let debug = format!("{:?}", scheduler());
        assert!(debug.contains("time_overlap"));
    }
}
