//! Scheduler configuration record.

use serde::{Deserialize, Serialize};

use crate::coloring::{Algorithm, SearchBudget};
use crate::error::{Result, ScheduleError};
use crate::graph::ConflictPolicy;
use crate::models::SlotConfig;

/// Default number of slots grouped into one day.
pub const DEFAULT_MAX_SLOTS_PER_DAY: usize = 3;

/// Serializable scheduler settings.
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use u_contest::coloring::Algorithm;
/// use u_contest::scheduler::SchedulerConfig;
///
/// let config: SchedulerConfig = serde_json::from_str(r#"{
///     "algorithm": "backtracking",
///     "fallback": "dsatur",
///     "budget": { "max_steps": 5000 }
/// }"#).unwrap();
/// assert_eq!(config.algorithm, Algorithm::Backtracking);
/// assert_eq!(config.fallback, Some(Algorithm::DSatur));
/// assert_eq!(config.max_slots_per_day, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Coloring strategy.
    pub algorithm: Algorithm,
    /// Which contest pairs conflict.
    pub policy: ConflictPolicy,
    /// Exact-search budget.
    pub budget: SearchBudget,
    /// Scheduling window and slot length.
    pub slots: SlotConfig,
    /// Seed for the greedy visiting order.
    pub ordering_seed: Option<u64>,
    /// Strategy used when the primary one exhausts its budget.
    pub fallback: Option<Algorithm>,
    /// Slots per day in a day plan.
    pub max_slots_per_day: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            policy: ConflictPolicy::default(),
            budget: SearchBudget::default(),
            slots: SlotConfig::default(),
            ordering_seed: None,
            fallback: None,
            max_slots_per_day: DEFAULT_MAX_SLOTS_PER_DAY,
        }
    }
}

impl SchedulerConfig {
    /// Checks the slot geometry and day size.
    pub fn validate(&self) -> Result<()> {
        self.slots.validate()?;
        if self.max_slots_per_day == 0 {
            return Err(ScheduleError::config("max_slots_per_day must be at least 1"));
        }
        Ok(())
    }
}
