//! Grouping of slots into days.
//!
//! The used slots are taken in ascending order and packed into
//! consecutive days of at most `max_slots_per_day` slots each. Unused slot
//! indices are skipped, so days never contain empty slots.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{ScheduleResult, Slot};

/// One day of a [`DayPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Zero-based day number.
    pub index: usize,
    /// Slot indices on this day, ascending.
    pub slots: Vec<usize>,
}

/// Slots of a schedule grouped into days.
///
/// # Example
/// ```
/// use u_contest::models::{Contest, SlotConfig};
/// use u_contest::scheduler::{ContestScheduler, DayPlan};
///
/// let contests: Vec<Contest> = (0..4)
///     .map(|i| Contest::new(format!("K{i}"), 0, 60))
///     .collect();
/// let result = ContestScheduler::new(SlotConfig::new(0, 1_000, 100))
///     .schedule(&contests)
///     .unwrap();
///
/// let plan = DayPlan::from_result(&result, 3).unwrap();
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.days()[1].slots, vec![3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    days: Vec<Day>,
}

impl DayPlan {
    /// Groups the slots used by `result`.
    ///
    /// # Errors
    /// `InvalidConfig` if `max_slots_per_day` is zero.
    pub fn from_result(result: &ScheduleResult, max_slots_per_day: usize) -> Result<Self> {
        if max_slots_per_day == 0 {
            return Err(ScheduleError::config("max_slots_per_day must be at least 1"));
        }

        let used: Vec<usize> = result.slot_map().used_slots().into_iter().collect();
        let days = used
            .chunks(max_slots_per_day)
            .enumerate()
            .map(|(index, slots)| Day {
                index,
                slots: slots.to_vec(),
            })
            .collect();

        Ok(Self { days })
    }

    /// Days in order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the plan has no days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Day holding `slot`.
    pub fn day_of_slot(&self, slot: usize) -> Option<usize> {
        self.days
            .iter()
            .find(|day| day.slots.contains(&slot))
            .map(|day| day.index)
    }

    /// Contest IDs per slot, grouped by day, with the concrete slot interval.
    pub fn contests_by_day<'a>(&self, result: &'a ScheduleResult) -> Vec<Vec<(Slot, Vec<&'a str>)>> {
        self.days
            .iter()
            .map(|day| {
                day.slots
                    .iter()
                    .filter_map(|&index| {
                        let slot = result.slot_config().slot(index)?;
                        Some((slot, result.contests_in_slot(index)))
                    })
                    .collect()
            })
            .collect()
    }
}
