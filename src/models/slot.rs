//! Slot model.
//!
//! A slot is one of the fixed-length sub-intervals a scheduling window is
//! cut into. Slot `i` starts at `window_start + i * slot_duration`; the
//! last slot is clipped to the window end when the window is not an exact
//! multiple of the slot duration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{Color, TimeWindow};
use crate::error::{Result, ScheduleError};

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// A concrete time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Zero-based slot index within the window.
    pub index: usize,
    /// Slot interval.
    #[serde(flatten)]
    pub window: TimeWindow,
}

impl Slot {
    /// Slot start (ms).
    #[inline]
    pub fn start_ms(&self) -> i64 {
        self.window.start_ms
    }

    /// Slot end (ms, exclusive).
    #[inline]
    pub fn end_ms(&self) -> i64 {
        self.window.end_ms
    }
}

/// Geometry of the scheduling window.
///
/// # Example
/// ```
/// use u_contest::models::SlotConfig;
///
/// // Three days cut into 4-hour slots
/// let config = SlotConfig::new(0, 3 * 86_400_000, 4 * 3_600_000);
/// assert_eq!(config.slot_count(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Window start (ms).
    #[serde(default)]
    pub window_start_ms: i64,
    /// Window length (ms).
    pub window_ms: i64,
    /// Length of one slot (ms).
    pub slot_duration_ms: i64,
}

impl Default for SlotConfig {
    /// Three days of 8-hour slots, starting at the epoch.
    fn default() -> Self {
        Self::new(0, 3 * DAY_MS, 8 * HOUR_MS)
    }
}

impl SlotConfig {
    /// Creates a slot configuration.
    pub fn new(window_start_ms: i64, window_ms: i64, slot_duration_ms: i64) -> Self {
        Self {
            window_start_ms,
            window_ms,
            slot_duration_ms,
        }
    }

    /// Checks that the window and slot duration are positive and that the
    /// window end fits in an `i64`.
    pub fn validate(&self) -> Result<()> {
        if self.window_ms <= 0 {
            return Err(ScheduleError::config(format!(
                "time window must be positive, got {} ms",
                self.window_ms
            )));
        }
        if self.slot_duration_ms <= 0 {
            return Err(ScheduleError::config(format!(
                "slot duration must be positive, got {} ms",
                self.slot_duration_ms
            )));
        }
        if self.window_start_ms.checked_add(self.window_ms).is_none() {
            return Err(ScheduleError::config(format!(
                "time window starting at {} ms with length {} ms ends past the representable range",
                self.window_start_ms, self.window_ms
            )));
        }
        Ok(())
    }

    /// Number of slots: `ceil(window / slot_duration)`.
    ///
    /// Zero for an invalid configuration.
    pub fn slot_count(&self) -> usize {
        if self.window_ms <= 0 || self.slot_duration_ms <= 0 {
            return 0;
        }
        let whole = self.window_ms / self.slot_duration_ms;
        let count = whole + i64::from(self.window_ms % self.slot_duration_ms != 0);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// The whole scheduling window.
    ///
    /// The end saturates at `i64::MAX` for a configuration that fails
    /// [`validate`](Self::validate).
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(
            self.window_start_ms,
            self.window_start_ms.saturating_add(self.window_ms),
        )
    }

    /// The slot with the given index, or `None` past the window.
    pub fn slot(&self, index: usize) -> Option<Slot> {
        if index >= self.slot_count() {
            return None;
        }
        let offset = self.slot_duration_ms.checked_mul(i64::try_from(index).ok()?)?;
        let start = self.window_start_ms.checked_add(offset)?;
        let end = start
            .saturating_add(self.slot_duration_ms)
            .min(self.window().end_ms);
        Some(Slot {
            index,
            window: TimeWindow::new(start, end),
        })
    }
}

/// Color → slot index mapping for one scheduling run.
///
/// Distinct colors always map to distinct slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMap {
    slot_of_color: BTreeMap<Color, usize>,
}

impl SlotMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot index of a color.
    #[inline]
    pub fn get(&self, color: Color) -> Option<usize> {
        self.slot_of_color.get(&color).copied()
    }

    /// Maps `color` to `slot`. Returns `false` if either is already taken.
    pub(crate) fn insert(&mut self, color: Color, slot: usize) -> bool {
        if self.slot_of_color.contains_key(&color) || self.used_slots().contains(&slot) {
            return false;
        }
        self.slot_of_color.insert(color, slot);
        true
    }

    /// Number of mapped colors.
    pub fn len(&self) -> usize {
        self.slot_of_color.len()
    }

    /// Whether no color is mapped.
    pub fn is_empty(&self) -> bool {
        self.slot_of_color.is_empty()
    }

    /// Slot indices in use.
    pub fn used_slots(&self) -> BTreeSet<usize> {
        self.slot_of_color.values().copied().collect()
    }

    /// Lowest slot index below `slot_count` that no color uses.
    pub fn next_free_slot(&self, slot_count: usize) -> Option<usize> {
        let used = self.used_slots();
        (0..slot_count).find(|slot| !used.contains(slot))
    }

    /// Iterates `(color, slot)` pairs in color order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, usize)> + '_ {
        self.slot_of_color.iter().map(|(&c, &s)| (c, s))
    }
}
