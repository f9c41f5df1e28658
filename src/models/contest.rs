//! Contest model.
//!
//! A contest is a fixed time interval competing for a scheduling slot.
//! Two contests that conflict (per the configured conflict predicate)
//! must never share a slot.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::TimeWindow;

/// A contest to be scheduled.
///
/// Immutable once it enters a conflict graph. The builder methods are
/// meant for preparing records before scheduling.
///
/// # Time Representation
/// All times are in milliseconds relative to a scheduling epoch (t=0).
/// The consumer defines what t=0 means (e.g., a Unix timestamp in ms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    /// Unique contest identifier.
    pub id: String,
    /// Human-readable name. The first word is treated as the platform.
    #[serde(default)]
    pub name: String,
    /// Start time (ms, inclusive).
    #[serde(rename = "start")]
    pub start_ms: i64,
    /// End time (ms, exclusive). Must be greater than `start_ms`.
    #[serde(rename = "end")]
    pub end_ms: i64,
    /// Scheduling priority (higher = more urgent).
    #[serde(default)]
    pub priority: f64,
    /// Category tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Contest {
    /// Creates a contest occupying `[start_ms, end_ms)`.
    pub fn new(id: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_ms,
            end_ms,
            priority: 0.0,
            tags: BTreeSet::new(),
        }
    }

    /// Sets the contest name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a category tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Adds several category tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Duration (ms), saturating at the `i64` range.
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// The contest's interval.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_ms, self.end_ms)
    }

    /// Whether the two contests' intervals overlap.
    pub fn overlaps(&self, other: &Contest) -> bool {
        self.window().overlaps(&other.window())
    }

    /// Whether the two contests share at least one tag.
    pub fn shares_tag(&self, other: &Contest) -> bool {
        self.tags.intersection(&other.tags).next().is_some()
    }

    /// Platform name: the first word of `name`, or `"Unknown"`.
    pub fn platform(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("Unknown")
    }

    /// Scheduling precedence: priority descending, then ID ascending.
    ///
    /// `Ordering::Less` means `self` should be placed first.
    pub fn precedence(&self, other: &Contest) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| self.id.cmp(&other.id))
    }
}
