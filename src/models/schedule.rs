//! Schedule (solution) model.
//!
//! A schedule is the conflict graph of one run together with its proper
//! coloring and the color → slot mapping. Per-contest records are derived
//! from those three on demand, so they can never drift apart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Color, Coloring, Slot, SlotConfig, SlotMap};
use crate::coloring::Algorithm;
use crate::error::{Result, ScheduleError};
use crate::graph::ConflictGraph;

/// Outcome category of a scheduling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Contests were colored and placed into slots.
    #[default]
    Scheduled,
    /// No contests were supplied; the schedule is empty.
    EmptyInput,
}

/// A complete schedule.
///
/// Deserialization checks the same properties as [`is_consistent`]
/// and fails instead of producing an inconsistent schedule.
///
/// [`is_consistent`]: ScheduleResult::is_consistent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRecord", into = "ScheduleRecord")]
pub struct ScheduleResult {
    pub(crate) graph: ConflictGraph,
    pub(crate) coloring: Coloring,
    pub(crate) slots: SlotMap,
    pub(crate) slot_config: SlotConfig,
    pub(crate) algorithm: Option<Algorithm>,
    pub(crate) status: ScheduleStatus,
}

/// Serialized form of [`ScheduleResult`].
#[derive(Serialize, Deserialize)]
struct ScheduleRecord {
    graph: ConflictGraph,
    coloring: Coloring,
    slots: SlotMap,
    slot_config: SlotConfig,
    algorithm: Option<Algorithm>,
    status: ScheduleStatus,
}

impl From<ScheduleResult> for ScheduleRecord {
    fn from(result: ScheduleResult) -> Self {
        Self {
            graph: result.graph,
            coloring: result.coloring,
            slots: result.slots,
            slot_config: result.slot_config,
            algorithm: result.algorithm,
            status: result.status,
        }
    }
}

impl TryFrom<ScheduleRecord> for ScheduleResult {
    type Error = ScheduleError;

    fn try_from(record: ScheduleRecord) -> Result<Self> {
        record.slot_config.validate()?;
        record.coloring.verify(&record.graph)?;

        if record.status == ScheduleStatus::EmptyInput && !record.graph.is_empty() {
            return Err(ScheduleError::config(format!(
                "empty-input schedule carries {} contests",
                record.graph.node_count()
            )));
        }

        let slot_count = record.slot_config.slot_count();
        for color in record.coloring.palette() {
            match record.slots.get(color) {
                None => {
                    return Err(ScheduleError::config(format!("color {} has no slot", color)));
                }
                Some(slot) if slot >= slot_count => {
                    return Err(ScheduleError::config(format!(
                        "color {} maps to slot {} but the window holds {}",
                        color, slot, slot_count
                    )));
                }
                Some(_) => {}
            }
        }
        if record.slots.used_slots().len() != record.slots.len() {
            return Err(ScheduleError::config("two colors share a slot"));
        }

        Ok(Self {
            graph: record.graph,
            coloring: record.coloring,
            slots: record.slots,
            slot_config: record.slot_config,
            algorithm: record.algorithm,
            status: record.status,
        })
    }
}

/// One contest placed into a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledContest {
    /// Contest identifier.
    pub id: String,
    /// Contest start (ms).
    pub start: i64,
    /// Contest end (ms).
    pub end: i64,
    /// Contest priority.
    pub priority: f64,
    /// Contest tags.
    pub tags: BTreeSet<String>,
    /// Abstract color.
    pub color: Color,
    /// Slot index.
    pub slot: usize,
}

impl ScheduleResult {
    pub(crate) fn new(
        graph: ConflictGraph,
        coloring: Coloring,
        slots: SlotMap,
        slot_config: SlotConfig,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            graph,
            coloring,
            slots,
            slot_config,
            algorithm: Some(algorithm),
            status: ScheduleStatus::Scheduled,
        }
    }

    /// The empty schedule returned for empty input.
    pub fn empty(slot_config: SlotConfig) -> Self {
        Self {
            graph: ConflictGraph::new(),
            coloring: Coloring::new(),
            slots: SlotMap::new(),
            slot_config,
            algorithm: None,
            status: ScheduleStatus::EmptyInput,
        }
    }

    /// Conflict graph of this run.
    pub fn graph(&self) -> &ConflictGraph {
        &self.graph
    }

    /// Coloring of the graph.
    pub fn coloring(&self) -> &Coloring {
        &self.coloring
    }

    /// Color → slot mapping.
    pub fn slot_map(&self) -> &SlotMap {
        &self.slots
    }

    /// Slot geometry.
    pub fn slot_config(&self) -> &SlotConfig {
        &self.slot_config
    }

    /// Strategy that produced the current coloring. `None` for empty input.
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    /// Run status.
    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    /// Non-fatal condition the caller may want to log.
    pub fn notice(&self) -> Option<ScheduleError> {
        match self.status {
            ScheduleStatus::EmptyInput => Some(ScheduleError::EmptyInput),
            ScheduleStatus::Scheduled => None,
        }
    }

    /// Number of scheduled contests.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether nothing was scheduled.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Number of distinct colors (= slots in use).
    pub fn width(&self) -> usize {
        self.coloring.width()
    }

    /// Color of a contest.
    pub fn color_of(&self, id: &str) -> Option<Color> {
        self.coloring.color_of(&self.graph, id)
    }

    /// Slot index of a contest.
    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.color_of(id).and_then(|color| self.slots.get(color))
    }

    /// Concrete slot interval of a contest.
    pub fn slot_window_of(&self, id: &str) -> Option<Slot> {
        self.slot_of(id).and_then(|index| self.slot_config.slot(index))
    }

    /// Per-contest records in insertion order.
    pub fn entries(&self) -> Vec<ScheduledContest> {
        self.coloring
            .iter()
            .filter_map(|(node, color)| {
                let contest = self.graph.contest(node)?;
                let slot = self.slots.get(color)?;
                Some(ScheduledContest {
                    id: contest.id.clone(),
                    start: contest.start_ms,
                    end: contest.end_ms,
                    priority: contest.priority,
                    tags: contest.tags.clone(),
                    color,
                    slot,
                })
            })
            .collect()
    }

    /// IDs placed into `slot`, in insertion order.
    pub fn contests_in_slot(&self, slot: usize) -> Vec<&str> {
        self.coloring
            .iter()
            .filter(|&(_, color)| self.slots.get(color) == Some(slot))
            .map(|(node, _)| self.graph.id(node))
            .collect()
    }

    /// Whether the coloring is proper, covers every node, and every color
    /// has a slot inside the window.
    pub fn is_consistent(&self) -> bool {
        let slot_count = self.slot_config.slot_count();
        self.coloring.len() == self.graph.node_count()
            && self.coloring.is_proper(&self.graph)
            && self
                .coloring
                .palette()
                .into_iter()
                .all(|color| self.slots.get(color).is_some_and(|slot| slot < slot_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TimeOverlap;
    use crate::models::Contest;

    fn sample_result() -> ScheduleResult {
        let contests = vec![
            Contest::new("A", 0, 60).with_priority(2.0),
            Contest::new("B", 30, 90).with_tag("div1"),
            Contest::new("C", 100, 160),
        ];
        let graph = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
        let coloring = Coloring::from_colors(vec![0, 1, 0]);
        let mut slots = SlotMap::new();
        slots.insert(0, 0);
        slots.insert(1, 1);
        ScheduleResult::new(
            graph,
            coloring,
            slots,
            SlotConfig::new(0, 300, 100),
            Algorithm::Greedy,
        )
    }

    #[test]
    fn test_entries() {
        let result = sample_result();
        let entries = result.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].id, "B");
        assert_eq!(entries[1].slot, 1);
        assert!(entries[1].tags.contains("div1"));
        assert_eq!(entries[0].priority, 2.0);
    }

    #[test]
    fn test_slot_lookups() {
        let result = sample_result();
        assert_eq!(result.slot_of("C"), Some(0));
        assert_eq!(result.slot_of("Z"), None);
        assert_eq!(result.contests_in_slot(0), vec!["A", "C"]);
        let slot = result.slot_window_of("B").unwrap();
        assert_eq!((slot.start_ms(), slot.end_ms()), (100, 200));
        assert!(result.is_consistent());
    }

    #[test]
    fn test_empty_notice() {
        let result = ScheduleResult::empty(SlotConfig::new(0, 300, 100));
        assert_eq!(result.status(), ScheduleStatus::EmptyInput);
        assert_eq!(result.notice(), Some(ScheduleError::EmptyInput));
        assert!(result.entries().is_empty());
        assert_eq!(result.algorithm(), None);
        assert!(result.is_consistent());
        assert!(sample_result().notice().is_none());
    }

    #[test]
    fn test_entry_serialization_field_names() {
        let json = serde_json::to_value(&sample_result().entries()[0]).unwrap();
        for field in ["id", "start", "end", "priority", "tags", "color", "slot"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let back: ScheduleResult = serde_json::from_str(&json).unwrap();
        assert!(back.is_consistent());
        assert_eq!(back.entries(), result.entries());
        assert_eq!(back.algorithm(), Some(Algorithm::Greedy));
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> serde_json::Result<ScheduleResult> {
        let mut value = serde_json::to_value(sample_result()).unwrap();
        edit(&mut value);
        serde_json::from_value(value)
    }

    #[test]
    fn test_deserialize_rejects_broken_graph() {
        // Self-loop on C
        let err = tampered(|v| v["graph"]["adjacency"] = serde_json::json!([[1], [0], [2]]));
        assert!(err.is_err());
    }

    #[test]
    fn test_deserialize_rejects_improper_coloring() {
        assert!(tampered(|v| v["coloring"]["colors"] = serde_json::json!([0, 0, 0])).is_err());
    }

    #[test]
    fn test_deserialize_rejects_short_coloring() {
        assert!(tampered(|v| v["coloring"]["colors"] = serde_json::json!([0, 1])).is_err());
    }

    #[test]
    fn test_deserialize_rejects_slot_outside_window() {
        let err = tampered(|v| v["slots"]["slot_of_color"]["1"] = serde_json::json!(3));
        assert!(err.is_err());
    }

    #[test]
    fn test_deserialize_rejects_shared_slot() {
        let err = tampered(|v| v["slots"]["slot_of_color"]["1"] = serde_json::json!(0));
        assert!(err.is_err());
    }

    #[test]
    fn test_deserialize_rejects_invalid_slot_config() {
        assert!(tampered(|v| v["slot_config"]["slot_duration_ms"] = serde_json::json!(0)).is_err());
    }

    #[test]
    fn test_deserialize_empty_schedule() {
        let json = serde_json::to_string(&ScheduleResult::empty(SlotConfig::new(0, 300, 100))).unwrap();
        let back: ScheduleResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status(), ScheduleStatus::EmptyInput);
        assert!(back.is_empty());
    }
}
