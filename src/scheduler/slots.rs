//! Color → slot assignment.
//!
//! # Algorithm
//! 1. Rank each color class by its highest-priority member (priority
//!    descending, then contest ID ascending).
//! 2. Map the ranked classes to slots 0, 1, 2, … in that order.
//!
//! Higher-priority contests therefore land in earlier slots, and the
//! mapping is a bijection between the colors in use and a prefix of the
//! window's slots.
//!
//! Classes are not ranked by their average priority. A class holding one
//! urgent contest and several unimportant ones still goes first. Ranking
//! by the top member also makes the order total: two distinct classes
//! never tie, because their top members have distinct IDs.

use crate::error::{Result, ScheduleError};
use crate::graph::ConflictGraph;
use crate::models::{Color, Coloring, Contest, SlotConfig, SlotMap};

/// Maps colors to concrete slots within a bounded window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotAssigner;

impl SlotAssigner {
    /// Assigns every color of `coloring` to a distinct slot.
    ///
    /// # Errors
    /// - `InvalidConfig` for a non-positive window or slot duration.
    /// - `CapacityExceeded` if the coloring needs more slots than the
    ///   window holds.
    ///
    /// # Example
    /// ```
    /// use u_contest::graph::{ConflictGraph, TimeOverlap};
    /// use u_contest::models::{Coloring, Contest, SlotConfig};
    /// use u_contest::scheduler::SlotAssigner;
    ///
    /// let contests = vec![
    ///     Contest::new("A", 0, 60).with_priority(1.0),
    ///     Contest::new("B", 30, 90).with_priority(5.0),
    /// ];
    /// let graph = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
    /// let coloring = Coloring::from_colors(vec![0, 1]);
    ///
    /// let slots = SlotAssigner::assign(&graph, &coloring, &SlotConfig::new(0, 1000, 100)).unwrap();
    /// // B has the higher priority, so its color gets the first slot
    /// assert_eq!(slots.get(1), Some(0));
    /// assert_eq!(slots.get(0), Some(1));
    /// ```
    pub fn assign(
        graph: &ConflictGraph,
        coloring: &Coloring,
        config: &SlotConfig,
    ) -> Result<SlotMap> {
        config.validate()?;
        Self::check_capacity(coloring.width(), config)?;

        let mut ranked: Vec<(Color, &Contest)> = coloring
            .classes()
            .into_iter()
            .filter_map(|(color, members)| {
                members
                    .iter()
                    .filter_map(|&node| graph.contest(node))
                    .min_by(|a, b| a.precedence(b))
                    .map(|top| (color, top))
            })
            .collect();
        ranked.sort_by(|a, b| a.1.precedence(b.1).then_with(|| a.0.cmp(&b.0)));

        let mut map = SlotMap::new();
        for (slot, (color, _)) in ranked.into_iter().enumerate() {
            map.insert(color, slot);
        }

        log::debug!(
            "assigned {} colors to slots ({} available)",
            map.len(),
            config.slot_count()
        );

        Ok(map)
    }

    /// Gives `color` the lowest unused slot unless it already has one.
    ///
    /// Existing mappings never change.
    ///
    /// # Errors
    /// `CapacityExceeded` if every slot is taken.
    pub fn extend(map: &mut SlotMap, color: Color, config: &SlotConfig) -> Result<usize> {
        if let Some(slot) = map.get(color) {
            return Ok(slot);
        }

        let available = config.slot_count();
        let slot = map
            .next_free_slot(available)
            .ok_or(ScheduleError::CapacityExceeded {
                required: map.len() + 1,
                available,
            })?;
        map.insert(color, slot);
        Ok(slot)
    }

    /// Fails when `width` colors do not fit into the window.
    pub fn check_capacity(width: usize, config: &SlotConfig) -> Result<()> {
        let available = config.slot_count();
        if width > available {
            log::warn!(
                "coloring needs {} slots but the window only holds {}",
                width,
                available
            );
            return Err(ScheduleError::CapacityExceeded {
                required: width,
                available,
            });
        }
        Ok(())
    }
}
