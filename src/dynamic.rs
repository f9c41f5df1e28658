//! Incremental insertion of contests into a colored graph.
//!
//! When one contest arrives after a schedule has been committed, the
//! cheapest sound change is a local patch: reuse a color already in the
//! coloring that none of the new contest's neighbours hold. Only when
//! every existing color is blocked does the coloring grow by one color.
//! No existing contest changes color during a patch.
//!
//! A full recolor is opt-in ([`RecolorMode::Reoptimize`]); it may move
//! existing contests and is therefore never done silently.
//!
//! # Complexity
//! O(n) predicate evaluations plus O(deg · log k) for the color choice.

use std::collections::BTreeSet;

use crate::coloring::ColoringEngine;
use crate::error::{Result, ScheduleError};
use crate::graph::{ConflictGraph, ConflictPredicate, NodeIndex};
use crate::models::{Color, Coloring, Contest};
use crate::validation::validate_insert;

/// What happens to the rest of the coloring after an insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecolorMode {
    /// Patch the new node only.
    #[default]
    LocalPatch,
    /// Patch, then recolor the whole graph with `engine`.
    Reoptimize(ColoringEngine),
}

/// How the inserted contest got its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    /// An existing color was free among the neighbours.
    ReusedColor,
    /// Every existing color was blocked; a new one was introduced.
    NewColor,
    /// The whole graph was recolored after the patch.
    Recolored,
}

/// Result of [`DynamicUpdater::insert`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    /// Node index of the inserted contest.
    pub node: NodeIndex,
    /// Final color of the inserted contest.
    pub color: Color,
    /// How the color was chosen.
    pub kind: InsertKind,
    /// Failure of an opt-in recolor. The patched coloring was kept.
    pub recolor_error: Option<ScheduleError>,
}

/// Color choice for a contest that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPreview {
    /// Color the local patch would assign.
    pub color: Color,
    /// Whether that color is new to the coloring.
    pub introduces_color: bool,
    /// Existing nodes the contest would conflict with.
    pub neighbors: BTreeSet<NodeIndex>,
}

/// Inserts contests into a graph/coloring pair.
///
/// # Example
/// ```
/// use u_contest::dynamic::{DynamicUpdater, InsertKind};
/// use u_contest::coloring::{Algorithm, ColoringEngine};
/// use u_contest::graph::{ConflictGraph, TimeOverlap};
/// use u_contest::models::Contest;
///
/// let contests = vec![
///     Contest::new("A", 0, 60),
///     Contest::new("B", 30, 90),
///     Contest::new("C", 100, 160),
/// ];
/// let mut graph = ConflictGraph::build(&contests, &TimeOverlap).unwrap();
/// let mut coloring = ColoringEngine::new(Algorithm::Greedy).color(&graph).unwrap();
///
/// let outcome = DynamicUpdater::new()
///     .insert(&mut graph, &mut coloring, Contest::new("D", 50, 120), &TimeOverlap)
///     .unwrap();
/// assert_eq!(outcome.kind, InsertKind::NewColor);
/// assert_eq!(coloring.width(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicUpdater {
    mode: RecolorMode,
}

impl DynamicUpdater {
    /// Local-patch updater.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recolor mode.
    pub fn with_mode(mut self, mode: RecolorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Recolor mode.
    pub fn mode(&self) -> &RecolorMode {
        &self.mode
    }

    /// Computes the patch color for `contest` without touching anything.
    ///
    /// # Errors
    /// `InvalidContest` if the interval is malformed or the ID is taken.
    pub fn preview(
        &self,
        graph: &ConflictGraph,
        coloring: &Coloring,
        contest: &Contest,
        predicate: &dyn ConflictPredicate,
    ) -> Result<InsertPreview> {
        validate_insert(graph, contest)?;
        let neighbors = graph.conflicts_with(contest, predicate);
        let (color, introduces_color) = patch_color(coloring, &neighbors);
        Ok(InsertPreview {
            color,
            introduces_color,
            neighbors,
        })
    }

    /// Adds `contest` to `graph` and gives it a color in `coloring`.
    ///
    /// On error both `graph` and `coloring` are unchanged. After success the
    /// coloring is proper over the updated graph.
    ///
    /// # Errors
    /// `InvalidContest` if the interval is malformed or the ID is taken.
    /// A failed opt-in recolor is not an error; see
    /// [`InsertOutcome::recolor_error`].
    pub fn insert(
        &self,
        graph: &mut ConflictGraph,
        coloring: &mut Coloring,
        contest: Contest,
        predicate: &dyn ConflictPredicate,
    ) -> Result<InsertOutcome> {
        if coloring.len() != graph.node_count() {
            return Err(ScheduleError::IncompleteColoring {
                colored: coloring.len(),
                nodes: graph.node_count(),
            });
        }

        let id = contest.id.clone();
        let node = graph.add_node(contest, predicate)?;
        let (color, introduced) = patch_color(coloring, graph.neighbor_indices(node));
        coloring.push(color);

        let kind = if introduced {
            InsertKind::NewColor
        } else {
            InsertKind::ReusedColor
        };

        log::debug!(
            "inserted '{}' with {} conflicts: color {} ({:?})",
            id,
            graph.degree_of(node),
            color,
            kind
        );

        let RecolorMode::Reoptimize(engine) = &self.mode else {
            return Ok(InsertOutcome {
                node,
                color,
                kind,
                recolor_error: None,
            });
        };

        match engine.color(graph) {
            Ok(recolored) => {
                let color = recolored.get(node).unwrap_or(color);
                *coloring = recolored;
                Ok(InsertOutcome {
                    node,
                    color,
                    kind: InsertKind::Recolored,
                    recolor_error: None,
                })
            }
            Err(err) => {
                log::warn!("recolor after inserting '{}' failed, keeping patch: {}", id, err);
                Ok(InsertOutcome {
                    node,
                    color,
                    kind,
                    recolor_error: Some(err),
                })
            }
        }
    }
}

/// Smallest color present in `coloring` that no neighbour holds, or the
/// smallest absent index. The flag is `true` for a new color.
fn patch_color(coloring: &Coloring, neighbors: &BTreeSet<NodeIndex>) -> (Color, bool) {
    let blocked: BTreeSet<Color> = neighbors.iter().filter_map(|&n| coloring.get(n)).collect();
    let palette = coloring.palette();

    if let Some(&color) = palette.iter().find(|color| !blocked.contains(color)) {
        return (color, false);
    }

    let fresh = (0..).find(|color| !palette.contains(color)).unwrap_or(palette.len());
    (fresh, true)
}
