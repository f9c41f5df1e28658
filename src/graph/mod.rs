//! Conflict graph and conflict predicates.
//!
//! Contests become nodes; a pluggable [`ConflictPredicate`] decides which
//! pairs become edges. Coloring the resulting graph properly yields a
//! conflict-free slot assignment.

mod conflict_graph;
mod predicate;

pub use conflict_graph::{ConflictGraph, NodeIndex};
pub use predicate::{ConflictPolicy, ConflictPredicate, OverlapWithSharedTag, TimeOverlap};
