//! Conflict predicates.
//!
//! A conflict predicate decides whether two contests may not share a slot.
//! It is injected when a graph is built or extended; the graph itself
//! never hard-codes a policy.
//!
//! # Built-in policies
//!
//! | Policy | Edge when |
//! |--------|-----------|
//! | [`TimeOverlap`] | intervals overlap |
//! | [`OverlapWithSharedTag`] | intervals overlap AND a tag is shared |

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::models::Contest;

/// Decides whether two contests conflict.
///
/// Implementations must be symmetric (`conflicts(a, b) == conflicts(b, a)`)
/// and must not depend on anything but the two contests, otherwise the
/// graph's edge set would depend on insertion order.
pub trait ConflictPredicate: Send + Sync + Debug {
    /// Predicate name (e.g., "time_overlap").
    fn name(&self) -> &'static str;

    /// Whether `a` and `b` must be placed in different slots.
    fn conflicts(&self, a: &Contest, b: &Contest) -> bool;
}

/// Two contests conflict iff their time intervals overlap.
///
/// This is the default policy. "Overlap OR (overlap AND shared tag)"
/// reduces to plain overlap, so this also covers that formulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOverlap;

impl ConflictPredicate for TimeOverlap {
    fn name(&self) -> &'static str {
        "time_overlap"
    }

    fn conflicts(&self, a: &Contest, b: &Contest) -> bool {
        a.overlaps(b)
    }
}

/// Two contests conflict iff they overlap in time and share a tag.
///
/// Models audiences split by category: overlapping contests for
/// different audiences may run side by side.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapWithSharedTag;

impl ConflictPredicate for OverlapWithSharedTag {
    fn name(&self) -> &'static str {
        "overlap_with_shared_tag"
    }

    fn conflicts(&self, a: &Contest, b: &Contest) -> bool {
        a.overlaps(b) && a.shares_tag(b)
    }
}

/// Serializable selection of a built-in predicate, for configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// See [`TimeOverlap`].
    #[default]
    TimeOverlap,
    /// See [`OverlapWithSharedTag`].
    OverlapWithSharedTag,
}

impl ConflictPredicate for ConflictPolicy {
    fn name(&self) -> &'static str {
        match self {
            ConflictPolicy::TimeOverlap => TimeOverlap.name(),
            ConflictPolicy::OverlapWithSharedTag => OverlapWithSharedTag.name(),
        }
    }

    fn conflicts(&self, a: &Contest, b: &Contest) -> bool {
        match self {
            ConflictPolicy::TimeOverlap => TimeOverlap.conflicts(a, b),
            ConflictPolicy::OverlapWithSharedTag => OverlapWithSharedTag.conflicts(a, b),
        }
    }
}
