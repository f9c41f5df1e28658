//! Contest prioritization.
//!
//! Derives a contest's priority from its platform and duration:
//!
//! ```text
//! priority = platform_weight × (1 + 1 / duration_hours)
//! ```
//!
//! Shorter contests on heavier platforms rank higher. The platform is the
//! first word of the contest name ([`Contest::platform`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Contest;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Platform name → weight table.
///
/// # Example
/// ```
/// use u_contest::models::Contest;
/// use u_contest::priority::{prioritize, PlatformWeights};
///
/// let contests = vec![
///     Contest::new("lc", 0, 7_200_000).with_name("LeetCode Weekly 400"),
///     Contest::new("cf", 0, 7_200_000).with_name("Codeforces Round 950"),
/// ];
/// let ranked = prioritize(contests, &PlatformWeights::default());
/// assert_eq!(ranked[0].id, "cf");
/// assert!((ranked[0].priority - 1.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformWeights {
    /// Weight per platform name (exact match).
    pub weights: BTreeMap<String, f64>,
    /// Weight for platforms not in the table.
    pub default_weight: f64,
}

impl Default for PlatformWeights {
    fn default() -> Self {
        let weights = [
            ("Codeforces", 1.0),
            ("LeetCode", 0.8),
            ("HackerRank", 0.7),
            ("Synthetic", 0.6),
        ]
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight))
        .collect();

        Self {
            weights,
            default_weight: 0.5,
        }
    }
}

impl PlatformWeights {
    /// Empty table where every platform gets `default_weight`.
    pub fn uniform(default_weight: f64) -> Self {
        Self {
            weights: BTreeMap::new(),
            default_weight,
        }
    }

    /// Adds or replaces a platform weight.
    pub fn with_weight(mut self, platform: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(platform.into(), weight);
        self
    }

    /// Weight of a platform.
    pub fn weight(&self, platform: &str) -> f64 {
        self.weights
            .get(platform)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Priority of one contest.
    ///
    /// Contests without a positive duration get the bare platform weight.
    pub fn priority_of(&self, contest: &Contest) -> f64 {
        let weight = self.weight(contest.platform());
        let hours = contest.duration_ms() as f64 / MS_PER_HOUR;
        if hours > 0.0 {
            weight * (1.0 + 1.0 / hours)
        } else {
            weight
        }
    }
}

/// Sets every contest's priority and sorts by priority descending, then
/// ID ascending.
pub fn prioritize(contests: Vec<Contest>, weights: &PlatformWeights) -> Vec<Contest> {
    let mut ranked: Vec<Contest> = contests
        .into_iter()
        .map(|contest| {
            let priority = weights.priority_of(&contest);
            contest.with_priority(priority)
        })
        .collect();
    ranked.sort_by(|a, b| a.precedence(b));
    ranked
}
