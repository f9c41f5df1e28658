//! Error types for contest scheduling.
//!
//! Every failure is returned to the caller as a [`ScheduleError`] value.
//! The core never retries on its own: choosing a different algorithm, a
//! larger search budget or a wider time window is the caller's decision.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Unified error type for graph construction, coloring and slot assignment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Malformed interval, empty identifier or duplicate identifier.
    #[error("invalid contest input: {}", join_messages(.0))]
    InvalidContest(Vec<ValidationError>),

    /// Backtracking ran out of budget before a k-coloring was found or refuted.
    #[error("exact search exhausted its budget after {steps} steps while trying {colors} colors")]
    UnsolvableWithinBudget {
        /// Search steps taken across all k.
        steps: u64,
        /// Color count that was being attempted when the budget ran out.
        colors: usize,
    },

    /// More colors than the configured window has slots.
    #[error("coloring needs {required} slots but the time window only holds {available}")]
    CapacityExceeded {
        /// Slots needed (coloring width).
        required: usize,
        /// Slots available in the window.
        available: usize,
    },

    /// Zero contests were supplied.
    ///
    /// `ContestScheduler::schedule` answers empty input with an empty
    /// schedule and reports this through `ScheduleResult::notice`.
    #[error("no contests supplied")]
    EmptyInput,

    /// Slot window or duration is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A contest identifier is not part of the graph.
    #[error("unknown contest '{0}'")]
    UnknownContest(String),

    /// A strategy produced two adjacent nodes with the same color.
    #[error("coloring is not proper: '{first}' and '{second}' conflict but share a color")]
    ImproperColoring {
        /// First contest of the offending edge.
        first: String,
        /// Second contest of the offending edge.
        second: String,
    },

    /// A coloring does not cover exactly the nodes of its graph.
    #[error("coloring covers {colored} contests but the graph has {nodes}")]
    IncompleteColoring {
        /// Entries in the coloring.
        colored: usize,
        /// Nodes in the graph.
        nodes: usize,
    },
}

impl ScheduleError {
    /// Creates an invalid-contest error from a single validation problem.
    pub fn invalid_contest(error: ValidationError) -> Self {
        ScheduleError::InvalidContest(vec![error])
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ScheduleError::InvalidConfig(message.into())
    }

    /// Whether the caller can reasonably retry with different parameters.
    ///
    /// Budget exhaustion calls for a heuristic algorithm or a bigger budget;
    /// capacity problems call for a wider window or fewer contests.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScheduleError::UnsolvableWithinBudget { .. } | ScheduleError::CapacityExceeded { .. }
        )
    }

    /// Whether this is the empty-input notice rather than a real failure.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, ScheduleError::EmptyInput)
    }
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ScheduleError::InvalidContest(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_recoverable_classification() {
        assert!(ScheduleError::UnsolvableWithinBudget { steps: 10, colors: 3 }.is_recoverable());
        assert!(ScheduleError::CapacityExceeded {
            required: 4,
            available: 3
        }
        .is_recoverable());
        assert!(!ScheduleError::EmptyInput.is_recoverable());
        assert!(!ScheduleError::config("bad").is_recoverable());
    }

    #[test]
    fn test_invalid_contest_message_lists_all_problems() {
        let err = ScheduleError::from(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate contest ID: A"),
            ValidationError::new(ValidationErrorKind::InvalidInterval, "Contest 'B' ends before it starts"),
        ]);
        let text = err.to_string();
        assert!(text.contains("Duplicate contest ID: A"));
        assert!(text.contains("Contest 'B' ends before it starts"));
    }

    #[test]
    fn test_capacity_message() {
        let err = ScheduleError::CapacityExceeded {
            required: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "coloring needs 5 slots but the time window only holds 3"
        );
    }

    #[test]
    fn test_empty_input_flag() {
        assert!(ScheduleError::EmptyInput.is_empty_input());
        assert!(!ScheduleError::UnknownContest("X".into()).is_empty_input());
    }
}
