//! Input validation for contest scheduling.
//!
//! Checks structural integrity of contests before they enter a conflict
//! graph. Detects:
//! - Empty identifiers
//! - Duplicate identifiers (within the input, or against an existing graph)
//! - Malformed intervals (end ≤ start)
//!
//! All problems are collected, not just the first one, so the caller can
//! fix an input batch in a single pass.

use std::collections::HashSet;

use thiserror::Error;

use crate::graph::ConflictGraph;
use crate::models::Contest;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two contests share the same ID.
    DuplicateId,
    /// A contest has an empty ID.
    EmptyId,
    /// A contest ends at or before its start.
    InvalidInterval,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a batch of contests for graph construction.
///
/// Checks:
/// 1. No empty IDs
/// 2. No duplicate IDs
/// 3. Every interval satisfies end > start
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_contests(contests: &[Contest]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for contest in contests {
        errors.extend(check_contest(contest));
        if !contest.id.is_empty() && !ids.insert(contest.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate contest ID: {}", contest.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a single contest about to be inserted into an existing graph.
pub fn validate_insert(graph: &ConflictGraph, contest: &Contest) -> ValidationResult {
    let mut errors = check_contest(contest);

    if graph.contains(&contest.id) {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateId,
            format!("Contest ID already scheduled: {}", contest.id),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_contest(contest: &Contest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if contest.id.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyId,
            format!(
                "Contest with empty ID (start {}, end {})",
                contest.start_ms, contest.end_ms
            ),
        ));
    }

    if contest.end_ms <= contest.start_ms {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidInterval,
            format!(
                "Contest '{}' ends at {} which is not after its start {}",
                contest.id, contest.end_ms, contest.start_ms
            ),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TimeOverlap;

    fn sample_contests() -> Vec<Contest> {
        vec![
            Contest::new("A", 0, 60),
            Contest::new("B", 30, 90),
            Contest::new("C", 100, 160),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_contests(&sample_contests()).is_ok());
    }

    #[test]
    fn test_empty_batch_is_structurally_valid() {
        assert!(validate_contests(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_id() {
        let contests = vec![Contest::new("A", 0, 60), Contest::new("A", 100, 160)];
        let errors = validate_contests(&contests).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
    }

    #[test]
    fn test_zero_length_interval() {
        let contests = vec![Contest::new("A", 60, 60)];
        let errors = validate_contests(&contests).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidInterval);
    }

    #[test]
    fn test_reversed_interval() {
        let contests = vec![Contest::new("A", 90, 30)];
        let errors = validate_contests(&contests).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidInterval));
    }

    #[test]
    fn test_empty_id() {
        let contests = vec![Contest::new("", 0, 10)];
        let errors = validate_contests(&contests).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyId));
    }

    #[test]
    fn test_multiple_errors() {
        let contests = vec![
            Contest::new("A", 0, 60),
            Contest::new("A", 10, 5),
            Contest::new("", 0, 10),
        ];
        let errors = validate_contests(&contests).unwrap_err();
        // Interval of the second A, its duplicate ID, and the empty ID
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_insert_duplicate_against_graph() {
        let graph = ConflictGraph::build(&sample_contests(), &TimeOverlap).unwrap();
        let errors = validate_insert(&graph, &Contest::new("B", 500, 600)).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
        assert!(validate_insert(&graph, &Contest::new("D", 500, 600)).is_ok());
    }
}
