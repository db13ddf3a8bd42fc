//! Error types for constraint declaration
//!
//! Every variant except `Solver` is a programmer error: an invalid call
//! sequence detected synchronously. None of them are retried.

use thiserror::Error;

use crate::solver::SolverError;
use crate::types::ItemId;

/// Errors that can occur while declaring or installing constraints
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A superview-relative operation on an item without a container
    #[error("item {item} has no container; add it to a superview before pinning it")]
    MissingContainer { item: ItemId },

    /// An attribute that does not exist for the requested combination or platform
    #[error("invalid attribute combination for '{attribute}': {reason}")]
    InvalidAttributeCombination { attribute: String, reason: String },

    /// An operation that needs a minimum number of inputs got fewer
    #[error("{operation} needs at least {required} input(s), got {found}")]
    EmptyInput {
        operation: &'static str,
        required: usize,
        found: usize,
    },

    /// A scoped operation invoked outside its scope, or an unbalanced pop
    #[error("{operation}: {reason}")]
    ScopeMisuse {
        operation: &'static str,
        reason: String,
    },

    /// The host solver rejected a constraint
    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),
}

impl LayoutError {
    pub fn missing_container(item: ItemId) -> Self {
        Self::MissingContainer { item }
    }

    pub fn invalid_combination(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttributeCombination {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub fn scope_misuse(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::ScopeMisuse {
            operation,
            reason: reason.into(),
        }
    }

    /// Fail with `EmptyInput` when `found < required`
    pub fn require_count(
        operation: &'static str,
        required: usize,
        found: usize,
    ) -> Result<(), Self> {
        if found < required {
            return Err(Self::EmptyInput {
                operation,
                required,
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_container_display() {
        let err = LayoutError::missing_container(ItemId(4));
        assert!(err.to_string().contains("#4"));
    }

    #[test]
    fn test_require_count() {
        assert!(LayoutError::require_count("align_views_to_edge", 2, 2).is_ok());
        let err = LayoutError::require_count("align_views_to_edge", 2, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "align_views_to_edge needs at least 2 input(s), got 1"
        );
    }

    #[test]
    fn test_solver_error_converts() {
        let err: LayoutError = SolverError::Internal("boom".to_string()).into();
        assert!(matches!(err, LayoutError::Solver(_)));
        assert!(err.to_string().contains("boom"));
    }
}
