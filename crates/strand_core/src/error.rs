//! # List Error Types
//!
//! All errors that can occur when operating on a [`ConcurrentList`](crate::ConcurrentList).

use thiserror::Error;

/// Errors that can occur in list operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// A supplied argument is out of its accepted domain (e.g. a negative index).
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required handle was the absent handle.
    #[error("required handle `{0}` is null")]
    NullArgument(&'static str),

    /// A handle was used against a list that did not issue it, or after its
    /// position was removed.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for list operations.
pub type ListResult<T> = Result<T, ListError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ListError::InvalidArgument {
            name: "index",
            reason: "must be non-negative, got -1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid argument `index`: must be non-negative, got -1"
        );
        assert_eq!(
            ListError::NullArgument("anchor").to_string(),
            "required handle `anchor` is null"
        );
    }
}
