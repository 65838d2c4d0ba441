//! Context and transition error types.

use crate::transition::{ActionName, StateName};
use thiserror::Error;

/// Why a [`Context`](crate::Context) is done.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContextError {
    /// The context was cancelled.
    #[error("context cancelled")]
    Cancelled,

    /// The context's deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// General-purpose error for [`EventProcessor`](crate::EventProcessor)
/// implementations.
///
/// Processors are free to use their own error type instead; the delegate
/// hands back whatever `action` returned.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TransitionError {
    /// The action ran and failed.
    #[error("Action failed: {action}, details: {details}")]
    ActionFailed {
        /// The action that failed.
        action: ActionName,
        /// Details about the failure.
        details: String,
    },

    /// The action refused to run for this pair of states.
    #[error("Action '{action}' rejected transition from '{from}' to '{to}': {reason}")]
    Rejected {
        /// The action that was rejected.
        action: ActionName,
        /// Source state.
        from: StateName,
        /// Destination state.
        to: StateName,
        /// Why it was rejected.
        reason: String,
    },

    /// The context finished before the action did.
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl TransitionError {
    /// Shorthand for [`TransitionError::ActionFailed`].
    pub fn action_failed(action: impl Into<ActionName>, details: impl Into<String>) -> Self {
        TransitionError::ActionFailed {
            action: action.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TransitionError::action_failed("charge", "card declined");
        assert_eq!(
            error.to_string(),
            "Action failed: charge, details: card declined"
        );

        let error = TransitionError::Rejected {
            action: ActionName::new("ship"),
            from: StateName::new("draft"),
            to: StateName::new("shipped"),
            reason: "not paid".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Action 'ship' rejected transition from 'draft' to 'shipped': not paid"
        );
    }

    #[test]
    fn test_context_error_conversion() {
        let error: TransitionError = ContextError::DeadlineExceeded.into();
        assert_eq!(error, TransitionError::Context(ContextError::DeadlineExceeded));
        assert_eq!(error.to_string(), "context deadline exceeded");
    }
}
