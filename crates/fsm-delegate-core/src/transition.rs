//! State and action names, and the per-transition descriptor.

use crate::args::Args;
use std::fmt;

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Creates a new name.
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

name_type!(
    /// Identifier of an FSM state.
    StateName
);

name_type!(
    /// Identifier of the action (event) that drives a transition.
    ActionName
);

/// Everything the engine knows about one transition attempt.
///
/// Built right before the transition runs and dropped once the delegate
/// returns.
///
/// # Examples
///
/// ```
/// use fsm_delegate_core::{args, TransitionRequest};
///
/// let request = TransitionRequest::new("start", "idle", "running").with_args(args![42, "job-7"]);
/// assert!(!request.is_self_transition());
/// assert_eq!(request.args.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    /// The action being performed.
    pub action: ActionName,
    /// The state the FSM is leaving.
    pub from: StateName,
    /// The state the FSM is entering.
    pub to: StateName,
    /// Arguments handed to every callback.
    pub args: Args,
}

impl TransitionRequest {
    /// Creates a request with no arguments.
    pub fn new(
        action: impl Into<ActionName>,
        from: impl Into<StateName>,
        to: impl Into<StateName>,
    ) -> Self {
        Self {
            action: action.into(),
            from: from.into(),
            to: to.into(),
            args: Args::new(),
        }
    }

    /// Replaces the arguments.
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    /// Returns `true` when source and destination are the same state.
    pub fn is_self_transition(&self) -> bool {
        self.from == self.to
    }
}
