//! Core traits and types for the fsm-delegate transition callbacks.
//!
//! This crate holds the contracts and per-call data, with no logging.
//! Engines and processor authors depend on it directly; the runtime crate
//! `fsm-delegate` adds the default exit/action/enter strategy.
//!
//! # Core Types
//!
//! - [`EventProcessor`] - Callbacks for exit, action, action failure and enter
//! - [`Delegate`] - What the engine calls once per transition
//! - [`Context`] - Cancellation, deadline and values threaded through every call
//! - [`Args`] / [`Arg`] - Ordered, heterogeneous transition arguments
//! - [`TransitionRequest`] - One transition attempt, as a value
//! - [`TransitionError`] - Ready-made error for processors

mod args;
mod context;
mod delegate;
mod error;
mod processor;
mod transition;

pub use args::{Arg, Args};
pub use context::{Context, ContextKey};
pub use delegate::Delegate;
pub use error::{ContextError, TransitionError};
pub use processor::{EventProcessor, TransitionPhase};
pub use transition::{ActionName, StateName, TransitionRequest};

// Re-exported so processor implementations can name the token type.
pub use tokio_util::sync::CancellationToken;
