//! Transition callbacks for finite-state-machine engines.
//!
//! An FSM engine hands each transition to a [`Delegate`]. The
//! [`DefaultDelegate`] splits it into three callbacks on a user-supplied
//! [`EventProcessor`]: leave the old state, perform the action, enter the
//! new state. A failed action skips the enter step, goes to
//! `on_action_failure` instead, and comes back to the engine unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! use fsm_delegate::prelude::*;
//!
//! let delegate = DefaultDelegate::from_processor(MyProcessor);
//! let ctx = Context::new();
//!
//! match delegate.handle_event(&ctx, &action, &current, &next, &args![order_id]).await {
//!     Ok(()) => current = next,
//!     Err(err) => eprintln!("staying in {current}: {err}"),
//! }
//! ```

mod config;
mod delegate;

// Re-export core types
pub use fsm_delegate_core::*;

pub use config::DelegateConfig;
pub use delegate::DefaultDelegate;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        args, ActionName, Arg, Args, Context, ContextError, ContextKey, DefaultDelegate,
        Delegate, DelegateConfig, EventProcessor, StateName, TransitionError, TransitionPhase,
        TransitionRequest,
    };
}
