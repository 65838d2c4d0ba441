//! The callback contract user code implements to react to transitions.

use crate::args::Args;
use crate::context::Context;
use crate::transition::{ActionName, StateName};
use async_trait::async_trait;
use std::fmt;

/// The four callbacks a single transition can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Leaving the source state.
    OnExit,
    /// Performing the transition's action.
    Action,
    /// Reacting to a failed action.
    OnActionFailure,
    /// Entering the destination state.
    OnEnter,
}

impl fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionPhase::OnExit => write!(f, "on_exit"),
            TransitionPhase::Action => write!(f, "action"),
            TransitionPhase::OnActionFailure => write!(f, "on_action_failure"),
            TransitionPhase::OnEnter => write!(f, "on_enter"),
        }
    }
}

/// Reacts to the phases of a transition.
///
/// Only [`action`](EventProcessor::action) can fail. The other three are
/// notifications: there is no channel to report a problem from them, so an
/// implementation deals with its own failures there (log, compensate, ...).
///
/// The delegate never checks the context between calls. Implementations that
/// care about cancellation or deadlines look at `ctx` themselves.
///
/// One processor may be shared by many delegates and called from many tasks
/// at once; any state it mutates must be synchronized by the implementation.
///
/// # Examples
///
/// ```
/// use fsm_delegate_core::{
///     ActionName, Args, Context, EventProcessor, StateName, TransitionError,
/// };
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct Door;
///
/// #[async_trait]
/// impl EventProcessor for Door {
///     type Error = TransitionError;
///
///     async fn on_exit(&self, _ctx: &Context, from: &StateName, _args: &Args) {
///         println!("leaving {from}");
///     }
///
///     async fn action(
///         &self,
///         ctx: &Context,
///         action: &ActionName,
///         _from: &StateName,
///         _to: &StateName,
///         _args: &Args,
///     ) -> Result<(), TransitionError> {
///         if let Some(err) = ctx.err() {
///             return Err(err.into());
///         }
///         println!("performing {action}");
///         Ok(())
///     }
///
///     async fn on_action_failure(
///         &self,
///         _ctx: &Context,
///         action: &ActionName,
///         _from: &StateName,
///         _to: &StateName,
///         _args: &Args,
///         err: &TransitionError,
///     ) {
///         eprintln!("{action} failed: {err}");
///     }
///
///     async fn on_enter(&self, _ctx: &Context, to: &StateName, _args: &Args) {
///         println!("entered {to}");
///     }
/// }
/// ```
#[async_trait]
pub trait EventProcessor: Send + Sync {
    /// Error returned by [`action`](EventProcessor::action).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called when leaving `from`. Skipped for self-transitions.
    async fn on_exit(&self, ctx: &Context, from: &StateName, args: &Args);

    /// Performs the transition's effect.
    ///
    /// An `Err` here fails the whole transition; the delegate returns it
    /// to the engine unchanged.
    async fn action(
        &self,
        ctx: &Context,
        action: &ActionName,
        from: &StateName,
        to: &StateName,
        args: &Args,
    ) -> Result<(), Self::Error>;

    /// Called with the error when [`action`](EventProcessor::action) fails.
    async fn on_action_failure(
        &self,
        ctx: &Context,
        action: &ActionName,
        from: &StateName,
        to: &StateName,
        args: &Args,
        err: &Self::Error,
    );

    /// Called after entering `to`. Skipped for self-transitions and
    /// whenever the action failed.
    async fn on_enter(&self, ctx: &Context, to: &StateName, args: &Args);
}
