//! The contract an FSM engine calls once per transition.

use crate::args::Args;
use crate::context::Context;
use crate::transition::{ActionName, StateName, TransitionRequest};
use async_trait::async_trait;

/// Handles a transition on behalf of the engine.
///
/// An `Err` means the transition failed and the engine must stay in
/// `from`. On `Ok` the engine is free to commit `to`.
#[async_trait]
pub trait Delegate: Send + Sync {
    /// Error surfaced to the engine.
    type Error: Send + Sync;

    /// Handles one transition.
    async fn handle_event(
        &self,
        ctx: &Context,
        action: &ActionName,
        from: &StateName,
        to: &StateName,
        args: &Args,
    ) -> Result<(), Self::Error>;

    /// Handles the transition described by `request`.
    async fn handle_transition(
        &self,
        ctx: &Context,
        request: &TransitionRequest,
    ) -> Result<(), Self::Error> {
        self.handle_event(ctx, &request.action, &request.from, &request.to, &request.args)
            .await
    }
}
