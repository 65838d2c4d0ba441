//! Default exit/action/enter strategy.

use crate::config::DelegateConfig;
use async_trait::async_trait;
use fsm_delegate_core::{
    ActionName, Args, Context, Delegate, EventProcessor, StateName, TransitionPhase,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Splits every transition into exit, action and enter callbacks on one
/// [`EventProcessor`].
///
/// For a call with `from != to`:
///
/// 1. `on_exit(from)`
/// 2. `action(..)`
/// 3. on `Ok`: `on_enter(to)`; on `Err(e)`: `on_action_failure(.., &e)`
///
/// Self-transitions (`from == to`) run only the action and, if it failed,
/// `on_action_failure`. The action's error is returned as is.
///
/// Callbacks are awaited one after another in the caller's task. The
/// delegate keeps no state between calls and never looks at the context
/// itself.
///
/// # Examples
///
/// ```rust
/// use fsm_delegate::prelude::*;
/// use async_trait::async_trait;
///
/// struct Quiet;
///
/// #[async_trait]
/// impl EventProcessor for Quiet {
///     type Error = TransitionError;
///
///     async fn on_exit(&self, _: &Context, _: &StateName, _: &Args) {}
///
///     async fn action(
///         &self,
///         _: &Context,
///         action: &ActionName,
///         _: &StateName,
///         _: &StateName,
///         _: &Args,
///     ) -> Result<(), TransitionError> {
///         if action == "explode" {
///             return Err(TransitionError::action_failed(action.clone(), "boom"));
///         }
///         Ok(())
///     }
///
///     async fn on_action_failure(
///         &self,
///         _: &Context,
///         _: &ActionName,
///         _: &StateName,
///         _: &StateName,
///         _: &Args,
///         _: &TransitionError,
///     ) {
///     }
///
///     async fn on_enter(&self, _: &Context, _: &StateName, _: &Args) {}
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let delegate = DefaultDelegate::from_processor(Quiet);
/// let ctx = Context::new();
///
/// let ok = TransitionRequest::new("start", "idle", "running");
/// assert!(delegate.handle_transition(&ctx, &ok).await.is_ok());
///
/// let failing = TransitionRequest::new("explode", "running", "stopped");
/// assert!(delegate.handle_transition(&ctx, &failing).await.is_err());
/// # }
/// ```
pub struct DefaultDelegate<P: EventProcessor + ?Sized> {
    processor: Arc<P>,
    config: DelegateConfig,
}

impl<P: EventProcessor + ?Sized> fmt::Debug for DefaultDelegate<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultDelegate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: EventProcessor + ?Sized> Clone for DefaultDelegate<P> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
            config: self.config.clone(),
        }
    }
}

impl<P: EventProcessor> DefaultDelegate<P> {
    /// Creates a delegate that takes sole ownership of `processor`.
    pub fn from_processor(processor: P) -> Self {
        Self::new(Arc::new(processor))
    }
}

impl<P: EventProcessor + ?Sized> DefaultDelegate<P> {
    /// Creates a delegate over a shared processor with the default config.
    pub fn new(processor: Arc<P>) -> Self {
        Self::with_config(processor, DelegateConfig::default())
    }

    /// Creates a delegate over a shared processor.
    pub fn with_config(processor: Arc<P>, config: DelegateConfig) -> Self {
        Self { processor, config }
    }

    /// Returns the processor this delegate calls.
    pub fn processor(&self) -> &Arc<P> {
        &self.processor
    }

    /// Returns the delegate's configuration.
    pub fn config(&self) -> &DelegateConfig {
        &self.config
    }

    fn trace_phase(
        &self,
        phase: TransitionPhase,
        action: &ActionName,
        from: &StateName,
        to: &StateName,
        args: &Args,
    ) {
        if !self.config.trace_phases {
            return;
        }
        debug!(
            delegate = %self.config.name,
            %phase,
            %action,
            %from,
            %to,
            args = self.config.log_args.then(|| args.len()),
            "Invoking {}",
            phase
        );
    }
}

#[async_trait]
impl<P: EventProcessor + ?Sized> Delegate for DefaultDelegate<P> {
    type Error = P::Error;

    async fn handle_event(
        &self,
        ctx: &Context,
        action: &ActionName,
        from: &StateName,
        to: &StateName,
        args: &Args,
    ) -> Result<(), P::Error> {
        let changes_state = from != to;

        if changes_state {
            self.trace_phase(TransitionPhase::OnExit, action, from, to, args);
            self.processor.on_exit(ctx, from, args).await;
        }

        self.trace_phase(TransitionPhase::Action, action, from, to, args);
        if let Err(err) = self.processor.action(ctx, action, from, to, args).await {
            if self.config.log_failures {
                warn!(
                    delegate = %self.config.name,
                    %action,
                    %from,
                    %to,
                    error = %err,
                    "Action '{}' failed",
                    action
                );
            }
            self.trace_phase(TransitionPhase::OnActionFailure, action, from, to, args);
            self.processor
                .on_action_failure(ctx, action, from, to, args, &err)
                .await;
            return Err(err);
        }

        if changes_state {
            self.trace_phase(TransitionPhase::OnEnter, action, from, to, args);
            self.processor.on_enter(ctx, to, args).await;
        }

        debug!(
            delegate = %self.config.name,
            %action,
            %from,
            %to,
            "Transition completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsm_delegate_core::TransitionError;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        phases: Mutex<Vec<TransitionPhase>>,
    }

    impl Recorder {
        fn record(&self, phase: TransitionPhase) {
            if let Ok(mut phases) = self.phases.lock() {
                phases.push(phase);
            }
        }

        fn phases(&self) -> Vec<TransitionPhase> {
            self.phases.lock().map(|p| p.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl EventProcessor for Recorder {
        type Error = TransitionError;

        async fn on_exit(&self, _ctx: &Context, _from: &StateName, _args: &Args) {
            self.record(TransitionPhase::OnExit);
        }

        async fn action(
            &self,
            _ctx: &Context,
            action: &ActionName,
            _from: &StateName,
            _to: &StateName,
            _args: &Args,
        ) -> Result<(), TransitionError> {
            self.record(TransitionPhase::Action);
            if action == "fail" {
                return Err(TransitionError::action_failed(action.clone(), "Intentional failure"));
            }
            Ok(())
        }

        async fn on_action_failure(
            &self,
            _ctx: &Context,
            _action: &ActionName,
            _from: &StateName,
            _to: &StateName,
            _args: &Args,
            _err: &TransitionError,
        ) {
            self.record(TransitionPhase::OnActionFailure);
        }

        async fn on_enter(&self, _ctx: &Context, _to: &StateName, _args: &Args) {
            self.record(TransitionPhase::OnEnter);
        }
    }

    async fn run(
        delegate: &DefaultDelegate<Recorder>,
        action: &str,
        from: &str,
        to: &str,
    ) -> Result<(), TransitionError> {
        delegate
            .handle_event(
                &Context::new(),
                &ActionName::new(action),
                &StateName::new(from),
                &StateName::new(to),
                &Args::new(),
            )
            .await
    }

    #[tokio::test]
    async fn test_state_change_success() {
        let delegate = DefaultDelegate::from_processor(Recorder::default());
        assert!(run(&delegate, "start", "idle", "running").await.is_ok());
        assert_eq!(
            delegate.processor().phases(),
            vec![
                TransitionPhase::OnExit,
                TransitionPhase::Action,
                TransitionPhase::OnEnter
            ]
        );
    }

    #[tokio::test]
    async fn test_state_change_failure() {
        let delegate = DefaultDelegate::from_processor(Recorder::default());
        let result = run(&delegate, "fail", "running", "stopped").await;
        assert!(matches!(
            result,
            Err(TransitionError::ActionFailed { ref action, .. }) if action == "fail"
        ));
        assert_eq!(
            delegate.processor().phases(),
            vec![
                TransitionPhase::OnExit,
                TransitionPhase::Action,
                TransitionPhase::OnActionFailure
            ]
        );
    }

    #[tokio::test]
    async fn test_self_transition_skips_exit_and_enter() {
        let delegate = DefaultDelegate::from_processor(Recorder::default());
        assert!(run(&delegate, "tick", "running", "running").await.is_ok());
        assert!(run(&delegate, "fail", "running", "running").await.is_err());
        assert_eq!(
            delegate.processor().phases(),
            vec![
                TransitionPhase::Action,
                TransitionPhase::Action,
                TransitionPhase::OnActionFailure
            ]
        );
    }

    #[tokio::test]
    async fn test_quiet_config_keeps_ordering() {
        let config = DelegateConfig::default()
            .trace_phases(false)
            .log_failures(false);
        let delegate = DefaultDelegate::with_config(Arc::new(Recorder::default()), config);
        assert!(run(&delegate, "fail", "a", "b").await.is_err());
        assert_eq!(
            delegate.processor().phases(),
            vec![
                TransitionPhase::OnExit,
                TransitionPhase::Action,
                TransitionPhase::OnActionFailure
            ]
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if let Ok(mut out) = self.0.lock() {
                out.extend_from_slice(buf);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            self.0
                .lock()
                .map(|out| String::from_utf8_lossy(&out).into_owned())
                .unwrap_or_default()
        }
    }

    fn logged_run(config: DelegateConfig) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let delegate = DefaultDelegate::with_config(Arc::new(Recorder::default()), config);
        tracing::subscriber::with_default(subscriber, || {
            let result = tokio_test::block_on(delegate.handle_event(
                &Context::new(),
                &ActionName::new("start"),
                &StateName::new("idle"),
                &StateName::new("running"),
                &fsm_delegate_core::args![1, "two"],
            ));
            assert!(result.is_ok());
        });
        logs.text()
    }

    #[test]
    fn test_log_args_records_count() {
        let text = logged_run(DelegateConfig::default().with_name("door").log_args(true));
        assert!(text.contains("Invoking on_exit"));
        assert!(text.contains("Invoking on_enter"));
        assert!(text.contains("delegate=door"));
        assert!(text.contains("args=2"));
    }

    #[test]
    fn test_args_count_omitted_by_default() {
        let text = logged_run(DelegateConfig::default());
        assert!(text.contains("Invoking action"));
        assert!(!text.contains("args="));
    }

    #[test]
    fn test_trace_phases_off_keeps_completion_event() {
        let text = logged_run(DelegateConfig::default().trace_phases(false));
        assert!(!text.contains("Invoking"));
        assert!(text.contains("Transition completed"));
    }

    #[tokio::test]
    async fn test_clone_shares_processor() {
        let delegate = DefaultDelegate::from_processor(Recorder::default());
        let cloned = delegate.clone();
        assert!(run(&cloned, "start", "idle", "running").await.is_ok());
        assert!(Arc::ptr_eq(delegate.processor(), cloned.processor()));
        assert_eq!(delegate.processor().phases().len(), 3);
    }
}
