//! A coin-operated turnstile driven by a tiny engine loop.
//!
//! The engine owns the current state and the transition table; the delegate
//! runs the callbacks and decides whether the engine may move on.

use async_trait::async_trait;
use fsm_delegate::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Default)]
struct Turnstile {
    coins: AtomicU64,
    passages: AtomicU64,
}

#[async_trait]
impl EventProcessor for Turnstile {
    type Error = TransitionError;

    async fn on_exit(&self, _ctx: &Context, from: &StateName, _args: &Args) {
        info!("Leaving {}", from);
    }

    async fn action(
        &self,
        _ctx: &Context,
        action: &ActionName,
        from: &StateName,
        to: &StateName,
        args: &Args,
    ) -> Result<(), TransitionError> {
        match action.as_str() {
            "coin" => {
                let cents = args.get(0).and_then(Arg::as_int).unwrap_or(0);
                if cents < 50 {
                    return Err(TransitionError::Rejected {
                        action: action.clone(),
                        from: from.clone(),
                        to: to.clone(),
                        reason: format!("{cents} cents is not enough"),
                    });
                }
                self.coins.fetch_add(1, Ordering::SeqCst);
            }
            "push" if from == "unlocked" => {
                self.passages.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
        Ok(())
    }

    async fn on_action_failure(
        &self,
        _ctx: &Context,
        action: &ActionName,
        _from: &StateName,
        _to: &StateName,
        _args: &Args,
        err: &TransitionError,
    ) {
        info!("Refunding after failed {}: {}", action, err);
    }

    async fn on_enter(&self, _ctx: &Context, to: &StateName, _args: &Args) {
        info!("Entered {}", to);
    }
}

/// Minimal engine: looks up the destination and commits it only on success.
struct Engine<D: Delegate> {
    current: StateName,
    table: HashMap<(StateName, ActionName), StateName>,
    delegate: D,
}

impl<D: Delegate<Error = TransitionError>> Engine<D> {
    async fn fire(&mut self, ctx: &Context, action: &str, args: Args) -> Result<(), TransitionError> {
        let action = ActionName::new(action);
        let Some(to) = self
            .table
            .get(&(self.current.clone(), action.clone()))
            .cloned()
        else {
            println!("'{}' is not allowed in {}", action, self.current);
            return Ok(());
        };

        self.delegate
            .handle_event(ctx, &action, &self.current, &to, &args)
            .await?;
        self.current = to;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let locked = StateName::new("locked");
    let unlocked = StateName::new("unlocked");

    let mut table = HashMap::new();
    table.insert((locked.clone(), ActionName::new("coin")), unlocked.clone());
    table.insert((locked.clone(), ActionName::new("push")), locked.clone());
    table.insert((unlocked.clone(), ActionName::new("coin")), unlocked.clone());
    table.insert((unlocked.clone(), ActionName::new("push")), locked.clone());

    let config = DelegateConfig::default().with_name("turnstile").log_args(true);
    let delegate = DefaultDelegate::with_config(std::sync::Arc::new(Turnstile::default()), config);

    let mut engine = Engine {
        current: locked,
        table,
        delegate,
    };

    let ctx = Context::new();
    let script: Vec<(&str, Args)> = vec![
        ("push", args![]),
        ("coin", args![20]),
        ("coin", args![50]),
        ("push", args![]),
    ];

    for (action, args) in script {
        match engine.fire(&ctx, action, args).await {
            Ok(()) => println!("{} -> now {}", action, engine.current),
            Err(err) => println!("{} failed, still {}: {}", action, engine.current, err),
        }
    }

    let turnstile = engine.delegate.processor();
    println!(
        "coins: {}, passages: {}",
        turnstile.coins.load(Ordering::SeqCst),
        turnstile.passages.load(Ordering::SeqCst)
    );

    Ok(())
}
