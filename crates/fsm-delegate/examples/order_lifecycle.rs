//! Order lifecycle with a custom error type, opaque arguments and a
//! deadline-bound action.

use async_trait::async_trait;
use fsm_delegate::prelude::*;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Order {
    id: String,
    amount_cents: u64,
}

#[derive(Debug)]
enum PaymentError {
    Declined(String),
    Interrupted(ContextError),
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentError::Declined(reason) => write!(f, "payment declined: {}", reason),
            PaymentError::Interrupted(err) => write!(f, "payment interrupted: {}", err),
        }
    }
}

impl std::error::Error for PaymentError {}

#[derive(Debug, Default)]
struct OrderProcessor {
    journal: Mutex<Vec<String>>,
}

impl OrderProcessor {
    fn note(&self, line: String) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.push(line);
        }
    }
}

#[async_trait]
impl EventProcessor for OrderProcessor {
    type Error = PaymentError;

    async fn on_exit(&self, _ctx: &Context, from: &StateName, args: &Args) {
        if let Some(order) = args.get(0).and_then(|a| a.downcast_ref::<Order>()) {
            self.note(format!("{} leaves {}", order.id, from));
        }
    }

    async fn action(
        &self,
        ctx: &Context,
        action: &ActionName,
        _from: &StateName,
        _to: &StateName,
        args: &Args,
    ) -> Result<(), PaymentError> {
        let Some(order) = args.get(0).and_then(|a| a.downcast_ref::<Order>()) else {
            return Ok(());
        };
        if action != "pay" {
            return Ok(());
        }

        // Simulated gateway round trip, bounded by the caller's deadline.
        let latency = Duration::from_millis(order.amount_cents / 1_000);
        ctx.run(tokio::time::sleep(latency))
            .await
            .map_err(PaymentError::Interrupted)?;

        if order.amount_cents > 100_000 {
            return Err(PaymentError::Declined("over limit".to_string()));
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
        err: &PaymentError,
    ) {
        self.note(format!("{} failed: {}", action, err));
    }

    async fn on_enter(&self, _ctx: &Context, to: &StateName, args: &Args) {
        if let Some(order) = args.get(0).and_then(|a| a.downcast_ref::<Order>()) {
            self.note(format!("{} enters {}", order.id, to));
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let delegate = DefaultDelegate::from_processor(OrderProcessor::default());
    let ctx = Context::new().with_timeout(Duration::from_secs(1));

    let orders = [
        Order {
            id: "order-1".to_string(),
            amount_cents: 2_500,
        },
        Order {
            id: "order-2".to_string(),
            amount_cents: 250_000,
        },
        Order {
            id: "order-3".to_string(),
            amount_cents: 5_000_000,
        },
    ];

    for order in orders {
        let request = TransitionRequest::new("pay", "pending", "paid")
            .with_args(args![Arg::opaque(order.clone())]);
        match delegate.handle_transition(&ctx, &request).await {
            Ok(()) => println!("{} is paid", order.id),
            Err(err) => println!("{} stays pending: {}", order.id, err),
        }
    }

    if let Ok(journal) = delegate.processor().journal.lock() {
        for line in journal.iter() {
            println!("{}", line);
        }
    }

    Ok(())
}
