use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-invocation state of one payout or reconciliation pass.
///
/// The pass start time doubles as the payout period end for every NFT
/// processed in the pass. Cancellation is cooperative: checked between
/// iterations, never preempting an in-flight collaborator call.
#[derive(Clone)]
pub struct PassContext {
    pub started_at: DateTime<Utc>,
    shutdown: Arc<AtomicBool>,
}

impl PassContext {
    pub fn new(shutdown: Arc<AtomicBool>) -> Self {
        Self {
            started_at: Utc::now(),
            shutdown,
        }
    }

    /// Fixed start time, for tests that need deterministic periods
    pub fn starting_at(started_at: DateTime<Utc>, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            started_at,
            shutdown,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

/// In-process reconciliation state owned by the scheduler and passed into
/// each RetryService invocation. Not durable: counters reset on process
/// restart, an accepted limitation.
#[derive(Debug, Default)]
pub struct RetryContext {
    wallet_open_failures: HashMap<String, u32>,
}

impl RetryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wallet-open failure and return the consecutive count
    pub fn record_open_failure(&mut self, wallet: &str) -> u32 {
        let count = self.wallet_open_failures.entry(wallet.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Any successful open resets the wallet's counter
    pub fn reset_open_failures(&mut self, wallet: &str) {
        self.wallet_open_failures.remove(wallet);
    }
}
