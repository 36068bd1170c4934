use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::application::context::{PassContext, RetryContext};
use crate::application::pay_service::PayService;
use crate::application::retry_service::RetryService;
use crate::config::AppConfig;
use crate::domain::contracts::{FarmDataSource, PayoutStore, WalletClient};
use crate::domain::errors::PayoutError;
use crate::utils::logging;

/// Drives the two recurring passes: the payout pass on its long interval and
/// the reconciliation pass on its short one.
///
/// A failed pass is retried on the next tick; only sustained failure
/// escalates out of the loop so the process exits nonzero and supervision
/// takes over.
pub struct PayoutScheduler<'a> {
    config: &'a AppConfig,
    data_source: &'a dyn FarmDataSource,
    wallet: &'a dyn WalletClient,
    store: &'a dyn PayoutStore,
    shutdown: Arc<AtomicBool>,
}

impl<'a> PayoutScheduler<'a> {
    pub fn new(
        config: &'a AppConfig,
        data_source: &'a dyn FarmDataSource,
        wallet: &'a dyn WalletClient,
        store: &'a dyn PayoutStore,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            data_source,
            wallet,
            store,
            shutdown,
        }
    }

    /// Run until shutdown is requested or a pass fails persistently.
    pub async fn run(&self) -> Result<(), PayoutError> {
        let pay_interval = Duration::from_millis(self.config.payout.pay_interval_ms);
        let retry_interval = Duration::from_millis(self.config.payout.retry_interval_ms);

        logging::log_info(&format!(
            "Scheduler started: payout every {}s, reconciliation every {}s",
            pay_interval.as_secs(),
            retry_interval.as_secs()
        ));

        // Both passes run once at startup, then on their intervals
        let mut next_pay = Instant::now();
        let mut next_retry = Instant::now();
        let mut pay_failures: u32 = 0;
        let mut retry_failures: u32 = 0;
        let mut retry_ctx = RetryContext::new();

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                logging::log_info("Shutdown requested, scheduler stopping");
                return Ok(());
            }

            let now = Instant::now();

            if now >= next_pay {
                next_pay = now + pay_interval;
                let ctx = PassContext::new(Arc::clone(&self.shutdown));
                let service =
                    PayService::new(self.config, self.data_source, self.wallet, self.store);
                match service.execute(&ctx).await {
                    Ok(()) => {
                        pay_failures = 0;
                        logging::log_info("Payout pass finished");
                    }
                    Err(e) => {
                        pay_failures += 1;
                        logging::log_error(&format!(
                            "Payout pass failed ({} consecutive): {}",
                            pay_failures, e
                        ));
                        if pay_failures >= self.config.payout.max_pass_failures {
                            return Err(e);
                        }
                    }
                }
            }

            if now >= next_retry {
                next_retry = now + retry_interval;
                let ctx = PassContext::new(Arc::clone(&self.shutdown));
                let service = RetryService::new(self.config, self.wallet, self.store);
                match service.execute(&ctx, &mut retry_ctx).await {
                    Ok(()) => {
                        retry_failures = 0;
                    }
                    Err(e) => {
                        retry_failures += 1;
                        logging::log_error(&format!(
                            "Reconciliation pass failed ({} consecutive): {}",
                            retry_failures, e
                        ));
                        if retry_failures >= self.config.payout.max_pass_failures {
                            return Err(e);
                        }
                    }
                }
            }

            // Short sleep keeps shutdown responsive between due times
            let until_due = next_pay.min(next_retry).saturating_duration_since(Instant::now());
            tokio::time::sleep(until_due.min(Duration::from_secs(1))).await;
        }
    }
}
