use chrono::{Duration, Utc};
use std::collections::BTreeMap;

use crate::application::context::{PassContext, RetryContext};
use crate::config::AppConfig;
use crate::domain::contracts::{PayoutStore, WalletClient};
use crate::domain::errors::PayoutError;
use crate::domain::models::{TransactionRecord, TxStatus};
use crate::utils::logging;

/// Reconciles broadcast transactions against the chain: confirms, waits,
/// fee-bumps or fails each pending record.
///
/// Every step is persisted before the next is taken, so a crash mid-pass
/// leaves records that the next pass picks up where this one stopped.
pub struct RetryService<'a> {
    config: &'a AppConfig,
    wallet: &'a dyn WalletClient,
    store: &'a dyn PayoutStore,
}

impl<'a> RetryService<'a> {
    pub fn new(
        config: &'a AppConfig,
        wallet: &'a dyn WalletClient,
        store: &'a dyn PayoutStore,
    ) -> Self {
        Self {
            config,
            wallet,
            store,
        }
    }

    /// Run one reconciliation pass over all pending transactions.
    pub async fn execute(
        &self,
        ctx: &PassContext,
        retry_ctx: &mut RetryContext,
    ) -> Result<(), PayoutError> {
        let pending = self.store.pending_transactions().await?;
        if pending.is_empty() {
            logging::log_debug("No pending transactions to reconcile");
            return Ok(());
        }
        logging::log_info(&format!(
            "Reconciling {} pending transactions",
            pending.len()
        ));

        // One wallet scope per farm wallet, not per transaction
        let mut by_wallet: BTreeMap<String, Vec<TransactionRecord>> = BTreeMap::new();
        for record in pending {
            by_wallet
                .entry(record.farm_wallet.clone())
                .or_default()
                .push(record);
        }

        let mut completed: Vec<String> = Vec::new();

        for (wallet_name, records) in &by_wallet {
            if ctx.is_cancelled() {
                logging::log_info("Reconciliation pass cancelled, stopping before next wallet");
                break;
            }

            if let Err(e) = self.wallet.load_wallet(wallet_name).await {
                // A wallet that keeps refusing to open is an operational
                // problem; tolerate it a few passes, then escalate
                let failures = retry_ctx.record_open_failure(wallet_name);
                if failures >= self.config.payout.wallet_open_failure_limit {
                    logging::log_error(&format!(
                        "Wallet {} failed to open {} consecutive passes: {}",
                        wallet_name, failures, e
                    ));
                    return Err(e);
                }
                logging::log_warning(&format!(
                    "Wallet {} failed to open ({} of {} tolerated): {}",
                    wallet_name, failures, self.config.payout.wallet_open_failure_limit, e
                ));
                continue;
            }
            retry_ctx.reset_open_failures(wallet_name);

            let outcome = self
                .reconcile_wallet(wallet_name, records, &mut completed)
                .await;

            if let Err(e) = self.wallet.unload_wallet(wallet_name).await {
                logging::log_error(&format!("Failed to unload wallet {}: {}", wallet_name, e));
                return outcome.and(Err(e));
            }
            outcome?;
        }

        if !completed.is_empty() {
            logging::log_info(&format!(
                "{} transactions confirmed, marking completed",
                completed.len()
            ));
            self.store
                .update_statuses(&completed, TxStatus::Completed)
                .await?;
        }

        Ok(())
    }

    async fn reconcile_wallet(
        &self,
        wallet_name: &str,
        records: &[TransactionRecord],
        completed: &mut Vec<String>,
    ) -> Result<(), PayoutError> {
        for record in records {
            let confirmations = self.wallet.confirmations(&record.txid).await?;

            if confirmations > 0 {
                logging::log_debug(&format!(
                    "Transaction {} has {} confirmations",
                    record.txid, confirmations
                ));
                completed.push(record.txid.clone());
                continue;
            }

            let age = Utc::now() - record.time_sent;
            if age < Duration::seconds(self.config.payout.retry_delay_secs) {
                logging::log_debug(&format!(
                    "Transaction {} unconfirmed for {}s, still within the retry delay",
                    record.txid,
                    age.num_seconds()
                ));
                continue;
            }

            if record.retry_count >= self.config.payout.max_fee_bump_retries {
                let failed = record.status.transition(TxStatus::Failed)?;
                self.store
                    .update_statuses(&[record.txid.clone()], failed)
                    .await?;
                logging::log_error(&format!(
                    "Transaction {} on wallet {} exhausted {} fee bumps, marked failed; \
                     manual intervention required",
                    record.txid, wallet_name, record.retry_count
                ));
                continue;
            }

            let new_txid = self.wallet.bump_fee(&record.txid).await?;
            logging::log_info(&format!(
                "Transaction {} replaced by {} (bump {} of {})",
                record.txid,
                new_txid,
                record.retry_count + 1,
                self.config.payout.max_fee_bump_retries
            ));
            self.store
                .record_replacement(
                    &record.txid,
                    &new_txid,
                    wallet_name,
                    record.retry_count + 1,
                )
                .await?;
        }

        Ok(())
    }
}
