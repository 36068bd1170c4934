use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::application::context::PassContext;
use crate::config::AppConfig;
use crate::domain::contracts::{
    AccumulationUpdate, FarmDataSource, LedgerUtxo, PayoutStore, RunResult, WalletClient,
};
use crate::domain::errors::PayoutError;
use crate::domain::models::{transfer, Farm, Nft, NftStatistics, TransactionRecord, UtxoRef};
use crate::domain::services::{
    reward_allocator, FundingSelector, OwnershipSplitter, PayoutBatcher, RewardAllocator,
};
use crate::utils::logging;

/// Orchestrates one end-to-end payout pass across all approved farms.
///
/// Farms are processed strictly sequentially: the wallet transport exposes
/// one active wallet context at a time, and any farm's failure aborts the
/// whole pass so the scheduler retries it from a clean state.
pub struct PayService<'a> {
    config: &'a AppConfig,
    data_source: &'a dyn FarmDataSource,
    wallet: &'a dyn WalletClient,
    store: &'a dyn PayoutStore,
    splitter: OwnershipSplitter,
    allocator: RewardAllocator,
    batcher: PayoutBatcher,
    selector: FundingSelector,
}

impl<'a> PayService<'a> {
    pub fn new(
        config: &'a AppConfig,
        data_source: &'a dyn FarmDataSource,
        wallet: &'a dyn WalletClient,
        store: &'a dyn PayoutStore,
    ) -> Self {
        Self {
            config,
            data_source,
            wallet,
            store,
            splitter: OwnershipSplitter::new(&config.bitcoin.network),
            allocator: RewardAllocator::new(),
            batcher: PayoutBatcher::new(config.payout.payout_threshold),
            selector: FundingSelector::new(),
        }
    }

    /// Run one payout pass. Any farm's failure aborts the pass.
    pub async fn execute(&self, ctx: &PassContext) -> Result<(), PayoutError> {
        let farms = self.data_source.list_approved_farms().await?;
        logging::log_info(&format!("Payout pass over {} approved farms", farms.len()));

        for farm in &farms {
            if ctx.is_cancelled() {
                logging::log_info("Payout pass cancelled, stopping before next farm");
                return Ok(());
            }
            self.process_farm(ctx, farm).await?;
        }

        Ok(())
    }

    /// Process one farm inside its wallet scope. The scope is released on
    /// every exit path before the next farm is touched.
    async fn process_farm(&self, ctx: &PassContext, farm: &Farm) -> Result<(), PayoutError> {
        self.wallet.load_wallet(&farm.wallet).await?;

        let outcome = self.process_farm_in_scope(ctx, farm).await;

        if let Err(e) = self.wallet.unload_wallet(&farm.wallet).await {
            logging::log_error(&format!("Failed to unload wallet {}: {}", farm.wallet, e));
            // A stale wallet scope would corrupt the next farm's queries
            return outcome.and(Err(e));
        }

        outcome
    }

    async fn process_farm_in_scope(
        &self,
        ctx: &PassContext,
        farm: &Farm,
    ) -> Result<(), PayoutError> {
        let balance = self.wallet.balance().await?;
        if balance <= Decimal::ZERO {
            return Err(PayoutError::ValidationError(format!(
                "farm {} wallet balance is {}, nothing to pay",
                farm.name, balance
            )));
        }

        // Only verified collections take part in the reward split
        let refs = self.data_source.collections_for_farm(&farm.id).await?;
        let mut verified = Vec::with_capacity(refs.len());
        for collection_ref in refs {
            if self.data_source.verify_collection(&collection_ref.denom_id).await? {
                verified.push(collection_ref.denom_id);
            } else {
                logging::log_warning(&format!(
                    "Skipping unverified collection {} on farm {}",
                    collection_ref.denom_id, farm.name
                ));
            }
        }
        let collections = self.data_source.collections_with_nfts(&verified).await?;

        // Expired NFTs earn nothing but are kept on record
        let now = ctx.started_at;
        let mut nfts: Vec<(String, Nft)> = Vec::new();
        for collection in collections {
            for nft in collection.nfts {
                if nft.is_expired(now) {
                    logging::log_debug(&format!(
                        "NFT {}/{} expired at {}, excluded from rewards",
                        collection.denom_id, nft.id, nft.expires_at
                    ));
                } else {
                    nfts.push((collection.denom_id.clone(), nft));
                }
            }
        }

        let minted_hash_power: f64 = nfts.iter().map(|(_, nft)| nft.hash_rate).sum();
        let current_hash_power = self
            .data_source
            .pool_hash_power_today(&farm.name, now.date_naive())
            .await?;

        // Pick the funding output before any money math; an ambiguous wallet
        // state fails the farm before anything is computed
        let unspent = self.wallet.list_unspent().await?;
        let processed = self.store.processed_utxos(&farm.id).await?;
        let receiving = vec![farm.receiving_address.clone()];
        let selection = self.selector.select(&unspent, &receiving, &processed)?;

        // Platform cut only applies when a platform address is configured
        let platform_percent = if self.config.payout.platform_fee_address.is_empty() {
            0.0
        } else {
            self.config.payout.platform_fee_percent
        };

        let allocation =
            self.allocator
                .allocate_farm(current_hash_power, minted_hash_power, balance);
        let hash_rates: Vec<f64> = nfts.iter().map(|(_, nft)| nft.hash_rate).collect();
        let grosses =
            self.allocator
                .nft_gross_rewards(minted_hash_power, &hash_rates, allocation.pool_reward);

        let mut farm_amounts: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut statistics: Vec<NftStatistics> = Vec::new();

        for ((denom_id, nft), gross) in nfts.iter().zip(grosses) {
            // Period start: where the last statistics left off, or mint
            let previous = self.store.last_statistics_for(denom_id, &nft.id).await?;
            let period_start = previous
                .map(|stats| stats.period_end)
                .unwrap_or(nft.minted_at);
            let period_end = now;

            let mut events = self
                .data_source
                .transfer_history(denom_id, &nft.id, period_start)
                .await?;
            transfer::sort_ascending(&mut events);

            let mut split = self
                .splitter
                .split(
                    self.data_source,
                    nft,
                    denom_id,
                    &events,
                    period_start,
                    period_end,
                )
                .await?;

            let fee = self.allocator.maintenance_fee(
                farm.monthly_maintenance_fee,
                current_hash_power,
                period_start,
                period_end,
            );
            let breakdown = self.allocator.split_fee(gross, fee, platform_percent);

            // Net reward by ownership share; the last address absorbs the
            // rounding remainder so the NFT's money is conserved exactly
            let addresses: Vec<String> = split.percents.keys().cloned().collect();
            let mut distributed = Decimal::ZERO;
            for (index, address) in addresses.iter().enumerate() {
                let remaining = breakdown.net_reward - distributed;
                let amount = if index + 1 == addresses.len() {
                    remaining
                } else {
                    reward_allocator::amount_of(split.percents[address], breakdown.net_reward)
                        .min(remaining)
                };
                distributed += amount;
                *farm_amounts.entry(address.clone()).or_insert(Decimal::ZERO) += amount;
            }

            if breakdown.maintenance > Decimal::ZERO {
                *farm_amounts
                    .entry(farm.maintenance_address.clone())
                    .or_insert(Decimal::ZERO) += breakdown.maintenance;
            }
            if breakdown.platform > Decimal::ZERO {
                *farm_amounts
                    .entry(self.config.payout.platform_fee_address.clone())
                    .or_insert(Decimal::ZERO) += breakdown.platform;
            }

            for segment in &mut split.segments {
                segment.reward = reward_allocator::floor_to_btc(reward_allocator::amount_of(
                    segment.percent,
                    breakdown.net_reward,
                ));
            }

            statistics.push(NftStatistics {
                farm_id: farm.id.clone(),
                denom_id: denom_id.clone(),
                nft_id: nft.id.clone(),
                period_start,
                period_end,
                gross_reward: gross,
                maintenance_fee: breakdown.fee,
                platform_fee: breakdown.platform,
                owners: split.segments,
            });
        }

        // Hash power the pool reports but no NFT represents yet goes to the
        // farm owner
        if allocation.leftover > Decimal::ZERO {
            *farm_amounts
                .entry(farm.leftover_address.clone())
                .or_insert(Decimal::ZERO) += allocation.leftover;
        }

        // Conservation: the destination amounts must consume the balance
        // exactly. Never auto-corrected; a mismatch means misallocated funds.
        let total: Decimal = farm_amounts.values().copied().sum();
        if total != balance {
            return Err(PayoutError::ConservationError(format!(
                "farm {}: destination amounts sum to {} but balance is {}",
                farm.name, total, balance
            )));
        }

        // Threshold batching against the durable accumulation state
        let mut previous_amounts: HashMap<String, Decimal> = HashMap::new();
        for address in farm_amounts.keys() {
            let accumulated = self.store.accumulated_amount(address, &farm.id).await?;
            previous_amounts.insert(address.clone(), accumulated);
        }
        let decisions = self.batcher.decide(&farm_amounts, &previous_amounts);

        let outputs: BTreeMap<String, Decimal> = decisions
            .iter()
            .filter(|d| d.payable > Decimal::ZERO)
            .map(|d| (d.address.clone(), d.payable))
            .collect();
        let accumulation: Vec<AccumulationUpdate> = decisions
            .iter()
            .map(|d| AccumulationUpdate {
                address: d.address.clone(),
                farm_id: farm.id.clone(),
                amount: d.carried,
            })
            .collect();

        let mut ledger: Vec<LedgerUtxo> = selection
            .observed
            .iter()
            .map(|utxo| LedgerUtxo {
                farm_id: farm.id.clone(),
                utxo: UtxoRef::from(utxo),
                processed: false,
            })
            .collect();

        if outputs.is_empty() {
            // Every address stayed below the threshold: nothing moves, the
            // run is still recorded so accumulation and periods advance
            logging::log_info(&format!(
                "Farm {}: all {} addresses below payout threshold, nothing sent",
                farm.name,
                decisions.len()
            ));
            self.store
                .save_run_result(&RunResult {
                    farm_id: farm.id.clone(),
                    accumulation,
                    statistics,
                    transaction: None,
                    utxos: ledger,
                })
                .await?;
            return Ok(());
        }

        let funding = UtxoRef::from(&selection.funding);
        let txid = self
            .wallet
            .create_and_send(&[funding.clone()], &outputs)
            .await?;
        logging::log_info(&format!(
            "Farm {}: broadcast {} paying {} addresses from {}:{}",
            farm.name,
            txid,
            outputs.len(),
            funding.txid,
            funding.vout
        ));

        for entry in &mut ledger {
            if entry.utxo == funding {
                entry.processed = true;
            }
        }

        let record = TransactionRecord::pending(txid.clone(), farm.wallet.clone(), Utc::now());
        let result = RunResult {
            farm_id: farm.id.clone(),
            accumulation,
            statistics,
            transaction: Some(record),
            utxos: ledger,
        };

        if let Err(e) = self.store.save_run_result(&result).await {
            // Money moved but bookkeeping may not match; surfaced, never
            // reversed
            logging::log_error(&format!(
                "Farm {}: transaction {} broadcast but persisting the run failed: {}",
                farm.name, txid, e
            ));
            return Err(e);
        }

        Ok(())
    }
}
