//! Capability interfaces for the engine's external collaborators.
//!
//! The core never depends on a concrete transport; each external system is a
//! small adapter implementing one of these traits, so tests can substitute
//! in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use crate::domain::errors::PayoutError;
use crate::domain::models::{
    Collection, CollectionRef, Farm, NftStatistics, TransactionRecord, TransferEvent, TxStatus,
    UtxoRef, WalletUtxo,
};

/// Resolves an owner's chain address to a payout address for a given token.
/// A resolution failure aborts the whole ownership computation.
#[async_trait]
pub trait PayoutAddressResolver: Send + Sync {
    async fn payout_address_for(
        &self,
        chain_address: &str,
        network: &str,
        token_id: &str,
        denom_id: &str,
    ) -> Result<String, PayoutError>;
}

/// Backend indexer supplying farm, collection, NFT and transfer data
#[async_trait]
pub trait FarmDataSource: PayoutAddressResolver {
    /// List farms approved for payout
    async fn list_approved_farms(&self) -> Result<Vec<Farm>, PayoutError>;

    /// Collections registered for a farm
    async fn collections_for_farm(&self, farm_id: &str)
        -> Result<Vec<CollectionRef>, PayoutError>;

    /// Whether a collection id is verified for payout
    async fn verify_collection(&self, denom_id: &str) -> Result<bool, PayoutError>;

    /// Full NFT data for the given collection ids
    async fn collections_with_nfts(
        &self,
        denom_ids: &[String],
    ) -> Result<Vec<Collection>, PayoutError>;

    /// Transfer history of one NFT since a timestamp
    async fn transfer_history(
        &self,
        denom_id: &str,
        nft_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransferEvent>, PayoutError>;

    /// Hash power the mining pool reports for the farm today
    async fn pool_hash_power_today(
        &self,
        farm_name: &str,
        since: NaiveDate,
    ) -> Result<f64, PayoutError>;
}

/// Bitcoin wallet transport. One wallet scope is active at a time; callers
/// must load a farm's wallet before querying and unload it on every exit path.
#[async_trait]
pub trait WalletClient: Send + Sync {
    async fn load_wallet(&self, name: &str) -> Result<(), PayoutError>;

    async fn unload_wallet(&self, name: &str) -> Result<(), PayoutError>;

    /// Balance of the active wallet in BTC
    async fn balance(&self) -> Result<Decimal, PayoutError>;

    /// Unspent outputs visible to the active wallet
    async fn list_unspent(&self) -> Result<Vec<WalletUtxo>, PayoutError>;

    /// Build, fund, sign and broadcast one transaction spending `inputs` to
    /// `outputs`, with the network fee subtracted from the outputs.
    /// Returns the broadcast transaction hash.
    async fn create_and_send(
        &self,
        inputs: &[UtxoRef],
        outputs: &BTreeMap<String, Decimal>,
    ) -> Result<String, PayoutError>;

    /// Confirmation count for a transaction of the active wallet
    async fn confirmations(&self, txid: &str) -> Result<i32, PayoutError>;

    /// Replace a stuck transaction with a higher-fee one; returns the new hash
    async fn bump_fee(&self, txid: &str) -> Result<String, PayoutError>;
}

/// Accumulation balance written back after batching
#[derive(Debug, Clone)]
pub struct AccumulationUpdate {
    pub address: String,
    pub farm_id: String,
    pub amount: Decimal,
}

/// A funding output observed during a run, with its processed flag
#[derive(Debug, Clone)]
pub struct LedgerUtxo {
    pub farm_id: String,
    pub utxo: UtxoRef,
    pub processed: bool,
}

/// Everything a completed farm run persists in one atomic unit
#[derive(Debug, Clone)]
pub struct RunResult {
    pub farm_id: String,
    pub accumulation: Vec<AccumulationUpdate>,
    pub statistics: Vec<NftStatistics>,
    /// None when batching produced no payable output and nothing was sent
    pub transaction: Option<TransactionRecord>,
    pub utxos: Vec<LedgerUtxo>,
}

/// Persistence for accumulation state, statistics and transaction tracking
#[async_trait]
pub trait PayoutStore: Send + Sync {
    /// Latest statistics record for an NFT, if any
    async fn last_statistics_for(
        &self,
        denom_id: &str,
        nft_id: &str,
    ) -> Result<Option<NftStatistics>, PayoutError>;

    /// Stored sub-threshold balance for an address/farm pair (0 if unseen)
    async fn accumulated_amount(
        &self,
        address: &str,
        farm_id: &str,
    ) -> Result<Decimal, PayoutError>;

    /// Outputs already consumed by earlier runs for a farm
    async fn processed_utxos(&self, farm_id: &str) -> Result<HashSet<UtxoRef>, PayoutError>;

    /// Persist a farm run's outcome in one transaction
    async fn save_run_result(&self, result: &RunResult) -> Result<(), PayoutError>;

    /// All transactions still pending reconciliation
    async fn pending_transactions(&self) -> Result<Vec<TransactionRecord>, PayoutError>;

    /// Move a batch of pending transactions to a terminal status
    async fn update_statuses(&self, txids: &[String], status: TxStatus)
        -> Result<(), PayoutError>;

    /// Atomically mark `old_txid` replaced, record the RBF link, and insert
    /// the replacement as a fresh pending record with the given retry count.
    async fn record_replacement(
        &self,
        old_txid: &str,
        new_txid: &str,
        farm_wallet: &str,
        retry_count: i32,
    ) -> Result<(), PayoutError>;
}
