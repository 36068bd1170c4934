//! In-memory fakes for the engine's external collaborators.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use farm_payout_engine::config::{
    ApiConfig, AppConfig, BitcoinConfig, DatabaseConfig, PayoutConfig,
};
use farm_payout_engine::domain::contracts::{
    FarmDataSource, PayoutAddressResolver, PayoutStore, RunResult, WalletClient,
};
use farm_payout_engine::domain::errors::PayoutError;
use farm_payout_engine::domain::models::{
    Collection, CollectionRef, Farm, NftStatistics, TransactionRecord, TransferEvent, TxStatus,
    UtxoRef, WalletUtxo,
};

pub fn test_config() -> AppConfig {
    AppConfig {
        bitcoin: BitcoinConfig {
            host: "localhost".to_string(),
            port: "48332".to_string(),
            username: "test".to_string(),
            password: "test".to_string(),
            network: "testnet4".to_string(),
        },
        api: ApiConfig {
            url: "http://localhost:3000".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://test".to_string(),
        },
        payout: PayoutConfig {
            payout_threshold: Decimal::new(1, 2),
            platform_fee_percent: 10.0,
            platform_fee_address: "platform-addr".to_string(),
            retry_delay_secs: 3600,
            max_fee_bump_retries: 3,
            wallet_open_failure_limit: 3,
            pay_interval_ms: 86_400_000,
            retry_interval_ms: 600_000,
            max_pass_failures: 5,
        },
    }
}

pub fn test_farm() -> Farm {
    Farm {
        id: "farm-1".to_string(),
        name: "Test Farm".to_string(),
        wallet: "farm-1-wallet".to_string(),
        receiving_address: "farm-receiving".to_string(),
        leftover_address: "farm-leftover".to_string(),
        maintenance_address: "farm-maintenance".to_string(),
        monthly_maintenance_fee: Decimal::ZERO,
    }
}

/// Backend fake: every query answers from in-memory tables. Payout addresses
/// resolve to `payout:{chain_address}` unless an override is registered.
#[derive(Default)]
pub struct FakeDataSource {
    pub farms: Vec<Farm>,
    pub collections: HashMap<String, Vec<CollectionRef>>,
    pub verified: HashSet<String>,
    pub nft_collections: Vec<Collection>,
    pub transfers: HashMap<(String, String), Vec<TransferEvent>>,
    pub hash_power: f64,
    pub payout_addresses: HashMap<String, String>,
}

#[async_trait]
impl PayoutAddressResolver for FakeDataSource {
    async fn payout_address_for(
        &self,
        chain_address: &str,
        _network: &str,
        _token_id: &str,
        _denom_id: &str,
    ) -> Result<String, PayoutError> {
        Ok(self
            .payout_addresses
            .get(chain_address)
            .cloned()
            .unwrap_or_else(|| format!("payout:{}", chain_address)))
    }
}

#[async_trait]
impl FarmDataSource for FakeDataSource {
    async fn list_approved_farms(&self) -> Result<Vec<Farm>, PayoutError> {
        Ok(self.farms.clone())
    }

    async fn collections_for_farm(
        &self,
        farm_id: &str,
    ) -> Result<Vec<CollectionRef>, PayoutError> {
        Ok(self.collections.get(farm_id).cloned().unwrap_or_default())
    }

    async fn verify_collection(&self, denom_id: &str) -> Result<bool, PayoutError> {
        Ok(self.verified.contains(denom_id))
    }

    async fn collections_with_nfts(
        &self,
        denom_ids: &[String],
    ) -> Result<Vec<Collection>, PayoutError> {
        Ok(self
            .nft_collections
            .iter()
            .filter(|c| denom_ids.contains(&c.denom_id))
            .cloned()
            .collect())
    }

    async fn transfer_history(
        &self,
        denom_id: &str,
        nft_id: &str,
        _since: DateTime<Utc>,
    ) -> Result<Vec<TransferEvent>, PayoutError> {
        Ok(self
            .transfers
            .get(&(denom_id.to_string(), nft_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn pool_hash_power_today(
        &self,
        _farm_name: &str,
        _since: NaiveDate,
    ) -> Result<f64, PayoutError> {
        Ok(self.hash_power)
    }
}

/// Wallet fake tracking load/unload ordering and every broadcast request
pub struct FakeWallet {
    pub state: Mutex<FakeWalletState>,
}

#[derive(Default)]
pub struct FakeWalletState {
    pub balance: Decimal,
    pub utxos: Vec<WalletUtxo>,
    pub loaded: Option<String>,
    pub load_calls: Vec<String>,
    pub unload_calls: Vec<String>,
    pub fail_load_for: HashSet<String>,
    pub sent: Vec<(Vec<UtxoRef>, BTreeMap<String, Decimal>)>,
    pub confirmations: HashMap<String, i32>,
    pub bumped: Vec<String>,
    pub next_txid: u32,
}

impl FakeWallet {
    pub fn new(balance: Decimal, utxos: Vec<WalletUtxo>) -> Self {
        Self {
            state: Mutex::new(FakeWalletState {
                balance,
                utxos,
                next_txid: 1,
                ..FakeWalletState::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeWalletState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl WalletClient for FakeWallet {
    async fn load_wallet(&self, name: &str) -> Result<(), PayoutError> {
        let mut state = self.lock();
        state.load_calls.push(name.to_string());
        if state.fail_load_for.contains(name) {
            return Err(PayoutError::ProcessingError(format!(
                "wallet {} refused to open",
                name
            )));
        }
        state.loaded = Some(name.to_string());
        Ok(())
    }

    async fn unload_wallet(&self, name: &str) -> Result<(), PayoutError> {
        let mut state = self.lock();
        state.unload_calls.push(name.to_string());
        state.loaded = None;
        Ok(())
    }

    async fn balance(&self) -> Result<Decimal, PayoutError> {
        Ok(self.lock().balance)
    }

    async fn list_unspent(&self) -> Result<Vec<WalletUtxo>, PayoutError> {
        Ok(self.lock().utxos.clone())
    }

    async fn create_and_send(
        &self,
        inputs: &[UtxoRef],
        outputs: &BTreeMap<String, Decimal>,
    ) -> Result<String, PayoutError> {
        let mut state = self.lock();
        state.sent.push((inputs.to_vec(), outputs.clone()));
        let txid = format!("txid-{:04}", state.next_txid);
        state.next_txid += 1;
        Ok(txid)
    }

    async fn confirmations(&self, txid: &str) -> Result<i32, PayoutError> {
        Ok(self.lock().confirmations.get(txid).copied().unwrap_or(0))
    }

    async fn bump_fee(&self, txid: &str) -> Result<String, PayoutError> {
        let mut state = self.lock();
        state.bumped.push(txid.to_string());
        let txid = format!("bump-{}", txid);
        Ok(txid)
    }
}

/// Store fake persisting everything into vectors and maps
#[derive(Default)]
pub struct FakeStore {
    pub state: Mutex<FakeStoreState>,
}

#[derive(Default)]
pub struct FakeStoreState {
    pub statistics: Vec<NftStatistics>,
    pub accumulated: HashMap<(String, String), Decimal>,
    pub processed: HashMap<String, HashSet<UtxoRef>>,
    pub transactions: Vec<TransactionRecord>,
    pub rbf_links: Vec<(String, String)>,
    pub saved_runs: Vec<RunResult>,
}

impl FakeStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStoreState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl PayoutStore for FakeStore {
    async fn last_statistics_for(
        &self,
        denom_id: &str,
        nft_id: &str,
    ) -> Result<Option<NftStatistics>, PayoutError> {
        Ok(self
            .lock()
            .statistics
            .iter()
            .filter(|s| s.denom_id == denom_id && s.nft_id == nft_id)
            .max_by_key(|s| s.period_end)
            .cloned())
    }

    async fn accumulated_amount(
        &self,
        address: &str,
        farm_id: &str,
    ) -> Result<Decimal, PayoutError> {
        Ok(self
            .lock()
            .accumulated
            .get(&(address.to_string(), farm_id.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn processed_utxos(&self, farm_id: &str) -> Result<HashSet<UtxoRef>, PayoutError> {
        Ok(self.lock().processed.get(farm_id).cloned().unwrap_or_default())
    }

    async fn save_run_result(&self, result: &RunResult) -> Result<(), PayoutError> {
        let mut state = self.lock();
        for update in &result.accumulation {
            state.accumulated.insert(
                (update.address.clone(), update.farm_id.clone()),
                update.amount,
            );
        }
        state.statistics.extend(result.statistics.iter().cloned());
        if let Some(record) = &result.transaction {
            state.transactions.push(record.clone());
        }
        for entry in &result.utxos {
            if entry.processed {
                state
                    .processed
                    .entry(entry.farm_id.clone())
                    .or_default()
                    .insert(entry.utxo.clone());
            }
        }
        state.saved_runs.push(result.clone());
        Ok(())
    }

    async fn pending_transactions(&self) -> Result<Vec<TransactionRecord>, PayoutError> {
        Ok(self
            .lock()
            .transactions
            .iter()
            .filter(|t| t.status == TxStatus::Pending)
            .cloned()
            .collect())
    }

    async fn update_statuses(
        &self,
        txids: &[String],
        status: TxStatus,
    ) -> Result<(), PayoutError> {
        let mut state = self.lock();
        for record in state.transactions.iter_mut() {
            if txids.contains(&record.txid) && record.status == TxStatus::Pending {
                record.status = status;
            }
        }
        Ok(())
    }

    async fn record_replacement(
        &self,
        old_txid: &str,
        new_txid: &str,
        farm_wallet: &str,
        retry_count: i32,
    ) -> Result<(), PayoutError> {
        let mut state = self.lock();
        for record in state.transactions.iter_mut() {
            if record.txid == old_txid {
                record.status = TxStatus::Replaced;
            }
        }
        state
            .rbf_links
            .push((old_txid.to_string(), new_txid.to_string()));
        let mut replacement = TransactionRecord::pending(
            new_txid.to_string(),
            farm_wallet.to_string(),
            Utc::now(),
        );
        replacement.retry_count = retry_count;
        state.transactions.push(replacement);
        Ok(())
    }
}
