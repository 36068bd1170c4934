use async_trait::async_trait;
use bitcoincore_rpc::bitcoin::{Amount, Txid};
use bitcoincore_rpc::{json, jsonrpc, Auth, Client, RpcApi};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::domain::contracts::WalletClient;
use crate::domain::errors::PayoutError;
use crate::domain::models::{UtxoRef, WalletUtxo};
use crate::infrastructure::bitcoin::error::WalletClientError;
use crate::utils::logging;

/// Bitcoin Core error codes the client tolerates on wallet scope changes
const RPC_WALLET_ALREADY_LOADED: i32 = -35;
const RPC_WALLET_NOT_LOADED: i32 = -18;

struct ActiveWallet {
    name: String,
    client: Client,
}

/// Wallet transport over the Bitcoin Core RPC API.
///
/// The node exposes one wallet context per RPC endpoint path; this client
/// mirrors that with a single active wallet scope behind a mutex. Loading a
/// farm's wallet opens a wallet-scoped RPC client, and every balance, UTXO
/// and transaction call runs against it until the scope is unloaded.
pub struct WalletRpcClient {
    rpc_url: String,
    auth: Auth,
    base: Client,
    active: Mutex<Option<ActiveWallet>>,
}

impl WalletRpcClient {
    /// Create a new wallet RPC client
    pub fn new(config: &AppConfig) -> Result<Self, WalletClientError> {
        let rpc_url = format!("http://{}:{}", config.bitcoin.host, config.bitcoin.port);
        let auth = Auth::UserPass(
            config.bitcoin.username.clone(),
            config.bitcoin.password.clone(),
        );

        let base = Client::new(&rpc_url, auth.clone()).map_err(|e| {
            WalletClientError::ConnectionError(format!(
                "Failed to connect to Bitcoin RPC: {}",
                e
            ))
        })?;

        Ok(WalletRpcClient {
            rpc_url,
            auth,
            base,
            active: Mutex::new(None),
        })
    }

    fn lock_active(&self) -> Result<MutexGuard<'_, Option<ActiveWallet>>, WalletClientError> {
        self.active
            .lock()
            .map_err(|_| WalletClientError::Other("wallet scope lock poisoned".to_string()))
    }

    fn rpc_error_code(error: &bitcoincore_rpc::Error) -> Option<i32> {
        match error {
            bitcoincore_rpc::Error::JsonRpc(jsonrpc::Error::Rpc(rpc)) => Some(rpc.code),
            _ => None,
        }
    }

    fn parse_txid(txid: &str) -> Result<Txid, WalletClientError> {
        Txid::from_str(txid)
            .map_err(|e| WalletClientError::InvalidInput(format!("invalid txid {}: {}", txid, e)))
    }

    /// BTC decimal -> satoshis, exact; amounts never pass through floats
    fn to_amount(value: Decimal) -> Result<Amount, WalletClientError> {
        let sats = (value * Decimal::from(100_000_000u64))
            .trunc()
            .to_u64()
            .ok_or_else(|| {
                WalletClientError::InvalidInput(format!("amount {} not representable", value))
            })?;
        Ok(Amount::from_sat(sats))
    }

    fn to_decimal(amount: Amount) -> Decimal {
        Decimal::new(amount.to_sat() as i64, 8)
    }
}

#[async_trait]
impl WalletClient for WalletRpcClient {
    async fn load_wallet(&self, name: &str) -> Result<(), PayoutError> {
        // Tolerate a wallet left loaded by an interrupted earlier run
        let result: Result<Value, _> = self.base.call("loadwallet", &[Value::from(name)]);
        match result {
            Ok(_) => {}
            Err(ref e) if Self::rpc_error_code(e) == Some(RPC_WALLET_ALREADY_LOADED) => {
                logging::log_warning(&format!("Wallet {} was already loaded", name));
            }
            Err(e) => return Err(WalletClientError::from(e).into()),
        }

        let wallet_url = format!("{}/wallet/{}", self.rpc_url, name);
        let client = Client::new(&wallet_url, self.auth.clone()).map_err(|e| {
            WalletClientError::ConnectionError(format!(
                "Failed to open wallet endpoint {}: {}",
                name, e
            ))
        })?;

        let mut active = self.lock_active().map_err(PayoutError::from)?;
        *active = Some(ActiveWallet {
            name: name.to_string(),
            client,
        });
        Ok(())
    }

    async fn unload_wallet(&self, name: &str) -> Result<(), PayoutError> {
        // Drop the scope first so a failed unload never leaves a stale client
        {
            let mut active = self.lock_active().map_err(PayoutError::from)?;
            if let Some(wallet) = active.take() {
                if wallet.name != name {
                    logging::log_warning(&format!(
                        "Unloading wallet {} while {} was active",
                        name, wallet.name
                    ));
                }
            }
        }

        let result: Result<Value, _> = self.base.call("unloadwallet", &[Value::from(name)]);
        match result {
            Ok(_) => Ok(()),
            Err(ref e) if Self::rpc_error_code(e) == Some(RPC_WALLET_NOT_LOADED) => Ok(()),
            Err(e) => Err(WalletClientError::from(e).into()),
        }
    }

    async fn balance(&self) -> Result<Decimal, PayoutError> {
        let active = self.lock_active().map_err(PayoutError::from)?;
        let wallet = active.as_ref().ok_or(WalletClientError::NoActiveWallet)?;

        let balance = wallet
            .client
            .get_balance(None, None)
            .map_err(WalletClientError::from)?;
        Ok(Self::to_decimal(balance))
    }

    async fn list_unspent(&self) -> Result<Vec<WalletUtxo>, PayoutError> {
        let active = self.lock_active().map_err(PayoutError::from)?;
        let wallet = active.as_ref().ok_or(WalletClientError::NoActiveWallet)?;

        let entries = wallet
            .client
            .list_unspent(None, None, None, None, None)
            .map_err(WalletClientError::from)?;

        Ok(entries
            .into_iter()
            .map(|entry| WalletUtxo {
                txid: entry.txid.to_string(),
                vout: entry.vout,
                address: entry.address.map(|a| a.assume_checked().to_string()),
                amount: Self::to_decimal(entry.amount),
            })
            .collect())
    }

    async fn create_and_send(
        &self,
        inputs: &[UtxoRef],
        outputs: &BTreeMap<String, Decimal>,
    ) -> Result<String, PayoutError> {
        let active = self.lock_active().map_err(PayoutError::from)?;
        let wallet = active.as_ref().ok_or(WalletClientError::NoActiveWallet)?;

        let raw_inputs = inputs
            .iter()
            .map(|input| {
                Ok(json::CreateRawTransactionInput {
                    txid: Self::parse_txid(&input.txid)?,
                    vout: input.vout,
                    sequence: None,
                })
            })
            .collect::<Result<Vec<_>, WalletClientError>>()?;

        let mut raw_outputs: HashMap<String, Amount> = HashMap::new();
        for (address, amount) in outputs {
            raw_outputs.insert(address.clone(), Self::to_amount(*amount)?);
        }

        // Build, fund, sign, broadcast as one logical operation. The fee is
        // subtracted proportionally from every output, never added on top.
        let tx = wallet
            .client
            .create_raw_transaction(&raw_inputs, &raw_outputs, None, Some(true))
            .map_err(WalletClientError::from)?;

        let fund_options = json::FundRawTransactionOptions {
            add_inputs: Some(false),
            replaceable: Some(true),
            subtract_fee_from_outputs: Some((0..outputs.len() as u32).collect()),
            ..Default::default()
        };
        let funded = wallet
            .client
            .fund_raw_transaction(&tx, Some(&fund_options), None)
            .map_err(WalletClientError::from)?;

        let signed = wallet
            .client
            .sign_raw_transaction_with_wallet(funded.hex.as_slice(), None, None)
            .map_err(WalletClientError::from)?;
        if !signed.complete {
            return Err(WalletClientError::Other(
                "wallet could not fully sign the payout transaction".to_string(),
            )
            .into());
        }

        let txid = wallet
            .client
            .send_raw_transaction(signed.hex.as_slice())
            .map_err(WalletClientError::from)?;
        Ok(txid.to_string())
    }

    async fn confirmations(&self, txid: &str) -> Result<i32, PayoutError> {
        let active = self.lock_active().map_err(PayoutError::from)?;
        let wallet = active.as_ref().ok_or(WalletClientError::NoActiveWallet)?;

        let parsed = Self::parse_txid(txid)?;
        let result = wallet
            .client
            .get_transaction(&parsed, None)
            .map_err(WalletClientError::from)?;
        Ok(result.info.confirmations)
    }

    async fn bump_fee(&self, txid: &str) -> Result<String, PayoutError> {
        let active = self.lock_active().map_err(PayoutError::from)?;
        let wallet = active.as_ref().ok_or(WalletClientError::NoActiveWallet)?;

        // Raw call: the typed bumpfee signature has churned across RPC
        // library versions while the verb itself is stable
        let result: Value = wallet
            .client
            .call("bumpfee", &[Value::from(txid)])
            .map_err(WalletClientError::from)?;

        result
            .get("txid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                WalletClientError::Other(format!("bumpfee for {} returned no txid", txid)).into()
            })
    }
}
