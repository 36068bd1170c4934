use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An unspent output as reported by the wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletUtxo {
    /// Funding transaction hash
    pub txid: String,

    /// Output index
    pub vout: u32,

    /// Receiving address, if the wallet can attribute one
    pub address: Option<String>,

    /// Output value in BTC
    pub amount: Decimal,
}

/// Reference to a specific transaction output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoRef {
    pub txid: String,
    pub vout: u32,
}

impl From<&WalletUtxo> for UtxoRef {
    fn from(utxo: &WalletUtxo) -> Self {
        UtxoRef {
            txid: utxo.txid.clone(),
            vout: utxo.vout,
        }
    }
}
