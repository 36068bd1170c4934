pub mod collection;
pub mod farm;
pub mod statistics;
pub mod transaction;
pub mod transfer;
pub mod utxo;

pub use collection::{Collection, CollectionRef, Nft};
pub use farm::Farm;
pub use statistics::{NftStatistics, OwnerInformation};
pub use transaction::{TransactionRecord, TxStatus};
pub use transfer::TransferEvent;
pub use utxo::{UtxoRef, WalletUtxo};
