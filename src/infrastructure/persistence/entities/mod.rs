pub mod accumulated_amounts;
pub mod farm_utxos;
pub mod nft_statistics;
pub mod payout_transactions;
pub mod rbf_links;
