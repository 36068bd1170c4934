pub mod client;
pub mod error;

pub use client::WalletRpcClient;
pub use error::WalletClientError;
