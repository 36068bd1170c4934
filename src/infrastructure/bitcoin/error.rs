use std::error::Error;
use std::fmt;

/// Represents errors that can occur in wallet RPC operations
#[derive(Debug)]
pub enum WalletClientError {
    /// Error from the Bitcoin Core RPC client
    RpcError(bitcoincore_rpc::Error),
    /// Connection error
    ConnectionError(String),
    /// An operation needing a wallet scope ran without one loaded
    NoActiveWallet,
    /// Invalid address or transaction id
    InvalidInput(String),
    /// Other error
    Other(String),
}

impl fmt::Display for WalletClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletClientError::RpcError(e) => write!(f, "Bitcoin RPC error: {}", e),
            WalletClientError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            WalletClientError::NoActiveWallet => write!(f, "No wallet scope is loaded"),
            WalletClientError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            WalletClientError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl Error for WalletClientError {}

impl From<bitcoincore_rpc::Error> for WalletClientError {
    fn from(error: bitcoincore_rpc::Error) -> Self {
        WalletClientError::RpcError(error)
    }
}
