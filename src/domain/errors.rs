use std::error::Error;
use std::fmt;

use crate::domain::models::transaction::TxStatus;
use crate::infrastructure::api::error::ApiClientError;
use crate::infrastructure::bitcoin::error::WalletClientError;
use crate::infrastructure::persistence::error::DbError;

/// Error type for payout computation and reconciliation
#[derive(Debug)]
pub enum PayoutError {
    WalletClientError(WalletClientError),
    ApiClientError(ApiClientError),
    DbError(DbError),
    /// Payout period bounds are invalid (end before or equal to start)
    InvalidPeriod(String),
    /// Input data is unusable (zero balance, negative hash power, ...)
    ValidationError(String),
    /// No usable funding output, or more than one candidate
    FundingError(String),
    /// Computed destination amounts do not add up to the consumed balance
    ConservationError(String),
    /// Rejected transaction status transition
    InvalidTransition { from: TxStatus, to: TxStatus },
    ProcessingError(String),
}

impl fmt::Display for PayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutError::WalletClientError(e) => write!(f, "Wallet client error: {}", e),
            PayoutError::ApiClientError(e) => write!(f, "API client error: {}", e),
            PayoutError::DbError(e) => write!(f, "Database error: {}", e),
            PayoutError::InvalidPeriod(msg) => write!(f, "Invalid payout period: {}", msg),
            PayoutError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            PayoutError::FundingError(msg) => write!(f, "Funding error: {}", msg),
            PayoutError::ConservationError(msg) => write!(f, "Conservation violation: {}", msg),
            PayoutError::InvalidTransition { from, to } => {
                write!(f, "Invalid status transition: {} -> {}", from, to)
            }
            PayoutError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for PayoutError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PayoutError::WalletClientError(e) => Some(e),
            PayoutError::ApiClientError(e) => Some(e),
            PayoutError::DbError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WalletClientError> for PayoutError {
    fn from(error: WalletClientError) -> Self {
        PayoutError::WalletClientError(error)
    }
}

impl From<ApiClientError> for PayoutError {
    fn from(error: ApiClientError) -> Self {
        PayoutError::ApiClientError(error)
    }
}

impl From<DbError> for PayoutError {
    fn from(error: DbError) -> Self {
        PayoutError::DbError(error)
    }
}
