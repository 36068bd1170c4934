use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::PayoutError;

/// Lifecycle status of a broadcast payout transaction.
///
/// `Pending` is the only non-terminal state; every transition out of it is
/// one-way. A `Replaced` record is superseded by a fresh `Pending` record for
/// the fee-bumped replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
    Replaced,
}

impl TxStatus {
    /// Whether moving from this status to `next` is a legal transition
    pub fn can_transition_to(&self, next: TxStatus) -> bool {
        matches!(self, TxStatus::Pending) && next != TxStatus::Pending
    }

    /// Apply a transition, rejecting anything but Pending -> terminal
    pub fn transition(&self, next: TxStatus) -> Result<TxStatus, PayoutError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PayoutError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }

    /// Database representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Completed => "completed",
            TxStatus::Failed => "failed",
            TxStatus::Replaced => "replaced",
        }
    }

    /// Parse the database representation
    pub fn parse(value: &str) -> Option<TxStatus> {
        match value {
            "pending" => Some(TxStatus::Pending),
            "completed" => Some(TxStatus::Completed),
            "failed" => Some(TxStatus::Failed),
            "replaced" => Some(TxStatus::Replaced),
            _ => None,
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A broadcast payout transaction tracked until it reaches a terminal status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash
    pub txid: String,

    /// Current lifecycle status
    pub status: TxStatus,

    /// Wallet sub-account the transaction was sent from
    pub farm_wallet: String,

    /// When the transaction was broadcast
    pub time_sent: DateTime<Utc>,

    /// Number of fee-bump replacements in this transaction's chain
    pub retry_count: i32,
}

impl TransactionRecord {
    /// Create a fresh pending record for a just-broadcast transaction
    pub fn pending(txid: String, farm_wallet: String, time_sent: DateTime<Utc>) -> Self {
        Self {
            txid,
            status: TxStatus::Pending,
            farm_wallet,
            time_sent,
            retry_count: 0,
        }
    }
}
