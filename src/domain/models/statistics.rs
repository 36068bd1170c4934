use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Audit record for one ownership window of one NFT in one payout period.
/// Informational: the actual transfer amounts come from the merged
/// per-address allocation, which absorbs rounding dust deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerInformation {
    /// Owner's chain address during the window
    pub chain_address: String,

    /// Resolved payout address for the owner
    pub payout_address: String,

    /// Window start within the payout period
    pub window_start: DateTime<Utc>,

    /// Window end within the payout period
    pub window_end: DateTime<Utc>,

    /// Seconds of the period this owner held the NFT
    pub owned_seconds: i64,

    /// Percentage of the period this window represents
    pub percent: f64,

    /// This window's share of the NFT's net reward
    pub reward: Decimal,
}

/// Write-once audit record of one NFT's computed payout period.
/// The latest record's `period_end` seeds the next run's period start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftStatistics {
    /// Farm the NFT's collection belongs to
    pub farm_id: String,

    /// Collection (denomination) identifier
    pub denom_id: String,

    /// NFT identifier
    pub nft_id: String,

    /// Payout period start (inclusive)
    pub period_start: DateTime<Utc>,

    /// Payout period end (exclusive)
    pub period_end: DateTime<Utc>,

    /// Gross reward allocated to the NFT before fees
    pub gross_reward: Decimal,

    /// Maintenance fee collected, capped at the gross reward
    pub maintenance_fee: Decimal,

    /// Platform's cut of the maintenance fee
    pub platform_fee: Decimal,

    /// Ordered per-owner breakdown of the period
    pub owners: Vec<OwnerInformation>,
}
