use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An approved mining farm, as returned by the farm directory.
/// Read-only reference data for the duration of a payout pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    /// Farm identifier
    pub id: String,

    /// Human-readable farm name, also used for pool hash power lookups
    pub name: String,

    /// Wallet sub-account name on the Bitcoin node
    pub wallet: String,

    /// Address the mining pool pays rewards into
    pub receiving_address: String,

    /// Address receiving the farm owner's unminted-hash-power leftover
    pub leftover_address: String,

    /// Address receiving the farm's share of maintenance fees
    pub maintenance_address: String,

    /// Monthly maintenance fee in BTC, spread across the farm's hash power
    pub monthly_maintenance_fee: Decimal,
}
