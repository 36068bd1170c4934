use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ownership transfer of an NFT. The ascending-sorted list of these
/// events forms the provenance chain ownership windows are computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Chain address the NFT moved away from
    pub from: String,

    /// Chain address the NFT moved to
    pub to: String,

    /// When the transfer happened
    pub timestamp: DateTime<Utc>,
}

/// Sort transfer events ascending by timestamp. Events for one NFT must be
/// monotonically non-decreasing after this.
pub fn sort_ascending(events: &mut [TransferEvent]) {
    events.sort_by_key(|e| e.timestamp);
}
