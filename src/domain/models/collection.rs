use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a collection (denomination) scoped to a farm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Denomination identifier
    pub denom_id: String,
}

/// A collection with its full NFT data loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Denomination identifier
    pub denom_id: String,

    /// NFTs belonging to this collection
    pub nfts: Vec<Nft>,
}

/// A hash-power-backed NFT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nft {
    /// NFT identifier within its collection
    pub id: String,

    /// Hash rate this NFT entitles its owner to
    pub hash_rate: f64,

    /// Expiration timestamp; expired NFTs earn no reward but are kept
    pub expires_at: DateTime<Utc>,

    /// Mint timestamp, the first payout period's start when no statistics exist
    pub minted_at: DateTime<Utc>,

    /// Current owner's chain address
    pub owner: String,
}

impl Nft {
    /// An expired NFT earns no reward. Payout periods always end at the pass
    /// start, so checking against the pass start also covers expiration before
    /// the period start.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
