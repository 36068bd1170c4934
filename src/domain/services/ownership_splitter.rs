use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::domain::contracts::PayoutAddressResolver;
use crate::domain::errors::PayoutError;
use crate::domain::models::{Nft, OwnerInformation, TransferEvent};

/// Result of splitting one NFT's payout period across its owners
#[derive(Debug, Clone)]
pub struct OwnershipSplit {
    /// Merged payout-address -> percent-of-period map. An owner who bought,
    /// sold and rebought within the period accumulates here.
    pub percents: BTreeMap<String, f64>,

    /// Ordered per-window audit trail. Rewards are filled in by the caller
    /// once the NFT's net reward is known.
    pub segments: Vec<OwnerInformation>,
}

/// Computes each owner's time-weighted share of an NFT's payout period
pub struct OwnershipSplitter {
    network: String,
}

impl OwnershipSplitter {
    pub fn new(network: &str) -> Self {
        Self {
            network: network.to_string(),
        }
    }

    /// Split the period `[start, end)` across the NFT's owners.
    ///
    /// Events outside the period are ignored. The stretch before the first
    /// retained event belongs to that event's `from` owner, each stretch
    /// between events to the later event's `from` owner, and the tail after
    /// the last event to its `to` owner. With no retained events the whole
    /// period belongs to the NFT's current owner.
    pub async fn split<R>(
        &self,
        resolver: &R,
        nft: &Nft,
        denom_id: &str,
        events: &[TransferEvent],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<OwnershipSplit, PayoutError>
    where
        R: PayoutAddressResolver + ?Sized,
    {
        if end <= start {
            return Err(PayoutError::InvalidPeriod(format!(
                "period end {} is not after start {} for NFT {}/{}",
                end, start, denom_id, nft.id
            )));
        }

        let total_seconds = (end - start).num_seconds();
        if total_seconds <= 0 {
            // Sub-second periods have a zero denominator at our granularity
            return Err(PayoutError::InvalidPeriod(format!(
                "period for NFT {}/{} is shorter than one second",
                denom_id, nft.id
            )));
        }

        // Keep only events inside the period
        let in_period: Vec<&TransferEvent> = events
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .collect();

        // (owner chain address, window start, window end)
        let mut windows: Vec<(String, DateTime<Utc>, DateTime<Utc>)> = Vec::new();

        if in_period.is_empty() {
            // Nothing changed hands: the current owner held the whole period
            windows.push((nft.owner.clone(), start, end));
        } else {
            let first = in_period[0];
            windows.push((first.from.clone(), start, first.timestamp));

            for pair in in_period.windows(2) {
                let (prev, next) = (pair[0], pair[1]);
                windows.push((next.from.clone(), prev.timestamp, next.timestamp));
            }

            let last = in_period[in_period.len() - 1];
            windows.push((last.to.clone(), last.timestamp, end));
        }

        // Resolve each distinct chain address once; a failure aborts the
        // whole computation, no partial attribution.
        let mut resolved: HashMap<String, String> = HashMap::new();
        let mut percents: BTreeMap<String, f64> = BTreeMap::new();
        let mut segments = Vec::with_capacity(windows.len());

        for (chain_address, window_start, window_end) in windows {
            let payout_address = match resolved.get(&chain_address) {
                Some(address) => address.clone(),
                None => {
                    let address = resolver
                        .payout_address_for(&chain_address, &self.network, &nft.id, denom_id)
                        .await?;
                    resolved.insert(chain_address.clone(), address.clone());
                    address
                }
            };

            let owned_seconds = (window_end - window_start).num_seconds();
            let percent = owned_seconds as f64 / total_seconds as f64 * 100.0;

            *percents.entry(payout_address.clone()).or_insert(0.0) += percent;
            segments.push(OwnerInformation {
                chain_address,
                payout_address,
                window_start,
                window_end,
                owned_seconds,
                percent,
                reward: Decimal::ZERO,
            });
        }

        Ok(OwnershipSplit { percents, segments })
    }
}
