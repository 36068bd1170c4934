use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::domain::services::reward_allocator::floor_to_btc;

/// Outcome of batching for one address in one run.
/// Invariant: `payable + carried == previous + earned`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDecision {
    /// Payout address
    pub address: String,

    /// Amount computed for the address this run
    pub earned: Decimal,

    /// Sub-threshold balance carried in from earlier runs
    pub previous: Decimal,

    /// Amount actually paid this run (zero when below the threshold)
    pub payable: Decimal,

    /// New accumulated balance carried forward
    pub carried: Decimal,
}

/// Defers per-address payouts until they cross a configured threshold, so the
/// engine never broadcasts outputs smaller than their practical spend cost.
/// The carried balance is persisted across runs; owners are never shorted.
pub struct PayoutBatcher {
    threshold: Decimal,
}

impl PayoutBatcher {
    pub fn new(threshold: Decimal) -> Self {
        Self { threshold }
    }

    /// Decide which addresses get paid this run. Totals at or above the
    /// threshold pay out floored to 8 decimals, with the unrepresentable
    /// remainder carried forward; totals below it carry forward whole.
    pub fn decide(
        &self,
        earned: &BTreeMap<String, Decimal>,
        previous: &HashMap<String, Decimal>,
    ) -> Vec<BatchDecision> {
        earned
            .iter()
            .map(|(address, amount)| {
                let previous = previous.get(address).copied().unwrap_or(Decimal::ZERO);
                let total = *amount + previous;

                let (payable, carried) = if total >= self.threshold {
                    let payable = floor_to_btc(total);
                    (payable, total - payable)
                } else {
                    (Decimal::ZERO, total)
                };

                BatchDecision {
                    address: address.clone(),
                    earned: *amount,
                    previous,
                    payable,
                    carried,
                }
            })
            .collect()
    }
}
