use std::collections::HashSet;

use crate::domain::errors::PayoutError;
use crate::domain::models::{UtxoRef, WalletUtxo};

/// Outcome of funding selection for one farm run
#[derive(Debug, Clone)]
pub struct FundingSelection {
    /// The single eligible, unprocessed output this run spends
    pub funding: WalletUtxo,

    /// Every output on a farm receiving address seen this run, for the ledger
    pub observed: Vec<WalletUtxo>,
}

/// Picks the funding output for a farm run out of the wallet's unspent set.
///
/// Only outputs on one of the farm's receiving addresses count as farm
/// income; wallet change is excluded. Outputs already marked processed in the
/// UTXO ledger are never spent again.
pub struct FundingSelector;

impl FundingSelector {
    pub fn new() -> Self {
        Self
    }

    /// Select the farm's funding output. Exactly one eligible output is
    /// expected per run; zero cannot fund the run, and more than one is an
    /// anomaly that fails the run rather than guessing which to spend.
    pub fn select(
        &self,
        utxos: &[WalletUtxo],
        receiving_addresses: &[String],
        processed: &HashSet<UtxoRef>,
    ) -> Result<FundingSelection, PayoutError> {
        let observed: Vec<WalletUtxo> = utxos
            .iter()
            .filter(|u| {
                u.address
                    .as_ref()
                    .is_some_and(|a| receiving_addresses.contains(a))
            })
            .cloned()
            .collect();

        let mut eligible = observed
            .iter()
            .filter(|u| !processed.contains(&UtxoRef::from(*u)))
            .cloned()
            .collect::<Vec<_>>();

        match eligible.len() {
            0 => Err(PayoutError::FundingError(
                "no eligible unprocessed funding output".to_string(),
            )),
            1 => Ok(FundingSelection {
                funding: eligible.remove(0),
                observed,
            }),
            n => Err(PayoutError::FundingError(format!(
                "{} eligible funding outputs found, expected exactly one",
                n
            ))),
        }
    }
}

impl Default for FundingSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn utxo(txid: &str, vout: u32, address: Option<&str>) -> WalletUtxo {
        WalletUtxo {
            txid: txid.to_string(),
            vout,
            address: address.map(str::to_string),
            amount: Decimal::ONE,
        }
    }

    fn receiving() -> Vec<String> {
        vec!["farm-addr".to_string()]
    }

    #[test]
    fn selects_the_single_eligible_output() {
        let utxos = vec![
            utxo("aa", 0, Some("farm-addr")),
            utxo("bb", 1, Some("change-addr")),
            utxo("cc", 0, None),
        ];

        let selection = FundingSelector::new()
            .select(&utxos, &receiving(), &HashSet::new())
            .unwrap();

        assert_eq!(selection.funding.txid, "aa");
        assert_eq!(selection.observed.len(), 1);
    }

    #[test]
    fn processed_outputs_are_never_selected_again() {
        let utxos = vec![
            utxo("aa", 0, Some("farm-addr")),
            utxo("bb", 0, Some("farm-addr")),
        ];
        let processed: HashSet<UtxoRef> = [UtxoRef {
            txid: "aa".to_string(),
            vout: 0,
        }]
        .into_iter()
        .collect();

        let selection = FundingSelector::new()
            .select(&utxos, &receiving(), &processed)
            .unwrap();

        assert_eq!(selection.funding.txid, "bb");
        // The processed output is still observed for the ledger
        assert_eq!(selection.observed.len(), 2);
    }

    #[test]
    fn no_eligible_output_fails_the_run() {
        let utxos = vec![utxo("bb", 1, Some("change-addr"))];
        let result = FundingSelector::new().select(&utxos, &receiving(), &HashSet::new());
        assert!(matches!(result, Err(PayoutError::FundingError(_))));
    }

    #[test]
    fn multiple_eligible_outputs_fail_the_run() {
        let utxos = vec![
            utxo("aa", 0, Some("farm-addr")),
            utxo("bb", 0, Some("farm-addr")),
        ];
        let result = FundingSelector::new().select(&utxos, &receiving(), &HashSet::new());
        assert!(matches!(result, Err(PayoutError::FundingError(_))));
    }
}
