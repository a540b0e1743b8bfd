//! Debt settlement.
//!
//! Reduces net balances to a short list of point-to-point payments with the
//! classic greedy sweep: the largest remaining debt is always paid towards the
//! largest remaining credit. This yields at most `n - 1` transfers for `n`
//! players with a non-zero balance. It is a heuristic; finding the true
//! minimum number of transfers is NP-hard.

use crate::balance::NetBalances;
use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::player::PlayerId;
use log::{debug, warn};

/// A single payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Debtor's display name
    pub from: String,

    /// Creditor's display name
    pub to: String,

    pub from_id: PlayerId,
    pub to_id: PlayerId,

    /// Always positive.
    pub amount: Money,
}

/// Transfers in the order the sweep produced them.
pub type TransferPlan = Vec<Transfer>;

/// One side of the sweep with whatever is still open.
struct Party<'a> {
    id: &'a PlayerId,
    name: &'a str,
    remaining: Money,
}

/// Computes the transfers that bring every balance to zero.
///
/// Zero balances are ignored. Debtors and creditors are each sorted by
/// magnitude, largest first; equal magnitudes keep their input order.
///
/// Fails with [`LedgerError::UnbalancedLedger`] when debts and credits do not
/// cancel out, which means the balances did not sum to zero.
pub fn settle(balances: &NetBalances) -> Result<TransferPlan> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for entry in balances {
        let party = Party {
            id: &entry.player,
            name: &entry.name,
            remaining: entry.balance.abs(),
        };
        if entry.balance.is_negative() {
            debtors.push(party);
        } else if entry.balance.is_positive() {
            creditors.push(party);
        }
    }

    // `sort_by` is stable, so ties keep roster order.
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut transfers = TransferPlan::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let amount = debtor.remaining.min(creditor.remaining);

        transfers.push(Transfer {
            from: debtor.name.to_string(),
            to: creditor.name.to_string(),
            from_id: debtor.id.clone(),
            to_id: creditor.id.clone(),
            amount,
        });
        debtor.remaining -= amount;
        creditor.remaining -= amount;

        if debtor.remaining.is_zero() {
            i += 1;
        }
        if creditor.remaining.is_zero() {
            j += 1;
        }
    }

    let unpaid: Money = debtors[i..].iter().map(|d| d.remaining).sum();
    let uncollected: Money = creditors[j..].iter().map(|c| c.remaining).sum();
    if !unpaid.is_zero() || !uncollected.is_zero() {
        warn!(
            "Settlement left {} unpaid and {} uncollected",
            unpaid, uncollected
        );
        return Err(LedgerError::UnbalancedLedger {
            unpaid,
            uncollected,
        });
    }

    debug!(
        "Settled {} debtors and {} creditors with {} transfers",
        debtors.len(),
        creditors.len(),
        transfers.len()
    );
    Ok(transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceEntry;

    fn balances(entries: &[(&str, i64)]) -> NetBalances {
        NetBalances::from_entries(
            entries
                .iter()
                .map(|(name, amount)| {
                    BalanceEntry::new(
                        PlayerId::new(name.to_lowercase()),
                        *name,
                        Money::from(*amount),
                    )
                })
                .collect(),
        )
    }

    fn summary(plan: &TransferPlan) -> Vec<(String, String, Money)> {
        plan.iter()
            .map(|t| (t.from.clone(), t.to.clone(), t.amount))
            .collect()
    }

    #[test]
    fn test_single_winner() {
        let plan = settle(&balances(&[("A", 1500), ("B", -1000), ("C", -500), ("D", 0)])).unwrap();

        assert_eq!(
            summary(&plan),
            vec![
                ("B".to_string(), "A".to_string(), Money::from(1000)),
                ("C".to_string(), "A".to_string(), Money::from(500)),
            ]
        );
        assert_eq!(plan[0].from_id, PlayerId::new("b"));
        assert_eq!(plan[0].to_id, PlayerId::new("a"));
    }

    #[test]
    fn test_all_zero_needs_no_transfers() {
        let plan = settle(&balances(&[("A", 0), ("B", 0)])).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let plan = settle(&NetBalances::default()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_largest_debtor_pays_largest_creditor_first() {
        let plan = settle(&balances(&[
            ("A", 300),
            ("B", -100),
            ("C", 700),
            ("D", -900),
        ]))
        .unwrap();

        assert_eq!(
            summary(&plan),
            vec![
                ("D".to_string(), "C".to_string(), Money::from(700)),
                ("D".to_string(), "A".to_string(), Money::from(200)),
                ("B".to_string(), "A".to_string(), Money::from(100)),
            ]
        );
    }

    #[test]
    fn test_exact_match_advances_both_sides() {
        let plan = settle(&balances(&[("A", 500), ("B", -500), ("C", 200), ("D", -200)])).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].amount, Money::from(500));
        assert_eq!(plan[1].amount, Money::from(200));
    }

    #[test]
    fn test_transfer_count_bound() {
        let input = balances(&[("A", 10), ("B", 20), ("C", 30), ("D", -25), ("E", -35)]);
        let plan = settle(&input).unwrap();
        assert!(plan.len() <= input.non_zero_count() - 1);
    }

    #[test]
    fn test_unbalanced_credit_is_rejected() {
        let err = settle(&balances(&[("A", 100), ("B", -60)])).unwrap_err();
        match err {
            LedgerError::UnbalancedLedger {
                unpaid,
                uncollected,
            } => {
                assert!(unpaid.is_zero());
                assert_eq!(uncollected, Money::from(40));
            }
            other => panic!("Expected UnbalancedLedger, got {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_debt_is_rejected() {
        let err = settle(&balances(&[("A", -100)])).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::UnbalancedLedger { unpaid, .. } if unpaid == Money::from(100)
        ));
    }
}
