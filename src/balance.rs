//! Net balances derived from the round log.

use crate::money::Money;
use crate::player::{Player, PlayerId};
use crate::round::RoundRecord;

/// One player's net position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub player: PlayerId,
    pub name: String,
    pub balance: Money,
}

impl BalanceEntry {
    pub fn new(player: PlayerId, name: impl Into<String>, balance: Money) -> Self {
        BalanceEntry {
            player,
            name: name.into(),
            balance,
        }
    }
}

/// Net gain (positive) or loss (negative) per player, in roster order.
///
/// Always derived from the full round log; never stored or patched in place.
/// Keeping roster order makes everything computed from it, settlement
/// included, deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetBalances {
    entries: Vec<BalanceEntry>,
}

impl NetBalances {
    /// Every roster member at zero.
    pub fn zeroed(players: &[Player]) -> Self {
        NetBalances {
            entries: players
                .iter()
                .map(|p| BalanceEntry::new(p.id.clone(), p.name.clone(), Money::ZERO))
                .collect(),
        }
    }

    /// Builds balances from explicit entries, keeping their order.
    pub fn from_entries(entries: Vec<BalanceEntry>) -> Self {
        NetBalances { entries }
    }

    /// Replays `rounds` over a zeroed roster.
    ///
    /// Each loss is subtracted from its loser and the round's full loss total
    /// is credited to the winner. Players no longer on the roster are skipped
    /// on whichever side they appear; the other side is still applied.
    pub fn compute<'a, I>(players: &[Player], rounds: I) -> Self
    where
        I: IntoIterator<Item = &'a RoundRecord>,
    {
        let mut balances = NetBalances::zeroed(players);
        for round in rounds {
            balances.apply(round);
        }
        balances
    }

    /// Applies a single round on top of the current values.
    pub(crate) fn apply(&mut self, round: &RoundRecord) {
        for loss in &round.losses {
            if let Some(entry) = self.entry_mut(&loss.player) {
                entry.balance -= loss.amount;
            }
        }
        let total = round.total();
        if let Some(entry) = self.entry_mut(&round.winner) {
            entry.balance += total;
        }
    }

    fn entry_mut(&mut self, id: &PlayerId) -> Option<&mut BalanceEntry> {
        self.entries.iter_mut().find(|e| &e.player == id)
    }

    /// Balance of `id`, if the player is present.
    pub fn get(&self, id: &PlayerId) -> Option<Money> {
        self.entries
            .iter()
            .find(|e| &e.player == id)
            .map(|e| e.balance)
    }

    /// Sum over every entry. Zero for any log whose players are all still
    /// on the roster.
    pub fn total(&self) -> Money {
        self.entries.iter().map(|e| e.balance).sum()
    }

    /// Number of entries with a non-zero balance.
    pub fn non_zero_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.balance.is_zero()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BalanceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a NetBalances {
    type Item = &'a BalanceEntry;
    type IntoIter = std::slice::Iter<'a, BalanceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
