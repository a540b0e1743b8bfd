//! Round records and their CSV import representation.

use crate::money::Money;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a round record, strictly increasing in recording order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What one player lost in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loss {
    pub player: PlayerId,

    /// Never negative; input is coerced before a `Loss` is built.
    pub amount: Money,
}

/// One game outcome: a single winner collecting every listed loss.
///
/// # Invariants
///
/// - `winner` never appears among `losses`
/// - every `amount` is zero or positive
///
/// Records are immutable once appended to the ledger; removal is the only
/// way to undo one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: RoundId,
    pub winner: PlayerId,
    pub losses: Vec<Loss>,
}

impl RoundRecord {
    /// The winner's gain: the sum of every loss in the round.
    pub fn total(&self) -> Money {
        self.losses.iter().map(|l| l.amount).sum()
    }

    /// Returns `true` if `player` won or lost in this round.
    pub fn involves(&self, player: &PlayerId) -> bool {
        &self.winner == player || self.losses.iter().any(|l| &l.player == player)
    }
}

/// Raw round row as read from CSV.
///
/// A round spans consecutive rows sharing the same `round` token; each row
/// contributes one loser.
#[derive(Debug, Deserialize)]
pub struct RoundRow {
    /// Token grouping rows into one round
    pub round: String,

    /// Winner's display name
    pub winner: String,

    /// Loser's display name
    pub loser: Option<String>,

    /// Lost amount, free text
    pub amount: Option<String>,
}

/// A round row with its fields checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub round: String,
    pub winner: String,
    pub loser: String,
    pub amount: Money,
}

impl RoundRow {
    /// Validates the row. Returns a description of the problem when the row
    /// cannot contribute to a round.
    ///
    /// The amount follows the lenient policy: a missing or unreadable amount
    /// is recorded as zero rather than rejected.
    pub fn parse(&self) -> std::result::Result<ParsedRow, String> {
        let round = self.round.trim();
        if round.is_empty() {
            return Err("missing round".to_string());
        }

        let winner = self.winner.trim();
        if winner.is_empty() {
            return Err("missing winner".to_string());
        }

        let loser = self.loser.as_deref().map(str::trim).unwrap_or_default();
        if loser.is_empty() {
            return Err("missing loser".to_string());
        }
        if loser == winner {
            return Err(format!("{} is both winner and loser", winner));
        }

        Ok(ParsedRow {
            round: round.to_string(),
            winner: winner.to_string(),
            loser: loser.to_string(),
            amount: Money::coerce_str(self.amount.as_deref().unwrap_or_default()),
        })
    }
}
