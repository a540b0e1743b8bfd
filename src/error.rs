//! Error types for the settlement ledger.

use crate::money::Money;
use crate::player::PlayerId;
use crate::round::RoundId;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while keeping or settling the ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The roster would drop below its minimum size
    #[error("At least {minimum} players are required")]
    InvariantViolation { minimum: usize },

    /// A player id that is not on the current roster
    #[error("Unknown player id {id}")]
    InvalidReference { id: PlayerId },

    /// A round lists its own winner among the losers
    #[error("Player {id} cannot lose a round they won")]
    WinnerListedAsLoser { id: PlayerId },

    /// Debts and credits did not cancel out during settlement
    #[error("Unbalanced ledger: {unpaid} left unpaid, {uncollected} left uncollected")]
    UnbalancedLedger { unpaid: Money, uncollected: Money },

    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Stored state could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored round breaks the rules `record_round` enforces
    #[error("Stored round {round} is corrupt: {message}")]
    CorruptState { round: RoundId, message: String },

    /// Invalid round record in an import
    #[error("Invalid round at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: betting-settlement <rounds.csv>")]
    MissingArgument,
}
