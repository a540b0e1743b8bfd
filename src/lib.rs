//! # Betting Settlement
//!
//! Keeps a round-by-round log of a multi-player betting game and works out
//! the fewest practical payments needed to settle up.
//!
//! ## Design Principles
//!
//! - **Single source of truth**: the [`Ledger`] owns the roster and the round
//!   log; balances, plans and chart data are recomputed from it on demand
//! - **Whole-unit arithmetic**: amounts use `rust_decimal` at scale 0
//! - **Lenient input**: negative or unreadable stakes count as zero
//! - **Deterministic output**: balances follow roster order and settlement
//!   uses stable sorts, so identical input gives identical plans
//!
//! ## Example
//!
//! ```
//! use betting_settlement::{render_transfers, ExportOptions, Ledger};
//!
//! let mut ledger = Ledger::with_players(["Ann", "Bo", "Cy"]).unwrap();
//! ledger.record_round("p1", [("p2", 1000), ("p3", 500)]).unwrap();
//!
//! let plan = ledger.settle().unwrap();
//! let text = render_transfers(&plan, &ExportOptions::default()).unwrap();
//! assert!(text.contains("Bo -> Ann : 1,000"));
//! ```

pub mod balance;
pub mod error;
pub mod export;
pub mod import;
pub mod ledger;
pub mod money;
pub mod player;
pub mod round;
pub mod settlement;
pub mod store;
pub mod views;

pub use balance::{BalanceEntry, NetBalances};
pub use error::{LedgerError, Result};
pub use export::{render_transfer, render_transfers, ExportOptions};
pub use import::import_rounds;
pub use ledger::{Ledger, LedgerConfig, HISTORY_KEY, PLAYERS_KEY};
pub use money::{IntoAmount, Money};
pub use player::{Player, PlayerId};
pub use round::{Loss, ParsedRow, RoundId, RoundRecord, RoundRow};
pub use settlement::{settle, Transfer, TransferPlan};
pub use store::{FileStore, MemoryStore, Store};
pub use views::{
    balance_trend, standouts, win_counts, win_share, BalanceTrend, Standouts, TrendIter,
    TrendPoint, WinShare,
};
