//! The betting ledger.
//!
//! Owns the roster and the round log and is the single source of truth for
//! both. Net balances, settlement plans and chart data are derived from it on
//! demand and never cached. Every successful mutation is written through to
//! the injected [`Store`] on a best-effort basis.

use crate::balance::NetBalances;
use crate::error::{LedgerError, Result};
use crate::money::{IntoAmount, Money};
use crate::player::{Player, PlayerId};
use crate::round::{Loss, RoundId, RoundRecord};
use crate::settlement::{settle, TransferPlan};
use crate::store::{MemoryStore, Store};
use crate::views::{self, BalanceTrend};
use log::{debug, warn};
use std::collections::HashMap;

/// Store key holding the serialized roster.
pub const PLAYERS_KEY: &str = "bettingPlayers";

/// Store key holding the serialized round log.
pub const HISTORY_KEY: &str = "bettingHistory";

/// Roster policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// The roster never shrinks below this many players.
    pub min_players: usize,

    /// Players created for a fresh or reset ledger.
    pub default_roster_size: usize,

    /// Default names are `"<name_prefix> <n>"`.
    pub name_prefix: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            min_players: 2,
            default_roster_size: 4,
            name_prefix: "Player".to_string(),
        }
    }
}

/// Roster plus append-only round log.
///
/// # Invariants
///
/// - the roster holds at least `config.min_players` players
/// - player ids and round ids are never handed out twice
/// - no operation leaves a partial mutation behind: validation happens
///   before anything changes
#[derive(Debug)]
pub struct Ledger<S: Store = MemoryStore> {
    /// Current roster, in display order.
    players: Vec<Player>,

    /// Round log, oldest first.
    rounds: Vec<RoundRecord>,

    store: S,
    config: LedgerConfig,

    next_player_seq: u64,
    next_round_id: u64,
}

impl Ledger<MemoryStore> {
    /// Creates an in-memory ledger with the default roster.
    pub fn new() -> Self {
        let config = LedgerConfig::default();
        let players = default_roster(&config);
        Ledger::assemble(players, Vec::new(), MemoryStore::new(), config)
    }

    /// Creates an in-memory ledger whose roster uses the given names.
    ///
    /// Fails with [`LedgerError::InvariantViolation`] if fewer names are given
    /// than the roster minimum.
    pub fn with_players<I, N>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let config = LedgerConfig::default();
        let players: Vec<Player> = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Player::new(generated_id(idx as u64 + 1), name))
            .collect();
        if players.len() < config.min_players {
            return Err(LedgerError::InvariantViolation {
                minimum: config.min_players,
            });
        }
        Ok(Ledger::assemble(players, Vec::new(), MemoryStore::new(), config))
    }
}

impl Default for Ledger<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Store> Ledger<S> {
    /// Restores a ledger from `store`.
    ///
    /// Missing keys fall back to the default roster and an empty log. Stored
    /// state that cannot be decoded, a stored roster below the minimum, or a
    /// stored round that `record_round` would never have produced is an
    /// error.
    pub fn open(store: S, config: LedgerConfig) -> Result<Self> {
        let players = match store.load(PLAYERS_KEY)? {
            Some(json) => serde_json::from_str::<Vec<Player>>(&json)?,
            None => default_roster(&config),
        };
        if players.len() < config.min_players {
            return Err(LedgerError::InvariantViolation {
                minimum: config.min_players,
            });
        }

        let rounds = match store.load(HISTORY_KEY)? {
            Some(json) => serde_json::from_str::<Vec<RoundRecord>>(&json)?,
            None => Vec::new(),
        };
        for record in &rounds {
            check_stored_round(record)?;
        }

        debug!(
            "Opened ledger with {} players and {} rounds",
            players.len(),
            rounds.len()
        );
        Ok(Ledger::assemble(players, rounds, store, config))
    }

    fn assemble(
        players: Vec<Player>,
        rounds: Vec<RoundRecord>,
        store: S,
        config: LedgerConfig,
    ) -> Self {
        // Rounds may still mention removed players; their ids stay reserved.
        let highest_seq = players
            .iter()
            .map(|p| &p.id)
            .chain(rounds.iter().map(|r| &r.winner))
            .chain(rounds.iter().flat_map(|r| r.losses.iter().map(|l| &l.player)))
            .filter_map(PlayerId::sequence)
            .max()
            .unwrap_or(0);
        let highest_round = rounds.iter().map(|r| r.id.0).max().unwrap_or(0);

        Ledger {
            players,
            rounds,
            store,
            config,
            next_player_seq: highest_seq + 1,
            next_round_id: highest_round + 1,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current roster in display order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn is_on_roster(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == id)
    }

    /// Round log, oldest first.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Round log, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &RoundRecord> {
        self.rounds.iter().rev()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Adds a player with a fresh id and a default name.
    pub fn add_player(&mut self) -> PlayerId {
        let id = generated_id(self.next_player_seq);
        self.next_player_seq += 1;

        let name = format!("{} {}", self.config.name_prefix, self.players.len() + 1);
        debug!("Adding player {} as {:?}", id, name);
        self.players.push(Player::new(id.clone(), name));

        self.persist();
        id
    }

    /// Removes a player from the roster.
    ///
    /// A roster at its minimum size rejects every removal with
    /// [`LedgerError::InvariantViolation`]. Removing an unknown id is a no-op.
    /// Rounds mentioning the player stay in the log.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<()> {
        if self.players.len() <= self.config.min_players {
            return Err(LedgerError::InvariantViolation {
                minimum: self.config.min_players,
            });
        }

        let before = self.players.len();
        self.players.retain(|p| &p.id != id);
        if self.players.len() == before {
            debug!("Remove ignored: player {} not on the roster", id);
            return Ok(());
        }

        let mentioned = self.rounds.iter().filter(|r| r.involves(id)).count();
        debug!("Removed player {} ({} rounds keep their entries)", id, mentioned);
        self.persist();
        Ok(())
    }

    /// Changes a player's display name. Any string is accepted.
    pub fn rename_player(&mut self, id: &PlayerId, name: impl Into<String>) -> Result<()> {
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| LedgerError::InvalidReference { id: id.clone() })?;
        player.name = name.into();
        debug!("Renamed player {} to {:?}", id, player.name);

        self.persist();
        Ok(())
    }

    /// Appends a round won by `winner`, collecting every listed loss.
    ///
    /// The winner and every loser must be on the roster
    /// ([`LedgerError::InvalidReference`]) and the winner may not be listed
    /// as a loser ([`LedgerError::WinnerListedAsLoser`]). Amounts are coerced
    /// leniently through [`IntoAmount`]: negative or unreadable amounts
    /// count as zero.
    pub fn record_round<W, I, P, A>(&mut self, winner: W, losses: I) -> Result<RoundId>
    where
        W: Into<PlayerId>,
        I: IntoIterator<Item = (P, A)>,
        P: Into<PlayerId>,
        A: IntoAmount,
    {
        let winner = winner.into();
        if !self.is_on_roster(&winner) {
            return Err(LedgerError::InvalidReference { id: winner });
        }

        let mut checked = Vec::new();
        for (player, amount) in losses {
            let player = player.into();
            if player == winner {
                return Err(LedgerError::WinnerListedAsLoser { id: player });
            }
            if !self.is_on_roster(&player) {
                return Err(LedgerError::InvalidReference { id: player });
            }
            checked.push(Loss {
                player,
                amount: amount.into_amount(),
            });
        }

        let id = RoundId(self.next_round_id);
        self.next_round_id += 1;

        let record = RoundRecord {
            id,
            winner,
            losses: checked,
        };
        debug!(
            "Recorded round {}: {} wins {}",
            id,
            record.winner,
            record.total()
        );
        self.rounds.push(record);

        self.persist();
        Ok(id)
    }

    /// Removes a round. Returns `false` (and changes nothing) if no round has
    /// that id.
    pub fn remove_round(&mut self, id: RoundId) -> bool {
        let before = self.rounds.len();
        self.rounds.retain(|r| r.id != id);
        if self.rounds.len() == before {
            debug!("Remove ignored: round {} not in the log", id);
            return false;
        }

        debug!("Removed round {}", id);
        self.persist();
        true
    }

    /// Clears the log and restores the default roster. Stored state is
    /// deleted, so reopening the store also yields a fresh ledger.
    pub fn reset(&mut self) {
        self.players = default_roster(&self.config);
        self.rounds.clear();
        self.next_player_seq = self.config.default_roster_size as u64 + 1;
        self.next_round_id = 1;

        for key in [PLAYERS_KEY, HISTORY_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear {}: {}", key, e);
            }
        }
        debug!("Ledger reset");
    }

    /// Net balance of every current player, recomputed from the full log.
    pub fn compute_net_balances(&self) -> NetBalances {
        NetBalances::compute(&self.players, &self.rounds)
    }

    /// Settlement plan for the current balances.
    pub fn settle(&self) -> Result<TransferPlan> {
        settle(&self.compute_net_balances())
    }

    /// Rounds won per player id.
    pub fn win_counts(&self) -> HashMap<PlayerId, usize> {
        views::win_counts(&self.rounds)
    }

    /// Cumulative balances per round, labelled with current names.
    pub fn balance_trend(&self) -> BalanceTrend<'_> {
        views::balance_trend(&self.players, &self.rounds)
    }

    /// Writes roster and log to the store. Failures are logged and dropped;
    /// the in-memory ledger stays authoritative.
    fn persist(&mut self) {
        let (players, rounds) = match self.encode_state() {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Failed to encode ledger state: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.save(PLAYERS_KEY, &players) {
            warn!("Failed to save {}: {}", PLAYERS_KEY, e);
        }
        if let Err(e) = self.store.save(HISTORY_KEY, &rounds) {
            warn!("Failed to save {}: {}", HISTORY_KEY, e);
        }
    }

    fn encode_state(&self) -> serde_json::Result<(String, String)> {
        let players = serde_json::to_string(&self.players)?;
        let rounds = serde_json::to_string(&self.rounds)?;
        Ok((players, rounds))
    }
}

/// Rejects a decoded round with a loss outside `0..=MAX_INPUT` or a winner
/// listed among its losers.
fn check_stored_round(record: &RoundRecord) -> Result<()> {
    let corrupt = |message: String| LedgerError::CorruptState {
        round: record.id,
        message,
    };
    for loss in &record.losses {
        if loss.player == record.winner {
            return Err(corrupt(format!("winner {} is listed as a loser", loss.player)));
        }
        if loss.amount.is_negative() || loss.amount > Money::max_input() {
            return Err(corrupt(format!(
                "loss of {} by {} is out of range",
                loss.amount, loss.player
            )));
        }
    }
    Ok(())
}

fn generated_id(seq: u64) -> PlayerId {
    PlayerId::new(format!("p{}", seq))
}

fn default_roster(config: &LedgerConfig) -> Vec<Player> {
    (1..=config.default_roster_size)
        .map(|n| {
            Player::new(
                generated_id(n as u64),
                format!("{} {}", config.name_prefix, n),
            )
        })
        .collect()
}
