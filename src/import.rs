//! Builds a ledger from a CSV round log.
//!
//! Expected columns: `round,winner,loser,amount`. Consecutive rows sharing a
//! `round` token make up one round, one row per loser. Players are identified
//! by name and join the roster in the order they are first seen.

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::money::Money;
use crate::player::PlayerId;
use crate::round::{ParsedRow, RoundRow};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Read;

/// A round whose rows are still being collected.
struct PendingRound {
    token: String,
    winner: String,
    losses: Vec<(String, Money)>,
}

/// Reads a round log and replays it into a fresh in-memory ledger.
///
/// Rows that cannot be used are logged at warn level and skipped: missing
/// fields, a loser equal to the winner, or a winner that changes part way
/// through a round. Amounts are coerced leniently, so an unreadable amount
/// counts as zero.
///
/// Fails with [`LedgerError::InvariantViolation`] if fewer than two distinct
/// players appear in usable rows.
pub fn import_rounds<R: Read>(reader: R) -> Result<Ledger> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut names: Vec<String> = Vec::new();
    let mut rounds: Vec<PendingRound> = Vec::new();

    for (row_idx, result) in csv_reader.deserialize::<RoundRow>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let parsed = match result {
            Ok(record) => record.parse().map_err(|message| LedgerError::InvalidRecord {
                row: row_num,
                message,
            }),
            Err(e) => Err(e.into()),
        };

        match parsed.and_then(|row| add_row(&mut rounds, row, row_num)) {
            Ok((winner, loser)) => {
                for name in [winner, loser] {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
            Err(e) => warn!("{}", skip_reason(row_num, &e)),
        }
    }

    let mut ledger = Ledger::with_players(names.iter().cloned())?;
    let ids: HashMap<String, PlayerId> = ledger
        .players()
        .iter()
        .map(|p| (p.name.clone(), p.id.clone()))
        .collect();

    for round in rounds {
        let losses = round
            .losses
            .into_iter()
            .map(|(name, amount)| (ids[&name].clone(), amount));
        let id = ledger.record_round(ids[&round.winner].clone(), losses)?;
        debug!("Imported round {} as {}", round.token, id);
    }

    Ok(ledger)
}

/// Warning text for a skipped row. [`LedgerError::InvalidRecord`] already
/// names its row.
fn skip_reason(row_num: usize, e: &LedgerError) -> String {
    match e {
        LedgerError::InvalidRecord { .. } => e.to_string(),
        _ => format!("Row {}: {}", row_num, e),
    }
}

/// Adds a row to the current round or opens a new one. Returns the winner
/// and loser names on success.
fn add_row(
    rounds: &mut Vec<PendingRound>,
    row: ParsedRow,
    row_num: usize,
) -> Result<(String, String)> {
    match rounds.last_mut() {
        Some(current) if current.token == row.round => {
            if current.winner != row.winner {
                return Err(LedgerError::InvalidRecord {
                    row: row_num,
                    message: format!(
                        "round {} was won by {}, not {}",
                        row.round, current.winner, row.winner
                    ),
                });
            }
            current.losses.push((row.loser.clone(), row.amount));
        }
        _ => rounds.push(PendingRound {
            token: row.round,
            winner: row.winner.clone(),
            losses: vec![(row.loser.clone(), row.amount)],
        }),
    }
    Ok((row.winner, row.loser))
}
