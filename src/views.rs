//! Read-only projections of the round log for display.
//!
//! Nothing here feeds back into the ledger or the settlement engine.

use crate::balance::NetBalances;
use crate::money::Money;
use crate::player::{name_of, Player, PlayerId};
use crate::round::RoundRecord;
use std::collections::HashMap;

/// Label used for a winner who is no longer on the roster.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Number of rounds won per player id, removed players included.
pub fn win_counts(rounds: &[RoundRecord]) -> HashMap<PlayerId, usize> {
    let mut counts = HashMap::new();
    for round in rounds {
        *counts.entry(round.winner.clone()).or_insert(0) += 1;
    }
    counts
}

/// A slice of the win-share chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinShare {
    pub name: String,
    pub wins: usize,
}

/// Wins per winner, most wins first. Equal counts keep the order in which
/// each winner first won.
pub fn win_share(players: &[Player], rounds: &[RoundRecord]) -> Vec<WinShare> {
    let mut order: Vec<&PlayerId> = Vec::new();
    let mut counts: HashMap<&PlayerId, usize> = HashMap::new();
    for round in rounds {
        let count = counts.entry(&round.winner).or_insert(0);
        if *count == 0 {
            order.push(&round.winner);
        }
        *count += 1;
    }

    let mut shares: Vec<WinShare> = order
        .into_iter()
        .map(|id| WinShare {
            name: name_of(players, id).unwrap_or(UNKNOWN_PLAYER).to_string(),
            wins: counts[id],
        })
        .collect();
    shares.sort_by(|a, b| b.wins.cmp(&a.wins));
    shares
}

/// The players currently furthest ahead and furthest behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standouts {
    /// Highest positive balance, if anyone is ahead.
    pub top_winner: Option<String>,

    /// Lowest negative balance, if anyone is behind.
    pub biggest_loser: Option<String>,
}

/// Picks the standouts from `balances`. On ties the earlier roster entry wins.
pub fn standouts(balances: &NetBalances) -> Standouts {
    let mut top: Option<(&str, Money)> = None;
    let mut bottom: Option<(&str, Money)> = None;

    for entry in balances {
        if entry.balance.is_positive() && top.map_or(true, |(_, m)| entry.balance > m) {
            top = Some((entry.name.as_str(), entry.balance));
        }
        if entry.balance.is_negative() && bottom.map_or(true, |(_, m)| entry.balance < m) {
            bottom = Some((entry.name.as_str(), entry.balance));
        }
    }

    Standouts {
        top_winner: top.map(|(name, _)| name.to_string()),
        biggest_loser: bottom.map(|(name, _)| name.to_string()),
    }
}

/// Cumulative balances after a given round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    /// 1-based round number; `None` for the starting snapshot.
    pub round: Option<usize>,

    /// Every current player's name with their running balance, roster order.
    pub balances: Vec<(String, Money)>,
}

impl TrendPoint {
    /// Chart label: `start`, then `1R`, `2R`, ...
    pub fn label(&self) -> String {
        match self.round {
            None => "start".to_string(),
            Some(n) => format!("{}R", n),
        }
    }

    /// Running balance of the first player called `name`.
    pub fn get(&self, name: &str) -> Option<Money> {
        self.balances
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| *m)
    }
}

/// Per-round cumulative balances, oldest round first.
///
/// The sequence is computed lazily and can be walked any number of times;
/// each call to [`BalanceTrend::iter`] starts again from the all-zero
/// snapshot. Names come from the roster passed in, so renamed players show
/// their current name throughout.
#[derive(Debug, Clone, Copy)]
pub struct BalanceTrend<'a> {
    players: &'a [Player],
    rounds: &'a [RoundRecord],
}

impl<'a> BalanceTrend<'a> {
    pub fn iter(&self) -> TrendIter<'a> {
        TrendIter {
            rounds: self.rounds.iter(),
            running: NetBalances::zeroed(self.players),
            next_round: 0,
            started: false,
        }
    }

    /// Number of points, the starting snapshot included.
    pub fn len(&self) -> usize {
        self.rounds.len() + 1
    }

    /// Always `false`: the starting snapshot is always present.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<'a> IntoIterator for BalanceTrend<'a> {
    type Item = TrendPoint;
    type IntoIter = TrendIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &BalanceTrend<'a> {
    type Item = TrendPoint;
    type IntoIter = TrendIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`TrendPoint`]s.
#[derive(Debug)]
pub struct TrendIter<'a> {
    rounds: std::slice::Iter<'a, RoundRecord>,
    running: NetBalances,
    next_round: usize,
    started: bool,
}

impl TrendIter<'_> {
    fn snapshot(&self, round: Option<usize>) -> TrendPoint {
        TrendPoint {
            round,
            balances: self
                .running
                .iter()
                .map(|e| (e.name.clone(), e.balance))
                .collect(),
        }
    }
}

impl Iterator for TrendIter<'_> {
    type Item = TrendPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(self.snapshot(None));
        }
        let round = self.rounds.next()?;
        self.running.apply(round);
        self.next_round += 1;
        Some(self.snapshot(Some(self.next_round)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.rounds.len() + usize::from(!self.started);
        (left, Some(left))
    }
}

impl ExactSizeIterator for TrendIter<'_> {}

/// Running balances for charting. `rounds` must be in chronological order.
///
/// Rounds are applied with the same rule as [`NetBalances::compute`]: the
/// winner gains the full round total even if some losers have left the
/// roster. The last point therefore always equals the ledger's net balances.
pub fn balance_trend<'a>(players: &'a [Player], rounds: &'a [RoundRecord]) -> BalanceTrend<'a> {
    BalanceTrend { players, rounds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceEntry;
    use crate::round::{Loss, RoundId};

    fn roster() -> Vec<Player> {
        vec![
            Player::new(PlayerId::new("p1"), "Ann"),
            Player::new(PlayerId::new("p2"), "Bo"),
            Player::new(PlayerId::new("p3"), "Cy"),
        ]
    }

    fn round(id: u64, winner: &str, losses: &[(&str, i64)]) -> RoundRecord {
        RoundRecord {
            id: RoundId(id),
            winner: PlayerId::new(winner),
            losses: losses
                .iter()
                .map(|(p, a)| Loss {
                    player: PlayerId::new(*p),
                    amount: Money::from(*a),
                })
                .collect(),
        }
    }

    #[test]
    fn test_win_counts() {
        let rounds = vec![
            round(1, "p1", &[("p2", 10)]),
            round(2, "p2", &[("p1", 10)]),
            round(3, "p1", &[("p3", 10)]),
            round(4, "gone", &[("p3", 10)]),
        ];
        let counts = win_counts(&rounds);

        assert_eq!(counts[&PlayerId::new("p1")], 2);
        assert_eq!(counts[&PlayerId::new("p2")], 1);
        assert_eq!(counts[&PlayerId::new("gone")], 1);
        assert!(!counts.contains_key(&PlayerId::new("p3")));
    }

    #[test]
    fn test_win_share_sorted_with_unknown_label() {
        let rounds = vec![
            round(1, "gone", &[("p2", 10)]),
            round(2, "p2", &[("p1", 10)]),
            round(3, "p2", &[("p3", 10)]),
        ];
        let shares = win_share(&roster(), &rounds);

        assert_eq!(
            shares,
            vec![
                WinShare {
                    name: "Bo".to_string(),
                    wins: 2
                },
                WinShare {
                    name: UNKNOWN_PLAYER.to_string(),
                    wins: 1
                },
            ]
        );
    }

    #[test]
    fn test_standouts() {
        let balances = NetBalances::from_entries(vec![
            BalanceEntry::new(PlayerId::new("p1"), "Ann", Money::from(300)),
            BalanceEntry::new(PlayerId::new("p2"), "Bo", Money::from(-500)),
            BalanceEntry::new(PlayerId::new("p3"), "Cy", Money::from(200)),
        ]);
        let s = standouts(&balances);

        assert_eq!(s.top_winner.as_deref(), Some("Ann"));
        assert_eq!(s.biggest_loser.as_deref(), Some("Bo"));
    }

    #[test]
    fn test_standouts_when_even() {
        let s = standouts(&NetBalances::zeroed(&roster()));
        assert_eq!(s, Standouts::default());
    }

    #[test]
    fn test_trend_points() {
        let players = roster();
        let rounds = vec![
            round(1, "p1", &[("p2", 100), ("p3", 50)]),
            round(2, "p3", &[("p1", 30)]),
        ];
        let trend = balance_trend(&players, &rounds);
        let points: Vec<_> = trend.iter().collect();

        assert_eq!(trend.len(), 3);
        assert_eq!(points.len(), 3);

        assert_eq!(points[0].label(), "start");
        assert!(points[0].balances.iter().all(|(_, m)| m.is_zero()));

        assert_eq!(points[1].label(), "1R");
        assert_eq!(points[1].get("Ann"), Some(Money::from(150)));
        assert_eq!(points[1].get("Bo"), Some(Money::from(-100)));
        assert_eq!(points[1].get("Cy"), Some(Money::from(-50)));

        assert_eq!(points[2].label(), "2R");
        assert_eq!(points[2].get("Ann"), Some(Money::from(120)));
        assert_eq!(points[2].get("Cy"), Some(Money::from(-20)));
    }

    #[test]
    fn test_trend_is_restartable() {
        let players = roster();
        let rounds = vec![round(1, "p1", &[("p2", 100)])];
        let trend = balance_trend(&players, &rounds);

        let first: Vec<_> = trend.iter().collect();
        let second: Vec<_> = trend.into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trend_ends_at_net_balances() {
        let players = roster();
        let rounds = vec![
            round(1, "p1", &[("p2", 100), ("gone", 70)]),
            round(2, "p2", &[("p3", 40)]),
        ];
        let last = balance_trend(&players, &rounds).iter().last().unwrap();
        let net = NetBalances::compute(&players, &rounds);

        for entry in &net {
            assert_eq!(last.get(&entry.name), Some(entry.balance));
        }
    }

    #[test]
    fn test_trend_size_hint() {
        let players = roster();
        let rounds = vec![round(1, "p1", &[("p2", 1)]), round(2, "p1", &[("p2", 1)])];
        let mut iter = balance_trend(&players, &rounds).iter();

        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }
}
