//! Roster entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable player identifier.
///
/// Ids are never reused while the roster exists, even after the player is
/// removed, so rounds that still mention a removed player stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of a generated `p<n>` id.
    pub(crate) fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix('p')?.parse().ok()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId::new(id)
    }
}

/// A participant in the game.
///
/// The `id` is fixed for the player's lifetime; the display `name` may be
/// edited freely, including to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
        }
    }
}

/// Looks up the display name for `id` on a roster.
pub(crate) fn name_of<'a>(players: &'a [Player], id: &PlayerId) -> Option<&'a str> {
    players
        .iter()
        .find(|p| &p.id == id)
        .map(|p| p.name.as_str())
}
