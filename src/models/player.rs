//! Player data structures and the player API payload they are built from.

use crate::models::attribute::Attributes;
use crate::models::error::FitError;
use crate::models::position::Position;
use serde::{Deserialize, Serialize};

/// Unique identifier for a player (assigned by the game, numeric).
pub type PlayerId = u64;

/// Club name used for players not on any club roster.
pub const UNASSIGNED_CLUB: &str = "Unassigned";

fn unassigned() -> String {
    UNASSIGNED_CLUB.to_string()
}

/// An owned or listed player with normalized positions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: u32,
    pub positions: Vec<Position>,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(default)]
    pub overall: i32,
    #[serde(default = "unassigned", rename = "assigned_club")]
    pub assigned_club: String,
}

impl Player {
    /// Create an unassigned player with zeroed attributes.
    pub fn new(id: PlayerId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            age: 0,
            positions: Vec::new(),
            attributes: Attributes::default(),
            overall: 0,
            assigned_club: unassigned(),
        }
    }

    pub fn with_positions(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.positions = positions.into_iter().collect();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// "First Last", trimmed when either part is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Whether the player is eligible to play `position`.
    pub fn plays(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    pub fn is_unassigned(&self) -> bool {
        self.assigned_club.eq_ignore_ascii_case(UNASSIGNED_CLUB)
    }

    /// Move the player between clubs. `old_club` must match the current assignment.
    pub fn reassign(&mut self, old_club: &str, new_club: &str) -> Result<(), FitError> {
        if !self.assigned_club.eq_ignore_ascii_case(old_club.trim()) {
            return Err(FitError::ClubMismatch {
                expected: old_club.trim().to_string(),
                actual: self.assigned_club.clone(),
            });
        }
        let new_club = new_club.trim();
        self.assigned_club = if new_club.is_empty() || new_club.eq_ignore_ascii_case(UNASSIGNED_CLUB) {
            unassigned()
        } else {
            new_club.to_string()
        };
        Ok(())
    }
}

/// Player record as returned by the player API (`{ id, metadata: {...} }`).
#[derive(Clone, Debug, Deserialize)]
pub struct RemotePlayer {
    pub id: PlayerId,
    #[serde(default)]
    pub metadata: RemotePlayerMetadata,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemotePlayerMetadata {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub positions: Vec<String>,
    pub overall: i32,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl From<RemotePlayer> for Player {
    /// Positions that cannot be normalized are dropped (logged), never fatal.
    fn from(remote: RemotePlayer) -> Self {
        let m = remote.metadata;
        let mut positions = Vec::with_capacity(m.positions.len());
        for raw in &m.positions {
            match Position::normalize(raw) {
                Ok(p) if !positions.contains(&p) => positions.push(p),
                Ok(_) => {}
                Err(_) => log::warn!("player {}: dropping unknown position {:?}", remote.id, raw),
            }
        }
        Player {
            id: remote.id,
            first_name: m.first_name,
            last_name: m.last_name,
            age: m.age,
            positions,
            attributes: m.attributes,
            overall: m.overall,
            assigned_club: unassigned(),
        }
    }
}
