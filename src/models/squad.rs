//! Squad assignment results and their aggregates.

use crate::models::fit::FitResult;
use crate::models::player::{Player, PlayerId};
use crate::models::position::Position;
use serde::{Deserialize, Serialize};

/// The player placed in a slot (a small view, not the full record).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AssignedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub overall: i32,
}

impl From<&Player> for AssignedPlayer {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.full_name(),
            overall: p.overall,
        }
    }
}

/// One slot of a squad. `player` and `fit` are both None when Unfilled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot: String,
    pub position: Position,
    /// Role name used for scoring this slot, if one was resolved.
    pub role: Option<String>,
    pub player: Option<AssignedPlayer>,
    pub fit: Option<FitResult>,
}

impl SlotAssignment {
    pub fn is_filled(&self) -> bool {
        self.player.is_some()
    }

    /// Label shown for the slot: the fit label, or "Unfilled".
    pub fn display_label(&self) -> &'static str {
        match &self.fit {
            Some(fit) if self.player.is_some() => fit.label.as_str(),
            _ => "Unfilled",
        }
    }
}

/// Ordered slot assignments for one formation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SquadAssignment {
    pub slots: Vec<SlotAssignment>,
}

impl SquadAssignment {
    pub fn filled(&self) -> impl Iterator<Item = &SlotAssignment> {
        self.slots.iter().filter(|s| s.is_filled())
    }

    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }

    /// Sum of fit scores over filled slots.
    pub fn total_score(&self) -> i64 {
        self.filled()
            .filter_map(|s| s.fit.map(|f| i64::from(f.score)))
            .sum()
    }

    /// Mean fit score over filled slots only; 0.0 when nothing is filled.
    pub fn average_score(&self) -> f64 {
        let n = self.filled_count();
        if n == 0 {
            return 0.0;
        }
        self.total_score() as f64 / n as f64
    }

    /// Ids of the assigned players, in slot order.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.filled().filter_map(|s| s.player.as_ref().map(|p| p.id)).collect()
    }
}

/// Squad plus aggregates, as returned to the lineup screens.
#[derive(Clone, Debug, Serialize)]
pub struct SquadSummary {
    pub squad: Vec<SquadRow>,
    pub filled: usize,
    pub total_fit_score: i64,
    pub average_fit_score: f64,
}

/// Flat row for one slot (`fit_label` is "Unfilled" for empty slots).
#[derive(Clone, Debug, Serialize)]
pub struct SquadRow {
    pub slot: String,
    pub position: Position,
    pub assigned_role: Option<String>,
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub fit_score: Option<i32>,
    pub fit_label: &'static str,
}

impl From<&SquadAssignment> for SquadSummary {
    fn from(a: &SquadAssignment) -> Self {
        let squad = a
            .slots
            .iter()
            .map(|s| SquadRow {
                slot: s.slot.clone(),
                position: s.position,
                assigned_role: s.role.clone(),
                player_id: s.player.as_ref().map(|p| p.id),
                player_name: s.player.as_ref().map(|p| p.name.clone()),
                fit_score: s.player.as_ref().and(s.fit).map(|f| f.score),
                fit_label: s.display_label(),
            })
            .collect();
        Self {
            squad,
            filled: a.filled_count(),
            total_fit_score: a.total_score(),
            average_fit_score: a.average_score(),
        }
    }
}
