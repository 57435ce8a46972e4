//! Clubs and the in-memory club registry.

use crate::models::error::FitError;
use crate::models::player::{Player, PlayerId, UNASSIGNED_CLUB};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a club.
pub type ClubId = Uuid;

/// A club: a named roster competing in one tier.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub tier: String,
    pub roster: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl Club {
    pub fn new(name: impl Into<String>, tier: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tier: tier.into(),
            roster: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.roster.contains(&id)
    }
}

/// All clubs, keyed by case-insensitive name.
#[derive(Clone, Debug, Default)]
pub struct ClubRegistry {
    clubs: Vec<Club>,
}

impl ClubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Club] {
        &self.clubs
    }

    pub fn get(&self, name: &str) -> Option<&Club> {
        let name = name.trim();
        self.clubs.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Club, FitError> {
        let name = name.trim();
        self.clubs
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FitError::UnknownClub(name.to_string()))
    }

    /// Name of the club whose roster holds `id`, or the unassigned sentinel.
    pub fn club_of(&self, id: PlayerId) -> &str {
        self.clubs
            .iter()
            .find(|c| c.has_player(id))
            .map(|c| c.name.as_str())
            .unwrap_or(UNASSIGNED_CLUB)
    }

    /// Set every player's `assigned_club` from the rosters.
    pub fn annotate(&self, players: &mut [Player]) {
        for p in players.iter_mut() {
            p.assigned_club = self.club_of(p.id).to_string();
        }
    }

    /// Create an empty club. Names must be unique and cannot be the unassigned sentinel.
    pub fn create(&mut self, name: &str, tier: &str) -> Result<&Club, FitError> {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(UNASSIGNED_CLUB) {
            return Err(FitError::InvalidClub(name.to_string()));
        }
        if self.get(name).is_some() {
            return Err(FitError::DuplicateName(name.to_string()));
        }
        self.clubs.push(Club::new(name, tier.trim()));
        let idx = self.clubs.len() - 1;
        Ok(&self.clubs[idx])
    }

    /// Delete a club. Its players become unassigned.
    pub fn delete(&mut self, name: &str) -> Result<Club, FitError> {
        let name = name.trim();
        let idx = self
            .clubs
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FitError::UnknownClub(name.to_string()))?;
        Ok(self.clubs.remove(idx))
    }

    pub fn set_tier(&mut self, name: &str, tier: &str) -> Result<(), FitError> {
        self.get_mut(name)?.tier = tier.trim().to_string();
        Ok(())
    }

    /// Replace a club's roster wholesale (duplicates dropped, order kept).
    /// Players listed here leave any other club.
    pub fn set_roster(&mut self, name: &str, roster: Vec<PlayerId>) -> Result<(), FitError> {
        let mut deduped = Vec::with_capacity(roster.len());
        for id in roster {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        let target = self.get_mut(name)?.id;
        for club in self.clubs.iter_mut().filter(|c| c.id != target) {
            club.roster.retain(|id| !deduped.contains(id));
        }
        self.get_mut(name)?.roster = deduped;
        Ok(())
    }

    /// Move a player from `old_club` to `new_club` (either may be "Unassigned"),
    /// keeping both rosters and the player's `assigned_club` in step.
    pub fn move_player(
        &mut self,
        player: &mut Player,
        old_club: &str,
        new_club: &str,
    ) -> Result<(), FitError> {
        let new_is_club = !new_club.trim().eq_ignore_ascii_case(UNASSIGNED_CLUB)
            && !new_club.trim().is_empty();
        if new_is_club && self.get(new_club).is_none() {
            return Err(FitError::UnknownClub(new_club.trim().to_string()));
        }
        player.reassign(old_club, new_club)?;
        for club in self.clubs.iter_mut() {
            club.roster.retain(|id| *id != player.id);
        }
        if new_is_club {
            let club = self.get_mut(new_club)?;
            club.roster.push(player.id);
            player.assigned_club = club.name.clone();
        }
        log::debug!("player {} moved {} -> {}", player.id, old_club, player.assigned_club);
        Ok(())
    }
}
