//! Per-player analysis: which roles a player can fill at each tier.

use crate::logic::scoring::score_fit;
use crate::models::{FitLabel, Player, PlayerId, RoleCatalog, TierTable};
use serde::Serialize;

/// One role a player fits at one tier.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoleFit {
    pub role: String,
    pub tier: String,
    pub score: i32,
    pub label: FitLabel,
}

/// Non-negative role fits per tier, best tier first.
#[derive(Clone, Debug, Serialize)]
pub struct PlayerAnalysis {
    pub player_id: PlayerId,
    /// Best role at the most competitive tier where the player fits any role.
    pub best_role: Option<RoleFit>,
    /// `(tier, roles)` with roles sorted by score (desc) then name.
    pub roles_by_tier: Vec<(String, Vec<RoleFit>)>,
}

impl PlayerAnalysis {
    /// Name of the best tier the player fits, if any.
    pub fn best_tier(&self) -> Option<&str> {
        self.best_role.as_ref().map(|r| r.tier.as_str())
    }

    pub fn roles_at(&self, tier: &str) -> &[RoleFit] {
        self.roles_by_tier
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(tier.trim()))
            .map(|(_, roles)| roles.as_slice())
            .unwrap_or(&[])
    }
}

/// Score the player against every role at every tier, keeping fits with
/// a score of 0 or more (Natural or better).
pub fn analyze_player(player: &Player, roles: &RoleCatalog, tiers: &TierTable) -> PlayerAnalysis {
    let roles_by_tier: Vec<(String, Vec<RoleFit>)> = tiers
        .iter_best_first()
        .map(|tier| {
            let mut fits: Vec<RoleFit> = roles
                .roles()
                .iter()
                .filter_map(|role| {
                    let fit = score_fit(player, role, tier);
                    (fit.score >= 0).then(|| RoleFit {
                        role: role.name.clone(),
                        tier: tier.name.clone(),
                        score: fit.score,
                        label: fit.label,
                    })
                })
                .collect();
            fits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.role.cmp(&b.role)));
            (tier.name.clone(), fits)
        })
        .collect();

    let best_role = roles_by_tier
        .iter()
        .find_map(|(_, fits)| fits.first().cloned());

    PlayerAnalysis {
        player_id: player.id,
        best_role,
        roles_by_tier,
    }
}
