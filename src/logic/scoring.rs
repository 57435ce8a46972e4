//! Fit scoring: how well a player meets a role's tier-adjusted requirements.

use crate::models::{
    FitError, FitResult, Player, Role, RoleCatalog, Tier, TierTable, ATTRIBUTE_WEIGHTS,
};

/// Score `player` for `role` at `tier`.
///
/// 1. If the player cannot play `role.position`, the result is the
///    disqualification sentinel (-999, Unusable) whatever the attributes.
/// 2. Otherwise each ranked attribute contributes
///    `(value - tier.thresholds[rank]) * ATTRIBUTE_WEIGHTS[rank]`;
///    unassigned ranks contribute nothing.
/// 3. The label comes from the fixed score bands.
///
/// Attribute values come from upstream payloads unchecked, so the sum is
/// taken in `i64` and saturated to the `i32` range.
pub fn score_fit(player: &Player, role: &Role, tier: &Tier) -> FitResult {
    if !player.plays(role.position) {
        return FitResult::DISQUALIFIED;
    }
    let total: i64 = role
        .ranked_attributes()
        .map(|(rank, attr)| {
            let margin = i64::from(player.attributes.get(attr)) - i64::from(tier.thresholds[rank]);
            margin * i64::from(ATTRIBUTE_WEIGHTS[rank])
        })
        .sum();
    let score = total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    FitResult::from_score(score)
}

/// Score by role and tier name, failing fast on names missing from the catalogs.
pub fn score_fit_by_name(
    player: &Player,
    role_name: &str,
    tier_name: &str,
    roles: &RoleCatalog,
    tiers: &TierTable,
) -> Result<FitResult, FitError> {
    let tier = tiers.require(tier_name)?;
    let role = roles.require(role_name)?;
    Ok(score_fit(player, role, tier))
}
