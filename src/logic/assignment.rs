//! Squad assignment: match candidate players to formation slots.
//!
//! Each player fills at most one slot and each slot takes at most one player.
//! Pairings that fail the position gate are never made; a slot with no
//! eligible player left is Unfilled.

use crate::logic::scoring::score_fit;
use crate::models::{
    AssignedPlayer, FitResult, Player, SlotAssignment, SlotRole, SquadAssignment, Tier,
};
use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// How candidates are matched to slots.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// Maximum-weight bipartite matching. Fills as many slots as possible,
    /// then maximizes the total fit score, then prefers lower player ids.
    #[default]
    Optimal,
    /// Take the best remaining (slot, player) pair until none is left.
    /// Ties go to the earlier slot, then the lower player id.
    Greedy,
}

/// Assign players to slots with the default (optimal) policy.
pub fn assign_squad(candidates: &[Player], slots: &[SlotRole], tier: &Tier) -> SquadAssignment {
    assign_squad_with(AssignmentPolicy::Optimal, candidates, slots, tier)
}

/// Assign players to slots with an explicit policy.
///
/// Candidates are considered in ascending id order; repeated ids are
/// scored once. The input slice is not modified.
pub fn assign_squad_with(
    policy: AssignmentPolicy,
    candidates: &[Player],
    slots: &[SlotRole],
    tier: &Tier,
) -> SquadAssignment {
    let pool = candidate_pool(candidates);
    let fits = fit_table(&pool, slots, tier);

    let chosen = if slots.is_empty() || pool.is_empty() {
        vec![None; slots.len()]
    } else {
        match policy {
            AssignmentPolicy::Optimal => match_optimal(&fits, pool.len()),
            AssignmentPolicy::Greedy => match_greedy(&fits, &pool),
        }
    };

    let slots: Vec<SlotAssignment> = slots
        .iter()
        .zip(chosen)
        .enumerate()
        .map(|(i, (slot, pick))| {
            let (player, fit) = match pick {
                Some(j) => (Some(AssignedPlayer::from(pool[j])), fits[i][j]),
                None => (None, None),
            };
            SlotAssignment {
                slot: slot.slot.clone(),
                position: slot.position,
                role: slot.role.as_ref().map(|r| r.name.clone()),
                player,
                fit,
            }
        })
        .collect();

    let assignment = SquadAssignment { slots };
    log::debug!(
        "assigned {}/{} slots from {} candidates at {} ({:?}), total fit {}",
        assignment.filled_count(),
        assignment.slots.len(),
        pool.len(),
        tier.name,
        policy,
        assignment.total_score()
    );
    assignment
}

/// Unique candidates sorted by id.
fn candidate_pool(candidates: &[Player]) -> Vec<&Player> {
    let mut pool: Vec<&Player> = candidates.iter().collect();
    pool.sort_by_key(|p| p.id);
    pool.dedup_by_key(|p| p.id);
    pool
}

/// `fits[slot][player]`: the fit, or None when the pairing is not allowed
/// (slot has no role, or the player fails the position gate).
fn fit_table(pool: &[&Player], slots: &[SlotRole], tier: &Tier) -> Vec<Vec<Option<FitResult>>> {
    slots
        .iter()
        .map(|slot| {
            pool.iter()
                .map(|p| {
                    let role = slot.role.as_ref()?;
                    let fit = score_fit(p, role, tier);
                    (!fit.is_disqualified()).then_some(fit)
                })
                .collect()
        })
        .collect()
}

/// Kuhn-Munkres over slots x (players + one dummy column per slot).
///
/// A dummy column means "leave Unfilled" and weighs 0. Real pairings weigh
/// `fill_bonus + score * score_scale - player_rank`, so one more filled slot
/// outweighs any score difference, and any score difference outweighs any
/// rank difference. Disallowed pairings weigh less than a dummy.
fn match_optimal(fits: &[Vec<Option<FitResult>>], players: usize) -> Vec<Option<usize>> {
    let slots = fits.len();
    let max_abs_score = fits
        .iter()
        .flatten()
        .flatten()
        .map(|f| i64::from(f.score).abs())
        .max()
        .unwrap_or(0);
    let (n, m) = (slots as i64, players as i64);
    let score_scale = n * m + 1;
    let fill_bonus = n * (2 * max_abs_score * score_scale + m) + 1;
    let disallowed = -fill_bonus;

    let weights = Matrix::from_fn(slots, players + slots, |(i, j)| {
        if j >= players {
            return 0;
        }
        match fits[i][j] {
            Some(fit) => fill_bonus + i64::from(fit.score) * score_scale - j as i64,
            None => disallowed,
        }
    });
    let (_, columns) = kuhn_munkres(&weights);

    columns
        .into_iter()
        .enumerate()
        .map(|(i, j)| (j < players && fits[i][j].is_some()).then_some(j))
        .collect()
}

fn match_greedy(fits: &[Vec<Option<FitResult>>], pool: &[&Player]) -> Vec<Option<usize>> {
    let mut options: Vec<(usize, usize, i32)> = fits
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(j, fit)| fit.map(|f| (i, j, f.score)))
        })
        .collect();
    options.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then(a.0.cmp(&b.0))
            .then(pool[a.1].id.cmp(&pool[b.1].id))
    });

    let mut chosen = vec![None; fits.len()];
    let mut used = vec![false; pool.len()];
    for (i, j, _) in options {
        if chosen[i].is_some() || used[j] {
            continue;
        }
        chosen[i] = Some(j);
        used[j] = true;
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attribute, Attributes, Position, Role};

    fn tier() -> Tier {
        Tier::new("Flat", [50, 50, 50, 50])
    }

    fn slot(name: &str, position: Position, attr: Attribute) -> SlotRole {
        SlotRole {
            slot: name.into(),
            position,
            role: Some(Role::new(format!("{name}-role"), position, vec![attr]).unwrap()),
        }
    }

    fn player(id: u64, positions: &[Position], attrs: &[(Attribute, i32)]) -> Player {
        let a = attrs
            .iter()
            .fold(Attributes::default(), |a, &(k, v)| a.with(k, v));
        Player::new(id, format!("P{id}"), "")
            .with_positions(positions.iter().copied())
            .with_attributes(a)
    }

    #[test]
    fn optimal_beats_greedy_on_crossed_preferences() {
        use Attribute::*;
        use Position::*;
        // Player 1 is best at both slots; greedy gives it CB and leaves ST weak.
        let slots = vec![slot("CB", CB, Defense), slot("ST", ST, Shooting)];
        let players = vec![
            player(1, &[CB, ST], &[(Defense, 60), (Shooting, 90)]),
            player(2, &[CB, ST], &[(Defense, 58), (Shooting, 40)]),
        ];
        let optimal = assign_squad(&players, &slots, &tier());
        let greedy = assign_squad_with(AssignmentPolicy::Greedy, &players, &slots, &tier());
        assert_eq!(optimal.player_ids(), vec![2, 1]);
        assert_eq!(optimal.total_score(), 32 + 160);
        assert_eq!(greedy.player_ids(), vec![2, 1]);

        let players = vec![
            player(1, &[CB, ST], &[(Defense, 90), (Shooting, 80)]),
            player(2, &[CB, ST], &[(Defense, 85), (Shooting, 40)]),
        ];
        let optimal = assign_squad(&players, &slots, &tier());
        let greedy = assign_squad_with(AssignmentPolicy::Greedy, &players, &slots, &tier());
        // Greedy: P1 -> CB (160), P2 -> ST (-40). Optimal: P2 -> CB (140), P1 -> ST (120).
        assert_eq!(greedy.total_score(), 120);
        assert_eq!(optimal.total_score(), 260);
        assert_eq!(optimal.player_ids(), vec![2, 1]);
    }

    #[test]
    fn filling_a_slot_wins_over_a_higher_total() {
        use Attribute::*;
        use Position::*;
        // Leaving ST empty would raise the total, but a weak eligible player still plays.
        let slots = vec![slot("CB", CB, Defense), slot("ST", ST, Shooting)];
        let players = vec![
            player(1, &[CB], &[(Defense, 90)]),
            player(2, &[ST], &[(Shooting, 20)]),
        ];
        let a = assign_squad(&players, &slots, &tier());
        assert_eq!(a.filled_count(), 2);
        assert_eq!(a.total_score(), 160 - 120);
    }

    #[test]
    fn disqualified_pairings_leave_slot_unfilled() {
        use Attribute::*;
        use Position::*;
        let slots = vec![slot("GK", GK, Goalkeeping), slot("ST", ST, Shooting)];
        let players = vec![player(1, &[ST], &[(Shooting, 70), (Goalkeeping, 99)])];
        for policy in [AssignmentPolicy::Optimal, AssignmentPolicy::Greedy] {
            let a = assign_squad_with(policy, &players, &slots, &tier());
            assert!(a.slots[0].player.is_none());
            assert!(a.slots[0].fit.is_none());
            assert_eq!(a.slots[1].player.as_ref().unwrap().id, 1);
        }
    }

    #[test]
    fn equal_scores_go_to_lower_id() {
        use Attribute::*;
        use Position::*;
        let slots = vec![slot("CM", CM, Passing)];
        let players = vec![
            player(9, &[CM], &[(Passing, 70)]),
            player(4, &[CM], &[(Passing, 70)]),
        ];
        for policy in [AssignmentPolicy::Optimal, AssignmentPolicy::Greedy] {
            let a = assign_squad_with(policy, &players, &slots, &tier());
            assert_eq!(a.player_ids(), vec![4]);
        }
    }

    #[test]
    fn slot_without_role_is_unfilled() {
        let slots = vec![SlotRole {
            slot: "X".into(),
            position: Position::CM,
            role: None,
        }];
        let players = vec![player(1, &[Position::CM], &[])];
        let a = assign_squad(&players, &slots, &tier());
        assert!(!a.slots[0].is_filled());
        assert_eq!(a.slots[0].role, None);
    }

    #[test]
    fn duplicate_candidates_fill_one_slot() {
        use Attribute::*;
        use Position::*;
        let slots = vec![slot("CB1", CB, Defense), slot("CB2", CB, Defense)];
        let p = player(1, &[CB], &[(Defense, 70)]);
        let a = assign_squad(&[p.clone(), p], &slots, &tier());
        assert_eq!(a.filled_count(), 1);
    }
}
