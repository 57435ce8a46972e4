//! Integration tests for fit scoring and player analysis.

use mfl_squad_fit::{
    analyze_player, score_fit, score_fit_by_name, Attribute, Attributes, FitError, FitLabel,
    Player, Position, Role, RoleCatalog, Tier, TierTable, DISQUALIFIED_SCORE,
};
use mfl_squad_fit::models::RemotePlayer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn striker() -> Player {
    Player::new(7, "Sam", "Striker")
        .with_positions([Position::ST, Position::CF])
        .with_attributes(
            Attributes::default()
                .with(Attribute::Shooting, 85)
                .with(Attribute::Pace, 80)
                .with(Attribute::Dribbling, 76)
                .with(Attribute::Physical, 70)
                .with(Attribute::Defense, 30),
        )
}

fn complete_forward() -> Role {
    Role::new(
        "ST-Complete",
        Position::ST,
        vec![Attribute::Shooting, Attribute::Pace, Attribute::Dribbling, Attribute::Physical],
    )
    .unwrap()
}

#[test]
fn score_is_weighted_margin_over_tier_thresholds() {
    let tiers = TierTable::default();
    let iron = tiers.require("Iron").unwrap(); // [80, 77, 74, 70]
    let fit = score_fit(&striker(), &complete_forward(), iron);
    // (85-80)*4 + (80-77)*3 + (76-74)*2 + (70-70)*1
    assert_eq!(fit.score, 33);
    assert_eq!(fit.label, FitLabel::Strong);
}

#[test]
fn higher_tiers_never_score_higher() {
    let tiers = TierTable::default();
    let scores: Vec<i32> = tiers
        .tiers()
        .iter()
        .map(|t| score_fit(&striker(), &complete_forward(), t).score)
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}", scores);
}

/// Random CB role with one to four distinct attributes, gaps allowed.
fn random_role(rng: &mut StdRng) -> Role {
    let mut attrs = Attribute::ALL.to_vec();
    attrs.shuffle(rng);
    let mut ranks = [None; 4];
    for (slot, attr) in ranks.iter_mut().zip(attrs) {
        if rng.gen_bool(0.75) {
            *slot = Some(attr);
        }
    }
    if ranks.iter().all(Option::is_none) {
        ranks[rng.gen_range(0..4)] = Some(Attribute::Defense);
    }
    Role::with_ranks("CB-Random", Position::CB, ranks).unwrap()
}

fn random_tier(rng: &mut StdRng) -> Tier {
    TierTable::default().tiers().choose(rng).unwrap().clone()
}

fn random_defender(rng: &mut StdRng) -> Player {
    let mut attributes = Attributes::default();
    for a in Attribute::ALL {
        attributes.set(a, rng.gen_range(30..=99));
    }
    Player::new(1, "Random", "Defender")
        .with_positions([Position::CB])
        .with_attributes(attributes)
}

#[test]
fn raising_a_ranked_attribute_strictly_raises_the_score() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..300 {
        let role = random_role(&mut rng);
        let tier = random_tier(&mut rng);
        let player = random_defender(&mut rng);
        let before = score_fit(&player, &role, &tier).score;
        for (_, attr) in role.ranked_attributes() {
            let mut better = player.clone();
            better.attributes.set(attr, player.attributes.get(attr) + rng.gen_range(1..=20));
            let after = score_fit(&better, &role, &tier).score;
            assert!(after > before, "{:?} at {}: {} -> {}", attr, tier.name, before, after);
        }
    }
}

#[test]
fn raising_an_unranked_attribute_changes_nothing() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let role = random_role(&mut rng);
        let tier = random_tier(&mut rng);
        let player = random_defender(&mut rng);
        let before = score_fit(&player, &role, &tier).score;
        for attr in Attribute::ALL {
            if role.ranked_attributes().any(|(_, a)| a == attr) {
                continue;
            }
            let mut other = player.clone();
            other.attributes.set(attr, 99);
            assert_eq!(score_fit(&other, &role, &tier).score, before);
        }
    }
}

#[test]
fn shortfall_at_rank_one_costs_more_than_at_rank_four() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..200 {
        let mut attrs = Attribute::ALL.to_vec();
        attrs.shuffle(&mut rng);
        attrs.truncate(4);
        let role = Role::new("CB-Full", Position::CB, attrs.clone()).unwrap();
        let tier = random_tier(&mut rng);
        let shortfall = rng.gen_range(1..=30);

        // Exactly on every threshold scores 0.
        let mut on_threshold = Attributes::default();
        for (rank, attr) in attrs.iter().enumerate() {
            on_threshold.set(*attr, tier.thresholds[rank]);
        }
        let base = Player::new(1, "Even", "")
            .with_positions([Position::CB])
            .with_attributes(on_threshold);
        assert_eq!(score_fit(&base, &role, &tier).score, 0);

        let mut short_first = base.clone();
        short_first.attributes.set(attrs[0], tier.thresholds[0] - shortfall);
        let mut short_last = base.clone();
        short_last.attributes.set(attrs[3], tier.thresholds[3] - shortfall);

        let first = score_fit(&short_first, &role, &tier).score;
        let last = score_fit(&short_last, &role, &tier).score;
        assert!(first < last, "{} vs {} at {}", first, last, tier.name);
        assert_eq!(first, -4 * shortfall);
        assert_eq!(last, -shortfall);
    }
}

#[test]
fn empty_middle_rank_does_not_shift_later_attributes() {
    let json = r#"[{"Role": "CB-Gap", "Position": "CB", "Attribute1": "DEF", "Attribute2": "", "Attribute3": "PAC"}]"#;
    let roles = RoleCatalog::from_json(json).unwrap();
    let gold = Tier::new("Gold", [80, 70, 65, 60]);
    let player = Player::new(3, "Gap", "Test")
        .with_positions([Position::CB])
        .with_attributes(Attributes::default().with(Attribute::Defense, 85).with(Attribute::Pace, 70));
    // (85-80)*4 + (70-65)*2
    assert_eq!(score_fit(&player, roles.require("CB-Gap").unwrap(), &gold).score, 30);
}

#[test]
fn out_of_range_upstream_attribute_does_not_overflow() {
    let remote: RemotePlayer = serde_json::from_str(
        r#"{"id": 5, "metadata": {"positions": ["CB"], "defense": 1000000000}}"#,
    )
    .unwrap();
    let player = Player::from(remote);
    let role = Role::new("CB-Stopper", Position::CB, vec![Attribute::Defense]).unwrap();
    let fit = score_fit(&player, &role, TierTable::default().require("Iron").unwrap());
    assert_eq!(fit.score, i32::MAX);
    assert_eq!(fit.label, FitLabel::Elite);
}

#[test]
fn wrong_position_is_disqualified_whatever_the_attributes() {
    let tiers = TierTable::default();
    let keeper = Role::new("GK-Sweeper", Position::GK, vec![Attribute::Goalkeeping]).unwrap();
    let mut player = striker();
    player.attributes.set(Attribute::Goalkeeping, 99);
    let fit = score_fit(&player, &keeper, tiers.require("Flint").unwrap());
    assert_eq!(fit.score, DISQUALIFIED_SCORE);
    assert_eq!(fit.label, FitLabel::Unusable);
    assert!(fit.is_disqualified());
}

#[test]
fn label_bands_are_inclusive_at_the_lower_edge() {
    let cases = [
        (50, FitLabel::Elite),
        (49, FitLabel::Strong),
        (20, FitLabel::Strong),
        (19, FitLabel::Natural),
        (0, FitLabel::Natural),
        (-1, FitLabel::Weak),
        (-20, FitLabel::Weak),
        (-21, FitLabel::Unusable),
    ];
    for (score, label) in cases {
        assert_eq!(FitLabel::from_score(score), label, "score {}", score);
    }
}

#[test]
fn by_name_reports_unknown_tier_before_unknown_role() {
    let roles = RoleCatalog::new(vec![complete_forward()]).unwrap();
    let tiers = TierTable::default();
    assert!(matches!(
        score_fit_by_name(&striker(), "Nope", "Mithril", &roles, &tiers),
        Err(FitError::UnknownTier(_))
    ));
    assert!(matches!(
        score_fit_by_name(&striker(), "Nope", "Iron", &roles, &tiers),
        Err(FitError::UnknownRole(_))
    ));
    let fit = score_fit_by_name(&striker(), "st-complete", "iron", &roles, &tiers).unwrap();
    assert_eq!(fit.score, 33);
}

#[test]
fn analysis_finds_best_tier_and_skips_negative_fits() {
    let roles = RoleCatalog::new(vec![
        complete_forward(),
        Role::new("CF-Target", Position::CF, vec![Attribute::Physical]).unwrap(),
        Role::new("CB-Stopper", Position::CB, vec![Attribute::Defense]).unwrap(),
    ])
    .unwrap();
    let tiers = TierTable::default();
    let analysis = analyze_player(&striker(), &roles, &tiers);

    assert_eq!(analysis.player_id, 7);
    // ST-Complete at Bronze: (85-84)*4 + (80-80)*3 + (76-77)*2 + (70-74) = -2, so Iron is the best.
    let best = analysis.best_role.clone().unwrap();
    assert_eq!(analysis.best_tier(), Some("Iron"));
    assert_eq!(best.role, "ST-Complete");
    assert_eq!(best.score, 33);

    let flint = analysis.roles_at("Flint");
    let names: Vec<&str> = flint.iter().map(|f| f.role.as_str()).collect();
    assert_eq!(names, ["ST-Complete", "CF-Target"]);
    assert!(analysis.roles_at("Diamond").is_empty());
    assert!(analysis
        .roles_by_tier
        .iter()
        .flat_map(|(_, fits)| fits)
        .all(|f| f.score >= 0 && f.role != "CB-Stopper"));
}
