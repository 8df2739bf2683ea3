mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;
use squad_report::player::{PhysicalAttributes, PlayerStats};
use squad_report::scoring::{RatingTier, ScoreComponent};
use squad_report::{Player, compute_score};

fn skills(values: &[(&str, u8)]) -> BTreeMap<String, u8> {
    values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn mixed_skills_and_physical_average_to_strong() {
    let player = Player {
        skills: Some(skills(&[("passing", 80), ("shooting", 60), ("dribbling", 70)])),
        physical_attributes: Some(PhysicalAttributes {
            speed: Some(90),
            strength: Some(50),
            agility: Some(70),
            endurance: Some(60),
            fitness: Some(80),
        }),
        ..Player::named("Example")
    };
    let score = compute_score(&player);
    assert_eq!(score.score, 70);
    assert_eq!(score.tier, RatingTier::Strong);
    assert_eq!(
        score.breakdown.missing,
        vec![ScoreComponent::Stats, ScoreComponent::AgePotential]
    );
    let skills = score.breakdown.component(ScoreComponent::Skills).unwrap();
    assert!((skills.value - 70.0).abs() < 1e-9);
    assert!((skills.effective_weight - 0.625).abs() < 1e-9);
    let physical = score.breakdown.component(ScoreComponent::Physical).unwrap();
    assert!((physical.value - 70.0).abs() < 1e-9);
}

#[test]
fn empty_player_scores_zero() {
    let score = compute_score(&Player::named("Nobody"));
    assert_eq!(score.score, 0);
    assert_eq!(score.tier, RatingTier::Developing);
    assert!(score.breakdown.components.is_empty());
    assert_eq!(score.breakdown.missing.len(), 4);
}

#[test]
fn tier_boundaries() {
    assert_eq!(RatingTier::from_score(85), RatingTier::Exceptional);
    assert_eq!(RatingTier::from_score(84), RatingTier::Strong);
    assert_eq!(RatingTier::from_score(70), RatingTier::Strong);
    assert_eq!(RatingTier::from_score(69), RatingTier::Solid);
    assert_eq!(RatingTier::from_score(50), RatingTier::Solid);
    assert_eq!(RatingTier::from_score(49), RatingTier::Developing);
}

#[test]
fn young_age_alone_scores_full_potential() {
    let player = Player {
        age: Some(19),
        ..Player::named("Prospect")
    };
    let score = compute_score(&player);
    assert_eq!(score.score, 100);
    assert_eq!(score.tier, RatingTier::Exceptional);
}

#[test]
fn games_without_appearances_do_not_count_as_stats() {
    let player = Player {
        stats: Some(PlayerStats {
            games: Some(0),
            goals: Some(3),
            ..PlayerStats::default()
        }),
        ..Player::named("Bench")
    };
    let score = compute_score(&player);
    assert!(score.breakdown.missing.contains(&ScoreComponent::Stats));
    assert_eq!(score.score, 0);
}

fn arb_player() -> impl Strategy<Value = Player> {
    (
        proptest::option::of(proptest::collection::vec(0u8..=100, 1..8)),
        proptest::option::of(proptest::collection::vec(proptest::option::of(0u8..=100), 5)),
        proptest::option::of((0u32..60, 0u32..40, 0u32..40, 0u32..15, 0u32..4)),
        proptest::option::of(15u32..45),
        prop_oneof![Just("GK"), Just("CB"), Just("CM"), Just("ST"), Just("??")],
    )
        .prop_map(|(skill_values, attrs, stats, age, position)| {
            let skills = skill_values.map(|values| {
                values
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (format!("skill{i}"), v))
                    .collect()
            });
            let physical_attributes = attrs.map(|a| PhysicalAttributes {
                speed: a[0],
                strength: a[1],
                agility: a[2],
                endurance: a[3],
                fitness: a[4],
            });
            let stats = stats.map(|(games, goals, assists, yellow, red)| PlayerStats {
                games: Some(games),
                goals: Some(goals),
                assists: Some(assists),
                yellow_cards: Some(yellow),
                red_cards: Some(red),
                saves: Some(goals * 3),
                clean_sheets: Some(assists / 2),
            });
            Player {
                position: Some(position.to_string()),
                skills,
                physical_attributes,
                stats,
                age,
                ..Player::named("Generated")
            }
        })
}

proptest! {
    #[test]
    fn score_is_deterministic_and_bounded(player in arb_player()) {
        let first = compute_score(&player);
        let second = compute_score(&player);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.score <= 100);
        prop_assert_eq!(first.tier, RatingTier::from_score(first.score));
        prop_assert_eq!(
            first.breakdown.components.len() + first.breakdown.missing.len(),
            4
        );
        if !first.breakdown.components.is_empty() {
            let total: f64 = first.breakdown.components.iter().map(|c| c.effective_weight).sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn raising_a_skill_never_lowers_the_score(player in arb_player(), bump in 1u8..=50) {
        let before = compute_score(&player);
        let mut raised = player.clone();
        if let Some(skills) = raised.skills.as_mut() {
            for value in skills.values_mut() {
                *value = value.saturating_add(bump).min(100);
            }
        }
        let after = compute_score(&raised);
        prop_assert!(after.score >= before.score);
    }
}

#[test]
fn physical_only_player_scores_physical_average() {
    let player = Player {
        physical_attributes: Some(PhysicalAttributes {
            speed: Some(61),
            strength: Some(70),
            agility: Some(80),
            endurance: Some(90),
            fitness: Some(75),
        }),
        ..Player::named("Athlete")
    };
    let score = compute_score(&player);
    assert_eq!(score.score, 75);
    assert_eq!(score.tier, RatingTier::Strong);
    let physical = score.breakdown.component(ScoreComponent::Physical).unwrap();
    assert_eq!(physical.effective_weight, 1.0);
}
