mod common;

use common::fixture_squad;
use squad_report::RenderOptions;
use squad_report::batch::{rank_outcomes, rank_squad, render_squad, score_squad};

#[test]
fn renders_every_player_in_order() {
    let squad = fixture_squad();
    let outcomes = render_squad(&squad, &RenderOptions::default());
    assert_eq!(outcomes.len(), squad.len());
    for (player, outcome) in squad.iter().zip(&outcomes) {
        assert!(outcome.success);
        let document = outcome.document.as_ref().expect("document");
        assert_eq!(document.subject, player.display_name());
    }
}

#[test]
fn ranking_is_sorted_and_complete() {
    let squad = fixture_squad();
    let scores = score_squad(&squad);
    let ranked = rank_squad(&squad);
    assert_eq!(ranked.len(), squad.len());
    for pair in ranked.windows(2) {
        assert!(pair[0].1.score >= pair[1].1.score);
    }
    for (idx, score) in &ranked {
        assert_eq!(score, &scores[*idx]);
    }
}

#[test]
fn ranking_from_outcomes_matches_fresh_scores() {
    let squad = fixture_squad();
    let outcomes = render_squad(&squad, &RenderOptions::default());
    assert_eq!(rank_outcomes(&outcomes), rank_squad(&squad));

    let mut partial = outcomes.clone();
    partial[0].score = None;
    let ranked = rank_outcomes(&partial);
    assert_eq!(ranked.len(), squad.len() - 1);
    assert!(ranked.iter().all(|(idx, _)| *idx != 0));
}
