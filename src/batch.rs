use rayon::prelude::*;

use crate::config::RenderOptions;
use crate::player::Player;
use crate::report::{ReportOutcome, render_player_report_with};
use crate::scoring::{PlayerScore, compute_score};

/// Render one report per player in parallel. Every render owns its own layout
/// context; outcomes come back in input order.
pub fn render_squad(players: &[Player], options: &RenderOptions) -> Vec<ReportOutcome> {
    players
        .par_iter()
        .map(|player| render_player_report_with(Some(player), options))
        .collect()
}

pub fn score_squad(players: &[Player]) -> Vec<PlayerScore> {
    players.par_iter().map(compute_score).collect()
}

/// Indices into `players`, best score first. Ties keep input order.
pub fn rank_squad(players: &[Player]) -> Vec<(usize, PlayerScore)> {
    rank(score_squad(players).into_iter().enumerate().collect())
}

/// Same ordering as [`rank_squad`], reusing the scores already carried by
/// rendered outcomes. Outcomes without a score are left out.
pub fn rank_outcomes(outcomes: &[ReportOutcome]) -> Vec<(usize, PlayerScore)> {
    rank(
        outcomes
            .iter()
            .enumerate()
            .filter_map(|(idx, outcome)| outcome.score.clone().map(|score| (idx, score)))
            .collect(),
    )
}

fn rank(mut ranked: Vec<(usize, PlayerScore)>) -> Vec<(usize, PlayerScore)> {
    ranked.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(&b.0)));
    ranked
}
