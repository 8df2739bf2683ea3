use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::batch::score_squad;
use crate::player::Player;
use crate::scoring::{PlayerScore, ScoreComponent};
use crate::skill_schema::{group_label, skill_label};

pub struct ExportReport {
    pub players: usize,
    pub skills: usize,
    pub physical: usize,
    pub injuries: usize,
    pub goals: usize,
    pub notes: usize,
}

pub struct ExportProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

pub fn export_squad(path: &Path, players: &[Player]) -> Result<ExportReport> {
    export_squad_with_progress(path, players, |_| {})
}

pub fn export_squad_with_progress(
    path: &Path,
    players: &[Player],
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<ExportReport> {
    let total = players.len();
    let scores = score_squad(players);
    on_progress(ExportProgress {
        current: 0,
        total,
        message: "Scored squad".to_string(),
    });

    let mut players_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Position".to_string(),
        "Group".to_string(),
        "Number".to_string(),
        "Age".to_string(),
        "Status".to_string(),
        "Team".to_string(),
        "Score".to_string(),
        "Rating".to_string(),
        "Skills".to_string(),
        "Physical".to_string(),
        "Statistics".to_string(),
        "Age Potential".to_string(),
    ]];

    let mut skills_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Skill".to_string(),
        "Label".to_string(),
        "Value".to_string(),
    ]];

    let mut physical_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Attribute".to_string(),
        "Value".to_string(),
    ]];

    let mut injuries_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Type".to_string(),
        "Date".to_string(),
        "Duration".to_string(),
        "Status".to_string(),
    ]];

    let mut goals_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "#".to_string(),
        "Goal".to_string(),
    ]];

    let mut notes_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Author".to_string(),
        "Date".to_string(),
        "Note".to_string(),
    ]];

    for (idx, (player, score)) in players.iter().zip(&scores).enumerate() {
        players_rows.push(player_row(player, score));
        skills_rows.extend(skill_rows(player));
        physical_rows.extend(physical_rows_for(player));
        injuries_rows.extend(injury_rows(player));
        goals_rows.extend(goal_rows(player));
        notes_rows.extend(note_rows(player));

        on_progress(ExportProgress {
            current: idx + 1,
            total,
            message: format!("Player: {}", player.display_name()),
        });
    }

    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("Players", &players_rows),
        ("Skills", &skills_rows),
        ("Physical", &physical_rows),
        ("Injuries", &injuries_rows),
        ("DevelopmentGoals", &goals_rows),
        ("Notes", &notes_rows),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: players_rows.len().saturating_sub(1),
        skills: skills_rows.len().saturating_sub(1),
        physical: physical_rows.len().saturating_sub(1),
        injuries: injuries_rows.len().saturating_sub(1),
        goals: goals_rows.len().saturating_sub(1),
        notes: notes_rows.len().saturating_sub(1),
    })
}

fn player_id(player: &Player) -> String {
    player.id.clone().unwrap_or_default()
}

fn player_row(player: &Player, score: &PlayerScore) -> Vec<String> {
    let component = |c: ScoreComponent| {
        score
            .breakdown
            .component(c)
            .map(|s| format!("{:.1}", s.value))
            .unwrap_or_default()
    };
    vec![
        player_id(player),
        player.display_name().to_string(),
        player.position.clone().unwrap_or_default(),
        group_label(player.position_group()).to_string(),
        opt_to_string(player.number),
        opt_to_string(player.age),
        player.status.clone().unwrap_or_default(),
        player.team.clone().unwrap_or_default(),
        score.score.to_string(),
        score.tier.label().to_string(),
        component(ScoreComponent::Skills),
        component(ScoreComponent::Physical),
        component(ScoreComponent::Stats),
        component(ScoreComponent::AgePotential),
    ]
}

fn skill_rows(player: &Player) -> Vec<Vec<String>> {
    player
        .skills()
        .into_iter()
        .flatten()
        .map(|(key, value)| {
            vec![
                player_id(player),
                player.display_name().to_string(),
                key.clone(),
                skill_label(key),
                value.to_string(),
            ]
        })
        .collect()
}

fn physical_rows_for(player: &Player) -> Vec<Vec<String>> {
    let Some(attrs) = player.physical() else {
        return Vec::new();
    };
    attrs
        .entries()
        .iter()
        .filter_map(|(_, label, value)| value.map(|v| (*label, v)))
        .map(|(label, value)| {
            vec![
                player_id(player),
                player.display_name().to_string(),
                label.to_string(),
                value.to_string(),
            ]
        })
        .collect()
}

fn injury_rows(player: &Player) -> Vec<Vec<String>> {
    player
        .injuries
        .iter()
        .map(|injury| {
            vec![
                player_id(player),
                player.display_name().to_string(),
                injury.kind.clone(),
                injury.date.clone(),
                injury.duration.clone(),
                injury.status.clone(),
            ]
        })
        .collect()
}

fn goal_rows(player: &Player) -> Vec<Vec<String>> {
    player
        .development_goals()
        .iter()
        .enumerate()
        .map(|(i, goal)| {
            vec![
                player_id(player),
                player.display_name().to_string(),
                (i + 1).to_string(),
                goal.clone(),
            ]
        })
        .collect()
}

fn note_rows(player: &Player) -> Vec<Vec<String>> {
    player
        .notes
        .iter()
        .map(|note| {
            vec![
                player_id(player),
                player.display_name().to_string(),
                note.author.clone(),
                note.date.clone(),
                note.text.clone(),
            ]
        })
        .collect()
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
