use serde::Serialize;

use crate::document::Color;
use crate::player::{Player, PlayerStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScoreComponent {
    Skills,
    Physical,
    Stats,
    AgePotential,
}

impl ScoreComponent {
    pub const ALL: [ScoreComponent; 4] = [
        ScoreComponent::Skills,
        ScoreComponent::Physical,
        ScoreComponent::Stats,
        ScoreComponent::AgePotential,
    ];

    pub fn base_weight(self) -> f64 {
        match self {
            ScoreComponent::Skills => 0.50,
            ScoreComponent::Physical => 0.30,
            ScoreComponent::Stats => 0.15,
            ScoreComponent::AgePotential => 0.05,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreComponent::Skills => "Skills",
            ScoreComponent::Physical => "Physical",
            ScoreComponent::Stats => "Statistics",
            ScoreComponent::AgePotential => "Age Potential",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RatingTier {
    Exceptional,
    Strong,
    Solid,
    Developing,
}

impl RatingTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => RatingTier::Exceptional,
            70..=84 => RatingTier::Strong,
            50..=69 => RatingTier::Solid,
            _ => RatingTier::Developing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingTier::Exceptional => "Exceptional",
            RatingTier::Strong => "Strong",
            RatingTier::Solid => "Solid",
            RatingTier::Developing => "Developing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RatingTier::Exceptional => "Elite performer across the profile",
            RatingTier::Strong => "Reliable first-team quality",
            RatingTier::Solid => "Dependable squad contributor",
            RatingTier::Developing => "Building towards squad level",
        }
    }

    pub fn color(self) -> Color {
        match self {
            RatingTier::Exceptional => Color::rgb(22, 163, 74),
            RatingTier::Strong => Color::rgb(37, 99, 235),
            RatingTier::Solid => Color::rgb(217, 119, 6),
            RatingTier::Developing => Color::rgb(220, 38, 38),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScore {
    pub component: ScoreComponent,
    /// Component value on the 0–100 scale.
    pub value: f64,
    pub base_weight: f64,
    /// Weight after redistributing the weight of missing components.
    pub effective_weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ComponentScore>,
    pub missing: Vec<ScoreComponent>,
}

impl ScoreBreakdown {
    pub fn component(&self, component: ScoreComponent) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.component == component)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerScore {
    pub score: u8,
    pub tier: RatingTier,
    pub breakdown: ScoreBreakdown,
}

/// Weighted composite of skills, physical attributes, statistics and age
/// potential. Components with no data are left out and their weight is spread
/// proportionally over the ones that remain; with nothing to score the result
/// is 0 / `Developing`.
pub fn compute_score(player: &Player) -> PlayerScore {
    let mut present: Vec<(ScoreComponent, f64)> = Vec::with_capacity(4);
    let mut missing = Vec::new();

    for component in ScoreComponent::ALL {
        match component_value(player, component) {
            Some(value) if value.is_finite() => present.push((component, value.clamp(0.0, 100.0))),
            _ => missing.push(component),
        }
    }

    let total_weight: f64 = present.iter().map(|(c, _)| c.base_weight()).sum();
    if present.is_empty() || total_weight <= 0.0 {
        return PlayerScore {
            score: 0,
            tier: RatingTier::Developing,
            breakdown: ScoreBreakdown {
                components: Vec::new(),
                missing,
            },
        };
    }

    let components: Vec<ComponentScore> = present
        .iter()
        .map(|(component, value)| ComponentScore {
            component: *component,
            value: *value,
            base_weight: component.base_weight(),
            effective_weight: component.base_weight() / total_weight,
        })
        .collect();
    let raw: f64 = components.iter().map(|c| c.value * c.effective_weight).sum();
    let score = raw.round().clamp(0.0, 100.0) as u8;

    PlayerScore {
        score,
        tier: RatingTier::from_score(score),
        breakdown: ScoreBreakdown {
            components,
            missing,
        },
    }
}

fn component_value(player: &Player, component: ScoreComponent) -> Option<f64> {
    match component {
        ScoreComponent::Skills => player.skill_average(),
        ScoreComponent::Physical => player.physical_average(),
        ScoreComponent::Stats => player
            .stats()
            .and_then(|stats| normalized_stats(stats, player.is_goalkeeper())),
        ScoreComponent::AgePotential => player.age.map(age_potential),
    }
}

/// Statistics on the 0–100 scale; `None` until the player has appeared in a game.
pub fn normalized_stats(stats: &PlayerStats, goalkeeper: bool) -> Option<f64> {
    const FULL_GAMES: f64 = 20.0;
    const APPEARANCE_POINTS: f64 = 40.0;
    const OUTPUT_POINTS: f64 = 60.0;
    const MAX_DISCIPLINE_PENALTY: f64 = 20.0;

    let games = f64::from(stats.games());
    if games <= 0.0 {
        return None;
    }
    let count = |v: Option<u32>| f64::from(v.unwrap_or(0));

    let appearance = APPEARANCE_POINTS * (games / FULL_GAMES).min(1.0);
    let rate = if goalkeeper {
        (count(stats.clean_sheets) + count(stats.saves) / 5.0) / games
    } else {
        (count(stats.goals) + count(stats.assists)) / games
    };
    let output = OUTPUT_POINTS * rate.min(1.0);
    let discipline = (10.0 * (count(stats.yellow_cards) + 3.0 * count(stats.red_cards)) / games)
        .min(MAX_DISCIPLINE_PENALTY);

    Some((appearance + output - discipline).clamp(0.0, 100.0))
}

pub fn age_potential(age: u32) -> f64 {
    match age {
        0..=21 => 100.0,
        22..=25 => 80.0,
        26..=29 => 60.0,
        30..=32 => 40.0,
        _ => 20.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(RatingTier::from_score(100), RatingTier::Exceptional);
        assert_eq!(RatingTier::from_score(85), RatingTier::Exceptional);
        assert_eq!(RatingTier::from_score(84), RatingTier::Strong);
        assert_eq!(RatingTier::from_score(70), RatingTier::Strong);
        assert_eq!(RatingTier::from_score(69), RatingTier::Solid);
        assert_eq!(RatingTier::from_score(50), RatingTier::Solid);
        assert_eq!(RatingTier::from_score(49), RatingTier::Developing);
        assert_eq!(RatingTier::from_score(0), RatingTier::Developing);
    }

    #[test]
    fn stats_need_games() {
        let stats = PlayerStats {
            games: Some(0),
            goals: Some(4),
            ..PlayerStats::default()
        };
        assert!(normalized_stats(&stats, false).is_none());
    }

    #[test]
    fn keeper_stats_use_clean_sheets_and_saves() {
        let stats = PlayerStats {
            games: Some(20),
            clean_sheets: Some(10),
            saves: Some(50),
            ..PlayerStats::default()
        };
        // 40 appearance + 60 * min((10 + 10) / 20, 1)
        assert_eq!(normalized_stats(&stats, true), Some(100.0));
        // As an outfielder the same counters produce no output.
        assert_eq!(normalized_stats(&stats, false), Some(40.0));
    }

    #[test]
    fn discipline_penalty_is_capped() {
        let stats = PlayerStats {
            games: Some(10),
            goals: Some(5),
            red_cards: Some(10),
            ..PlayerStats::default()
        };
        // 20 appearance + 30 output - 20 capped penalty
        assert_eq!(normalized_stats(&stats, false), Some(30.0));
    }

    #[test]
    fn age_bands() {
        assert_eq!(age_potential(19), 100.0);
        assert_eq!(age_potential(25), 80.0);
        assert_eq!(age_potential(29), 60.0);
        assert_eq!(age_potential(32), 40.0);
        assert_eq!(age_potential(36), 20.0);
    }
}
