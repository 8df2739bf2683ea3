use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::skill_schema::{self, PositionGroup};

/// Player snapshot as delivered by the team API.
///
/// Every nested section is optional. Values are normalised once, while
/// deserialising: attribute and skill ratings are rounded and clamped into
/// `0..=100`, counters are clamped to be non-negative, and anything that is not
/// a number is dropped rather than coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default, deserialize_with = "de::opt_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub preferred_foot: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub weight: Option<String>,
    /// `data:` URL of the player's photo.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub photo: Option<String>,
    #[serde(default)]
    pub physical_attributes: Option<PhysicalAttributes>,
    #[serde(default, deserialize_with = "de::opt_score_map")]
    pub skills: Option<BTreeMap<String, u8>>,
    #[serde(default)]
    pub stats: Option<PlayerStats>,
    #[serde(default, deserialize_with = "de::list")]
    pub injuries: Vec<Injury>,
    #[serde(default)]
    pub development: Option<Development>,
    #[serde(default, deserialize_with = "de::list")]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalAttributes {
    #[serde(default, deserialize_with = "de::opt_score")]
    pub speed: Option<u8>,
    #[serde(default, deserialize_with = "de::opt_score")]
    pub strength: Option<u8>,
    #[serde(default, deserialize_with = "de::opt_score")]
    pub agility: Option<u8>,
    #[serde(default, deserialize_with = "de::opt_score")]
    pub endurance: Option<u8>,
    #[serde(default, deserialize_with = "de::opt_score")]
    pub fitness: Option<u8>,
}

impl PhysicalAttributes {
    /// `(key, label, value)` in display order.
    pub fn entries(&self) -> [(&'static str, &'static str, Option<u8>); 5] {
        [
            ("speed", "Speed", self.speed),
            ("strength", "Strength", self.strength),
            ("agility", "Agility", self.agility),
            ("endurance", "Endurance", self.endurance),
            ("fitness", "Fitness", self.fitness),
        ]
    }

    pub fn present(&self) -> impl Iterator<Item = u8> {
        self.entries().into_iter().filter_map(|(_, _, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default, deserialize_with = "de::opt_count")]
    pub games: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub goals: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub assists: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub yellow_cards: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub red_cards: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub saves: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub clean_sheets: Option<u32>,
}

impl PlayerStats {
    pub fn games(&self) -> u32 {
        self.games.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        *self == PlayerStats::default()
    }

    /// `(label, value)` rows for display. Goalkeeper counters are included when the
    /// player is a keeper or when they carry values.
    pub fn display_rows(&self, goalkeeper: bool) -> Vec<(&'static str, u32)> {
        let mut rows = vec![
            ("Games", self.games.unwrap_or(0)),
            ("Goals", self.goals.unwrap_or(0)),
            ("Assists", self.assists.unwrap_or(0)),
            ("Yellow Cards", self.yellow_cards.unwrap_or(0)),
            ("Red Cards", self.red_cards.unwrap_or(0)),
        ];
        if goalkeeper || self.saves.is_some() {
            rows.push(("Saves", self.saves.unwrap_or(0)));
        }
        if goalkeeper || self.clean_sheets.is_some() {
            rows.push(("Clean Sheets", self.clean_sheets.unwrap_or(0)));
        }
        rows
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    #[serde(rename = "type", default, deserialize_with = "de::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "de::text")]
    pub date: String,
    #[serde(default, deserialize_with = "de::text")]
    pub duration: String,
    #[serde(default, deserialize_with = "de::text")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Development {
    #[serde(default, deserialize_with = "de::list")]
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, deserialize_with = "de::text")]
    pub author: String,
    #[serde(default, deserialize_with = "de::text")]
    pub date: String,
    #[serde(default, deserialize_with = "de::text")]
    pub text: String,
}

impl Player {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "Unnamed player" } else { name }
    }

    /// Lowercase ASCII stem for file names: `"Ana-María Ruiz"` → `"ana_mar_a_ruiz"`,
    /// followed by the slugged id when there is one.
    pub fn file_stem(&self) -> String {
        let mut out = slug(self.display_name());
        if out.is_empty() {
            out.push_str("player");
        }
        match self.id.as_deref().map(slug) {
            Some(id) if !id.is_empty() => format!("{out}_{id}"),
            _ => out,
        }
    }

    pub fn position_group(&self) -> PositionGroup {
        self.position
            .as_deref()
            .map(skill_schema::position_group)
            .unwrap_or(PositionGroup::Unknown)
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position_group() == PositionGroup::Goalkeeper
    }

    /// Skills with at least one populated key.
    pub fn skills(&self) -> Option<&BTreeMap<String, u8>> {
        self.skills.as_ref().filter(|skills| !skills.is_empty())
    }

    pub fn physical(&self) -> Option<&PhysicalAttributes> {
        self.physical_attributes
            .as_ref()
            .filter(|attrs| !attrs.is_empty())
    }

    pub fn stats(&self) -> Option<&PlayerStats> {
        self.stats.as_ref().filter(|stats| !stats.is_empty())
    }

    pub fn development_goals(&self) -> &[String] {
        self.development
            .as_ref()
            .map(|dev| dev.goals.as_slice())
            .unwrap_or(&[])
    }

    /// Mean over the populated skill keys, whatever the position schema.
    pub fn skill_average(&self) -> Option<f64> {
        let skills = self.skills()?;
        let sum: u32 = skills.values().map(|v| u32::from(*v)).sum();
        Some(f64::from(sum) / skills.len() as f64)
    }

    pub fn physical_average(&self) -> Option<f64> {
        let attrs = self.physical()?;
        let (sum, n) = attrs
            .present()
            .fold((0u32, 0u32), |(sum, n), v| (sum + u32::from(v), n + 1));
        if n == 0 {
            None
        } else {
            Some(f64::from(sum) / f64::from(n))
        }
    }
}

/// One output stem per player, in input order. Players whose stems collide
/// get `_2`, `_3`, ... in the order they appear.
pub fn unique_file_stems(players: &[Player]) -> Vec<String> {
    let mut taken: HashSet<String> = players.iter().map(Player::file_stem).collect();
    let mut seen: HashSet<String> = HashSet::new();
    players
        .iter()
        .map(|player| {
            let stem = player.file_stem();
            if seen.insert(stem.clone()) {
                return stem;
            }
            let mut n = 2;
            loop {
                let candidate = format!("{stem}_{n}");
                if !taken.contains(&candidate) {
                    taken.insert(candidate.clone());
                    seen.insert(candidate.clone());
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

fn slug(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut prev_us = false;
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_us = false;
        } else if !prev_us && !out.is_empty() {
            out.push('_');
            prev_us = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Parse one player payload. Empty input or a literal `null` is the
/// "no player" case and yields `Ok(None)`.
pub fn parse_player_json(raw: &str) -> Result<Option<Player>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let player = serde_json::from_str::<Player>(trimmed).context("invalid player json")?;
    Ok(Some(player))
}

/// Parse either a single player object or an array of players. `null` entries
/// inside an array are skipped.
pub fn parse_squad_json(raw: &str) -> Result<Vec<Player>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let value: serde_json::Value = serde_json::from_str(trimmed).context("invalid squad json")?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(idx, item)| {
                serde_json::from_value::<Player>(item)
                    .with_context(|| format!("invalid player at index {idx}"))
            })
            .collect(),
        serde_json::Value::Null => Ok(Vec::new()),
        other => {
            let player = serde_json::from_value::<Player>(other).context("invalid player json")?;
            Ok(vec![player])
        }
    }
}

mod de {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn clamp_score(value: f64) -> Option<u8> {
        if !value.is_finite() {
            return None;
        }
        Some(value.round().clamp(0.0, 100.0) as u8)
    }

    fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn opt_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().and_then(number).and_then(clamp_score))
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value
            .as_ref()
            .and_then(number)
            .filter(|v| v.is_finite())
            .map(|v| v.round().clamp(0.0, f64::from(u32::MAX)) as u32))
    }

    pub fn opt_score_map<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<BTreeMap<String, u8>>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        let Some(Value::Object(entries)) = value else {
            return Ok(None);
        };
        let map: BTreeMap<String, u8> = entries
            .iter()
            .filter_map(|(key, v)| number(v).and_then(clamp_score).map(|s| (key.clone(), s)))
            .collect();
        Ok(Some(map))
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_text(d)?.unwrap_or_default())
    }

    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }
}
