use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionGroup {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillDef {
    pub key: &'static str,
    pub label: &'static str,
}

const fn skill(key: &'static str, label: &'static str) -> SkillDef {
    SkillDef { key, label }
}

const GOALKEEPER_SKILLS: &[SkillDef] = &[
    skill("goalkeeping", "Goalkeeping"),
    skill("reflexes", "Reflexes"),
    skill("handling", "Handling"),
    skill("positioning", "Positioning"),
    skill("distribution", "Distribution"),
    skill("communication", "Communication"),
];

const DEFENDER_SKILLS: &[SkillDef] = &[
    skill("tackling", "Tackling"),
    skill("marking", "Marking"),
    skill("heading", "Heading"),
    skill("positioning", "Positioning"),
    skill("passing", "Passing"),
    skill("composure", "Composure"),
];

const MIDFIELDER_SKILLS: &[SkillDef] = &[
    skill("passing", "Passing"),
    skill("vision", "Vision"),
    skill("dribbling", "Dribbling"),
    skill("ballControl", "Ball Control"),
    skill("shooting", "Shooting"),
    skill("workRate", "Work Rate"),
];

const FORWARD_SKILLS: &[SkillDef] = &[
    skill("finishing", "Finishing"),
    skill("shooting", "Shooting"),
    skill("dribbling", "Dribbling"),
    skill("ballControl", "Ball Control"),
    skill("heading", "Heading"),
    skill("movement", "Movement"),
];

const DEFAULT_SKILLS: &[SkillDef] = &[
    skill("passing", "Passing"),
    skill("shooting", "Shooting"),
    skill("dribbling", "Dribbling"),
];

/// Starting value for every schema key on a newly created player.
pub const INITIAL_SKILL_VALUE: u8 = 50;

static POSITION_CODES: Lazy<HashMap<&'static str, PositionGroup>> = Lazy::new(|| {
    let groups: [(PositionGroup, &[&str]); 4] = [
        (PositionGroup::Goalkeeper, &["GK", "G", "GOALKEEPER", "KEEPER"]),
        (
            PositionGroup::Defender,
            &["CB", "LB", "RB", "LWB", "RWB", "SW", "DF", "D", "DEF", "DEFENDER"],
        ),
        (
            PositionGroup::Midfielder,
            &["CDM", "DM", "CM", "CAM", "AM", "LM", "RM", "MF", "M", "MID", "MIDFIELDER"],
        ),
        (
            PositionGroup::Forward,
            &[
                "ST", "CF", "SS", "LW", "RW", "FW", "F", "FWD", "FORWARD", "STRIKER", "ATTACKER",
                "WINGER",
            ],
        ),
    ];
    let mut map = HashMap::new();
    for (group, codes) in groups {
        for code in codes {
            map.insert(*code, group);
        }
    }
    map
});

pub fn position_group(code: &str) -> PositionGroup {
    let code = code.trim().to_ascii_uppercase();
    POSITION_CODES
        .get(code.as_str())
        .copied()
        .unwrap_or(PositionGroup::Unknown)
}

pub fn group_schema(group: PositionGroup) -> &'static [SkillDef] {
    match group {
        PositionGroup::Goalkeeper => GOALKEEPER_SKILLS,
        PositionGroup::Defender => DEFENDER_SKILLS,
        PositionGroup::Midfielder => MIDFIELDER_SKILLS,
        PositionGroup::Forward => FORWARD_SKILLS,
        PositionGroup::Unknown => DEFAULT_SKILLS,
    }
}

/// Ordered skill keys and labels for a position code. Unrecognised codes get
/// the generic three-skill set.
pub fn resolve_skill_schema(code: &str) -> &'static [SkillDef] {
    group_schema(position_group(code))
}

/// Skill map for a new player at this position.
pub fn initial_skills(code: &str) -> BTreeMap<String, u8> {
    resolve_skill_schema(code)
        .iter()
        .map(|def| (def.key.to_string(), INITIAL_SKILL_VALUE))
        .collect()
}

pub fn group_label(group: PositionGroup) -> &'static str {
    match group {
        PositionGroup::Goalkeeper => "Goalkeeper",
        PositionGroup::Defender => "Defender",
        PositionGroup::Midfielder => "Midfielder",
        PositionGroup::Forward => "Forward",
        PositionGroup::Unknown => "Player",
    }
}

/// Display label for a skill key: the schema label when one exists, otherwise
/// the key split on camelCase / snake_case boundaries and title-cased.
pub fn skill_label(key: &str) -> String {
    let known = [
        GOALKEEPER_SKILLS,
        DEFENDER_SKILLS,
        MIDFIELDER_SKILLS,
        FORWARD_SKILLS,
    ]
    .into_iter()
    .flatten()
    .find(|def| def.key == key);
    if let Some(def) = known {
        return def.label.to_string();
    }

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in key.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
