use squad_report::resolve_skill_schema;
use squad_report::skill_schema::{
    INITIAL_SKILL_VALUE, PositionGroup, initial_skills, position_group, skill_label,
};

fn keys(code: &str) -> Vec<&'static str> {
    resolve_skill_schema(code).iter().map(|def| def.key).collect()
}

#[test]
fn goalkeeper_schema_leads_with_goalkeeping() {
    let keys = keys("GK");
    assert_eq!(keys.len(), 6);
    assert_eq!(keys[0], "goalkeeping");
    assert!(keys.contains(&"reflexes"));
}

#[test]
fn striker_schema_has_finishing() {
    assert!(keys("ST").contains(&"finishing"));
    assert_eq!(keys("st"), keys("ST"));
    assert_eq!(keys(" cf "), keys("ST"));
}

#[test]
fn unknown_codes_get_the_default_schema() {
    assert_eq!(keys("XYZ"), ["passing", "shooting", "dribbling"]);
    assert_eq!(keys(""), ["passing", "shooting", "dribbling"]);
    assert_eq!(position_group("XYZ"), PositionGroup::Unknown);
}

#[test]
fn position_codes_map_to_groups() {
    assert_eq!(position_group("CB"), PositionGroup::Defender);
    assert_eq!(position_group("CDM"), PositionGroup::Midfielder);
    assert_eq!(position_group("LW"), PositionGroup::Forward);
    assert_eq!(position_group("goalkeeper"), PositionGroup::Goalkeeper);
}

#[test]
fn new_players_start_at_the_initial_value() {
    let skills = initial_skills("CM");
    assert_eq!(skills.len(), 6);
    assert!(skills.values().all(|v| *v == INITIAL_SKILL_VALUE));
    assert!(skills.contains_key("workRate"));
}

#[test]
fn labels_fall_back_to_humanised_keys() {
    assert_eq!(skill_label("ballControl"), "Ball Control");
    assert_eq!(skill_label("weak_foot"), "Weak Foot");
}
