use std::fs;
use std::path::PathBuf;

use squad_report::{Player, parse_player_json, parse_squad_json};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[allow(dead_code)]
pub fn fixture_player(name: &str) -> Player {
    parse_player_json(&read_fixture(name))
        .expect("fixture should parse")
        .expect("fixture should hold a player")
}

#[allow(dead_code)]
pub fn fixture_squad() -> Vec<Player> {
    parse_squad_json(&read_fixture("squad.json")).expect("squad fixture should parse")
}
