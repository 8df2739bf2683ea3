pub mod batch;
pub mod charts;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod layout;
pub mod player;
pub mod report;
pub mod scoring;
pub mod skill_schema;
pub mod squad_export;
pub mod svg;
pub mod table;

pub use config::RenderOptions;
pub use document::Document;
pub use player::{Player, parse_player_json, parse_squad_json};
pub use report::{ReportOutcome, render_player_report, render_player_report_with};
pub use scoring::{PlayerScore, RatingTier, compute_score};
pub use skill_schema::{SkillDef, resolve_skill_schema};
