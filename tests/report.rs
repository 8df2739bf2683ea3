mod common;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{fixture_player, read_fixture};
use squad_report::diagnostics::Diagnostic;
use squad_report::document::{Block, Document, ImageSource};
use squad_report::layout::{
    CONTENT_BOTTOM, CONTENT_HEIGHT, CONTENT_LEFT, CONTENT_TOP, CONTENT_WIDTH, page_label,
};
use squad_report::player::{Development, PhysicalAttributes};
use squad_report::report::skill_chart_data;
use squad_report::scoring::RatingTier;
use squad_report::{
    Player, RenderOptions, parse_player_json, render_player_report, render_player_report_with,
};

const EPS: f64 = 1e-6;

fn fixed_options() -> RenderOptions {
    let at = NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid timestamp");
    RenderOptions::default().generated_at(at)
}

#[test]
fn minimal_player_renders_one_page() {
    let player = parse_player_json(r#"{"name":"Test"}"#).unwrap().unwrap();
    let outcome = render_player_report(Some(&player));
    assert!(outcome.success);
    let document = outcome.document.expect("document");
    assert!(document.page_count() >= 1);
    assert!(document.contains_text("Test"));
    assert!(document.contains_text(&page_label(1, document.page_count())));

    let score = outcome.score.expect("score");
    assert_eq!(score.score, 0);
    assert_eq!(score.tier, RatingTier::Developing);

    for section in ["physical attributes", "skills", "statistics"] {
        assert!(
            outcome.diagnostics.contains(&Diagnostic::missing(section)),
            "missing {section} should be reported"
        );
    }
    assert!(!outcome.diagnostics.iter().any(Diagnostic::is_failure));
}

#[test]
fn missing_player_is_invalid_input() {
    let outcome = render_player_report(None);
    assert!(!outcome.success);
    assert!(outcome.document.is_none());
    assert!(outcome.score.is_none());
    assert_eq!(outcome.diagnostics, vec![Diagnostic::InvalidInput]);
}

#[test]
fn full_player_renders_every_section() {
    let player = fixture_player("player_full.json");
    let outcome = render_player_report_with(Some(&player), &fixed_options());
    assert!(outcome.success);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);

    let document = outcome.document.expect("document");
    assert_eq!(document.generated_at, "2026-10-18 09:30");
    for heading in [
        "Physical Attributes",
        "Skills",
        "Statistics",
        "Injury History",
        "Development Goals",
        "Notes",
        "Hamstring strain",
        "Generated 2026-10-18 09:30",
    ] {
        assert!(document.contains_text(heading), "{heading} not rendered");
    }

    let has_photo = document.pages[0].body.iter().any(|block| {
        matches!(block, Block::Image(image) if matches!(image.source, ImageSource::Raster(_)))
    });
    assert!(has_photo);

    let score = outcome.score.expect("score");
    assert!(score.score >= 70, "score {}", score.score);
}

/// Every body block sits inside the content area and inside the height the
/// page reports as used.
fn assert_body_within_content(document: &Document) {
    for page in &document.pages {
        assert!(page.used_height <= CONTENT_HEIGHT + EPS);
        for block in &page.body {
            let (min, max) = block.bounds();
            let n = page.number;
            assert!(min.y >= CONTENT_TOP - EPS, "page {n}: {block:?} above content area");
            assert!(max.y <= CONTENT_BOTTOM + EPS, "page {n}: {block:?} below content area");
            assert!(
                max.y <= CONTENT_TOP + page.used_height + EPS,
                "page {n}: {block:?} below used height {}",
                page.used_height
            );
            assert!(min.x >= CONTENT_LEFT - EPS, "page {n}: {block:?} left of content area");
            assert!(
                max.x <= CONTENT_LEFT + CONTENT_WIDTH + EPS,
                "page {n}: {block:?} right of content area"
            );
        }
    }
}

fn assert_footers(document: &Document) {
    let total = document.page_count();
    for page in &document.pages {
        let label = page_label(page.number, total);
        assert!(page.texts().any(|t| t.text == label), "page {} lacks footer", page.number);
    }
}

fn heading_page(document: &Document, title: &str) -> Option<(usize, f64)> {
    document.pages.iter().enumerate().find_map(|(idx, page)| {
        page.body
            .iter()
            .filter_map(Block::as_text)
            .find(|t| t.text == title && t.size == 13.0)
            .map(|t| (idx, t.y))
    })
}

#[test]
fn long_history_spans_pages_within_bounds() {
    let player = fixture_player("player_long.json");
    let outcome = render_player_report_with(Some(&player), &fixed_options());
    let document = outcome.document.expect("document");
    assert!(document.page_count() > 1, "expected several pages");
    assert_body_within_content(&document);
    assert_footers(&document);
    for page in &document.pages {
        assert!(page.texts().any(|t| t.text == "Long Career" && t.rotation != 0.0));
    }

    assert!(document.contains_text("Knee meniscus"));
    assert!(document.contains_text("Scout"));
}

fn many_skills_player(count: usize) -> Player {
    let skills: BTreeMap<String, u8> = (0..count)
        .map(|i| (format!("skill{i:02}"), (40 + i % 60) as u8))
        .collect();
    Player {
        position: Some("ZZ".to_string()),
        skills: Some(skills),
        physical_attributes: Some(PhysicalAttributes {
            speed: Some(70),
            strength: Some(65),
            agility: Some(80),
            endurance: Some(75),
            fitness: Some(72),
        }),
        ..Player::named("Utility Player")
    }
}

#[test]
fn long_skill_lists_continue_across_pages() {
    let player = many_skills_player(34);
    let outcome = render_player_report(Some(&player));
    let document = outcome.document.expect("document");
    assert!(document.page_count() > 1);
    assert_body_within_content(&document);
    assert_footers(&document);

    for datum in skill_chart_data(&player) {
        assert!(document.contains_text(&datum.label), "{} not listed", datum.label);
    }
}

#[test]
fn chart_headings_stay_with_their_charts() {
    let player = many_skills_player(34);
    let document = render_player_report(Some(&player))
        .document
        .expect("document");

    for title in ["Physical Attributes", "Skills"] {
        let (idx, heading_y) = heading_page(&document, title).expect("heading rendered");
        let chart_follows = document.pages[idx].body.iter().any(|block| {
            matches!(block, Block::Image(image) if image.y >= heading_y
                && matches!(image.source, ImageSource::Vector(_)))
        });
        assert!(chart_follows, "{title} heading separated from its chart");
    }
    for page in &document.pages {
        assert!(page.used_height > 10.0 + EPS, "page {} holds only a heading", page.number);
    }
}

#[test]
fn long_goal_lists_span_pages_within_bounds() {
    let goals: Vec<String> = (0..60)
        .map(|i| format!("Goal {i}: hold the line for the full ninety minutes of every match"))
        .collect();
    let player = Player {
        development: Some(Development { goals }),
        ..Player::named("Goal Setter")
    };
    let document = render_player_report(Some(&player))
        .document
        .expect("document");
    assert!(document.page_count() > 1);
    assert_body_within_content(&document);
    assert_footers(&document);
    assert!(document.contains_text("Goal 0:"));
    assert!(document.contains_text("Goal 59:"));
}

#[test]
fn long_info_values_are_cut_to_their_column() {
    let player = Player {
        team: Some("Associação Desportiva e Recreativa Under-23 Reserve Development Squad".to_string()),
        nationality: Some("Saint Vincent and the Grenadines / Trinidad and Tobago".to_string()),
        position: Some("CM".to_string()),
        ..Player::named("Long Strings")
    };
    let document = render_player_report(Some(&player))
        .document
        .expect("document");
    assert_body_within_content(&document);
    assert!(document.texts().any(|t| t.text.ends_with('…')));
}

#[test]
fn broken_photo_keeps_later_sections() {
    let raw = read_fixture("player_full.json").replace(
        "data:image/png;base64,",
        "data:image/png;base64,@@not-base64@@",
    );
    let player = parse_player_json(&raw).unwrap().unwrap();
    let outcome = render_player_report(Some(&player));
    assert!(outcome.success);
    assert!(
        outcome
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::RenderSubsystemFailure { section: "photo", .. }))
    );
    let document = outcome.document.expect("document");
    assert!(document.contains_text("Skills"));
    assert!(document.contains_text("Notes"));
}

#[test]
fn watermark_can_be_disabled() {
    let player = fixture_player("player_full.json");
    let options = RenderOptions {
        watermark: false,
        ..fixed_options()
    };
    let document = render_player_report_with(Some(&player), &options)
        .document
        .expect("document");
    assert!(!document.texts().any(|t| t.opacity < 1.0));
}
