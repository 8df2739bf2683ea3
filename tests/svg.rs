mod common;

use common::fixture_player;
use squad_report::document::{Page, PageSize, TextRun};
use squad_report::render_player_report;
use squad_report::svg::{render_document, render_page};

#[test]
fn one_svg_root_per_page() {
    let player = fixture_player("player_long.json");
    let document = render_player_report(Some(&player)).document.expect("document");
    let pages = render_document(&document).expect("svg output");
    assert_eq!(pages.len(), document.page_count());
    for svg in &pages {
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("viewBox=\"0 0 210.00 297.00\""));
    }
}

#[test]
fn text_is_escaped() {
    let mut page = Page::new(1);
    page.body.push(TextRun::new(10.0, 10.0, "Smith & <Jones> \"Jr\"").into());
    let svg = render_page(&page, PageSize::A4).expect("svg output");
    assert!(svg.contains("Smith &amp; &lt;Jones&gt; &quot;Jr&quot;"));
    assert!(!svg.contains("<Jones>"));
}

#[test]
fn photos_and_charts_are_embedded() {
    let player = fixture_player("player_full.json");
    let document = render_player_report(Some(&player)).document.expect("document");
    let svg = render_document(&document).expect("svg output").join("\n");
    assert!(svg.contains("href=\"data:image/png;base64,"));
    assert!(svg.contains("<polygon"));
    assert!(svg.contains("transform=\"rotate(-45.00"));
}
