use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use squad_report::batch::{rank_outcomes, render_squad};
use squad_report::player::unique_file_stems;
use squad_report::squad_export::export_squad_with_progress;
use squad_report::{Document, RenderOptions, parse_squad_json, svg};

const DEFAULT_OUT_DIR: &str = "reports";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let input = parse_input_arg().context("usage: squad_report <players.json> [--out DIR] [--xlsx PATH] [--json]")?;
    let out_dir = parse_path_arg("--out").unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    let xlsx_path = parse_path_arg("--xlsx");
    let dump_json = std::env::args().skip(1).any(|arg| arg == "--json");

    let raw = fs::read_to_string(&input)
        .with_context(|| format!("failed reading {}", input.display()))?;
    let players = parse_squad_json(&raw)?;
    if players.is_empty() {
        return Err(anyhow!("no players found in {}", input.display()));
    }

    let options = RenderOptions::from_env();
    let outcomes = render_squad(&players, &options);

    let stems = unique_file_stems(&players);
    let mut pages_written = 0usize;
    let mut failures = 0usize;
    for ((player, outcome), stem) in players.iter().zip(&outcomes).zip(&stems) {
        let Some(document) = outcome.document.as_ref() else {
            failures += 1;
            continue;
        };
        let dir = out_dir.join(stem);
        pages_written += write_document(&dir, document, dump_json)?;
        for diagnostic in &outcome.diagnostics {
            if diagnostic.is_failure() {
                warn!(player = player.display_name(), "{diagnostic}");
            }
        }
    }

    println!("Reports written to {}", out_dir.display());
    println!("Players: {}", players.len());
    println!("Pages: {pages_written}");
    if failures > 0 {
        println!("Skipped: {failures}");
    }

    println!("Ranking:");
    for (rank, (idx, score)) in rank_outcomes(&outcomes).iter().enumerate() {
        println!(
            "{:>3}. {:<28} {:>3}  {}",
            rank + 1,
            players[*idx].display_name(),
            score.score,
            score.tier.label()
        );
    }

    if let Some(path) = xlsx_path {
        let report = export_squad_with_progress(&path, &players, |progress| {
            info!(current = progress.current, total = progress.total, "{}", progress.message);
        })?;
        println!(
            "Workbook: {} ({} players, {} skills, {} injuries, {} notes)",
            path.display(),
            report.players,
            report.skills,
            report.injuries,
            report.notes
        );
    }

    Ok(())
}

fn init_logging() {
    let filter = std::env::var("SQUAD_REPORT_LOG")
        .ok()
        .and_then(|val| EnvFilter::try_new(val.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn write_document(dir: &Path, document: &Document, dump_json: bool) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("failed creating {}", dir.display()))?;
    clear_stale_pages(dir)?;
    let pages = svg::render_document(document)?;
    for (idx, page) in pages.iter().enumerate() {
        let path = dir.join(format!("page-{:03}.svg", idx + 1));
        fs::write(&path, page).with_context(|| format!("failed writing {}", path.display()))?;
    }
    if dump_json {
        let path = dir.join("document.json");
        let json = serde_json::to_string_pretty(document).context("serialize document")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).context("swap document json")?;
    }
    Ok(pages.len())
}

/// Drop pages left over from an earlier, longer report in the same directory.
fn clear_stale_pages(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("failed listing {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_page = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("page-") && name.ends_with(".svg"));
        if is_page {
            fs::remove_file(&path).with_context(|| format!("failed removing {}", path.display()))?;
        }
    }
    Ok(())
}

fn parse_input_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--out" || arg == "--xlsx" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        if !arg.trim().is_empty() {
            return Some(PathBuf::from(arg));
        }
    }
    None
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}
