//! Player report assembly.
//!
//! Sections are placed top to bottom through a [`LayoutContext`] owned by the
//! render call. A section that has nothing to show is skipped, and a section
//! that fails to draw is replaced by blank space of its estimated size; in both
//! cases a [`Diagnostic`] is recorded and the remaining sections still render.

use tracing::{debug, warn};

use crate::charts::{self, ChartDatum};
use crate::config::RenderOptions;
use crate::diagnostics::Diagnostic;
use crate::document::{
    CircleShape, Color, Document, ImageBlock, ImageSource, LineShape, Point, RasterImage,
    RectShape, Stroke, TextAnchor, TextRun, line_height, truncate_to_width, wrap_text,
};
use crate::layout::{
    CONTENT_HEIGHT, CONTENT_LEFT, CONTENT_WIDTH, LayoutContext, PAGE, PageFrame, SECTION_GAP,
    stamp_page_frames,
};
use crate::player::Player;
use crate::scoring::{PlayerScore, ScoreComponent, compute_score, normalized_stats};
use crate::skill_schema::{group_label, group_schema, skill_label};
use crate::table::{Table, place_table};

const HEADING_HEIGHT: f64 = 10.0;
const TITLE_HEIGHT: f64 = 18.0;
const SCORE_CARD_HEIGHT: f64 = 38.0;
const INFO_ROW_HEIGHT: f64 = 7.0;
const PHOTO_SIZE: f64 = 30.0;
const RADAR_SIZE: f64 = 80.0;
const BAR_CHART_HEIGHT: f64 = 60.0;
const VALUE_ROW_HEIGHT: f64 = 8.0;
const VALUE_LIST_TOP: f64 = 6.0;
const VALUE_LIST_LEFT: f64 = CONTENT_LEFT + RADAR_SIZE + 10.0;
const BODY_SIZE: f64 = 10.0;
const NOTE_SIZE: f64 = 9.0;

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// False only when there was no player to report on.
    pub success: bool,
    pub document: Option<Document>,
    pub diagnostics: Vec<Diagnostic>,
    pub score: Option<PlayerScore>,
}

pub fn render_player_report(player: Option<&Player>) -> ReportOutcome {
    render_player_report_with(player, &RenderOptions::default())
}

pub fn render_player_report_with(player: Option<&Player>, options: &RenderOptions) -> ReportOutcome {
    let Some(player) = player else {
        warn!("player report requested without a player");
        return ReportOutcome {
            success: false,
            document: None,
            diagnostics: vec![Diagnostic::InvalidInput],
            score: None,
        };
    };

    let score = compute_score(player);
    let mut report = ReportBuilder {
        player,
        score: &score,
        ctx: LayoutContext::new(),
        diagnostics: Vec::new(),
    };
    report.title();
    report.info_card();
    report.score_card();
    report.physical_attributes();
    report.skills();
    report.statistics();
    report.injuries();
    report.development_goals();
    report.notes();

    let ReportBuilder {
        ctx, diagnostics, ..
    } = report;
    let mut pages = ctx.into_pages();
    let generated_at = options.timestamp();
    stamp_page_frames(
        &mut pages,
        &PageFrame {
            title: &options.title,
            subject: player.display_name(),
            generated_at: &generated_at,
            branding: &options.branding,
            watermark: options.watermark,
        },
    );

    for diagnostic in &diagnostics {
        if diagnostic.is_failure() {
            warn!(player = player.display_name(), "{diagnostic}");
        } else {
            debug!(player = player.display_name(), "{diagnostic}");
        }
    }
    debug!(
        player = player.display_name(),
        pages = pages.len(),
        score = score.score,
        "player report rendered"
    );

    ReportOutcome {
        success: true,
        document: Some(Document {
            title: options.title.clone(),
            subject: player.display_name().to_string(),
            generated_at,
            page_size: PAGE,
            pages,
        }),
        diagnostics,
        score: Some(score),
    }
}

/// Skill axes for a player: the position schema in schema order (absent keys
/// at 0) followed by any extra keys the player carries. When none of the
/// schema keys are present the player's own keys are used as they are.
pub fn skill_chart_data(player: &Player) -> Vec<ChartDatum> {
    let Some(skills) = player.skills() else {
        return Vec::new();
    };
    let schema = group_schema(player.position_group());
    let uses_schema = schema.iter().any(|def| skills.contains_key(def.key));

    let mut data = Vec::with_capacity(skills.len().max(schema.len()));
    if uses_schema {
        for def in schema {
            let value = skills.get(def.key).copied().unwrap_or(0);
            data.push(ChartDatum::new(def.label, f64::from(value)));
        }
    }
    for (key, value) in skills {
        if uses_schema && schema.iter().any(|def| def.key == key) {
            continue;
        }
        data.push(ChartDatum::new(skill_label(key), f64::from(*value)));
    }
    data
}

pub fn physical_chart_data(player: &Player) -> Vec<ChartDatum> {
    player
        .physical()
        .map(|attrs| {
            attrs
                .entries()
                .iter()
                .map(|(_, label, value)| ChartDatum::new(*label, f64::from(value.unwrap_or(0))))
                .collect()
        })
        .unwrap_or_default()
}

struct ReportBuilder<'a> {
    player: &'a Player,
    score: &'a PlayerScore,
    ctx: LayoutContext,
    diagnostics: Vec<Diagnostic>,
}

impl ReportBuilder<'_> {
    /// Section heading kept on the same page as the first `keep_with`
    /// millimetres of its content.
    fn heading(&mut self, title: &str, keep_with: f64) {
        let keep_with = keep_with.clamp(0.0, CONTENT_HEIGHT - HEADING_HEIGHT);
        self.ctx.gap(SECTION_GAP);
        self.ctx.ensure_space(HEADING_HEIGHT + keep_with);
        let top = self.ctx.reserve(HEADING_HEIGHT);
        self.ctx.push(
            TextRun::new(CONTENT_LEFT, top + 6.0, title)
                .size(13.0)
                .bold()
                .color(Color::BRAND),
        );
        self.ctx.push(LineShape {
            from: Point::new(CONTENT_LEFT, top + 8.0),
            to: Point::new(CONTENT_LEFT + CONTENT_WIDTH, top + 8.0),
            stroke: Stroke::new(Color::BRAND, 0.4),
        });
    }

    fn title(&mut self) {
        let top = self.ctx.reserve(TITLE_HEIGHT);
        self.ctx.push(
            TextRun::new(CONTENT_LEFT, top + 8.0, self.player.display_name())
                .size(20.0)
                .bold(),
        );

        let mut subtitle = vec![group_label(self.player.position_group()).to_string()];
        if let Some(position) = self.player.position.as_deref() {
            subtitle.push(position.to_string());
        }
        if let Some(number) = self.player.number {
            subtitle.push(format!("#{number}"));
        }
        self.ctx.push(
            TextRun::new(CONTENT_LEFT, top + 15.0, subtitle.join(" · "))
                .size(11.0)
                .color(Color::MUTED),
        );
    }

    fn info_fields(&self) -> Vec<(&'static str, String)> {
        let p = self.player;
        let mut fields = Vec::new();
        let mut add = |label: &'static str, value: Option<String>| {
            if let Some(value) = value {
                fields.push((label, value));
            }
        };
        add("Position", p.position.clone());
        add("Number", p.number.map(|n| n.to_string()));
        add("Age", p.age.map(|a| a.to_string()));
        add("Date of Birth", p.dob.clone());
        add("Status", p.status.clone());
        add("Team", p.team.clone());
        add("Nationality", p.nationality.clone());
        add("Preferred Foot", p.preferred_foot.clone());
        add("Height", p.height.clone());
        add("Weight", p.weight.clone());
        fields
    }

    fn info_card(&mut self) {
        let fields = self.info_fields();
        let photo = match self.player.photo.as_deref().map(RasterImage::from_data_url) {
            Some(Ok(image)) => Some(image),
            Some(Err(err)) => {
                self.diagnostics.push(Diagnostic::failure("photo", format!("{err:#}")));
                None
            }
            None => None,
        };
        if fields.is_empty() && photo.is_none() {
            return;
        }

        let rows = fields.len().div_ceil(2);
        let mut height = 8.0 + rows as f64 * INFO_ROW_HEIGHT;
        if photo.is_some() {
            height = height.max(PHOTO_SIZE + 8.0);
        }

        self.ctx.gap(SECTION_GAP);
        let top = self.ctx.reserve(height);
        self.ctx.push(
            RectShape::new(CONTENT_LEFT, top, CONTENT_WIDTH, height)
                .rounded(3.0)
                .fill(Color::PANEL),
        );

        let text_width = if photo.is_some() {
            CONTENT_WIDTH - PHOTO_SIZE - 8.0
        } else {
            CONTENT_WIDTH
        };
        let column_width = text_width / 2.0;
        for (i, (label, value)) in fields.iter().enumerate() {
            let x = CONTENT_LEFT + 5.0 + (i % 2) as f64 * column_width;
            let y = top + 8.0 + (i / 2) as f64 * INFO_ROW_HEIGHT;
            self.ctx.push(
                TextRun::new(x, y, format!("{label}:"))
                    .size(9.0)
                    .bold()
                    .color(Color::MUTED),
            );
            let value = truncate_to_width(value, column_width - 33.0, 9.0);
            self.ctx.push(TextRun::new(x + 28.0, y, value).size(9.0));
        }

        if let Some(image) = photo {
            self.ctx.push(ImageBlock {
                x: CONTENT_LEFT + CONTENT_WIDTH - PHOTO_SIZE - 4.0,
                y: top + 4.0,
                width: PHOTO_SIZE,
                height: PHOTO_SIZE,
                source: ImageSource::Raster(image),
            });
        }
    }

    fn score_card(&mut self) {
        let score = self.score;
        let tier = score.tier;
        self.ctx.gap(SECTION_GAP);
        let top = self.ctx.reserve(SCORE_CARD_HEIGHT);
        self.ctx.push(
            RectShape::new(CONTENT_LEFT, top, CONTENT_WIDTH, SCORE_CARD_HEIGHT)
                .rounded(3.0)
                .stroke(Stroke::new(tier.color(), 0.6)),
        );

        let center = Point::new(CONTENT_LEFT + 19.0, top + SCORE_CARD_HEIGHT / 2.0);
        self.ctx.push(CircleShape::new(center, 14.0).stroke(Stroke::new(tier.color(), 1.5)));
        self.ctx.push(
            TextRun::new(center.x, center.y + 3.0, score.score.to_string())
                .size(22.0)
                .bold()
                .color(tier.color())
                .anchor(TextAnchor::Middle),
        );

        let x = CONTENT_LEFT + 40.0;
        self.ctx.push(
            TextRun::new(x, top + 10.0, format!("Overall rating: {}", tier.label()))
                .size(14.0)
                .bold()
                .color(tier.color()),
        );
        self.ctx.push(
            TextRun::new(x, top + 17.0, tier.description())
                .size(9.0)
                .color(Color::MUTED),
        );

        let parts: Vec<String> = score
            .breakdown
            .components
            .iter()
            .map(|c| {
                format!(
                    "{} {:.0} ({:.0}%)",
                    c.component.label(),
                    c.value,
                    c.effective_weight * 100.0
                )
            })
            .collect();
        if !parts.is_empty() {
            self.ctx
                .push(TextRun::new(x, top + 26.0, parts.join("  ·  ")).size(8.5));
        }
        if !score.breakdown.missing.is_empty() {
            let missing: Vec<&str> = score
                .breakdown
                .missing
                .iter()
                .map(|c| c.label())
                .collect();
            self.ctx.push(
                TextRun::new(x, top + 32.0, format!("No data: {}", missing.join(", ")))
                    .size(8.0)
                    .color(Color::MUTED),
            );
        }
    }

    /// Radar (or bars below three axes) with a value list beside it. Rows that
    /// do not fit beside the chart continue below it, one row at a time.
    fn chart_section(&mut self, title: &str, data: &[ChartDatum], color: Color) {
        self.heading(title, RADAR_SIZE);
        let top = self.ctx.reserve(RADAR_SIZE);

        if data.len() >= 3 {
            let chart = charts::radar_chart(data, RADAR_SIZE, color);
            self.ctx.push(ImageBlock {
                x: CONTENT_LEFT,
                y: top,
                width: RADAR_SIZE,
                height: RADAR_SIZE,
                source: ImageSource::Vector(chart.canvas),
            });
        } else {
            let chart = charts::bar_chart(data, RADAR_SIZE, BAR_CHART_HEIGHT);
            self.ctx.push(ImageBlock {
                x: CONTENT_LEFT,
                y: top,
                width: RADAR_SIZE,
                height: BAR_CHART_HEIGHT,
                source: ImageSource::Vector(chart.canvas),
            });
        }

        let beside = ((RADAR_SIZE - VALUE_LIST_TOP) / VALUE_ROW_HEIGHT).floor() as usize;
        let (first, rest) = data.split_at(beside.min(data.len()));
        for (i, datum) in first.iter().enumerate() {
            let y = top + VALUE_LIST_TOP + i as f64 * VALUE_ROW_HEIGHT;
            self.value_row(VALUE_LIST_LEFT, y, datum, color);
        }
        for datum in rest {
            let row_top = self.ctx.reserve(VALUE_ROW_HEIGHT);
            self.value_row(CONTENT_LEFT, row_top + 2.0, datum, color);
        }
    }

    /// Label, track, fill and value for one datum; `y` is the top of the track.
    fn value_row(&mut self, x: f64, y: f64, datum: &ChartDatum, color: Color) {
        let bar_width = CONTENT_LEFT + CONTENT_WIDTH - x - 45.0;
        self.ctx.push(
            TextRun::new(x, y + 2.5, truncate_to_width(&datum.label, 30.0, 9.0)).size(9.0),
        );
        self.ctx.push(
            RectShape::new(x + 32.0, y, bar_width, 3.0)
                .rounded(1.5)
                .fill(Color::GRID),
        );
        let fill_width = bar_width * datum.value.clamp(0.0, 100.0) / 100.0;
        self.ctx.push(
            RectShape::new(x + 32.0, y, fill_width, 3.0)
                .rounded(1.5)
                .fill(color),
        );
        self.ctx.push(
            TextRun::new(x + 34.0 + bar_width, y + 2.5, format!("{:.0}", datum.value))
                .size(9.0)
                .bold(),
        );
    }

    fn physical_attributes(&mut self) {
        let data = physical_chart_data(self.player);
        if data.is_empty() {
            self.diagnostics.push(Diagnostic::missing("physical attributes"));
            return;
        }
        self.chart_section("Physical Attributes", &data, Color::rgb(22, 163, 74));
    }

    fn skills(&mut self) {
        let data = skill_chart_data(self.player);
        if data.is_empty() {
            self.diagnostics.push(Diagnostic::missing("skills"));
            return;
        }
        self.chart_section("Skills", &data, Color::rgb(37, 99, 235));
    }

    fn statistics(&mut self) {
        let Some(stats) = self.player.stats() else {
            self.diagnostics.push(Diagnostic::missing("statistics"));
            return;
        };
        let goalkeeper = self.player.is_goalkeeper();
        let rows = stats.display_rows(goalkeeper);
        let data: Vec<ChartDatum> = rows
            .iter()
            .map(|(label, value)| ChartDatum::new(*label, f64::from(*value)))
            .collect();

        self.heading("Statistics", BAR_CHART_HEIGHT);
        let top = self.ctx.reserve(BAR_CHART_HEIGHT);
        let chart = charts::bar_chart(&data, CONTENT_WIDTH, BAR_CHART_HEIGHT);
        self.ctx.push(ImageBlock {
            x: CONTENT_LEFT,
            y: top,
            width: CONTENT_WIDTH,
            height: BAR_CHART_HEIGHT,
            source: ImageSource::Vector(chart.canvas),
        });

        let games = stats.games();
        let mut table = Table::new(&["Statistic", "Total", "Per Game"]).widths(&[2.0, 1.0, 1.0]);
        for (label, value) in &rows {
            let per_game = if *label == "Games" || games == 0 {
                "-".to_string()
            } else {
                format!("{:.2}", f64::from(*value) / f64::from(games))
            };
            table.row(vec![label.to_string(), value.to_string(), per_game]);
        }
        if let Some(normalized) = normalized_stats(stats, goalkeeper) {
            table.row(vec![
                ScoreComponent::Stats.label().to_string(),
                format!("{normalized:.0} / 100"),
                "-".to_string(),
            ]);
        }
        self.ctx.gap(3.0);
        if let Some(diagnostic) = place_table(&mut self.ctx, "statistics table", &table) {
            self.diagnostics.push(diagnostic);
        }
    }

    fn injuries(&mut self) {
        if self.player.injuries.is_empty() {
            return;
        }
        let mut table =
            Table::new(&["Type", "Date", "Duration", "Status"]).widths(&[2.0, 1.2, 1.2, 1.0]);
        for injury in &self.player.injuries {
            table.row(vec![
                or_dash(&injury.kind),
                or_dash(&injury.date),
                or_dash(&injury.duration),
                or_dash(&injury.status),
            ]);
        }
        self.heading("Injury History", table.lead_height());
        if let Some(diagnostic) = place_table(&mut self.ctx, "injuries", &table) {
            self.diagnostics.push(diagnostic);
        }
    }

    fn development_goals(&mut self) {
        let goals = self.player.development_goals();
        if goals.is_empty() {
            return;
        }
        let step = line_height(BODY_SIZE);
        self.heading("Development Goals", step);
        for (i, goal) in goals.iter().enumerate() {
            let prefix = format!("{}.", i + 1);
            let lines = wrap_text(goal, CONTENT_WIDTH - 8.0, BODY_SIZE);
            for (j, line) in lines.iter().enumerate() {
                let top = self.ctx.reserve(step);
                let baseline = top + step * 0.75;
                if j == 0 {
                    self.ctx.push(
                        TextRun::new(CONTENT_LEFT, baseline, prefix.clone())
                            .size(BODY_SIZE)
                            .bold(),
                    );
                }
                self.ctx
                    .push(TextRun::new(CONTENT_LEFT + 8.0, baseline, line.clone()).size(BODY_SIZE));
            }
            self.ctx.advance(1.5);
        }
    }

    fn notes(&mut self) {
        if self.player.notes.is_empty() {
            return;
        }
        let step = line_height(NOTE_SIZE);
        self.heading("Notes", 2.0 * step);
        for note in &self.player.notes {
            let author = if note.author.is_empty() {
                "Unknown author"
            } else {
                note.author.as_str()
            };
            let byline = if note.date.is_empty() {
                author.to_string()
            } else {
                format!("{author} · {}", note.date)
            };

            self.ctx.ensure_space(2.0 * step);
            let top = self.ctx.reserve(step);
            self.ctx.push(
                TextRun::new(CONTENT_LEFT, top + step * 0.75, byline)
                    .size(NOTE_SIZE)
                    .bold()
                    .color(Color::MUTED),
            );
            for line in wrap_text(&note.text, CONTENT_WIDTH - 4.0, NOTE_SIZE) {
                let top = self.ctx.reserve(step);
                self.ctx.push(
                    TextRun::new(CONTENT_LEFT + 4.0, top + step * 0.75, line).size(NOTE_SIZE),
                );
            }
            self.ctx.advance(2.0);
        }
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn skill_axes_follow_schema_then_extras() {
        let mut skills = BTreeMap::new();
        skills.insert("finishing".to_string(), 80);
        skills.insert("weakFoot".to_string(), 60);
        let player = Player {
            position: Some("ST".to_string()),
            skills: Some(skills),
            ..Player::named("Nine")
        };
        let data = skill_chart_data(&player);
        let labels: Vec<&str> = data.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Finishing",
                "Shooting",
                "Dribbling",
                "Ball Control",
                "Heading",
                "Movement",
                "Weak Foot"
            ]
        );
        assert_eq!(data[0].value, 80.0);
        assert_eq!(data[1].value, 0.0);
    }

    #[test]
    fn foreign_skill_keys_are_charted_as_is() {
        let mut skills = BTreeMap::new();
        skills.insert("passing".to_string(), 80);
        skills.insert("shooting".to_string(), 60);
        let player = Player {
            position: Some("GK".to_string()),
            skills: Some(skills),
            ..Player::named("Keeper")
        };
        let data = skill_chart_data(&player);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].label, "Passing");
    }
}
