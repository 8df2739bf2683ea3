use thiserror::Error;
use tracing::warn;

use crate::diagnostics::Diagnostic;
use crate::document::{Color, RectShape, Stroke, TextRun, line_height, wrap_text};
use crate::layout::{CONTENT_LEFT, CONTENT_TOP, CONTENT_WIDTH, LayoutContext};

/// Row height used when a table cannot report where it ended.
pub const ESTIMATED_ROW_HEIGHT: f64 = 7.0;
const CELL_PADDING: f64 = 2.0;
const FONT_SIZE: f64 = 9.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Relative column widths; equal widths when empty.
    pub widths: Vec<f64>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            widths: Vec::new(),
        }
    }

    pub fn widths(mut self, widths: &[f64]) -> Self {
        self.widths = widths.to_vec();
        self
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Height of the header plus the first row, the least that must share a
    /// page with whatever precedes the table.
    pub fn lead_height(&self) -> f64 {
        let widths = self.column_widths();
        let header = layout_row(&self.headers, &widths).height;
        let first = self
            .rows
            .first()
            .map_or(0.0, |cells| layout_row(cells, &widths).height);
        header + first
    }

    fn column_widths(&self) -> Vec<f64> {
        let n = self.headers.len();
        let weights: Vec<f64> = if self.widths.len() == n && self.widths.iter().all(|w| *w > 0.0) {
            self.widths.clone()
        } else {
            vec![1.0; n]
        };
        let total: f64 = weights.iter().sum();
        weights.iter().map(|w| w / total * CONTENT_WIDTH).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table has no columns")]
    NoColumns,
    #[error("row {row} has {found} cells, expected {expected}")]
    ColumnMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Draw `table` at the cursor, breaking pages between rows and repeating the
/// header row on each new page. Returns the cursor offset after the last row.
/// Nothing is drawn when the table is malformed.
pub fn draw_table(ctx: &mut LayoutContext, table: &Table) -> Result<f64, TableError> {
    let expected = table.headers.len();
    if expected == 0 {
        return Err(TableError::NoColumns);
    }
    if let Some((row, cells)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != expected)
    {
        return Err(TableError::ColumnMismatch {
            row,
            found: cells.len(),
            expected,
        });
    }

    let widths = table.column_widths();
    let header = layout_row(&table.headers, &widths);

    ctx.ensure_space(table.lead_height());
    draw_row(ctx, &header, &widths, true, false);

    for (idx, cells) in table.rows.iter().enumerate() {
        let row = layout_row(cells, &widths);
        if ctx.ensure_space(row.height) {
            draw_row(ctx, &header, &widths, true, false);
        }
        draw_row(ctx, &row, &widths, false, idx % 2 == 1);
    }

    Ok(ctx.cursor())
}

/// Draw a table section, falling back to an estimated height when the table
/// routine fails so the rest of the document still renders.
pub fn place_table(ctx: &mut LayoutContext, section: &'static str, table: &Table) -> Option<Diagnostic> {
    let start_y = ctx.cursor();
    match draw_table(ctx, table) {
        Ok(end_y) => {
            ctx.set_cursor(end_y);
            None
        }
        Err(err) => {
            let fallback = start_y + ESTIMATED_ROW_HEIGHT * (table.rows.len() as f64 + 1.0);
            warn!(section, error = %err, fallback, "table render failed, using estimated height");
            ctx.set_cursor(fallback);
            Some(Diagnostic::failure(section, err))
        }
    }
}

struct RowLayout {
    lines: Vec<Vec<String>>,
    height: f64,
}

fn layout_row(cells: &[String], widths: &[f64]) -> RowLayout {
    let lines: Vec<Vec<String>> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| wrap_text(cell, (width - 2.0 * CELL_PADDING).max(1.0), FONT_SIZE))
        .collect();
    let max_lines = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let height = (max_lines as f64 * line_height(FONT_SIZE) + 2.0 * CELL_PADDING).max(ESTIMATED_ROW_HEIGHT);
    RowLayout { lines, height }
}

fn draw_row(ctx: &mut LayoutContext, row: &RowLayout, widths: &[f64], header: bool, striped: bool) {
    let top = ctx.reserve(row.height);
    let height = (ctx.cursor() + CONTENT_TOP - top).min(row.height);
    let band = RectShape::new(CONTENT_LEFT, top, CONTENT_WIDTH, height);
    if header {
        ctx.push(band.fill(Color::BRAND));
    } else if striped {
        ctx.push(band.fill(Color::PANEL));
    } else {
        ctx.push(band.stroke(Stroke::new(Color::GRID, 0.1)));
    }

    let step = line_height(FONT_SIZE);
    let max_lines = ((height - 2.0 * CELL_PADDING) / step).floor().max(1.0) as usize;
    let mut x = CONTENT_LEFT;
    for (lines, width) in row.lines.iter().zip(widths) {
        for (i, line) in lines.iter().take(max_lines).enumerate() {
            let baseline = top + CELL_PADDING + step * (i as f64 + 0.75);
            let mut text = TextRun::new(x + CELL_PADDING, baseline, line.clone()).size(FONT_SIZE);
            if header {
                text = text.bold().color(Color::WHITE);
            }
            ctx.push(text);
        }
        x += width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CONTENT_HEIGHT;

    fn sample(rows: usize) -> Table {
        let mut table = Table::new(&["Type", "Date"]);
        for i in 0..rows {
            table.row(vec![format!("Strain {i}"), "2026-01-01".to_string()]);
        }
        table
    }

    #[test]
    fn long_tables_span_pages() {
        let mut ctx = LayoutContext::new();
        let end = draw_table(&mut ctx, &sample(80)).unwrap();
        assert!(ctx.page_number() > 1);
        assert!(end <= CONTENT_HEIGHT);
    }

    #[test]
    fn mismatched_rows_fall_back_to_estimate() {
        let mut table = sample(3);
        table.row(vec!["only one cell".to_string()]);

        let mut ctx = LayoutContext::new();
        ctx.advance(10.0);
        let diagnostic = place_table(&mut ctx, "injuries", &table);

        assert!(matches!(
            diagnostic,
            Some(Diagnostic::RenderSubsystemFailure { section: "injuries", .. })
        ));
        assert_eq!(ctx.cursor(), 10.0 + ESTIMATED_ROW_HEIGHT * 5.0);
        let pages = ctx.into_pages();
        assert!(pages[0].body.is_empty());
    }

    #[test]
    fn lead_height_covers_header_and_first_row() {
        let table = sample(3);
        assert!(table.lead_height() >= 2.0 * ESTIMATED_ROW_HEIGHT);
        assert!(Table::new(&["Only"]).lead_height() >= ESTIMATED_ROW_HEIGHT);
    }

    #[test]
    fn empty_header_is_an_error() {
        let mut ctx = LayoutContext::new();
        let table = Table::new(&[]);
        assert_eq!(draw_table(&mut ctx, &table), Err(TableError::NoColumns));
    }
}
