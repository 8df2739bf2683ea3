use tracing::debug;

use crate::document::{
    Block, Color, LineShape, PT_TO_MM, Page, PageSize, Point, RectShape, Stroke, TextAnchor,
    TextRun,
};

pub const PAGE: PageSize = PageSize::A4;
pub const PAGE_MARGIN: f64 = 15.0;
pub const HEADER_HEIGHT: f64 = 20.0;
pub const FOOTER_HEIGHT: f64 = 15.0;
/// Top of the body content area.
pub const CONTENT_TOP: f64 = PAGE_MARGIN + HEADER_HEIGHT;
/// Bottom of the body content area.
pub const CONTENT_BOTTOM: f64 = PAGE.height - PAGE_MARGIN - FOOTER_HEIGHT;
/// Fixed body height available on every page.
pub const CONTENT_HEIGHT: f64 = CONTENT_BOTTOM - CONTENT_TOP;
pub const CONTENT_LEFT: f64 = PAGE_MARGIN;
pub const CONTENT_WIDTH: f64 = PAGE.width - 2.0 * PAGE_MARGIN;
pub const SECTION_GAP: f64 = 6.0;

const WATERMARK_OPACITY: f64 = 0.06;
const WATERMARK_MAX_SIZE: f64 = 60.0;
const WATERMARK_MAX_WIDTH: f64 = 250.0;

/// Page list plus the vertical cursor for one render. The cursor is an offset
/// from [`CONTENT_TOP`] on the current (last) page.
#[derive(Debug)]
pub struct LayoutContext {
    pages: Vec<Page>,
    y: f64,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutContext {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(1)],
            y: 0.0,
        }
    }

    pub fn cursor(&self) -> f64 {
        self.y
    }

    /// Absolute page coordinate of the cursor.
    pub fn cursor_y(&self) -> f64 {
        CONTENT_TOP + self.y
    }

    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    pub fn remaining(&self) -> f64 {
        (CONTENT_HEIGHT - self.y).max(0.0)
    }

    pub fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        debug!(page = number, "page break");
        self.pages.push(Page::new(number));
        self.y = 0.0;
    }

    /// Break the page when `height` no longer fits below the cursor. A fresh
    /// page never breaks again, whatever the height. Returns whether a break
    /// happened.
    pub fn ensure_space(&mut self, height: f64) -> bool {
        if self.y > 0.0 && self.y + height > CONTENT_HEIGHT {
            self.new_page();
            return true;
        }
        false
    }

    /// Reserve `height` below the cursor, breaking the page first if needed,
    /// and return the absolute top of the reserved band. Heights taller than a
    /// page are clamped to the content area.
    pub fn reserve(&mut self, height: f64) -> f64 {
        let height = height.clamp(0.0, CONTENT_HEIGHT);
        self.ensure_space(height);
        let top = self.cursor_y();
        self.advance(height);
        top
    }

    /// Move the cursor down without breaking the page; stops at the bottom of
    /// the content area.
    pub fn advance(&mut self, height: f64) {
        self.set_cursor(self.y + height.max(0.0));
    }

    pub fn gap(&mut self, height: f64) {
        if self.y > 0.0 {
            self.advance(height);
        }
    }

    /// Place the cursor at an absolute offset from the content top, clamped to
    /// the content area.
    pub fn set_cursor(&mut self, y: f64) {
        self.y = y.clamp(0.0, CONTENT_HEIGHT);
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.used_height = page.used_height.max(y);
        }
    }

    pub fn push(&mut self, block: impl Into<Block>) {
        if let Some(page) = self.pages.last_mut() {
            page.body.push(block.into());
        }
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

/// What the finishing pass stamps on every page.
#[derive(Debug, Clone)]
pub struct PageFrame<'a> {
    pub title: &'a str,
    pub subject: &'a str,
    pub generated_at: &'a str,
    pub branding: &'a str,
    pub watermark: bool,
}

/// Stamp header, footer and watermark on every page. Runs once all body
/// content is placed, since the footer needs the final page count.
pub fn stamp_page_frames(pages: &mut [Page], frame: &PageFrame<'_>) {
    let total = pages.len();
    for page in pages.iter_mut() {
        page.decorations.clear();
        page.decorations.extend(header_blocks(frame));
        page.decorations.extend(footer_blocks(frame, page.number, total));
        if frame.watermark && !frame.subject.is_empty() {
            page.decorations.push(watermark_block(frame.subject).into());
        }
    }
}

fn header_blocks(frame: &PageFrame<'_>) -> Vec<Block> {
    let band_height = CONTENT_TOP - 10.0;
    vec![
        RectShape::new(0.0, 0.0, PAGE.width, band_height)
            .fill(Color::BRAND)
            .into(),
        TextRun::new(CONTENT_LEFT, band_height / 2.0 + 2.0, frame.title)
            .size(14.0)
            .bold()
            .color(Color::WHITE)
            .into(),
        TextRun::new(PAGE.width - PAGE_MARGIN, band_height / 2.0 + 2.0, frame.subject)
            .size(10.0)
            .color(Color::WHITE)
            .anchor(TextAnchor::End)
            .into(),
    ]
}

pub fn page_label(number: usize, total: usize) -> String {
    format!("Page {number} of {total}")
}

fn footer_blocks(frame: &PageFrame<'_>, number: usize, total: usize) -> Vec<Block> {
    let rule_y = CONTENT_BOTTOM + 4.0;
    let text_y = rule_y + 7.0;
    vec![
        LineShape {
            from: Point::new(CONTENT_LEFT, rule_y),
            to: Point::new(PAGE.width - PAGE_MARGIN, rule_y),
            stroke: Stroke::new(Color::GRID, 0.3),
        }
        .into(),
        TextRun::new(CONTENT_LEFT, text_y, format!("Generated {}", frame.generated_at))
            .size(8.0)
            .color(Color::MUTED)
            .into(),
        TextRun::new(PAGE.width / 2.0, text_y, frame.branding)
            .size(8.0)
            .bold()
            .color(Color::MUTED)
            .anchor(TextAnchor::Middle)
            .into(),
        TextRun::new(PAGE.width - PAGE_MARGIN, text_y, page_label(number, total))
            .size(8.0)
            .color(Color::MUTED)
            .anchor(TextAnchor::End)
            .into(),
    ]
}

fn watermark_block(subject: &str) -> TextRun {
    let chars = subject.chars().count().max(1) as f64;
    let fit = WATERMARK_MAX_WIDTH / (chars * 0.5 * PT_TO_MM);
    TextRun::new(PAGE.width / 2.0, PAGE.height / 2.0, subject)
        .size(fit.min(WATERMARK_MAX_SIZE))
        .bold()
        .color(Color::MUTED)
        .anchor(TextAnchor::Middle)
        .rotation(-45.0)
        .opacity(WATERMARK_OPACITY)
}
