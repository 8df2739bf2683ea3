use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Serializer};

/// Points to millimetres.
pub const PT_TO_MM: f64 = 0.352_778;
/// Average glyph advance as a fraction of the font size (Helvetica-ish).
const AVG_GLYPH_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TEXT: Color = Color::rgb(31, 41, 55);
    pub const MUTED: Color = Color::rgb(107, 114, 128);
    pub const GRID: Color = Color::rgb(209, 213, 219);
    pub const PANEL: Color = Color::rgb(243, 244, 246);
    pub const BRAND: Color = Color::rgb(30, 64, 175);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// A single line of text. `y` is the baseline; `size` is in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub size: f64,
    pub color: Color,
    pub weight: FontWeight,
    pub anchor: TextAnchor,
    /// Clockwise rotation in degrees around `(x, y)`.
    pub rotation: f64,
    pub opacity: f64,
}

impl TextRun {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            size: 10.0,
            color: Color::TEXT,
            weight: FontWeight::Normal,
            anchor: TextAnchor::Start,
            rotation: 0.0,
            opacity: 1.0,
        }
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn width(&self) -> f64 {
        text_width(&self.text, self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// 0 for a plain rectangle.
    pub corner_radius: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub opacity: f64,
}

impl RectShape {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            corner_radius: 0.0,
            fill: None,
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn rounded(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleShape {
    pub center: Point,
    pub radius: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub opacity: f64,
}

impl CircleShape {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            fill: None,
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineShape {
    pub from: Point,
    pub to: Point,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonShape {
    pub points: Vec<Point>,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub opacity: f64,
}

/// Vector drawing in its own coordinate space (origin top-left, millimetres).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Block>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, block: impl Into<Block>) {
        self.shapes.push(block.into());
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.shapes.iter().filter_map(|b| match b {
            Block::Text(t) => Some(t),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterImage {
    pub media_type: String,
    #[serde(serialize_with = "serialize_base64")]
    pub bytes: Vec<u8>,
}

impl RasterImage {
    /// Decode a `data:<media type>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| anyhow!("not a data url"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow!("data url without payload"))?;
        let media_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| anyhow!("data url is not base64 encoded"))?;
        if !media_type.starts_with("image/") {
            return Err(anyhow!("unsupported media type {media_type}"));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .context("invalid base64 image payload")?;
        Ok(Self {
            media_type: media_type.to_string(),
            bytes,
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&STANDARD.encode(bytes))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ImageSource {
    Vector(Canvas),
    Raster(RasterImage),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub source: ImageSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Block {
    Text(TextRun),
    Rect(RectShape),
    Circle(CircleShape),
    Line(LineShape),
    Polygon(PolygonShape),
    Image(ImageBlock),
}

impl From<TextRun> for Block {
    fn from(value: TextRun) -> Self {
        Block::Text(value)
    }
}

impl From<RectShape> for Block {
    fn from(value: RectShape) -> Self {
        Block::Rect(value)
    }
}

impl From<CircleShape> for Block {
    fn from(value: CircleShape) -> Self {
        Block::Circle(value)
    }
}

impl From<LineShape> for Block {
    fn from(value: LineShape) -> Self {
        Block::Line(value)
    }
}

impl From<PolygonShape> for Block {
    fn from(value: PolygonShape) -> Self {
        Block::Polygon(value)
    }
}

impl From<ImageBlock> for Block {
    fn from(value: ImageBlock) -> Self {
        Block::Image(value)
    }
}

impl Block {
    /// Axis-aligned bounds `(min, max)`, ignoring text rotation.
    pub fn bounds(&self) -> (Point, Point) {
        match self {
            Block::Text(t) => {
                let width = t.width();
                let height = t.size * PT_TO_MM;
                let left = match t.anchor {
                    TextAnchor::Start => t.x,
                    TextAnchor::Middle => t.x - width / 2.0,
                    TextAnchor::End => t.x - width,
                };
                (
                    Point::new(left, t.y - height * 0.8),
                    Point::new(left + width, t.y + height * 0.2),
                )
            }
            Block::Rect(r) => (Point::new(r.x, r.y), Point::new(r.x + r.width, r.y + r.height)),
            Block::Circle(c) => (
                Point::new(c.center.x - c.radius, c.center.y - c.radius),
                Point::new(c.center.x + c.radius, c.center.y + c.radius),
            ),
            Block::Line(l) => (
                Point::new(l.from.x.min(l.to.x), l.from.y.min(l.to.y)),
                Point::new(l.from.x.max(l.to.x), l.from.y.max(l.to.y)),
            ),
            Block::Polygon(p) => {
                let mut min = Point::new(f64::MAX, f64::MAX);
                let mut max = Point::new(f64::MIN, f64::MIN);
                for pt in &p.points {
                    min.x = min.x.min(pt.x);
                    min.y = min.y.min(pt.y);
                    max.x = max.x.max(pt.x);
                    max.y = max.y.max(pt.y);
                }
                (min, max)
            }
            Block::Image(i) => (Point::new(i.x, i.y), Point::new(i.x + i.width, i.y + i.height)),
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Block::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub body: Vec<Block>,
    /// Header, footer and watermark, stamped once every page is known.
    pub decorations: Vec<Block>,
    /// Body height consumed by placed sections.
    pub used_height: f64,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            body: Vec::new(),
            decorations: Vec::new(),
            used_height: 0.0,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.body.iter().chain(self.decorations.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.blocks().filter_map(Block::as_text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub subject: String,
    pub generated_at: String,
    pub page_size: PageSize,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text run on every page, in page order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::texts)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.text.contains(needle))
    }
}

pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVG_GLYPH_WIDTH * PT_TO_MM
}

/// Line advance for a font size, in millimetres.
pub fn line_height(size: f64) -> f64 {
    size * PT_TO_MM * 1.4
}

/// Greedy word wrap to `max_width` millimetres. Words longer than a line are
/// split by characters. Always returns at least one line.
pub fn wrap_text(text: &str, max_width: f64, size: f64) -> Vec<String> {
    let max_chars = ((max_width / (size * AVG_GLYPH_WIDTH * PT_TO_MM)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Cut `text` so it fits `max_width` millimetres on one line, ending with an
/// ellipsis when anything was dropped.
pub fn truncate_to_width(text: &str, max_width: f64, size: f64) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    let max_chars = (max_width / (size * AVG_GLYPH_WIDTH * PT_TO_MM)).floor() as usize;
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}
