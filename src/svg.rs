//! SVG backend: one standalone `<svg>` document per page.

use std::fmt::Write;

use anyhow::{Context, Result};

use crate::document::{
    Block, Canvas, Color, Document, FontWeight, ImageSource, Page, PageSize, Stroke, TextAnchor,
};

pub fn render_document(document: &Document) -> Result<Vec<String>> {
    document
        .pages
        .iter()
        .map(|page| {
            render_page(page, document.page_size)
                .with_context(|| format!("render page {}", page.number))
        })
        .collect()
}

/// Body first, then decorations so the header, footer and watermark sit on top.
pub fn render_page(page: &Page, size: PageSize) -> Result<String> {
    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}mm" height="{h:.0}mm" viewBox="0 0 {w:.2} {h:.2}" font-family="Helvetica, Arial, sans-serif">"#,
        w = size.width,
        h = size.height
    )?;
    writeln!(
        svg,
        r#"  <rect x="0" y="0" width="{:.2}" height="{:.2}" fill="white"/>"#,
        size.width, size.height
    )?;
    for block in page.blocks() {
        write_block(&mut svg, block)?;
    }
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn write_block(svg: &mut String, block: &Block) -> std::fmt::Result {
    match block {
        Block::Text(t) => {
            let anchor = match t.anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let weight = match t.weight {
                FontWeight::Normal => "normal",
                FontWeight::Bold => "bold",
            };
            let transform = if t.rotation.abs() > 1e-9 {
                format!(r#" transform="rotate({:.2} {:.2} {:.2})""#, t.rotation, t.x, t.y)
            } else {
                String::new()
            };
            writeln!(
                svg,
                r#"  <text x="{:.2}" y="{:.2}" font-size="{:.2}pt" font-weight="{}" text-anchor="{}" fill="{}"{}{}>{}</text>"#,
                t.x,
                t.y,
                t.size,
                weight,
                anchor,
                t.color.hex(),
                opacity_attr(t.opacity),
                transform,
                escape_xml(&t.text)
            )
        }
        Block::Rect(r) => {
            let radius = if r.corner_radius > 0.0 {
                format!(r#" rx="{0:.2}" ry="{0:.2}""#, r.corner_radius)
            } else {
                String::new()
            };
            writeln!(
                svg,
                r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{} {}{}/>"#,
                r.x,
                r.y,
                r.width,
                r.height,
                radius,
                paint(r.fill, r.stroke),
                opacity_attr(r.opacity)
            )
        }
        Block::Circle(c) => writeln!(
            svg,
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}{}/>"#,
            c.center.x,
            c.center.y,
            c.radius,
            paint(c.fill, c.stroke),
            opacity_attr(c.opacity)
        ),
        Block::Line(l) => writeln!(
            svg,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            l.from.x,
            l.from.y,
            l.to.x,
            l.to.y,
            paint(None, Some(l.stroke))
        ),
        Block::Polygon(p) => {
            let points: Vec<String> = p
                .points
                .iter()
                .map(|pt| format!("{:.2},{:.2}", pt.x, pt.y))
                .collect();
            writeln!(
                svg,
                r#"  <polygon points="{}" {}{}/>"#,
                points.join(" "),
                paint(p.fill, p.stroke),
                opacity_attr(p.opacity)
            )
        }
        Block::Image(image) => match &image.source {
            ImageSource::Vector(canvas) => {
                write_canvas(svg, canvas, image.x, image.y, image.width, image.height)
            }
            ImageSource::Raster(raster) => writeln!(
                svg,
                r#"  <image x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="xMidYMid meet" href="{}"/>"#,
                image.x,
                image.y,
                image.width,
                image.height,
                raster.to_data_url()
            ),
        },
    }
}

/// Nested `<svg>` so the canvas keeps its own coordinate space.
fn write_canvas(
    svg: &mut String,
    canvas: &Canvas,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"  <svg x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" viewBox="0 0 {:.2} {:.2}" overflow="visible">"#,
        x, y, width, height, canvas.width, canvas.height
    )?;
    for shape in &canvas.shapes {
        write_block(svg, shape)?;
    }
    writeln!(svg, "  </svg>")
}

fn paint(fill: Option<Color>, stroke: Option<Stroke>) -> String {
    let fill = fill.map_or_else(|| "none".to_string(), Color::hex);
    match stroke {
        Some(s) => format!(
            r#"fill="{}" stroke="{}" stroke-width="{:.2}""#,
            fill,
            s.color.hex(),
            s.width
        ),
        None => format!(r#"fill="{fill}" stroke="none""#),
    }
}

fn opacity_attr(opacity: f64) -> String {
    if opacity < 1.0 {
        format!(r#" opacity="{:.2}""#, opacity.max(0.0))
    } else {
        String::new()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
