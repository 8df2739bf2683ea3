//! Chart geometry.
//!
//! Charts are drawn into a standalone [`Canvas`] which the report embeds as an
//! image block, so the maths here never depends on where the chart lands on a
//! page.

use std::f64::consts::PI;

use crate::document::{
    Canvas, CircleShape, Color, LineShape, Point, PolygonShape, RectShape, Stroke, TextAnchor,
    TextRun,
};

/// Grid rings as fractions of the radar radius.
pub const RADAR_RING_STEPS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];
/// Space kept around the radar for axis labels.
pub const RADAR_LABEL_MARGIN: f64 = 14.0;
/// Distance between the outer ring and an axis label.
pub const RADAR_LABEL_OFFSET: f64 = 5.0;
pub const RADAR_VERTEX_RADIUS: f64 = 1.1;
pub const BAR_GRID_INTERVALS: usize = 5;

pub const BAR_PALETTE: [Color; 8] = [
    Color::rgb(37, 99, 235),
    Color::rgb(22, 163, 74),
    Color::rgb(234, 88, 12),
    Color::rgb(147, 51, 234),
    Color::rgb(220, 38, 38),
    Color::rgb(8, 145, 178),
    Color::rgb(202, 138, 4),
    Color::rgb(219, 39, 119),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
}

impl ChartDatum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RadarChart {
    pub canvas: Canvas,
    pub center: Point,
    pub radius: f64,
    /// Data points, one per axis, in axis order.
    pub vertices: Vec<Point>,
    /// Axis labels, one per axis, in axis order.
    pub labels: Vec<TextRun>,
}

/// Angle of axis `i` out of `n`, starting straight up and going clockwise.
pub fn radar_axis_angle(i: usize, n: usize) -> f64 {
    2.0 * PI * i as f64 / n as f64 - PI / 2.0
}

/// Rotation (degrees) that lays a label tangent to the circle at `angle`
/// without ever reading upside-down.
pub fn radar_label_rotation(angle: f64) -> f64 {
    let mut degrees = angle.to_degrees() + 90.0;
    if angle.sin() > 1e-9 {
        degrees -= 180.0;
    }
    while degrees > 180.0 {
        degrees -= 360.0;
    }
    while degrees <= -180.0 {
        degrees += 360.0;
    }
    degrees
}

fn polar(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Square radar chart of `size` millimetres. Values are on the 0–100 scale.
pub fn radar_chart(data: &[ChartDatum], size: f64, color: Color) -> RadarChart {
    let mut canvas = Canvas::new(size, size);
    let center = Point::new(size / 2.0, size / 2.0);
    let radius = (size / 2.0 - RADAR_LABEL_MARGIN).max(1.0);
    let n = data.len();

    for step in RADAR_RING_STEPS {
        canvas.push(CircleShape::new(center, radius * step).stroke(Stroke::new(Color::GRID, 0.2)));
    }

    if n == 0 {
        return RadarChart {
            canvas,
            center,
            radius,
            vertices: Vec::new(),
            labels: Vec::new(),
        };
    }

    for i in 0..n {
        let angle = radar_axis_angle(i, n);
        canvas.push(LineShape {
            from: center,
            to: polar(center, radius, angle),
            stroke: Stroke::new(Color::GRID, 0.2),
        });
    }

    let vertices: Vec<Point> = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let normalized = d.value.clamp(0.0, 100.0) / 100.0;
            polar(center, normalized * radius, radar_axis_angle(i, n))
        })
        .collect();

    canvas.push(PolygonShape {
        points: vertices.clone(),
        fill: Some(color),
        stroke: Some(Stroke::new(color, 0.5)),
        opacity: 0.25,
    });

    for (i, (vertex, d)) in vertices.iter().zip(data).enumerate() {
        let angle = radar_axis_angle(i, n);
        canvas.push(CircleShape::new(*vertex, RADAR_VERTEX_RADIUS).fill(color));
        let tag = polar(*vertex, 3.0, angle);
        canvas.push(
            TextRun::new(tag.x, tag.y + 1.0, format_value(d.value))
                .size(6.5)
                .bold()
                .color(color)
                .anchor(TextAnchor::Middle),
        );
    }

    let labels: Vec<TextRun> = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let angle = radar_axis_angle(i, n);
            let at = polar(center, radius + RADAR_LABEL_OFFSET, angle);
            TextRun::new(at.x, at.y, d.label.clone())
                .size(7.5)
                .color(Color::TEXT)
                .anchor(TextAnchor::Middle)
                .rotation(radar_label_rotation(angle))
        })
        .collect();
    for label in &labels {
        canvas.push(label.clone());
    }

    RadarChart {
        canvas,
        center,
        radius,
        vertices,
        labels,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub canvas: Canvas,
    pub bars: Vec<BarGeometry>,
    pub max_value: f64,
    /// Value at each gridline, from the baseline up.
    pub gridlines: Vec<f64>,
    pub plot_height: f64,
}

const BAR_AXIS_WIDTH: f64 = 12.0;
const BAR_LABEL_AREA: f64 = 10.0;
const BAR_VALUE_AREA: f64 = 8.0;

/// Vertical bar chart. Bars scale to the largest value; negative values draw
/// as empty bars.
pub fn bar_chart(data: &[ChartDatum], width: f64, height: f64) -> BarChart {
    let mut canvas = Canvas::new(width, height);
    let plot_left = BAR_AXIS_WIDTH;
    let plot_top = BAR_VALUE_AREA;
    let plot_bottom = height - BAR_LABEL_AREA;
    let plot_width = (width - plot_left - 2.0).max(1.0);
    let plot_height = (plot_bottom - plot_top).max(1.0);

    let max_value = data
        .iter()
        .map(|d| d.value.max(0.0))
        .fold(0.0_f64, f64::max);

    let gridlines: Vec<f64> = (0..=BAR_GRID_INTERVALS)
        .map(|i| max_value * i as f64 / BAR_GRID_INTERVALS as f64)
        .collect();
    for (i, value) in gridlines.iter().enumerate() {
        let y = plot_bottom - plot_height * i as f64 / BAR_GRID_INTERVALS as f64;
        canvas.push(LineShape {
            from: Point::new(plot_left, y),
            to: Point::new(plot_left + plot_width, y),
            stroke: Stroke::new(Color::GRID, if i == 0 { 0.4 } else { 0.2 }),
        });
        canvas.push(
            TextRun::new(plot_left - 2.0, y + 1.0, format_value(*value))
                .size(6.5)
                .color(Color::MUTED)
                .anchor(TextAnchor::End),
        );
    }

    let slot = if data.is_empty() {
        plot_width
    } else {
        plot_width / data.len() as f64
    };
    let bar_width = slot * 0.6;

    let mut bars = Vec::with_capacity(data.len());
    for (i, d) in data.iter().enumerate() {
        let value = d.value.max(0.0);
        let bar_height = if max_value > 0.0 {
            value / max_value * plot_height
        } else {
            0.0
        };
        let color = BAR_PALETTE[i % BAR_PALETTE.len()];
        let x = plot_left + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = plot_bottom - bar_height;

        canvas.push(RectShape::new(x, y, bar_width, bar_height).fill(color));
        canvas.push(
            TextRun::new(x + bar_width / 2.0, y - 1.5, format_value(d.value))
                .size(7.0)
                .bold()
                .anchor(TextAnchor::Middle),
        );
        canvas.push(
            TextRun::new(x + bar_width / 2.0, plot_bottom + 5.0, d.label.clone())
                .size(6.5)
                .color(Color::MUTED)
                .anchor(TextAnchor::Middle),
        );
        bars.push(BarGeometry {
            x,
            y,
            width: bar_width,
            height: bar_height,
            color,
        });
    }

    BarChart {
        canvas,
        bars,
        max_value,
        gridlines,
        plot_height,
    }
}

fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_never_upside_down() {
        for n in 3..12 {
            for i in 0..n {
                let rotation = radar_label_rotation(radar_axis_angle(i, n));
                assert!(rotation > -90.0 - 1e-9 && rotation <= 90.0 + 1e-9, "{rotation}");
            }
        }
    }

    #[test]
    fn first_axis_points_up() {
        let angle = radar_axis_angle(0, 5);
        assert!((angle + PI / 2.0).abs() < 1e-12);
        assert!(radar_label_rotation(angle).abs() < 1e-9);
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(12.0), "12");
        assert_eq!(format_value(2.5), "2.5");
    }
}
