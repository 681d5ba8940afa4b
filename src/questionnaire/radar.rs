//! Polar projection of the dimension totals for the star chart.
//!
//! Angles are expressed in chart space: axis `i` of `N` sits at `2πi/N`. The
//! chart puts angle 0 at the top and runs clockwise, which is applied only when
//! converting to Cartesian coordinates for drawing.

use super::catalog::DimensionId;
use super::scoring::{ScoreSheet, MAX_DIMENSION_SCORE};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Radial gridlines, as fractions of the maximum score.
pub const RADIAL_TICKS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarPoint {
    pub dimension: DimensionId,
    pub angle: f64,
    pub ratio: f64,
    pub score: u8,
}

impl RadarPoint {
    /// Unit-circle coordinates with angle 0 at the top, clockwise, y pointing up.
    pub fn to_cartesian(&self) -> (f64, f64) {
        let theta = FRAC_PI_2 - self.angle;
        (self.ratio * theta.cos(), self.ratio * theta.sin())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub dimension: DimensionId,
    pub label: &'static str,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialTick {
    pub ratio: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarProjection {
    /// Closed polygon: the last point repeats the first.
    pub points: Vec<RadarPoint>,
    pub axes: Vec<RadarAxis>,
    pub ticks: Vec<RadialTick>,
}

pub fn project(sheet: &ScoreSheet) -> RadarProjection {
    let count = sheet.as_slice().len();

    let mut points: Vec<RadarPoint> = sheet
        .iter()
        .enumerate()
        .map(|(index, score)| RadarPoint {
            dimension: score.dimension,
            angle: TAU * index as f64 / count as f64,
            ratio: score.ratio().clamp(0.0, 1.0),
            score: score.score,
        })
        .collect();

    let axes = points
        .iter()
        .map(|point| RadarAxis {
            dimension: point.dimension,
            label: point.dimension.label(),
            angle: point.angle,
        })
        .collect();

    if let Some(first) = points.first().copied() {
        points.push(first);
    }

    let ticks = RADIAL_TICKS
        .iter()
        .map(|&ratio| RadialTick {
            ratio,
            label: format!(
                "{}/{}",
                (ratio * f64::from(MAX_DIMENSION_SCORE)).round(),
                MAX_DIMENSION_SCORE
            ),
        })
        .collect();

    RadarProjection {
        points,
        axes,
        ticks,
    }
}

impl RadarProjection {
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Vertices of the polygon without the closing duplicate.
    pub fn vertices(&self) -> &[RadarPoint] {
        match self.points.split_last() {
            Some((_, rest)) if self.is_closed() => rest,
            _ => &self.points,
        }
    }

    /// One-line score recap, e.g. `D1: 12/40 | D2: 30/40 | ...`.
    pub fn score_line(&self) -> String {
        self.vertices()
            .iter()
            .map(|point| format!("{}: {}/{}", point.dimension, point.score, MAX_DIMENSION_SCORE))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Standalone SVG rendering of the star chart.
    pub fn render_svg(&self, title: &str) -> String {
        const SIZE: f64 = 640.0;
        const CENTER_X: f64 = SIZE / 2.0;
        const CENTER_Y: f64 = SIZE / 2.0 + 30.0;
        const RADIUS: f64 = 200.0;

        let to_canvas = |x: f64, y: f64| (CENTER_X + x * RADIUS, CENTER_Y - y * RADIUS);
        let ring = |ratio: f64| {
            self.axes
                .iter()
                .map(|axis| {
                    let point = RadarPoint {
                        dimension: axis.dimension,
                        angle: axis.angle,
                        ratio,
                        score: 0,
                    };
                    let (x, y) = point.to_cartesian();
                    let (cx, cy) = to_canvas(x, y);
                    format!("{cx:.1},{cy:.1}")
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{SIZE}\" height=\"{SIZE}\" \
             viewBox=\"0 0 {SIZE} {SIZE}\" font-family=\"sans-serif\">\n"
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
        svg.push_str(&format!(
            "<text x=\"{CENTER_X}\" y=\"24\" text-anchor=\"middle\" font-size=\"15\">{}</text>\n",
            escape_xml(title)
        ));
        svg.push_str(&format!(
            "<text x=\"{CENTER_X}\" y=\"44\" text-anchor=\"middle\" font-size=\"10\">{}</text>\n",
            escape_xml(&self.score_line())
        ));

        for tick in &self.ticks {
            svg.push_str(&format!(
                "<polygon points=\"{}\" fill=\"none\" stroke=\"#cccccc\" stroke-width=\"1\"/>\n",
                ring(tick.ratio)
            ));
            let (x, y) = to_canvas(0.0, tick.ratio);
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"9\" fill=\"#666666\">{}</text>\n",
                x + 3.0,
                y - 2.0,
                escape_xml(&tick.label)
            ));
        }

        for axis in &self.axes {
            let tip = RadarPoint {
                dimension: axis.dimension,
                angle: axis.angle,
                ratio: 1.0,
                score: 0,
            };
            let (x, y) = tip.to_cartesian();
            let (ex, ey) = to_canvas(x, y);
            svg.push_str(&format!(
                "<line x1=\"{CENTER_X}\" y1=\"{CENTER_Y}\" x2=\"{ex:.1}\" y2=\"{ey:.1}\" \
                 stroke=\"#cccccc\" stroke-width=\"1\"/>\n"
            ));

            let (lx, ly) = to_canvas(x * 1.12, y * 1.12);
            let anchor = if x.abs() < 1e-6 {
                "middle"
            } else if x > 0.0 {
                "start"
            } else {
                "end"
            };
            svg.push_str(&format!(
                "<text x=\"{lx:.1}\" y=\"{ly:.1}\" text-anchor=\"{anchor}\" font-size=\"11\">{}</text>\n",
                escape_xml(axis.label)
            ));
        }

        let outline = self
            .points
            .iter()
            .map(|point| {
                let (x, y) = point.to_cartesian();
                let (cx, cy) = to_canvas(x, y);
                format!("{cx:.1},{cy:.1}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        svg.push_str(&format!(
            "<polygon points=\"{outline}\" fill=\"#1f77b4\" fill-opacity=\"0.25\" \
             stroke=\"#1f77b4\" stroke-width=\"2\"/>\n"
        ));
        svg.push_str("</svg>\n");
        svg
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
