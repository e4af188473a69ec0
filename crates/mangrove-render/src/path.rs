//! Link path geometry: four built-in styles plus caller-supplied functions.
//!
//! All builders are pure functions of `(edge, orientation)` — the circuit
//! style additionally takes its jitter value, drawn by the caller from an
//! injected RNG so tests can pin outputs. Every builder returns a valid path
//! string for degenerate inputs (coincident endpoints, single sibling, target
//! missing from the child list); none of them panic.

use std::fmt;
use std::sync::Arc;

use mangrove_core::geom::{Orientation, Point};
use mangrove_core::model::LinkGeometry;

use crate::svg::fmt_path_into;

/// The geometric algorithm used to draw an edge between two positioned nodes.
///
/// There is no default: deserialization and [`PathStyle::parse`] reject
/// anything outside the four built-in names, and a custom function must be
/// supplied explicitly.
#[derive(Clone)]
pub enum PathStyle {
    Diagonal,
    Elbow,
    Straight,
    Circuit,
    Custom(Arc<dyn Fn(&LinkGeometry, Orientation) -> String + Send + Sync>),
}

impl PathStyle {
    pub fn parse(value: &str) -> mangrove_core::Result<Self> {
        match value {
            "diagonal" => Ok(PathStyle::Diagonal),
            "elbow" => Ok(PathStyle::Elbow),
            "straight" => Ok(PathStyle::Straight),
            "circuit" => Ok(PathStyle::Circuit),
            other => Err(mangrove_core::Error::UnsupportedPathStyle {
                value: other.to_string(),
            }),
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&LinkGeometry, Orientation) -> String + Send + Sync + 'static,
    {
        PathStyle::Custom(Arc::new(f))
    }
}

impl fmt::Debug for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStyle::Diagonal => f.write_str("Diagonal"),
            PathStyle::Elbow => f.write_str("Elbow"),
            PathStyle::Straight => f.write_str("Straight"),
            PathStyle::Circuit => f.write_str("Circuit"),
            PathStyle::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for PathStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <String as serde::Deserialize>::deserialize(deserializer)?;
        PathStyle::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Builds the path string for `style`. `jitter` must be in `[0, 1)` and is
/// only consumed by the circuit style.
pub fn path_for(
    style: &PathStyle,
    edge: &LinkGeometry,
    orientation: Orientation,
    jitter: f64,
) -> String {
    match style {
        PathStyle::Diagonal => diagonal_path(edge, orientation),
        PathStyle::Elbow => elbow_path(edge, orientation),
        PathStyle::Straight => straight_path(edge, orientation),
        PathStyle::Circuit => circuit_path(edge, jitter),
        PathStyle::Custom(f) => f(edge, orientation),
    }
}

fn push_point(out: &mut String, p: Point) {
    fmt_path_into(out, p.x);
    out.push(',');
    fmt_path_into(out, p.y);
}

fn push_cmd_point(out: &mut String, cmd: char, p: Point) {
    out.push(cmd);
    push_point(out, p);
}

fn push_cmd_pair(out: &mut String, cmd: char, x: f64, y: f64) {
    out.push(cmd);
    fmt_path_into(out, x);
    out.push(',');
    fmt_path_into(out, y);
}

fn push_cmd_cubic(out: &mut String, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
    out.push('C');
    fmt_path_into(out, x1);
    out.push(',');
    fmt_path_into(out, y1);
    out.push(',');
    fmt_path_into(out, x2);
    out.push(',');
    fmt_path_into(out, y2);
    out.push(',');
    fmt_path_into(out, x);
    out.push(',');
    fmt_path_into(out, y);
}

/// D3 v3 `svg.diagonal`: a cubic through two pseudo points at the mid level
/// between source and target. The pseudo points are computed in layout space
/// and each point is projected before emission.
pub fn diagonal_path(edge: &LinkGeometry, orientation: Orientation) -> String {
    let m = (edge.source.y + edge.target.y) / 2.0;
    let p = [
        orientation.project(edge.source.x, edge.source.y),
        orientation.project(edge.source.x, m),
        orientation.project(edge.target.x, m),
        orientation.project(edge.target.x, edge.target.y),
    ];

    let mut out = String::with_capacity(64);
    push_cmd_point(&mut out, 'M', p[0]);
    push_cmd_point(&mut out, 'C', p[1]);
    out.push(' ');
    push_point(&mut out, p[2]);
    out.push(' ');
    push_point(&mut out, p[3]);
    out
}

/// Basis-interpolated line through the two projected endpoints. With fewer
/// than three points the basis curve degenerates to the linear join, exactly
/// like D3's line generator.
pub fn straight_path(edge: &LinkGeometry, orientation: Orientation) -> String {
    let points = [
        orientation.project(edge.source.x, edge.source.y),
        orientation.project(edge.target.x, edge.target.y),
    ];
    basis_path(&points)
}

/// Right-angle path with a single bend at the target's cross-axis value.
pub fn elbow_path(edge: &LinkGeometry, orientation: Orientation) -> String {
    let (s, t) = (&edge.source, &edge.target);
    let mut out = String::with_capacity(32);
    match orientation {
        Orientation::Horizontal => {
            push_cmd_pair(&mut out, 'M', s.y, s.x);
            out.push('V');
            fmt_path_into(&mut out, t.x);
            out.push('H');
            fmt_path_into(&mut out, t.y);
        }
        Orientation::Vertical => {
            push_cmd_pair(&mut out, 'M', s.x, s.y);
            out.push('V');
            fmt_path_into(&mut out, t.y);
            out.push('H');
            fmt_path_into(&mut out, t.x);
        }
    }
    out
}

/// Right-angle path with a sibling-staggered bend so overlapping sibling edges
/// fan out. `jitter` shifts the bend within the sibling's slot; the second
/// breakpoint is clamped so it never overshoots the target level.
///
/// A target name missing from the source's child list degrades to sibling
/// index -1, which lands in the first slot.
pub fn circuit_path(edge: &LinkGeometry, jitter: f64) -> String {
    let (s, t) = (&edge.source, &edge.target);
    let children = &s.children;
    let index = children
        .iter()
        .position(|name| name == &t.name)
        .map(|i| i as i64)
        .unwrap_or(-1);

    let last = index == children.len() as i64 - 1;
    let multiplier = if last {
        jitter
    } else {
        index as f64 + 1.0 + jitter
    };

    let a = (t.y - s.y) / (children.len() as f64 + 1.0) * multiplier + s.y;
    let b = a + (t.x - s.x).abs();
    let bend = if b > t.y { t.y } else { b };

    let mut out = String::with_capacity(48);
    push_cmd_pair(&mut out, 'M', s.y, s.x);
    out.push('H');
    fmt_path_into(&mut out, a);
    out.push('L');
    fmt_path_into(&mut out, bend);
    out.push(',');
    fmt_path_into(&mut out, t.x);
    out.push('H');
    fmt_path_into(&mut out, t.y);
    out
}

// Ported from D3 `curveBasis`; the two-point case degenerates to `M…L…`.
pub(crate) fn basis_path(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len().saturating_mul(64));
    if points.is_empty() {
        return out;
    }

    fn basis_point(out: &mut String, x0: f64, y0: f64, x1: f64, y1: f64, x: f64, y: f64) {
        let c1x = (2.0 * x0 + x1) / 3.0;
        let c1y = (2.0 * y0 + y1) / 3.0;
        let c2x = (x0 + 2.0 * x1) / 3.0;
        let c2y = (y0 + 2.0 * y1) / 3.0;
        let ex = (x0 + 4.0 * x1 + x) / 6.0;
        let ey = (y0 + 4.0 * y1 + y) / 6.0;
        push_cmd_cubic(out, c1x, c1y, c2x, c2y, ex, ey);
    }

    let mut state = 0u8;
    let mut x0 = f64::NAN;
    let mut y0 = f64::NAN;
    let mut x1 = f64::NAN;
    let mut y1 = f64::NAN;

    for p in points {
        let (x, y) = (p.x, p.y);
        match state {
            0 => {
                state = 1;
                push_cmd_pair(&mut out, 'M', x, y);
            }
            1 => {
                state = 2;
            }
            2 => {
                state = 3;
                let lx = (5.0 * x0 + x1) / 6.0;
                let ly = (5.0 * y0 + y1) / 6.0;
                push_cmd_pair(&mut out, 'L', lx, ly);
                basis_point(&mut out, x0, y0, x1, y1, x, y);
            }
            _ => {
                basis_point(&mut out, x0, y0, x1, y1, x, y);
            }
        }
        x0 = x1;
        x1 = x;
        y0 = y1;
        y1 = y;
    }

    match state {
        3 => {
            basis_point(&mut out, x0, y0, x1, y1, x1, y1);
            push_cmd_pair(&mut out, 'L', x1, y1);
        }
        2 => {
            push_cmd_pair(&mut out, 'L', x1, y1);
        }
        _ => {}
    }

    out
}
