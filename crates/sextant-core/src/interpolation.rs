// File: crates/sextant-core/src/interpolation.rs
// Summary: Path construction strategies (none, simple, step, cardinal, monotone cubic) over projected points with holes.
// Notes:
// - Points are first split into solid segments. A hole ends a segment unless `fill_holes`
//   is set; monotone mode also breaks wherever x does not strictly increase.
// - Each segment starts with a Move, so sub-paths separated by holes never connect.

use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ChartError, Result};
use crate::path::{SegmentData, SvgPath};

/// One projected data point; `coords` is `None` for holes.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPoint {
    pub coords: Option<(f64, f64)>,
    pub data: SegmentData,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Interpolation {
    /// Straight lines.
    None { fill_holes: bool },
    /// Averages of `divisor` consecutive points joined by smooth curves.
    Simple { divisor: usize, fill_holes: bool },
    /// Horizontal then vertical (or the reverse when `postpone` is off).
    Step { postpone: bool, fill_holes: bool },
    /// Cardinal spline; `monotone` switches to a monotone cubic that never overshoots.
    Cardinal { tension: f64, fill_holes: bool, monotone: bool },
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::cardinal()
    }
}

impl Interpolation {
    pub const fn none() -> Self {
        Self::None { fill_holes: false }
    }

    pub const fn simple() -> Self {
        Self::Simple { divisor: 2, fill_holes: false }
    }

    pub const fn step() -> Self {
        Self::Step { postpone: true, fill_holes: false }
    }

    pub const fn cardinal() -> Self {
        Self::Cardinal { tension: 1.0, fill_holes: false, monotone: false }
    }

    pub const fn monotone() -> Self {
        Self::Cardinal { tension: 1.0, fill_holes: false, monotone: true }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "straight" => Ok(Self::none()),
            "simple" => Ok(Self::simple()),
            "step" => Ok(Self::step()),
            "cardinal" => Ok(Self::cardinal()),
            "monotone" | "monotonecubic" | "monotone-cubic" => Ok(Self::monotone()),
            _ => Err(ChartError::UnknownInterpolation(name.to_owned())),
        }
    }

    /// Canonical name, accepted back by `from_name`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None { .. } => "none",
            Self::Simple { .. } => "simple",
            Self::Step { .. } => "step",
            Self::Cardinal { monotone: true, .. } => "monotone",
            Self::Cardinal { .. } => "cardinal",
        }
    }

    pub fn fill_holes(&self) -> bool {
        match *self {
            Self::None { fill_holes }
            | Self::Simple { fill_holes, .. }
            | Self::Step { fill_holes, .. }
            | Self::Cardinal { fill_holes, .. } => fill_holes,
        }
    }

    /// Build the path through `points`.
    pub fn interpolate(&self, points: &[PathPoint]) -> SvgPath {
        let monotone = matches!(self, Self::Cardinal { monotone: true, .. });
        let segments = split_into_segments(points, self.fill_holes(), monotone);
        let mut path = SvgPath::new();
        for segment in &segments {
            match *self {
                Self::None { .. } => straight(&mut path, segment),
                Self::Simple { divisor, .. } => simple(&mut path, segment, divisor.max(1)),
                Self::Step { postpone, .. } => stepped(&mut path, segment, postpone),
                Self::Cardinal { tension, monotone: false, .. } => cardinal(&mut path, segment, tension),
                Self::Cardinal { monotone: true, .. } => monotone_cubic(&mut path, segment),
            }
        }
        path
    }
}

impl FromStr for Interpolation {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tuning {
    fill_holes: Option<bool>,
    postpone: Option<bool>,
    divisor: Option<usize>,
    tension: Option<f64>,
}

impl Tuning {
    fn apply(self, base: Interpolation) -> Interpolation {
        match base {
            Interpolation::None { fill_holes } => {
                Interpolation::None { fill_holes: self.fill_holes.unwrap_or(fill_holes) }
            }
            Interpolation::Simple { divisor, fill_holes } => Interpolation::Simple {
                divisor: self.divisor.unwrap_or(divisor),
                fill_holes: self.fill_holes.unwrap_or(fill_holes),
            },
            Interpolation::Step { postpone, fill_holes } => Interpolation::Step {
                postpone: self.postpone.unwrap_or(postpone),
                fill_holes: self.fill_holes.unwrap_or(fill_holes),
            },
            Interpolation::Cardinal { tension, fill_holes, monotone } => Interpolation::Cardinal {
                tension: self.tension.unwrap_or(tension),
                fill_holes: self.fill_holes.unwrap_or(fill_holes),
                monotone,
            },
        }
    }
}

/// Accepts `true`/`false`, a strategy name, or `{ "type": name, ...tuning }`.
impl<'de> Deserialize<'de> for Interpolation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(true) => Ok(Self::cardinal()),
            Value::Bool(false) => Ok(Self::none()),
            Value::String(name) => Self::from_name(&name).map_err(D::Error::custom),
            Value::Object(mut map) => {
                let name = match map.remove("type") {
                    Some(Value::String(name)) => name,
                    Some(other) => return Err(D::Error::custom(ChartError::UnknownInterpolation(other.to_string()))),
                    None => "cardinal".to_owned(),
                };
                let base = Self::from_name(&name).map_err(D::Error::custom)?;
                let tuning: Tuning = serde_json::from_value(Value::Object(map)).map_err(D::Error::custom)?;
                Ok(tuning.apply(base))
            }
            other => Err(D::Error::custom(ChartError::UnknownInterpolation(other.to_string()))),
        }
    }
}

/// A real point inside a solid segment.
struct Knot<'a> {
    x: f64,
    y: f64,
    data: &'a SegmentData,
    after_hole: bool,
}

fn split_into_segments(points: &[PathPoint], fill_holes: bool, increasing_x: bool) -> Vec<Vec<Knot<'_>>> {
    let mut segments: Vec<Vec<Knot<'_>>> = Vec::new();
    let mut gap = false;
    let mut open = false;
    for point in points {
        let Some((x, y)) = point.coords else {
            if !segments.is_empty() {
                gap = true;
            }
            if !fill_holes {
                open = false;
            }
            continue;
        };
        let breaks_order = increasing_x
            && segments.last().and_then(|s| s.last()).is_some_and(|prev: &Knot<'_>| x <= prev.x);
        if !open || breaks_order {
            segments.push(Vec::new());
            open = true;
        }
        if let Some(segment) = segments.last_mut() {
            segment.push(Knot { x, y, data: &point.data, after_hole: gap });
        }
        gap = false;
    }
    segments
}

fn move_to(path: &mut SvgPath, knot: &Knot<'_>) {
    path.move_to(knot.x, knot.y).with_data(knot.data.clone(), knot.after_hole);
}

fn straight(path: &mut SvgPath, segment: &[Knot<'_>]) {
    let Some((first, rest)) = segment.split_first() else { return };
    move_to(path, first);
    for knot in rest {
        path.line_to(knot.x, knot.y).with_data(knot.data.clone(), knot.after_hole);
    }
}

fn stepped(path: &mut SvgPath, segment: &[Knot<'_>], postpone: bool) {
    let Some(first) = segment.first() else { return };
    move_to(path, first);
    for pair in segment.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if postpone {
            path.line_to(curr.x, prev.y).with_data(curr.data.clone(), curr.after_hole);
        } else {
            path.line_to(prev.x, curr.y).with_data(curr.data.clone(), curr.after_hole);
        }
        path.line_to(curr.x, curr.y).with_data(curr.data.clone(), false);
    }
}

fn simple(path: &mut SvgPath, segment: &[Knot<'_>], divisor: usize) {
    let mut averaged = segment.chunks(divisor).map(|chunk| {
        let n = chunk.len() as f64;
        let x = chunk.iter().map(|k| k.x).sum::<f64>() / n;
        let y = chunk.iter().map(|k| k.y).sum::<f64>() / n;
        // chunks are never empty
        let last = &chunk[chunk.len() - 1];
        Knot { x, y, data: last.data, after_hole: chunk.iter().any(|k| k.after_hole) }
    });
    let Some(mut prev) = averaged.next() else { return };
    move_to(path, &prev);
    let d = 1.0 / divisor as f64;
    for curr in averaged {
        let dx = (curr.x - prev.x) * d;
        path.curve_to(prev.x + dx, prev.y, curr.x - dx, curr.y, curr.x, curr.y)
            .with_data(curr.data.clone(), curr.after_hole);
        prev = curr;
    }
}

fn cardinal(path: &mut SvgPath, segment: &[Knot<'_>], tension: f64) {
    if segment.len() <= 2 {
        straight(path, segment);
        return;
    }
    let t = tension.clamp(0.0, 1.0);
    let c = 1.0 - t;
    let n = segment.len();
    move_to(path, &segment[0]);
    for i in 0..n - 1 {
        let p0 = &segment[i.saturating_sub(1)];
        let p1 = &segment[i];
        let p2 = &segment[i + 1];
        let p3 = &segment[(i + 2).min(n - 1)];
        path.curve_to(
            t * (-p0.x + 6.0 * p1.x + p2.x) / 6.0 + c * p2.x,
            t * (-p0.y + 6.0 * p1.y + p2.y) / 6.0 + c * p2.y,
            t * (p1.x + 6.0 * p2.x - p3.x) / 6.0 + c * p2.x,
            t * (p1.y + 6.0 * p2.y - p3.y) / 6.0 + c * p2.y,
            p2.x,
            p2.y,
        )
        .with_data(p2.data.clone(), p2.after_hole);
    }
}

/// Fritsch-Carlson style monotone cubic; x is strictly increasing within a segment.
fn monotone_cubic(path: &mut SvgPath, segment: &[Knot<'_>]) {
    if segment.len() <= 2 {
        straight(path, segment);
        return;
    }
    let n = segment.len();
    let dxs: Vec<f64> = segment.windows(2).map(|w| w[1].x - w[0].x).collect();
    let ds: Vec<f64> = segment.windows(2).zip(&dxs).map(|(w, dx)| (w[1].y - w[0].y) / dx).collect();

    let mut ms = vec![0.0; n];
    ms[0] = ds[0];
    ms[n - 1] = ds[n - 2];
    for i in 1..n - 1 {
        if ds[i] == 0.0 || ds[i - 1] == 0.0 || (ds[i - 1] > 0.0) != (ds[i] > 0.0) {
            ms[i] = 0.0;
        } else {
            let common = dxs[i - 1] + dxs[i];
            ms[i] = 3.0 * common / ((common + dxs[i]) / ds[i - 1] + (common + dxs[i - 1]) / ds[i]);
            if !ms[i].is_finite() {
                ms[i] = 0.0;
            }
        }
    }

    move_to(path, &segment[0]);
    for i in 0..n - 1 {
        let (a, b) = (&segment[i], &segment[i + 1]);
        let third = dxs[i] / 3.0;
        path.curve_to(a.x + third, a.y + ms[i] * third, b.x - third, b.y - ms[i + 1] * third, b.x, b.y)
            .with_data(b.data.clone(), b.after_hole);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DataValue;

    fn pts(coords: &[Option<(f64, f64)>]) -> Vec<PathPoint> {
        coords
            .iter()
            .enumerate()
            .map(|(index, c)| PathPoint {
                coords: *c,
                data: SegmentData {
                    value: c.map_or(DataValue::HOLE, |(_, y)| DataValue::single(y)),
                    index,
                    meta: None,
                },
            })
            .collect()
    }

    #[test]
    fn leading_holes_are_not_gaps() {
        let p = pts(&[None, Some((1.0, 1.0)), Some((2.0, 2.0))]);
        let segs = split_into_segments(&p, false, false);
        assert_eq!(segs.len(), 1);
        assert!(!segs[0][0].after_hole);
    }

    #[test]
    fn monotone_breaks_on_backwards_x() {
        let p = pts(&[Some((0.0, 0.0)), Some((2.0, 1.0)), Some((1.0, 2.0)), Some((3.0, 3.0))]);
        let segs = split_into_segments(&p, false, true);
        assert_eq!(segs.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2]);
    }
}
