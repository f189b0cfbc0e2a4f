// File: crates/sextant-core/src/path.rs
// Summary: SVG path model produced by interpolation: typed elements tagged with their source data point.
// Notes:
// - Coordinates are absolute pixels unless a command is flagged `relative`.
// - `stringify` rounds every parameter to `accuracy` decimals; rounding is the only lossy step.

use std::fmt;

use crate::normalize::DataValue;
use crate::numeric::round_with_precision;
use crate::series::Meta;

/// Decimals kept by `Display`.
pub const DEFAULT_ACCURACY: u32 = 3;

/// Originating data point of a path command.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentData {
    pub value: DataValue,
    pub index: usize,
    pub meta: Option<Meta>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathElement {
    Move { x: f64, y: f64 },
    Line { x: f64, y: f64 },
    Curve { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    Arc { rx: f64, ry: f64, x_axis_rotation: f64, large_arc: bool, sweep: bool, x: f64, y: f64 },
}

impl PathElement {
    pub const fn letter(&self) -> char {
        match self {
            Self::Move { .. } => 'M',
            Self::Line { .. } => 'L',
            Self::Curve { .. } => 'C',
            Self::Arc { .. } => 'A',
        }
    }

    /// End point of the element.
    pub const fn end(&self) -> (f64, f64) {
        match *self {
            Self::Move { x, y } | Self::Line { x, y } | Self::Curve { x, y, .. } | Self::Arc { x, y, .. } => (x, y),
        }
    }

    /// Parameters in SVG order; arc flags are 0/1.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Self::Move { x, y } | Self::Line { x, y } => vec![x, y],
            Self::Curve { x1, y1, x2, y2, x, y } => vec![x1, y1, x2, y2, x, y],
            Self::Arc { rx, ry, x_axis_rotation, large_arc, sweep, x, y } => {
                vec![rx, ry, x_axis_rotation, f64::from(u8::from(large_arc)), f64::from(u8::from(sweep)), x, y]
            }
        }
    }

    /// Apply `f` to every point of the element (control points included).
    /// Arc radii are not points and stay untouched.
    fn map_points(self, mut f: impl FnMut(f64, f64) -> (f64, f64)) -> Self {
        match self {
            Self::Move { x, y } => {
                let (x, y) = f(x, y);
                Self::Move { x, y }
            }
            Self::Line { x, y } => {
                let (x, y) = f(x, y);
                Self::Line { x, y }
            }
            Self::Curve { x1, y1, x2, y2, x, y } => {
                let (x1, y1) = f(x1, y1);
                let (x2, y2) = f(x2, y2);
                let (x, y) = f(x, y);
                Self::Curve { x1, y1, x2, y2, x, y }
            }
            Self::Arc { rx, ry, x_axis_rotation, large_arc, sweep, x, y } => {
                let (x, y) = f(x, y);
                Self::Arc { rx, ry, x_axis_rotation, large_arc, sweep, x, y }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathCommand {
    pub element: PathElement,
    pub relative: bool,
    /// Set when one or more holes were skipped between this command's point
    /// and the previous real point.
    pub after_hole: bool,
    pub data: Option<SegmentData>,
}

impl PathCommand {
    pub fn new(element: PathElement) -> Self {
        Self { element, relative: false, after_hole: false, data: None }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SvgPath {
    pub commands: Vec<PathCommand>,
    pub close: bool,
}

impl SvgPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn closed() -> Self {
        Self { commands: Vec::new(), close: true }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: PathCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(PathCommand::new(PathElement::Move { x, y }))
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(PathCommand::new(PathElement::Line { x, y }))
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> &mut Self {
        self.push(PathCommand::new(PathElement::Curve { x1, y1, x2, y2, x, y }))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(&mut self, rx: f64, ry: f64, x_axis_rotation: f64, large_arc: bool, sweep: bool, x: f64, y: f64) -> &mut Self {
        self.push(PathCommand::new(PathElement::Arc { rx, ry, x_axis_rotation, large_arc, sweep, x, y }))
    }

    /// Tag the most recently added command with its source point.
    pub fn with_data(&mut self, data: SegmentData, after_hole: bool) -> &mut Self {
        if let Some(last) = self.commands.last_mut() {
            last.data = Some(data);
            last.after_hole = after_hole;
        }
        self
    }

    pub fn last_point(&self) -> Option<(f64, f64)> {
        self.commands.last().map(|c| c.element.end())
    }

    /// Source data of every tagged command, in path order.
    pub fn segment_data(&self) -> impl Iterator<Item = &SegmentData> + '_ {
        self.commands.iter().filter_map(|c| c.data.as_ref())
    }

    /// SVG path data with parameters rounded to `accuracy` decimals.
    pub fn stringify(&self, accuracy: u32) -> String {
        let mut out = String::new();
        for command in &self.commands {
            let letter = command.element.letter();
            out.push(if command.relative { letter.to_ascii_lowercase() } else { letter });
            let params: Vec<String> = command
                .element
                .params()
                .into_iter()
                .map(|p| round_with_precision(p, accuracy).to_string())
                .collect();
            out.push_str(&params.join(","));
        }
        if self.close {
            out.push('Z');
        }
        out
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.map_points(|x, y| (x * sx, y * sy))
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.map_points(|x, y| (x + dx, y + dy))
    }

    pub fn map_points(&mut self, mut f: impl FnMut(f64, f64) -> (f64, f64)) -> &mut Self {
        for command in &mut self.commands {
            command.element = command.element.map_points(&mut f);
        }
        self
    }

    /// Split into sub-paths, each starting at a `Move`. Close flags are not carried.
    pub fn split_by_move(&self) -> Vec<SvgPath> {
        let mut parts: Vec<SvgPath> = Vec::new();
        for command in &self.commands {
            if matches!(command.element, PathElement::Move { .. }) || parts.is_empty() {
                parts.push(SvgPath::new());
            }
            if let Some(current) = parts.last_mut() {
                current.commands.push(command.clone());
            }
        }
        parts
    }

    /// Concatenate paths into one.
    pub fn join(paths: impl IntoIterator<Item = SvgPath>, close: bool) -> SvgPath {
        let commands = paths.into_iter().flat_map(|p| p.commands).collect();
        SvgPath { commands, close }
    }
}

impl fmt::Display for SvgPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify(DEFAULT_ACCURACY))
    }
}
