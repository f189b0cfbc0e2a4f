// File: crates/sextant-core/src/event.rs
// Summary: Draw descriptors, pass events, and the listener registry with per-listener failure isolation.
// Notes:
// - Listeners run in registration order. An `Err` or a panic from one listener is logged
//   and the remaining listeners still see the event.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use crate::axis::{Axis, Tick};
use crate::geometry::{ChartRect, Dimension};
use crate::normalize::DataValue;
use crate::options::ChartOptions;
use crate::path::{SegmentData, SvgPath};
use crate::series::Meta;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Point,
    Line,
    Bar,
    Area,
    Grid,
    Label,
    Slice,
}

impl DrawKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Area => "area",
            Self::Grid => "grid",
            Self::Label => "label",
            Self::Slice => "slice",
        }
    }
}

impl fmt::Display for DrawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridDraw {
    pub axis: Dimension,
    pub index: usize,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelDraw {
    pub axis: Dimension,
    pub index: usize,
    pub tick: Tick,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointDraw {
    pub series_index: usize,
    pub index: usize,
    pub value: DataValue,
    pub meta: Option<Meta>,
    pub x: f64,
    pub y: f64,
}

/// A line or area path of one series. `x`/`y` is where the path starts and
/// `index` the data index of its first tagged point.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDraw {
    pub series_index: usize,
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub path: SvgPath,
    pub values: Vec<SegmentData>,
}

impl PathDraw {
    pub fn new(series_index: usize, path: SvgPath) -> Self {
        let values: Vec<SegmentData> = path.segment_data().cloned().collect();
        let (x, y) = path.commands.first().map_or((0.0, 0.0), |c| c.element.end());
        let index = values.first().map_or(0, |d| d.index);
        Self { series_index, index, x, y, path, values }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarDraw {
    pub series_index: usize,
    pub index: usize,
    pub value: DataValue,
    pub meta: Option<Meta>,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SliceDraw {
    pub series_index: usize,
    pub value: f64,
    pub meta: Option<Meta>,
    pub path: SvgPath,
    pub center: (f64, f64),
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawEvent {
    Grid(GridDraw),
    Label(LabelDraw),
    Point(PointDraw),
    Line(PathDraw),
    Area(PathDraw),
    Bar(BarDraw),
    Slice(SliceDraw),
}

impl DrawEvent {
    pub fn kind(&self) -> DrawKind {
        match self {
            Self::Grid(_) => DrawKind::Grid,
            Self::Label(_) => DrawKind::Label,
            Self::Point(_) => DrawKind::Point,
            Self::Line(_) => DrawKind::Line,
            Self::Area(_) => DrawKind::Area,
            Self::Bar(_) => DrawKind::Bar,
            Self::Slice(_) => DrawKind::Slice,
        }
    }

    pub fn series_index(&self) -> Option<usize> {
        match self {
            Self::Point(d) => Some(d.series_index),
            Self::Line(d) | Self::Area(d) => Some(d.series_index),
            Self::Bar(d) => Some(d.series_index),
            Self::Slice(d) => Some(d.series_index),
            Self::Grid(_) | Self::Label(_) => None,
        }
    }

    pub fn path(&self) -> Option<&SvgPath> {
        match self {
            Self::Line(d) | Self::Area(d) => Some(&d.path),
            Self::Slice(d) => Some(&d.path),
            _ => None,
        }
    }
}

/// Closes a completed pass; always the last event of that pass.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatedEvent {
    pub pass: u64,
    /// Draw events this pass delivered; they immediately precede this event.
    pub draw_count: usize,
    pub chart_rect: ChartRect,
    pub axis_x: Option<Axis>,
    pub axis_y: Option<Axis>,
    pub options: ChartOptions,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    Draw(DrawEvent),
    OptionsChanged { previous: ChartOptions, current: ChartOptions },
    Created(CreatedEvent),
}

impl ChartEvent {
    pub fn as_draw(&self) -> Option<&DrawEvent> {
        match self {
            Self::Draw(d) => Some(d),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ChartEvent) -> anyhow::Result<()>>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver `event` to every listener; returns how many failed.
    pub(crate) fn emit(&mut self, event: &ChartEvent) -> usize {
        let mut failures = 0;
        for (id, listener) in &mut self.entries {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    failures += 1;
                    warn!(listener = id.0, error = %err, "chart listener failed");
                }
                Err(_) => {
                    failures += 1;
                    warn!(listener = id.0, "chart listener panicked");
                }
            }
        }
        failures
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("count", &self.entries.len()).finish()
    }
}
