// File: crates/sextant-core/src/chart.rs
// Summary: Render pipeline: normalize, resolve responsive options, project, interpolate, then emit events.
// Notes:
// - Every descriptor of a pass is computed before the first emission, so configuration errors
//   surface before anything is drawn.
// - Updates requested through an `UpdateHandle` while a pass is emitting supersede it: the rest
//   of that pass is dropped and the newest state is rendered instead (last update wins).

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::mem;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::axis::Axis;
use crate::bar::{self, BarProjection};
use crate::error::Result;
use crate::event::{ChartEvent, CreatedEvent, ListenerId, Listeners};
use crate::geometry::ChartRect;
use crate::line::{self, LineProjection};
use crate::media::Viewport;
use crate::normalize::{normalize, NormalizeOptions, NormalizedData};
use crate::options::{ChartOptions, PartialChartOptions};
use crate::pie::{self, PieProjection};
use crate::responsive::{resolve_detailed, ResponsiveOptions};
use crate::series::ChartData;

/// Upper bound on back-to-back passes within one `render` call.
const MAX_PASSES_PER_RENDER: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineState {
    Idle,
    Normalizing,
    Resolving,
    Projecting,
    Interpolating,
    Drawing,
}

#[derive(Clone, Debug)]
enum OptionsUpdate {
    Replace(ChartOptions),
    Merge(PartialChartOptions),
}

#[derive(Clone, Debug, Default)]
struct PendingUpdate {
    data: Option<ChartData>,
    options: Vec<OptionsUpdate>,
    responsive: Option<ResponsiveOptions>,
    viewport: Option<Viewport>,
    rect: Option<ChartRect>,
}

impl PendingUpdate {
    fn is_empty(&self) -> bool {
        self.data.is_none()
            && self.options.is_empty()
            && self.responsive.is_none()
            && self.viewport.is_none()
            && self.rect.is_none()
    }
}

/// Queues updates for a chart, including from inside its own listeners.
#[derive(Clone, Debug, Default)]
pub struct UpdateHandle {
    pending: Rc<RefCell<PendingUpdate>>,
    generation: Rc<Cell<u64>>,
}

impl UpdateHandle {
    pub fn update_data(&self, data: ChartData) {
        self.pending.borrow_mut().data = Some(data);
        self.bump();
    }

    /// Replace the base options.
    pub fn update_options(&self, options: ChartOptions) {
        let mut pending = self.pending.borrow_mut();
        pending.options.clear();
        pending.options.push(OptionsUpdate::Replace(options));
        drop(pending);
        self.bump();
    }

    /// Merge overrides into the base options.
    pub fn merge_options(&self, overrides: PartialChartOptions) {
        self.pending.borrow_mut().options.push(OptionsUpdate::Merge(overrides));
        self.bump();
    }

    pub fn set_responsive_options(&self, responsive: ResponsiveOptions) {
        self.pending.borrow_mut().responsive = Some(responsive);
        self.bump();
    }

    pub fn resize(&self, viewport: Viewport, rect: ChartRect) {
        let mut pending = self.pending.borrow_mut();
        pending.viewport = Some(viewport);
        pending.rect = Some(rect);
        drop(pending);
        self.bump();
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    fn bump(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    fn take(&self) -> PendingUpdate {
        mem::take(&mut *self.pending.borrow_mut())
    }
}

/// Summary of one `render` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderReport {
    /// Passes that ran to completion (at most one per call unless listeners keep updating).
    pub completed: usize,
    /// Passes dropped mid-emission by a newer update.
    pub superseded: usize,
    /// Events delivered to listeners.
    pub emitted: usize,
    pub listener_failures: usize,
    /// Values coerced to holes during normalization.
    pub coerced: usize,
    /// States entered by the last pass, in order.
    pub stages: Vec<PipelineState>,
}

enum Projected {
    Line(LineProjection),
    Bar(BarProjection),
    Pie(PieProjection),
}

impl Projected {
    fn axes(&self) -> (Option<Axis>, Option<Axis>) {
        match self {
            Self::Line(p) => (Some(p.axis_x.clone()), Some(p.axis_y.clone())),
            Self::Bar(p) => (Some(p.axis_x.clone()), Some(p.axis_y.clone())),
            Self::Pie(_) => (None, None),
        }
    }
}

enum PassOutcome {
    Completed,
    Superseded,
}

#[derive(Debug)]
pub struct Chart {
    kind: ChartKind,
    data: ChartData,
    options: ChartOptions,
    responsive: ResponsiveOptions,
    viewport: Viewport,
    rect: ChartRect,
    listeners: Listeners,
    handle: UpdateHandle,
    normalized: Option<(NormalizeOptions, NormalizedData)>,
    resolved: Option<ChartOptions>,
    warned_queries: HashSet<String>,
    state: PipelineState,
    pass: u64,
}

impl Chart {
    /// A chart filling the default viewport.
    pub fn new(kind: ChartKind, data: ChartData, options: ChartOptions) -> Self {
        let viewport = Viewport::default();
        Self {
            kind,
            data,
            options,
            responsive: ResponsiveOptions::default(),
            viewport,
            rect: ChartRect { x1: 0.0, y1: viewport.height, x2: viewport.width, y2: 0.0 },
            listeners: Listeners::default(),
            handle: UpdateHandle::default(),
            normalized: None,
            resolved: None,
            warned_queries: HashSet::new(),
            state: PipelineState::Idle,
            pass: 0,
        }
    }

    pub fn line(data: ChartData, options: ChartOptions) -> Self {
        Self::new(ChartKind::Line, data, options)
    }

    pub fn bar(data: ChartData, options: ChartOptions) -> Self {
        Self::new(ChartKind::Bar, data, options)
    }

    pub fn pie(data: ChartData, options: ChartOptions) -> Self {
        Self::new(ChartKind::Pie, data, options)
    }

    pub fn with_rect(mut self, rect: ChartRect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_responsive_options(mut self, responsive: ResponsiveOptions) -> Self {
        self.responsive = responsive;
        self
    }

    /// Register a listener; listeners run in registration order.
    pub fn on<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChartEvent) -> anyhow::Result<()> + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn handle(&self) -> UpdateHandle {
        self.handle.clone()
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    /// Base options, before responsive overrides.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Options the last drawn pass used.
    pub fn resolved_options(&self) -> Option<&ChartOptions> {
        self.resolved.as_ref()
    }

    pub fn normalized(&self) -> Option<&NormalizedData> {
        self.normalized.as_ref().map(|(_, d)| d)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn chart_rect(&self) -> ChartRect {
        self.rect
    }

    pub fn update_data(&mut self, data: ChartData) -> Result<RenderReport> {
        self.handle.update_data(data);
        self.render()
    }

    pub fn update_options(&mut self, options: ChartOptions) -> Result<RenderReport> {
        self.handle.update_options(options);
        self.render()
    }

    pub fn merge_options(&mut self, overrides: PartialChartOptions) -> Result<RenderReport> {
        self.handle.merge_options(overrides);
        self.render()
    }

    pub fn resize(&mut self, viewport: Viewport, rect: ChartRect) -> Result<RenderReport> {
        self.handle.resize(viewport, rect);
        self.render()
    }

    /// Run the pipeline until a pass completes without being superseded.
    pub fn render(&mut self) -> Result<RenderReport> {
        let mut report = RenderReport::default();
        let mut entry = if self.normalized.is_some() { PipelineState::Resolving } else { PipelineState::Normalizing };

        for _ in 0..MAX_PASSES_PER_RENDER {
            if let Some(stage) = self.apply_pending() {
                entry = entry.min(stage);
            }
            let outcome = self.run_pass(entry, &mut report);
            self.state = PipelineState::Idle;
            match outcome? {
                PassOutcome::Completed => {
                    report.completed += 1;
                    return Ok(report);
                }
                PassOutcome::Superseded => {
                    report.superseded += 1;
                    entry = PipelineState::Resolving;
                }
            }
        }

        warn!(passes = MAX_PASSES_PER_RENDER, "listeners kept requesting updates; stopping");
        Ok(report)
    }

    /// Fold queued updates into the chart; returns the stage they re-enter at.
    fn apply_pending(&mut self) -> Option<PipelineState> {
        let pending = self.handle.take();
        if pending.is_empty() {
            return None;
        }
        let stage = if pending.data.is_some() { PipelineState::Normalizing } else { PipelineState::Resolving };
        if let Some(data) = pending.data {
            self.data = data;
            self.normalized = None;
        }
        for update in pending.options {
            match update {
                OptionsUpdate::Replace(options) => self.options = options,
                OptionsUpdate::Merge(overrides) => self.options.apply(&overrides),
            }
        }
        if let Some(responsive) = pending.responsive {
            self.responsive = responsive;
        }
        if let Some(viewport) = pending.viewport {
            self.viewport = viewport;
        }
        if let Some(rect) = pending.rect {
            self.rect = rect;
        }
        debug!(?stage, "applied pending chart update");
        Some(stage)
    }

    fn run_pass(&mut self, entry: PipelineState, report: &mut RenderReport) -> Result<PassOutcome> {
        let generation = self.handle.generation.get();
        let mut stages = Vec::new();
        let mut enter = |state: &mut PipelineState, next: PipelineState| {
            debug!(state = ?next, "chart pipeline");
            *state = next;
            stages.push(next);
        };

        if entry <= PipelineState::Normalizing || self.normalized.is_none() {
            enter(&mut self.state, PipelineState::Normalizing);
            let settings = self.options.normalize_options();
            self.normalized = Some((settings, normalize(&self.data, &settings)));
        }

        enter(&mut self.state, PipelineState::Resolving);
        let resolution = resolve_detailed(&self.options, &self.responsive, &self.viewport);
        for query in resolution.unsupported {
            if self.warned_queries.insert(query.clone()) {
                warn!(%query, "unsupported media query treated as non-matching");
            }
        }
        let options = resolution.options;
        options.validate()?;

        let settings = options.normalize_options();
        let data = match self.normalized.take() {
            Some((used, data)) if used == settings => data,
            _ => {
                debug!("resolved options change normalization; normalizing again");
                normalize(&self.data, &settings)
            }
        };
        report.coerced = data.coerced;

        enter(&mut self.state, PipelineState::Projecting);
        let projected = match self.kind {
            ChartKind::Line => Projected::Line(line::project(&data, &options, &self.rect)?),
            ChartKind::Bar => Projected::Bar(bar::project(&data, &options, &self.rect)?),
            ChartKind::Pie => Projected::Pie(pie::project(&data, &options, &self.rect)?),
        };
        self.normalized = Some((settings, data));

        enter(&mut self.state, PipelineState::Interpolating);
        let draws = match &projected {
            Projected::Line(p) => line::draw(p, &options),
            Projected::Bar(p) => bar::draw(p, &options),
            Projected::Pie(p) => pie::draw(p),
        };
        let (axis_x, axis_y) = projected.axes();

        enter(&mut self.state, PipelineState::Drawing);
        let mut events = Vec::with_capacity(draws.len() + 2);
        if let Some(previous) = self.resolved.take().filter(|previous| *previous != options) {
            events.push(ChartEvent::OptionsChanged { previous, current: options.clone() });
        }
        self.resolved = Some(options.clone());
        let draw_count = draws.len();
        events.extend(draws.into_iter().map(ChartEvent::Draw));
        self.pass += 1;
        events.push(ChartEvent::Created(CreatedEvent {
            pass: self.pass,
            draw_count,
            chart_rect: self.rect,
            axis_x,
            axis_y,
            options,
        }));
        report.stages = stages;

        for event in &events {
            if self.handle.generation.get() != generation {
                debug!(pass = self.pass, "pass superseded by a newer update");
                return Ok(PassOutcome::Superseded);
            }
            report.listener_failures += self.listeners.emit(event);
            report.emitted += 1;
        }
        Ok(PassOutcome::Completed)
    }
}
