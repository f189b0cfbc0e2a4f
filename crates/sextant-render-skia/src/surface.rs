// File: crates/sextant-render-skia/src/surface.rs
// Summary: CPU raster surface that paints one completed render pass per `created` event and encodes PNG.
// Notes:
// - Draw events are buffered; on `created` only the trailing `draw_count` of them are painted,
//   so the remains of a superseded pass never reach the canvas.

use std::cell::RefCell;
use std::io::Cursor;
use std::path::Path;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use sextant_core::event::LabelDraw;
use sextant_core::{Chart, ChartEvent, ChartOptions, CreatedEvent, Dimension, DrawEvent, ListenerId};
use skia_safe as skia;
use tracing::debug;

use crate::path::to_skia_path;
use crate::text::TextShaper;
use crate::theme::Theme;

pub const DEFAULT_FONT_SIZE: f32 = 12.0;

pub struct SkiaSurface {
    surface: skia::Surface,
    width: i32,
    height: i32,
    theme: Theme,
    text: TextShaper,
    pending: Vec<DrawEvent>,
    frames: u64,
}

impl SkiaSurface {
    pub fn new(width: i32, height: i32, theme: Theme) -> Result<Self> {
        Ok(Self {
            surface: raster(width, height)?,
            width,
            height,
            theme,
            text: TextShaper::new(DEFAULT_FONT_SIZE),
            pending: Vec::new(),
            frames: 0,
        })
    }

    /// Register a listener on `chart` that feeds this surface.
    pub fn attach(surface: &Rc<RefCell<Self>>, chart: &mut Chart) -> ListenerId {
        let surface = Rc::clone(surface);
        chart.on(move |event| surface.borrow_mut().handle(event))
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Completed passes painted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Replace the raster; the next completed pass paints at the new size.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        if (width, height) != (self.width, self.height) {
            self.surface = raster(width, height)?;
            self.width = width;
            self.height = height;
        }
        Ok(())
    }

    pub fn handle(&mut self, event: &ChartEvent) -> Result<()> {
        match event {
            ChartEvent::Draw(draw) => self.pending.push(draw.clone()),
            ChartEvent::OptionsChanged { .. } => debug!("options changed; next frame repaints"),
            ChartEvent::Created(created) => self.paint(created)?,
        }
        Ok(())
    }

    fn paint(&mut self, created: &CreatedEvent) -> Result<()> {
        let start = self.pending.len().checked_sub(created.draw_count).ok_or_else(|| {
            anyhow!("pass {} reported {} draws but {} arrived", created.pass, created.draw_count, self.pending.len())
        })?;
        if start > 0 {
            debug!(stale = start, "dropping draws of a superseded pass");
        }
        let draws = self.pending.split_off(start);
        self.pending.clear();

        let canvas = self.surface.canvas();
        canvas.clear(self.theme.background);
        for draw in &draws {
            paint_event(canvas, &self.theme, &self.text, draw, &created.options);
        }
        self.frames += 1;
        debug!(pass = created.pass, draws = draws.len(), "painted frame");
        Ok(())
    }

    /// Current pixels as straight-alpha RGBA.
    pub fn to_image(&mut self) -> Result<image::RgbaImage> {
        let info = skia::ImageInfo::new(
            (self.width, self.height),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let row_bytes = self.width as usize * 4;
        let mut pixels = vec![0u8; row_bytes * self.height as usize];
        if !self.surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            bail!("failed to read surface pixels");
        }
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, pixels)
            .ok_or_else(|| anyhow!("pixel buffer does not match {}x{}", self.width, self.height))
    }

    pub fn png_bytes(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_image()?.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn write_png(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.png_bytes()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }
}

fn raster(width: i32, height: i32) -> Result<skia::Surface> {
    if width <= 0 || height <= 0 {
        bail!("surface size must be positive, got {width}x{height}");
    }
    skia::surfaces::raster_n32_premul((width, height)).ok_or_else(|| anyhow!("failed to create raster surface"))
}

fn stroke(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    paint
}

fn fill(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color);
    paint
}

fn pt(x: f64, y: f64) -> skia::Point {
    skia::Point::new(x as f32, y as f32)
}

fn paint_event(canvas: &skia::Canvas, theme: &Theme, text: &TextShaper, draw: &DrawEvent, options: &ChartOptions) {
    match draw {
        DrawEvent::Grid(g) => {
            let mut paint = stroke(theme.grid, 1.0);
            paint.set_path_effect(skia::PathEffect::dash(&[2.0, 2.0], 0.0));
            canvas.draw_line(pt(g.x1, g.y1), pt(g.x2, g.y2), &paint);
        }
        DrawEvent::Label(label) => paint_label(canvas, theme, text, label),
        DrawEvent::Point(p) => {
            canvas.draw_circle(pt(p.x, p.y), theme.point_size / 2.0, &fill(theme.series_color(p.series_index)));
        }
        DrawEvent::Line(d) => {
            let mut paint = stroke(theme.series_color(d.series_index), theme.line_width);
            paint.set_stroke_join(skia::paint::Join::Round);
            paint.set_stroke_cap(skia::paint::Cap::Round);
            canvas.draw_path(&to_skia_path(&d.path), &paint);
        }
        DrawEvent::Area(d) => {
            canvas.draw_path(&to_skia_path(&d.path), &fill(theme.area_color(d.series_index)));
        }
        DrawEvent::Bar(b) => {
            canvas.draw_line(pt(b.x1, b.y1), pt(b.x2, b.y2), &stroke(theme.series_color(b.series_index), theme.bar_width));
        }
        DrawEvent::Slice(s) => {
            let color = theme.series_color(s.series_index);
            let paint = if options.pie.donut { stroke(color, options.pie.donut_width as f32) } else { fill(color) };
            canvas.draw_path(&to_skia_path(&s.path), &paint);
        }
    }
}

fn paint_label(canvas: &skia::Canvas, theme: &Theme, text: &TextShaper, label: &LabelDraw) {
    if label.text.is_empty() {
        return;
    }
    match label.axis {
        Dimension::X => text.draw_left(canvas, &label.text, label.x as f32, label.y as f32, label.width as f32, theme.label),
        // y labels end at `x` and are vertically centred on the tick
        Dimension::Y => text.draw_right(
            canvas,
            &label.text,
            label.x as f32,
            label.y as f32 + text.size() / 3.0,
            label.width as f32,
            theme.label,
        ),
    }
}
