// File: crates/sextant-render-skia/src/text.rs
// Summary: Tick label shaping with Skia textlayout; labels are placed inside the box a label descriptor reserves.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

pub struct TextShaper {
    fonts: FontCollection,
    size: f32,
}

impl TextShaper {
    pub fn new(size: f32) -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc, size: size.max(1.0) }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    fn layout(&self, text: &str, color: skia::Color, align: TextAlign, width: f32) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(align);
        let mut ts = TextStyle::new();
        ts.set_font_size(self.size);
        ts.set_color(color);
        ts.set_font_families(&["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"]);

        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&ts);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(width.max(1.0));
        paragraph
    }

    pub fn measure_width(&self, text: &str) -> f32 {
        self.layout(text, skia::Color::TRANSPARENT, TextAlign::Left, 10_000.0).longest_line()
    }

    /// Draw with the baseline at `y`, starting at `x`.
    pub fn draw_left(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, width: f32, color: skia::Color) {
        let mut p = self.layout(text, color, TextAlign::Left, width);
        // Paragraph draws from top-left; adjust baseline by glyph height approximation
        p.paint(canvas, (x, y - self.size * 0.8));
    }

    /// Draw with the baseline at `y`, ending at `right`.
    pub fn draw_right(&self, canvas: &skia::Canvas, text: &str, right: f32, y: f32, width: f32, color: skia::Color) {
        let width = width.max(1.0);
        let mut p = self.layout(text, color, TextAlign::Right, width);
        p.paint(canvas, (right - width, y - self.size * 0.8));
    }
}
