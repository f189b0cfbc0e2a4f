// File: crates/sextant-render-skia/src/lib.rs
// Summary: Skia drawing surface for Sextant charts: paints draw events on a CPU raster and encodes PNG.

pub mod path;
pub mod surface;
pub mod text;
pub mod theme;

pub use path::to_skia_path;
pub use surface::SkiaSurface;
pub use text::TextShaper;
pub use theme::Theme;
