// File: crates/sextant-render-skia/src/theme.rs
// Summary: Colour themes for rasterized charts: background, grid, labels and a per-series palette.

use skia_safe as skia;

/// Series colours cycle through this many entries.
pub const PALETTE_LEN: usize = 8;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub label: skia::Color,
    pub series: [skia::Color; PALETTE_LEN],
    /// Alpha applied to series colours when filling areas.
    pub area_alpha: u8,
    pub line_width: f32,
    pub point_size: f32,
    pub bar_width: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 255, 255, 255),
            grid: skia::Color::from_argb(51, 0, 0, 0),
            label: skia::Color::from_argb(102, 0, 0, 0),
            series: [
                skia::Color::from_rgb(0xd7, 0x02, 0x06),
                skia::Color::from_rgb(0xf0, 0x5b, 0x4f),
                skia::Color::from_rgb(0xf4, 0xc6, 0x3d),
                skia::Color::from_rgb(0xd1, 0x79, 0x05),
                skia::Color::from_rgb(0x45, 0x3d, 0x3f),
                skia::Color::from_rgb(0x59, 0x92, 0x2b),
                skia::Color::from_rgb(0x05, 0x44, 0xd3),
                skia::Color::from_rgb(0x6b, 0x03, 0x92),
            ],
            area_alpha: 26,
            line_width: 4.0,
            point_size: 10.0,
            bar_width: 10.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            grid: skia::Color::from_argb(255, 40, 40, 45),
            label: skia::Color::from_argb(255, 210, 210, 220),
            series: [
                skia::Color::from_rgb(64, 160, 255),
                skia::Color::from_rgb(255, 230, 70),
                skia::Color::from_rgb(40, 200, 120),
                skia::Color::from_rgb(220, 80, 80),
                skia::Color::from_rgb(180, 120, 255),
                skia::Color::from_rgb(255, 150, 60),
                skia::Color::from_rgb(0, 210, 210),
                skia::Color::from_rgb(235, 235, 245),
            ],
            area_alpha: 64,
            line_width: 3.0,
            point_size: 8.0,
            bar_width: 10.0,
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            background: skia::Color::from_argb(255, 0xfd, 0xf6, 0xe3), // base3
            grid: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),       // base2
            label: skia::Color::from_argb(255, 0x58, 0x6e, 0x75),      // base01
            series: [
                skia::Color::from_rgb(0x26, 0x8b, 0xd2),
                skia::Color::from_rgb(0xdc, 0x32, 0x2f),
                skia::Color::from_rgb(0x85, 0x99, 0x00),
                skia::Color::from_rgb(0xb5, 0x89, 0x00),
                skia::Color::from_rgb(0x6c, 0x71, 0xc4),
                skia::Color::from_rgb(0xcb, 0x4b, 0x16),
                skia::Color::from_rgb(0x2a, 0xa1, 0x98),
                skia::Color::from_rgb(0xd3, 0x36, 0x82),
            ],
            area_alpha: 40,
            line_width: 3.0,
            point_size: 8.0,
            bar_width: 10.0,
        }
    }

    /// Colour of series `index`, cycling through the palette.
    pub fn series_color(&self, index: usize) -> skia::Color {
        self.series[index % PALETTE_LEN]
    }

    pub fn area_color(&self, index: usize) -> skia::Color {
        self.series_color(index).with_a(self.area_alpha)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::solarized_light()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets().into_iter().find(|t| t.name.eq_ignore_ascii_case(name)).unwrap_or_default()
}
