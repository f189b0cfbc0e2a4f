// File: crates/sextant-render-skia/src/path.rs
// Summary: Convert SvgPath commands into a Skia path, resolving relative commands against the pen.

use sextant_core::{PathElement, SvgPath};
use skia_safe as skia;

pub fn to_skia_path(svg: &SvgPath) -> skia::Path {
    let mut path = skia::Path::new();
    let mut pen = (0.0f64, 0.0f64);
    for command in &svg.commands {
        let (dx, dy) = if command.relative { pen } else { (0.0, 0.0) };
        let pt = |x: f64, y: f64| skia::Point::new((x + dx) as f32, (y + dy) as f32);
        match command.element {
            PathElement::Move { x, y } => {
                path.move_to(pt(x, y));
            }
            PathElement::Line { x, y } => {
                path.line_to(pt(x, y));
            }
            PathElement::Curve { x1, y1, x2, y2, x, y } => {
                path.cubic_to(pt(x1, y1), pt(x2, y2), pt(x, y));
            }
            PathElement::Arc { rx, ry, x_axis_rotation, large_arc, sweep, x, y } => {
                let size = if large_arc { skia::path::ArcSize::Large } else { skia::path::ArcSize::Small };
                // SVG's positive sweep is clockwise on a y-down canvas
                let direction = if sweep { skia::PathDirection::CW } else { skia::PathDirection::CCW };
                path.arc_to_rotated((rx as f32, ry as f32), x_axis_rotation as f32, size, direction, pt(x, y));
            }
        }
        let (x, y) = command.element.end();
        pen = (x + dx, y + dy);
    }
    if svg.close {
        path.close();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_commands_follow_the_pen() {
        let mut svg = SvgPath::new();
        svg.move_to(10.0, 10.0).line_to(5.0, 0.0);
        svg.commands[1].relative = true;
        let path = to_skia_path(&svg);
        assert_eq!(path.last_pt(), Some(skia::Point::new(15.0, 10.0)));
        assert_eq!(path.count_points(), 2);
    }

    #[test]
    fn closed_paths_close() {
        let mut svg = SvgPath::closed();
        svg.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0);
        let bounds = to_skia_path(&svg).compute_tight_bounds();
        assert_eq!(bounds, skia::Rect::from_ltrb(0.0, 0.0, 10.0, 10.0));
    }
}
