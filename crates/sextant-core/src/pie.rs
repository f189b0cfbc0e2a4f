// File: crates/sextant-core/src/pie.rs
// Summary: Pie and donut layout: one arc slice per series, measured against the data sum or a fixed total.

use crate::error::Result;
use crate::event::{DrawEvent, SliceDraw};
use crate::geometry::ChartRect;
use crate::normalize::NormalizedData;
use crate::options::ChartOptions;
use crate::path::SvgPath;

/// A full circle cannot be drawn with one arc; slices stop just short of it.
const MAX_SWEEP: f64 = 359.99;

#[derive(Clone, Debug, PartialEq)]
pub struct PieProjection {
    pub center: (f64, f64),
    pub radius: f64,
    pub total: f64,
    pub slices: Vec<SliceDraw>,
}

/// Point on the circle at `angle` degrees clockwise from 12 o'clock.
pub fn polar_to_cartesian(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    let radians = (angle - 90.0).to_radians();
    (center.0 + radius * radians.cos(), center.1 + radius * radians.sin())
}

pub fn project(data: &NormalizedData, options: &ChartOptions, rect: &ChartRect) -> Result<PieProjection> {
    let pie = &options.pie;
    // first value of each series; negative values count by magnitude
    let values: Vec<Option<f64>> = data
        .series
        .iter()
        .map(|s| s.values().find_map(|v| v.y).map(f64::abs))
        .collect();
    let total = pie.total.unwrap_or_else(|| values.iter().flatten().sum());

    let center = ((rect.x1 + rect.x2) / 2.0, (rect.y1 + rect.y2) / 2.0);
    let outer = rect.width().min(rect.height()) / 2.0;
    let radius = if pie.donut { (outer - pie.donut_width / 2.0).max(0.0) } else { outer };

    let mut slices = Vec::new();
    if total > 0.0 {
        let mut start = pie.start_angle;
        for (series_index, value) in values.iter().enumerate() {
            let Some(value) = *value else { continue };
            if pie.ignore_empty_values && value == 0.0 {
                continue;
            }
            let sweep = (value / total * 360.0).min(MAX_SWEEP);
            let end = start + sweep;
            let from = polar_to_cartesian(center, radius, start);
            let to = polar_to_cartesian(center, radius, end);

            let mut path = if pie.donut { SvgPath::new() } else { SvgPath::closed() };
            path.move_to(to.0, to.1).arc_to(radius, radius, 0.0, sweep > 180.0, false, from.0, from.1);
            if !pie.donut {
                path.line_to(center.0, center.1);
            }

            let series = &data.series[series_index];
            slices.push(SliceDraw {
                series_index,
                value,
                meta: series.meta.clone(),
                path,
                center,
                radius,
                start_angle: start,
                end_angle: end,
            });
            start = end;
        }
    }

    Ok(PieProjection { center, radius, total, slices })
}

pub fn draw(projection: &PieProjection) -> Vec<DrawEvent> {
    projection.slices.iter().cloned().map(DrawEvent::Slice).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_zero_is_twelve_o_clock() {
        let (x, y) = polar_to_cartesian((50.0, 50.0), 10.0, 0.0);
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 40.0).abs() < 1e-9);
    }
}
