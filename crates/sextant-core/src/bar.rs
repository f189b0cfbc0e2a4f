// File: crates/sextant-core/src/bar.rs
// Summary: Bar chart layout: category step axis, value axis anchored on the reference value, bar descriptors.
// Notes:
// - Bars grow from the projected reference value (0 unless configured), clamped into the value range.
// - Stacked bars accumulate positive and negative values separately per category.

use crate::axis::{Axis, AxisType};
use crate::error::Result;
use crate::event::{BarDraw, DrawEvent};
use crate::geometry::{ChartRect, Dimension};
use crate::grid::axis_decorations;
use crate::normalize::{DataValue, NormalizedData, NormalizedPoint, NormalizedSeries};
use crate::options::ChartOptions;

#[derive(Clone, Debug, PartialEq)]
pub struct BarProjection {
    pub axis_x: Axis,
    pub axis_y: Axis,
    pub bars: Vec<BarDraw>,
}

pub fn project(data: &NormalizedData, options: &ChartOptions, rect: &ChartRect) -> Result<BarProjection> {
    let mut options = options.clone();
    if options.axis_y.reference_value.is_none() && options.reference_value.is_none() {
        options.reference_value = Some(0.0);
    }
    let stack = options.bar.stack_bars;

    let axis_x = Axis::build(AxisType::Step, Dimension::X, rect, data, &options)?;
    let value_type = options.axis_type(Dimension::Y);
    let axis_y = if stack {
        Axis::build(value_type, Dimension::Y, rect, &stacked_extent(data), &options)?
    } else {
        Axis::build(value_type, Dimension::Y, rect, data, &options)?
    };

    let step_length = axis_x.step_length().unwrap_or(0.0);
    let period_half = step_length / 2.0;
    let reference = options.extent_overrides(Dimension::Y).reference_value.unwrap_or(0.0);
    let reference = match axis_y.range() {
        Some((min, max)) => reference.clamp(min, max),
        None => reference,
    };
    let zero = axis_y.project(reference);

    let series_count = data.series.len();
    let mut positive = vec![zero; data.max_len()];
    let mut negative = vec![zero; data.max_len()];
    let mut bars = Vec::new();
    for (series_index, s) in data.series.iter().enumerate() {
        let offset = if stack {
            0.0
        } else {
            (series_index as f64 - (series_count as f64 - 1.0) / 2.0) * options.bar.series_bar_distance
        };
        for (index, p) in s.points.iter().enumerate() {
            let Some(v) = p.value.y else { continue };
            let x = Dimension::X.to_pixel(rect, step_length * index as f64 + period_half + offset);
            let (from, to) = if stack {
                let acc = if v < 0.0 { &mut negative[index] } else { &mut positive[index] };
                let from = *acc;
                *acc += axis_y.project(v) - zero;
                (from, *acc)
            } else {
                (zero, axis_y.project(v))
            };
            bars.push(BarDraw {
                series_index,
                index,
                value: p.value,
                meta: p.meta.clone().or_else(|| s.meta.clone()),
                x1: x,
                y1: Dimension::Y.to_pixel(rect, from),
                x2: x,
                y2: Dimension::Y.to_pixel(rect, to),
            });
        }
    }

    Ok(BarProjection { axis_x, axis_y, bars })
}

pub fn draw(projection: &BarProjection, options: &ChartOptions) -> Vec<DrawEvent> {
    let mut events = axis_decorations(&projection.axis_x, &options.axis_x);
    events.extend(axis_decorations(&projection.axis_y, &options.axis_y));
    events.extend(projection.bars.iter().cloned().map(DrawEvent::Bar));
    events
}

/// Per-category positive and negative sums as two pseudo series, for the value axis extent.
fn stacked_extent(data: &NormalizedData) -> NormalizedData {
    let len = data.max_len();
    let mut positive = vec![0.0; len];
    let mut negative = vec![0.0; len];
    for s in &data.series {
        for (i, v) in s.values().enumerate() {
            match v.y {
                Some(y) if y < 0.0 => negative[i] += y,
                Some(y) => positive[i] += y,
                None => {}
            }
        }
    }
    let pseudo = |sums: Vec<f64>| NormalizedSeries {
        name: None,
        class_name: None,
        meta: None,
        points: sums.into_iter().map(|y| NormalizedPoint { value: DataValue::single(y), meta: None }).collect(),
    };
    NormalizedData { labels: data.labels.clone(), series: vec![pseudo(positive), pseudo(negative)], coerced: 0 }
}
