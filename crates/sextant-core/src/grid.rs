// File: crates/sextant-core/src/grid.rs
// Summary: Grid line and tick label descriptors for one axis.

use crate::axis::Axis;
use crate::event::{DrawEvent, GridDraw, LabelDraw};
use crate::geometry::Dimension;
use crate::options::{AxisOptions, AxisPosition};

/// Labels of the last tick get at least this much room.
const MIN_LAST_LABEL_LENGTH: f64 = 30.0;

/// Distance from the x axis edge to the label baseline.
const X_LABEL_BASELINE: f64 = 20.0;

/// Gap between the y axis edge and its labels.
const Y_LABEL_GAP: f64 = 10.0;

/// Grid and label events for every tick of `axis`, in tick order.
/// A tick whose formatter returns `None` gets neither.
pub fn axis_decorations(axis: &Axis, options: &AxisOptions) -> Vec<DrawEvent> {
    let mut events = Vec::new();
    if !options.show_grid && !options.show_label {
        return events;
    }

    let rect = &axis.chart_rect;
    let counter_length = axis.counter_units.length(rect);
    for (index, tick) in axis.ticks.iter().enumerate() {
        let Some(projected) = axis.project_tick(index) else { continue };
        let text = match &options.label_interpolation {
            Some(formatter) => formatter.format(tick, index),
            None => Some(tick.to_string()),
        };
        let Some(text) = text else { continue };

        let label_length = match axis.project_tick(index + 1) {
            Some(next) if index + 1 < axis.ticks.len() => next - projected,
            _ => (axis.axis_length - projected).max(MIN_LAST_LABEL_LENGTH),
        };
        let position = axis.units.to_pixel(rect, projected);

        if options.show_grid {
            let grid = match axis.units {
                Dimension::X => GridDraw {
                    axis: axis.units,
                    index,
                    x1: position,
                    y1: axis.grid_offset,
                    x2: position,
                    y2: axis.grid_offset + counter_length,
                },
                Dimension::Y => GridDraw {
                    axis: axis.units,
                    index,
                    x1: axis.grid_offset,
                    y1: position,
                    x2: axis.grid_offset + counter_length,
                    y2: position,
                },
            };
            events.push(DrawEvent::Grid(grid));
        }

        if options.show_label {
            let (x, y, width, height) = match (axis.units, options.position) {
                (Dimension::X, AxisPosition::End) => (position, rect.y1 + X_LABEL_BASELINE, label_length, options.offset),
                (Dimension::X, AxisPosition::Start) => (position, rect.y2 - options.offset + X_LABEL_BASELINE, label_length, options.offset),
                (Dimension::Y, AxisPosition::Start) => (rect.x1 - Y_LABEL_GAP, position, options.offset, label_length),
                (Dimension::Y, AxisPosition::End) => (rect.x2 + Y_LABEL_GAP, position, options.offset, label_length),
            };
            events.push(DrawEvent::Label(LabelDraw {
                axis: axis.units,
                index,
                tick: tick.clone(),
                text,
                x: x + options.label_offset.x,
                y: y + options.label_offset.y,
                width,
                height,
            }));
        }
    }
    events
}
