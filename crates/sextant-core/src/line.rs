// File: crates/sextant-core/src/line.rs
// Summary: Line chart layout: axes, projected series points, then point/line/area descriptors.

use tracing::debug;

use crate::axis::Axis;
use crate::error::Result;
use crate::event::{DrawEvent, PathDraw, PointDraw};
use crate::geometry::{ChartRect, Dimension};
use crate::grid::axis_decorations;
use crate::interpolation::PathPoint;
use crate::normalize::NormalizedData;
use crate::options::{ChartOptions, ResolvedSeries};
use crate::path::{PathCommand, PathElement, SegmentData, SvgPath};

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedSeries {
    pub series_index: usize,
    pub options: ResolvedSeries,
    pub points: Vec<PathPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineProjection {
    pub axis_x: Axis,
    pub axis_y: Axis,
    pub series: Vec<ProjectedSeries>,
}

/// Build both axes and project every series point to absolute pixels.
pub fn project(data: &NormalizedData, options: &ChartOptions, rect: &ChartRect) -> Result<LineProjection> {
    let axis_x = Axis::build(options.axis_type(Dimension::X), Dimension::X, rect, data, options)?;
    let axis_y = Axis::build(options.axis_type(Dimension::Y), Dimension::Y, rect, data, options)?;

    let series = data
        .series
        .iter()
        .enumerate()
        .map(|(series_index, s)| {
            let points = s
                .points
                .iter()
                .enumerate()
                .map(|(index, p)| {
                    let coords = if p.value.is_hole() {
                        None
                    } else {
                        axis_x.project_value(&p.value, index).zip(axis_y.project_value(&p.value, index)).map(
                            |(x, y)| (Dimension::X.to_pixel(rect, x), Dimension::Y.to_pixel(rect, y)),
                        )
                    };
                    let meta = p.meta.clone().or_else(|| s.meta.clone());
                    PathPoint { coords, data: SegmentData { value: p.value, index, meta } }
                })
                .collect();
            ProjectedSeries { series_index, options: options.series_options(s.name.as_deref()), points }
        })
        .collect();

    Ok(LineProjection { axis_x, axis_y, series })
}

/// Grid, labels and series descriptors in emission order.
pub fn draw(projection: &LineProjection, options: &ChartOptions) -> Vec<DrawEvent> {
    let mut events = axis_decorations(&projection.axis_x, &options.axis_x);
    events.extend(axis_decorations(&projection.axis_y, &options.axis_y));

    for series in &projection.series {
        let settings = &series.options;
        if settings.show_point {
            events.extend(series.points.iter().filter_map(|p| {
                let (x, y) = p.coords?;
                Some(DrawEvent::Point(PointDraw {
                    series_index: series.series_index,
                    index: p.data.index,
                    value: p.data.value,
                    meta: p.data.meta.clone(),
                    x,
                    y,
                }))
            }));
        }

        if !settings.show_line && !settings.show_area {
            continue;
        }
        let path = settings.line_smooth.interpolate(&series.points);
        debug!(series = series.series_index, commands = path.len(), "interpolated series");

        if settings.show_line && !path.is_empty() {
            events.push(DrawEvent::Line(PathDraw::new(series.series_index, path.clone())));
        }
        if settings.show_area {
            let base = area_base_pixel(&projection.axis_y, options.area_base);
            events.extend(
                area_paths(&path, base).into_iter().map(|area| DrawEvent::Area(PathDraw::new(series.series_index, area))),
            );
        }
    }
    events
}

/// Pixel y of `area_base`, clamped into the y axis range.
fn area_base_pixel(axis_y: &Axis, area_base: f64) -> f64 {
    let base = match axis_y.range() {
        Some((min, max)) => area_base.clamp(min, max),
        None => area_base,
    };
    Dimension::Y.to_pixel(&axis_y.chart_rect, axis_y.project(base))
}

/// One closed area per solid sub-path of `line`; single-point sub-paths have no area.
pub fn area_paths(line: &SvgPath, base_y: f64) -> Vec<SvgPath> {
    line.split_by_move()
        .into_iter()
        .filter(|part| part.len() > 1)
        .filter_map(|part| {
            let (first_x, _) = part.commands.first()?.element.end();
            let (last_x, _) = part.last_point()?;
            let mut area = SvgPath::closed();
            area.move_to(first_x, base_y);
            for (i, command) in part.commands.into_iter().enumerate() {
                if i == 0 {
                    let (x, y) = command.element.end();
                    area.push(PathCommand { element: PathElement::Line { x, y }, ..command });
                } else {
                    area.push(command);
                }
            }
            area.line_to(last_x, base_y);
            Some(area)
        })
        .collect()
}
