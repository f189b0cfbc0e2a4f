// File: crates/sextant-core/src/options.rs
// Summary: Chart configuration with line-chart defaults, partial overlays for responsive merging, and label formatters.
// Notes:
// - Only the `Partial*` types deserialize; a full `ChartOptions` is always defaults plus overlays,
//   so JSON documents and responsive overrides share one merge path.
// - Lists (`ticks`) and functions (`labelInterpolationFnc`) are replaced wholesale, never merged.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::axis::{AxisType, Tick};
use crate::bounds::ExtentOverrides;
use crate::error::{ensure_finite, ChartError, Result};
use crate::geometry::Dimension;
use crate::interpolation::Interpolation;
use crate::normalize::NormalizeOptions;
use crate::numeric::NumericConfig;

type FormatFn = dyn Fn(&Tick, usize) -> Option<String> + Send + Sync;

/// Turns a tick into label text. Returning `None` skips that tick's label and grid line.
#[derive(Clone)]
pub struct LabelFormatter(Arc<FormatFn>);

impl LabelFormatter {
    pub fn new(f: impl Fn(&Tick, usize) -> Option<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn format(&self, tick: &Tick, index: usize) -> Option<String> {
        (self.0)(tick, index)
    }

    /// Reads tick values as epoch milliseconds and formats them with a `chrono` pattern.
    pub fn date(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self::new(move |tick, _| {
            let at = DateTime::<Utc>::from_timestamp_millis(tick.value()? as i64)?;
            let mut out = String::new();
            write!(out, "{}", at.format(&pattern)).ok()?;
            Some(out)
        })
    }

    /// Keeps only every `n`th label.
    pub fn every_nth(n: usize) -> Self {
        let n = n.max(1);
        Self::new(move |tick, index| (index % n == 0).then(|| tick.to_string()))
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

/// Formatters compare by identity.
impl PartialEq for LabelFormatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Start,
    #[default]
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Offset {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisOptions {
    /// `None` uses [`AxisType::default_for`] the axis dimension.
    pub axis_type: Option<AxisType>,
    /// Space reserved for labels, in pixels.
    pub offset: f64,
    pub position: AxisPosition,
    pub label_offset: Offset,
    pub show_label: bool,
    pub show_grid: bool,
    pub label_interpolation: Option<LabelFormatter>,
    /// Minimum pixel distance between ticks.
    pub scale_min_space: f64,
    pub only_integer: bool,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub reference_value: Option<f64>,
    pub ticks: Option<Vec<f64>>,
    pub ensure_tick_value: Option<f64>,
    pub divisor: Option<usize>,
    pub stretch: bool,
}

impl AxisOptions {
    pub fn x() -> Self {
        Self {
            axis_type: None,
            offset: 30.0,
            position: AxisPosition::End,
            label_offset: Offset::default(),
            show_label: true,
            show_grid: true,
            label_interpolation: None,
            scale_min_space: 30.0,
            only_integer: false,
            high: None,
            low: None,
            reference_value: None,
            ticks: None,
            ensure_tick_value: None,
            divisor: None,
            stretch: false,
        }
    }

    pub fn y() -> Self {
        Self { offset: 40.0, position: AxisPosition::Start, scale_min_space: 20.0, ..Self::x() }
    }

    pub fn apply(&mut self, p: &PartialAxisOptions) {
        set_some(&mut self.axis_type, &p.axis_type);
        set(&mut self.offset, &p.offset);
        set(&mut self.position, &p.position);
        set(&mut self.label_offset, &p.label_offset);
        set(&mut self.show_label, &p.show_label);
        set(&mut self.show_grid, &p.show_grid);
        set_some(&mut self.label_interpolation, &p.label_interpolation);
        set(&mut self.scale_min_space, &p.scale_min_space);
        set(&mut self.only_integer, &p.only_integer);
        set_some(&mut self.high, &p.high);
        set_some(&mut self.low, &p.low);
        set_some(&mut self.reference_value, &p.reference_value);
        set_some(&mut self.ticks, &p.ticks);
        set_some(&mut self.ensure_tick_value, &p.ensure_tick_value);
        set_some(&mut self.divisor, &p.divisor);
        set(&mut self.stretch, &p.stretch);
    }

    fn validate(&self) -> Result<()> {
        ensure_finite("scaleMinSpace", self.scale_min_space)?;
        if self.scale_min_space <= 0.0 {
            return Err(ChartError::InvalidOption { option: "scaleMinSpace", reason: "must be positive".into() });
        }
        ensure_finite("offset", self.offset)?;
        if self.divisor == Some(0) {
            return Err(ChartError::InvalidOption { option: "divisor", reason: "must be at least 1".into() });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialAxisOptions {
    #[serde(rename = "type")]
    pub axis_type: Option<AxisType>,
    pub offset: Option<f64>,
    pub position: Option<AxisPosition>,
    pub label_offset: Option<Offset>,
    pub show_label: Option<bool>,
    pub show_grid: Option<bool>,
    #[serde(skip)]
    pub label_interpolation: Option<LabelFormatter>,
    pub scale_min_space: Option<f64>,
    pub only_integer: Option<bool>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub reference_value: Option<f64>,
    pub ticks: Option<Vec<f64>>,
    pub ensure_tick_value: Option<f64>,
    pub divisor: Option<usize>,
    pub stretch: Option<bool>,
}

/// Per-series overrides, keyed by series name in [`ChartOptions::series`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesOptions {
    pub line_smooth: Option<Interpolation>,
    pub show_line: Option<bool>,
    pub show_point: Option<bool>,
    pub show_area: Option<bool>,
}

impl SeriesOptions {
    fn merge(&mut self, other: &SeriesOptions) {
        set_some(&mut self.line_smooth, &other.line_smooth);
        set_some(&mut self.show_line, &other.show_line);
        set_some(&mut self.show_point, &other.show_point);
        set_some(&mut self.show_area, &other.show_area);
    }
}

/// Drawing switches for one series after per-series overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSeries {
    pub line_smooth: Interpolation,
    pub show_line: bool,
    pub show_point: bool,
    pub show_area: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarOptions {
    /// Pixel offset between bars of neighbouring series in one slot.
    pub series_bar_distance: f64,
    pub stack_bars: bool,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self { series_bar_distance: 15.0, stack_bars: false }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialBarOptions {
    pub series_bar_distance: Option<f64>,
    pub stack_bars: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PieOptions {
    /// Degrees clockwise from 12 o'clock.
    pub start_angle: f64,
    /// Sum the slices are measured against; defaults to the data sum.
    pub total: Option<f64>,
    pub donut: bool,
    pub donut_width: f64,
    pub ignore_empty_values: bool,
}

impl Default for PieOptions {
    fn default() -> Self {
        Self { start_angle: 0.0, total: None, donut: false, donut_width: 60.0, ignore_empty_values: false }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialPieOptions {
    pub start_angle: Option<f64>,
    pub total: Option<f64>,
    pub donut: Option<bool>,
    pub donut_width: Option<f64>,
    pub ignore_empty_values: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
    pub axis_x: AxisOptions,
    pub axis_y: AxisOptions,
    /// Value-axis overrides; axis-level settings win.
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub reference_value: Option<f64>,
    pub show_line: bool,
    pub show_point: bool,
    pub show_area: bool,
    pub area_base: f64,
    pub line_smooth: Interpolation,
    pub full_width: bool,
    pub reverse_data: bool,
    pub allow_variable_data_lengths: bool,
    pub series: BTreeMap<String, SeriesOptions>,
    pub bar: BarOptions,
    pub pie: PieOptions,
    pub numeric: NumericConfig,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            axis_x: AxisOptions::x(),
            axis_y: AxisOptions::y(),
            high: None,
            low: None,
            reference_value: None,
            show_line: true,
            show_point: true,
            show_area: false,
            area_base: 0.0,
            line_smooth: Interpolation::default(),
            full_width: false,
            reverse_data: false,
            allow_variable_data_lengths: false,
            series: BTreeMap::new(),
            bar: BarOptions::default(),
            pie: PieOptions::default(),
            numeric: NumericConfig::default(),
        }
    }
}

impl ChartOptions {
    /// Defaults overlaid with a camelCase JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut options = Self::default();
        options.apply(&PartialChartOptions::from_json(text)?);
        options.validate()?;
        Ok(options)
    }

    /// Deep merge: nested option groups merge field by field, lists and functions are replaced.
    pub fn apply(&mut self, p: &PartialChartOptions) {
        if let Some(axis) = &p.axis_x {
            self.axis_x.apply(axis);
        }
        if let Some(axis) = &p.axis_y {
            self.axis_y.apply(axis);
        }
        set_some(&mut self.high, &p.high);
        set_some(&mut self.low, &p.low);
        set_some(&mut self.reference_value, &p.reference_value);
        set(&mut self.show_line, &p.show_line);
        set(&mut self.show_point, &p.show_point);
        set(&mut self.show_area, &p.show_area);
        set(&mut self.area_base, &p.area_base);
        set(&mut self.line_smooth, &p.line_smooth);
        set(&mut self.full_width, &p.full_width);
        set(&mut self.reverse_data, &p.reverse_data);
        set(&mut self.allow_variable_data_lengths, &p.allow_variable_data_lengths);
        if let Some(series) = &p.series {
            for (name, overrides) in series {
                self.series.entry(name.clone()).or_default().merge(overrides);
            }
        }
        set(&mut self.bar.series_bar_distance, &p.bar.series_bar_distance);
        set(&mut self.bar.stack_bars, &p.bar.stack_bars);
        set(&mut self.pie.start_angle, &p.pie.start_angle);
        set_some(&mut self.pie.total, &p.pie.total);
        set(&mut self.pie.donut, &p.pie.donut);
        set(&mut self.pie.donut_width, &p.pie.donut_width);
        set(&mut self.pie.ignore_empty_values, &p.pie.ignore_empty_values);
        set(&mut self.numeric, &p.numeric);
    }

    pub fn merged(&self, p: &PartialChartOptions) -> Self {
        let mut out = self.clone();
        out.apply(p);
        out
    }

    /// Reject option values no chart can be drawn with.
    pub fn validate(&self) -> Result<()> {
        self.axis_x.validate()?;
        self.axis_y.validate()?;
        for (option, value) in [("high", self.high), ("low", self.low), ("referenceValue", self.reference_value)] {
            if let Some(v) = value {
                ensure_finite(option, v)?;
            }
        }
        ensure_finite("areaBase", self.area_base)?;
        ensure_finite("seriesBarDistance", self.bar.series_bar_distance)?;
        ensure_finite("startAngle", self.pie.start_angle)?;
        ensure_finite("donutWidth", self.pie.donut_width)?;
        if let Some(total) = self.pie.total {
            ensure_finite("total", total)?;
        }
        if let Interpolation::Cardinal { tension, .. } = self.line_smooth {
            ensure_finite("tension", tension)?;
        }
        if self.numeric.precision > 300 {
            return Err(ChartError::InvalidOption { option: "precision", reason: "must be at most 300".into() });
        }
        Ok(())
    }

    pub fn axis(&self, dimension: Dimension) -> &AxisOptions {
        match dimension {
            Dimension::X => &self.axis_x,
            Dimension::Y => &self.axis_y,
        }
    }

    pub fn axis_type(&self, dimension: Dimension) -> AxisType {
        self.axis(dimension).axis_type.unwrap_or(AxisType::default_for(dimension))
    }

    /// True when either axis reads its own coordinate of `{x, y}` points.
    pub fn is_multi_dimensional(&self) -> bool {
        [Dimension::X, Dimension::Y].into_iter().any(|d| self.axis_type(d) != AxisType::default_for(d))
    }

    /// Extent overrides for `dimension`. Chart-level bounds apply to the value (y) axis only.
    pub fn extent_overrides(&self, dimension: Dimension) -> ExtentOverrides {
        let axis = self.axis(dimension);
        let chart_level = dimension == Dimension::Y;
        let fallback = |v: Option<f64>| if chart_level { v } else { None };
        ExtentOverrides {
            high: axis.high.or(fallback(self.high)),
            low: axis.low.or(fallback(self.low)),
            reference_value: axis.reference_value.or(fallback(self.reference_value)),
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions { allow_variable_data_lengths: self.allow_variable_data_lengths, reverse: self.reverse_data }
    }

    /// Chart-wide switches with the named series' overrides applied.
    pub fn series_options(&self, name: Option<&str>) -> ResolvedSeries {
        let overrides = name.and_then(|n| self.series.get(n));
        let pick = |o: Option<bool>, base: bool| o.unwrap_or(base);
        ResolvedSeries {
            line_smooth: overrides
                .and_then(|o| o.line_smooth.clone())
                .unwrap_or_else(|| self.line_smooth.clone()),
            show_line: pick(overrides.and_then(|o| o.show_line), self.show_line),
            show_point: pick(overrides.and_then(|o| o.show_point), self.show_point),
            show_area: pick(overrides.and_then(|o| o.show_area), self.show_area),
        }
    }
}

/// Overlay applied on top of [`ChartOptions`]; unset fields leave the base untouched.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialChartOptions {
    pub axis_x: Option<PartialAxisOptions>,
    pub axis_y: Option<PartialAxisOptions>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub reference_value: Option<f64>,
    pub show_line: Option<bool>,
    pub show_point: Option<bool>,
    pub show_area: Option<bool>,
    pub area_base: Option<f64>,
    pub line_smooth: Option<Interpolation>,
    pub full_width: Option<bool>,
    pub reverse_data: Option<bool>,
    pub allow_variable_data_lengths: Option<bool>,
    pub series: Option<BTreeMap<String, SeriesOptions>>,
    #[serde(flatten)]
    pub bar: PartialBarOptions,
    #[serde(flatten)]
    pub pie: PartialPieOptions,
    pub numeric: Option<NumericConfig>,
}

impl PartialChartOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn set<T: Clone>(dst: &mut T, src: &Option<T>) {
    if let Some(v) = src {
        *dst = v.clone();
    }
}

fn set_some<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if src.is_some() {
        dst.clone_from(src);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_overrides_merge_field_by_field() {
        let mut base = ChartOptions::default();
        base.apply(&PartialChartOptions::from_json(r#"{"series": {"a": {"showArea": true}}}"#).unwrap());
        base.apply(&PartialChartOptions::from_json(r#"{"series": {"a": {"showPoint": false}}}"#).unwrap());
        let a = base.series_options(Some("a"));
        assert!(a.show_area);
        assert!(!a.show_point);
        assert!(base.series_options(Some("b")).show_point);
    }

    #[test]
    fn formatter_identity() {
        let f = LabelFormatter::every_nth(2);
        assert_eq!(f, f.clone());
        assert_ne!(f, LabelFormatter::every_nth(2));
    }
}
