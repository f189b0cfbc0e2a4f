// File: crates/sextant-core/src/axis.rs
// Summary: Axis variants (linear, auto-scale, step, fixed) and value-to-pixel projection along one dimension.
// Notes:
// - An axis is rebuilt from scratch every pass and never mutated afterwards.
// - Projections are relative to the axis origin; `Dimension::to_pixel` turns them into
//   absolute coordinates (y grows upwards from the bottom edge).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::bounds::{compute_bounds, widen_degenerate, Bounds, HighLow};
use crate::error::{ensure_finite, ChartError, Result};
use crate::geometry::{ChartRect, Dimension};
use crate::normalize::{DataValue, NormalizedData};
use crate::numeric::{project_length, round_with_precision, NumericConfig};
use crate::options::{AxisOptions, ChartOptions};

/// One grid position: a number on value axes, a category label on step axes.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    Value(f64),
    Label(String),
}

impl Tick {
    /// Numeric value of the tick; labels that parse as numbers count too.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Label(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum AxisType {
    AutoScale,
    LinearScale,
    Step,
    FixedScale,
}

impl AxisType {
    /// Axis type used when none is configured: categories along x, values along y.
    pub const fn default_for(dimension: Dimension) -> Self {
        match dimension {
            Dimension::X => Self::Step,
            Dimension::Y => Self::AutoScale,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::AutoScale => "autoScale",
            Self::LinearScale => "linearScale",
            Self::Step => "step",
            Self::FixedScale => "fixedScale",
        }
    }
}

impl FromStr for AxisType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "autoscale" => Ok(Self::AutoScale),
            "linear" | "linearscale" => Ok(Self::LinearScale),
            "step" => Ok(Self::Step),
            "fixed" | "fixedscale" => Ok(Self::FixedScale),
            _ => Err(ChartError::UnknownAxisType(s.to_owned())),
        }
    }
}

impl TryFrom<String> for AxisType {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    LinearScale(Bounds),
    AutoScale(Bounds),
    Step { step_length: f64, stretch: bool },
    FixedScale { min: f64, max: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub units: Dimension,
    pub counter_units: Dimension,
    pub chart_rect: ChartRect,
    pub axis_length: f64,
    pub grid_offset: f64,
    pub ticks: Vec<Tick>,
    pub scale: AxisScale,
}

impl Axis {
    fn new(units: Dimension, rect: &ChartRect, ticks: Vec<Tick>, scale: AxisScale) -> Result<Self> {
        if ticks.is_empty() {
            return Err(ChartError::ZeroTicks { axis: units.name() });
        }
        Ok(Self {
            units,
            counter_units: units.counter(),
            chart_rect: *rect,
            axis_length: units.length(rect),
            grid_offset: units.grid_offset(rect),
            ticks,
            scale,
        })
    }

    pub fn linear_scale(
        units: Dimension,
        rect: &ChartRect,
        high_low: &HighLow,
        options: &AxisOptions,
        numeric: &NumericConfig,
    ) -> Result<Self> {
        let bounds = compute_bounds(units.length(rect), high_low, options.scale_min_space, options.only_integer, numeric)?;
        let ticks = bounds.values.iter().copied().map(Tick::Value).collect();
        Self::new(units, rect, ticks, AxisScale::LinearScale(bounds))
    }

    /// Linear bounds plus explicit extra `ticks` and `ensureTickValue`.
    pub fn auto_scale(
        units: Dimension,
        rect: &ChartRect,
        high_low: &HighLow,
        options: &AxisOptions,
        numeric: &NumericConfig,
    ) -> Result<Self> {
        let mut bounds =
            compute_bounds(units.length(rect), high_low, options.scale_min_space, options.only_integer, numeric)?;
        if let Some(value) = options.ensure_tick_value {
            bounds.ensure_tick_value(value, numeric)?;
        }
        if let Some(extra) = &options.ticks {
            for t in extra {
                ensure_finite("ticks", *t)?;
            }
            bounds.merge_ticks(extra, numeric)?;
        }
        let ticks = bounds.values.iter().copied().map(Tick::Value).collect();
        Self::new(units, rect, ticks, AxisScale::AutoScale(bounds))
    }

    /// Evenly spaced categories; `stretch` pins the last one to the far edge.
    pub fn step(units: Dimension, rect: &ChartRect, labels: Vec<String>, stretch: bool) -> Result<Self> {
        let divisions = labels.len().saturating_sub(usize::from(stretch)).max(1);
        let step_length = units.length(rect) / divisions as f64;
        let ticks = labels.into_iter().map(Tick::Label).collect();
        Self::new(units, rect, ticks, AxisScale::Step { step_length, stretch })
    }

    /// Explicit ticks, or `divisor` equal intervals over `high_low`.
    pub fn fixed_scale(
        units: Dimension,
        rect: &ChartRect,
        high_low: &HighLow,
        options: &AxisOptions,
        numeric: &NumericConfig,
    ) -> Result<Self> {
        let values = match (&options.ticks, options.divisor) {
            (_, Some(0)) => {
                return Err(ChartError::InvalidOption { option: "divisor", reason: "must be at least 1".into() });
            }
            (Some(ticks), None) => {
                for t in ticks {
                    ensure_finite("ticks", *t)?;
                }
                ticks.clone()
            }
            (_, divisor) => {
                let n = divisor.unwrap_or(1);
                let (low, high) = widen_degenerate(high_low.low, high_low.high);
                let step = (high - low) / n as f64;
                let digits = numeric.digits_for_step(step);
                (0..=n).map(|i| round_with_precision(low + i as f64 * step, digits)).collect()
            }
        };

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let (min, max) = if values.is_empty() { (0.0, 0.0) } else { widen_degenerate(min, max) };
        let ticks = values.into_iter().map(Tick::Value).collect();
        Self::new(units, rect, ticks, AxisScale::FixedScale { min, max })
    }

    /// Build the configured axis type for `units` from normalized data.
    pub fn build(
        axis_type: AxisType,
        units: Dimension,
        rect: &ChartRect,
        data: &NormalizedData,
        options: &ChartOptions,
    ) -> Result<Self> {
        let axis_options = options.axis(units);
        let high_low = || HighLow::from_data(data, units, options.extent_overrides(units));
        let axis = match axis_type {
            AxisType::Step => {
                let labels = if data.labels.is_empty() { vec![String::new()] } else { data.labels.clone() };
                let stretch = axis_options.stretch || (units == Dimension::X && options.full_width);
                Self::step(units, rect, labels, stretch)?
            }
            AxisType::LinearScale => Self::linear_scale(units, rect, &high_low()?, axis_options, &options.numeric)?,
            AxisType::AutoScale => Self::auto_scale(units, rect, &high_low()?, axis_options, &options.numeric)?,
            AxisType::FixedScale => Self::fixed_scale(units, rect, &high_low()?, axis_options, &options.numeric)?,
        };
        debug!(axis = units.name(), kind = axis_type.name(), ticks = axis.ticks.len(), "built axis");
        Ok(axis)
    }

    pub fn bounds(&self) -> Option<&Bounds> {
        match &self.scale {
            AxisScale::LinearScale(b) | AxisScale::AutoScale(b) => Some(b),
            _ => None,
        }
    }

    /// Value range covered by the axis; `None` for step axes.
    pub fn range(&self) -> Option<(f64, f64)> {
        match &self.scale {
            AxisScale::LinearScale(b) | AxisScale::AutoScale(b) => Some((b.min, b.max)),
            AxisScale::FixedScale { min, max } => Some((*min, *max)),
            AxisScale::Step { .. } => None,
        }
    }

    pub fn step_length(&self) -> Option<f64> {
        match self.scale {
            AxisScale::Step { step_length, .. } => Some(step_length),
            _ => None,
        }
    }

    /// Relative projection of a raw value (a category index on step axes).
    pub fn project(&self, value: f64) -> f64 {
        match (&self.scale, self.range()) {
            (AxisScale::Step { step_length, .. }, _) => step_length * value,
            (_, Some((min, max))) => project_length(self.axis_length, value - min, max - min),
            (_, None) => 0.0,
        }
    }

    /// Relative projection of a data point, `None` when it has no value along this axis.
    pub fn project_value(&self, value: &DataValue, index: usize) -> Option<f64> {
        match self.scale {
            AxisScale::Step { step_length, .. } => Some(step_length * index as f64),
            _ => value.get(self.units).map(|v| self.project(v)),
        }
    }

    /// Relative projection of the tick at `index`.
    pub fn project_tick(&self, index: usize) -> Option<f64> {
        match self.scale {
            AxisScale::Step { step_length, .. } => Some(step_length * index as f64),
            _ => self.ticks.get(index).and_then(Tick::value).map(|v| self.project(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_type_names() {
        assert_eq!("autoScale".parse::<AxisType>().unwrap(), AxisType::AutoScale);
        assert_eq!("FIXED".parse::<AxisType>().unwrap(), AxisType::FixedScale);
        assert!(matches!("log".parse::<AxisType>(), Err(ChartError::UnknownAxisType(s)) if s == "log"));
    }

    #[test]
    fn tick_display() {
        assert_eq!(Tick::Value(8.0).to_string(), "8");
        assert_eq!(Tick::Value(0.25).to_string(), "0.25");
        assert_eq!(Tick::Label("Mon".into()).to_string(), "Mon");
    }
}
