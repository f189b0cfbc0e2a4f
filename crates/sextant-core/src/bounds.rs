// File: crates/sextant-core/src/bounds.rs
// Summary: Value extents (HighLow) and "nice" tick bounds for a pixel budget.
// Notes:
// - Steps come from {1, 2, 2.5, 5, 10} x 10^n; the loop below only ever widens them.
// - Tick values are computed from integer cell indices, never by accumulation.

use tracing::trace;

use crate::error::{ensure_finite, ChartError, Result};
use crate::geometry::Dimension;
use crate::normalize::NormalizedData;
use crate::numeric::{order_of_magnitude, rho, round_with_precision, NumericConfig};

const NICE_DIVISORS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Target spacing multiplier; `scale_min_space` itself stays the hard limit.
const SPACING_HEADROOM: f64 = 2.0;

/// Value-space extent one axis must cover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighLow {
    pub low: f64,
    pub high: f64,
    pub average: f64,
    pub reference_value: Option<f64>,
}

/// Caller overrides for an extent computation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtentOverrides {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub reference_value: Option<f64>,
}

impl HighLow {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high, average: (low + high) / 2.0, reference_value: None }
    }

    pub fn with_reference(mut self, reference_value: f64) -> Self {
        self.reference_value = Some(reference_value);
        self.high = self.high.max(reference_value);
        self.low = self.low.min(reference_value);
        self
    }

    /// Extent of `data` along `dimension`. Explicit `high`/`low` win over the data;
    /// a reference value always lies inside the result.
    pub fn from_data(data: &NormalizedData, dimension: Dimension, overrides: ExtentOverrides) -> Result<Self> {
        if let Some(h) = overrides.high {
            ensure_finite("high", h)?;
        }
        if let Some(l) = overrides.low {
            ensure_finite("low", l)?;
        }
        if let Some(r) = overrides.reference_value {
            ensure_finite("referenceValue", r)?;
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        let mut extent: Option<(f64, f64)> = None;
        for v in data.series.iter().flat_map(|s| s.values()).filter_map(|v| v.get(dimension)) {
            sum += v;
            count += 1;
            extent = Some(match extent {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }

        let (mut low, mut high) = match (overrides.low, overrides.high, extent) {
            (Some(l), Some(h), _) => (l, h),
            (Some(l), None, Some((_, hi))) => (l, hi),
            (None, Some(h), Some((lo, _))) => (lo, h),
            (None, None, Some(e)) => e,
            // no data along this dimension
            (Some(l), None, None) => (l, l + 1.0),
            (None, Some(h), None) => (h - 1.0, h),
            (None, None, None) => (0.0, 1.0),
        };

        if let Some(r) = overrides.reference_value {
            high = high.max(r);
            low = low.min(r);
        }

        if high < low {
            let option = if overrides.high.is_some() { "high" } else { "low" };
            return Err(ChartError::InvertedRange { option, high, low });
        }

        let average = if count > 0 { sum / count as f64 } else { (low + high) / 2.0 };
        Ok(Self { low, high, average, reference_value: overrides.reference_value })
    }
}

/// A tick set for one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub range: f64,
    pub number_of_steps: usize,
    pub values: Vec<f64>,
}

/// Compute nice bounds covering `high_low` on an axis of `axis_length` pixels whose
/// ticks are at least `scale_min_space` pixels apart.
pub fn compute_bounds(
    axis_length: f64,
    high_low: &HighLow,
    scale_min_space: f64,
    only_integer: bool,
    numeric: &NumericConfig,
) -> Result<Bounds> {
    ensure_finite("axisLength", axis_length)?;
    ensure_finite("scaleMinSpace", scale_min_space)?;
    ensure_finite("low", high_low.low)?;
    ensure_finite("high", high_low.high)?;
    if let Some(r) = high_low.reference_value {
        ensure_finite("referenceValue", r)?;
    }
    if scale_min_space <= 0.0 {
        return Err(ChartError::InvalidOption { option: "scaleMinSpace", reason: "must be positive".into() });
    }
    if axis_length < 0.0 {
        return Err(ChartError::InvalidOption { option: "axisLength", reason: "must not be negative".into() });
    }
    if high_low.high < high_low.low {
        return Err(ChartError::InvertedRange { option: "high", high: high_low.high, low: high_low.low });
    }

    let (low, high) = widen_degenerate(high_low.low, high_low.high);
    let value_range = ensure_finite("high", high - low)?;
    let slots = (axis_length / (scale_min_space * SPACING_HEADROOM)).floor().max(1.0);
    let minimum_step = value_range / slots;

    let mut step = nice_step(minimum_step, only_integer, numeric);
    if only_integer {
        step = prefer_range_factor(step, minimum_step, value_range, numeric);
    }

    let anchor = high_low.reference_value.unwrap_or(0.0);
    let mut widenings = 0usize;
    let (first_cell, cells) = loop {
        let (first, last) = snap_cells(low, high, step, anchor, numeric);
        let cells = last - first;
        if cells * scale_min_space <= axis_length + scale_min_space {
            break (first, cells);
        }
        if step >= value_range {
            // Axis shorter than one spacing and the range straddles a grid line:
            // no multiple-of-step grid fits, so span the range with a single step.
            trace!(axis_length, scale_min_space, "falling back to a single-step grid");
            return Ok(single_step(low, high));
        }
        step = nice_step(step * (1.0 + 1e-6), only_integer, numeric);
        widenings += 1;
    };

    let digits = numeric.digits_for_step(step);
    let number_of_steps = cells as usize;
    let values: Vec<f64> = (0..=number_of_steps)
        .map(|i| round_with_precision(anchor + (first_cell + i as f64) * step, digits))
        .collect();
    let min = values[0];
    let max = values[number_of_steps];

    trace!(low, high, step, number_of_steps, widenings, "computed bounds");
    let bounds = Bounds { min, max, step, range: max - min, number_of_steps, values };
    bounds.check_finite()?;
    Ok(bounds)
}

impl Bounds {
    /// Merge explicit extra ticks into the grid (sorted, de-duplicated).
    /// Even spacing is no longer guaranteed afterwards.
    pub fn merge_ticks(&mut self, ticks: &[f64], numeric: &NumericConfig) -> Result<()> {
        let digits = numeric.digits_for_step(self.step);
        let mut values = self.values.clone();
        values.extend(ticks.iter().copied().filter(|t| t.is_finite()).map(|t| round_with_precision(t, digits)));
        values.sort_by(f64::total_cmp);
        values.dedup();
        self.set_values(values)
    }

    /// Regenerate the grid outward from `value` so it lands on a tick, keeping the step.
    ///
    /// When `value` lies outside `[min, max]` the grid is extended on that side only,
    /// ending exactly at `value`. Ticks off the old step grid (merged extras) are kept.
    pub fn ensure_tick_value(&mut self, value: f64, numeric: &NumericConfig) -> Result<()> {
        ensure_finite("ensureTickValue", value)?;
        if self.values.contains(&value) {
            return Ok(());
        }
        let step = self.step;
        let digits = numeric.digits_for_step(step);
        let origin = self.min;
        let extras: Vec<f64> = self
            .values
            .iter()
            .copied()
            .filter(|v| {
                let cells = (v - origin) / step;
                (cells - cells.round()).abs() > 1e-6
            })
            .collect();

        let below = numeric.round((value - self.min) / step).ceil().max(0.0);
        let above = numeric.round((self.max - value) / step).ceil().max(0.0);
        let mut values: Vec<f64> = (0..=(below + above) as usize)
            .map(|i| round_with_precision(value + (i as f64 - below) * step, digits))
            .collect();
        values.extend(extras);
        values.sort_by(f64::total_cmp);
        values.dedup();
        self.set_values(values)
    }

    /// Fails when any of `min`, `max`, `range` or `step` overflowed.
    fn check_finite(&self) -> Result<()> {
        ensure_finite("low", self.min)?;
        ensure_finite("high", self.max)?;
        ensure_finite("high", self.range)?;
        ensure_finite("scaleMinSpace", self.step)?;
        Ok(())
    }

    fn set_values(&mut self, values: Vec<f64>) -> Result<()> {
        if let (Some(&first), Some(&last)) = (values.first(), values.last()) {
            self.min = self.min.min(first);
            self.max = self.max.max(last);
            self.range = self.max - self.min;
        }
        self.number_of_steps = values.len().saturating_sub(1);
        self.values = values;
        self.check_finite()
    }
}

/// Zero ranges grow by one order of magnitude of the value on each side (1 around zero).
pub(crate) fn widen_degenerate(low: f64, high: f64) -> (f64, f64) {
    if high != low {
        return (low, high);
    }
    let pad = if low == 0.0 { 1.0 } else { 10f64.powi(order_of_magnitude(low)) };
    (low - pad, high + pad)
}

/// Smallest nice step not below `minimum_step`.
fn nice_step(minimum_step: f64, only_integer: bool, numeric: &NumericConfig) -> f64 {
    let magnitude = 10f64.powi(order_of_magnitude(minimum_step));
    let tolerance = minimum_step * 1e-9;
    let step = NICE_DIVISORS
        .iter()
        .map(|d| d * magnitude)
        .find(|candidate| *candidate + tolerance >= minimum_step)
        .unwrap_or(10.0 * magnitude);
    let step = round_with_precision(step, numeric.digits_for_step(step));

    if only_integer && step.fract() != 0.0 {
        step.ceil().max(1.0)
    } else {
        step.max(f64::EPSILON)
    }
}

/// With integer ticks, a small factor of an integral range splits it evenly.
fn prefer_range_factor(step: f64, minimum_step: f64, value_range: f64, numeric: &NumericConfig) -> f64 {
    let range = numeric.round(value_range);
    if range.fract() != 0.0 || range < 2.0 || range > u64::MAX as f64 {
        return step;
    }
    let factor = rho(range as u64) as f64;
    if factor >= minimum_step && factor < step {
        factor
    } else {
        step
    }
}

/// Grid cell indices (relative to `anchor`) of the lowest and highest tick.
fn snap_cells(low: f64, high: f64, step: f64, anchor: f64, numeric: &NumericConfig) -> (f64, f64) {
    let first = numeric.round((low - anchor) / step).floor();
    let last = numeric.round((high - anchor) / step).ceil();
    (first, last.max(first + 1.0))
}

fn single_step(low: f64, high: f64) -> Bounds {
    let range = high - low;
    Bounds { min: low, max: high, step: range, range, number_of_steps: 1, values: vec![low, high] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_steps_from_divisor_set() {
        let n = NumericConfig::default();
        assert_eq!(nice_step(0.7, false, &n), 1.0);
        assert_eq!(nice_step(1.4, false, &n), 2.0);
        assert_eq!(nice_step(2.1, false, &n), 2.5);
        assert_eq!(nice_step(2.6, false, &n), 5.0);
        assert_eq!(nice_step(13.0, false, &n), 20.0);
        assert_eq!(nice_step(0.2, false, &n), 0.2);
    }

    #[test]
    fn integer_steps_round_up() {
        let n = NumericConfig::default();
        assert_eq!(nice_step(0.3, true, &n), 1.0);
        assert_eq!(nice_step(2.1, true, &n), 3.0);
    }

    #[test]
    fn zero_range_widens_by_magnitude() {
        assert_eq!(widen_degenerate(0.0, 0.0), (-1.0, 1.0));
        assert_eq!(widen_degenerate(7.0, 7.0), (6.0, 8.0));
        assert_eq!(widen_degenerate(-250.0, -250.0), (-350.0, -150.0));
    }

    #[test]
    fn factor_of_integral_range_is_preferred() {
        let n = NumericConfig::default();
        assert_eq!(prefer_range_factor(5.0, 3.0, 15.0, &n), 3.0);
        assert_eq!(prefer_range_factor(2.0, 1.4, 7.0, &n), 2.0);
    }
}
