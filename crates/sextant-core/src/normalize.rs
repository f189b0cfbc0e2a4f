// File: crates/sextant-core/src/normalize.rs
// Summary: Converts raw series into a uniform value matrix with holes, padding and per-series extents.

use tracing::{debug, warn};

use crate::geometry::Dimension;
use crate::series::{ChartData, Meta, RawSeries, RawValue};

/// A normalized value. Bare numbers only carry `y`; `{x, y}` input keeps both and
/// single-dimension axes simply ignore `x`. A point without `y` is a hole.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DataValue {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl DataValue {
    pub const HOLE: Self = Self { x: None, y: None };

    pub const fn single(y: f64) -> Self {
        Self { x: None, y: Some(y) }
    }

    pub const fn pair(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y) }
    }

    #[inline]
    pub fn is_hole(&self) -> bool {
        self.y.is_none()
    }

    #[inline]
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::X => self.x,
            Dimension::Y => self.y,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedPoint {
    pub value: DataValue,
    pub meta: Option<Meta>,
}

impl NormalizedPoint {
    fn hole() -> Self {
        Self { value: DataValue::HOLE, meta: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedSeries {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub meta: Option<Meta>,
    pub points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &DataValue> + '_ {
        self.points.iter().map(|p| &p.value)
    }

    /// `(min, max)` of the series along `dimension`, ignoring holes.
    pub fn extent(&self, dimension: Dimension) -> Option<(f64, f64)> {
        self.values().filter_map(|v| v.get(dimension)).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedData {
    pub labels: Vec<String>,
    pub series: Vec<NormalizedSeries>,
    /// Values that were present but not numeric and were rendered as holes.
    pub coerced: usize,
}

impl NormalizedData {
    /// Longest series length.
    pub fn max_len(&self) -> usize {
        self.series.iter().map(NormalizedSeries::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(NormalizedSeries::is_empty)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Leave ragged series ragged instead of padding them with holes.
    pub allow_variable_data_lengths: bool,
    /// Reverse labels, series order and every series' points.
    pub reverse: bool,
}

/// Normalize raw chart data. Never fails: malformed values become holes.
pub fn normalize(data: &ChartData, options: &NormalizeOptions) -> NormalizedData {
    let mut coerced = 0usize;
    let mut series: Vec<NormalizedSeries> = data
        .series
        .iter()
        .map(|s| normalize_series(s, &mut coerced))
        .collect();

    if coerced > 0 {
        warn!(coerced, "non-numeric values in chart data were rendered as holes");
    }

    let longest = series.iter().map(NormalizedSeries::len).max().unwrap_or(0);
    if !options.allow_variable_data_lengths {
        for s in series.iter_mut().filter(|s| s.len() < longest) {
            debug!(series = ?s.name, from = s.len(), to = longest, "padding short series with holes");
            s.points.resize_with(longest, NormalizedPoint::hole);
        }
    }

    let mut labels = data.labels.clone();
    if labels.len() < longest {
        labels.resize(longest, String::new());
    }

    let mut out = NormalizedData { labels, series, coerced };
    if options.reverse {
        reverse_data(&mut out);
    }
    out
}

fn normalize_series(raw: &RawSeries, coerced: &mut usize) -> NormalizedSeries {
    let mut number = |v: Option<f64>| match v {
        Some(n) if n.is_finite() => Some(n),
        Some(_) => {
            *coerced += 1;
            None
        }
        None => None,
    };

    let points = raw
        .data
        .iter()
        .map(|p| {
            let value = match p.value {
                RawValue::Hole => DataValue::HOLE,
                RawValue::Number(v) => DataValue { x: None, y: number(Some(v)) },
                RawValue::Point { x, y } => {
                    let y = number(y);
                    DataValue { x: number(x), y }
                }
            };
            NormalizedPoint { value, meta: p.meta.clone() }
        })
        .collect();

    NormalizedSeries {
        name: raw.name.clone(),
        class_name: raw.class_name.clone(),
        meta: raw.meta.clone(),
        points,
    }
}

fn reverse_data(data: &mut NormalizedData) {
    data.labels.reverse();
    data.series.reverse();
    for s in &mut data.series {
        s.points.reverse();
    }
}
