// File: crates/sextant-core/src/series.rs
// Summary: Raw chart input: labels plus series of numbers, {x, y} pairs or holes, with optional metadata.
// Notes:
// - Values are kept exactly as supplied; hole detection and NaN coercion happen in `normalize`.
// - The JSON form accepts the loose shapes charts are usually fed with (bare arrays,
//   `{ name, data, meta }` objects, `{ value, meta }` wrappers).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;

/// Free-form metadata attached to a series or point, shared by reference with draw events.
pub type Meta = Arc<Value>;

#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// `null` / missing.
    Hole,
    /// A bare number (the y value on single-dimension charts).
    Number(f64),
    /// An `{x, y}` pair; either coordinate may be missing.
    Point { x: Option<f64>, y: Option<f64> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawPoint {
    pub value: RawValue,
    pub meta: Option<Meta>,
}

impl RawPoint {
    pub fn number(v: f64) -> Self {
        Self { value: RawValue::Number(v), meta: None }
    }

    pub fn hole() -> Self {
        Self { value: RawValue::Hole, meta: None }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Self { value: RawValue::Point { x: Some(x), y: Some(y) }, meta: None }
    }

    /// A point on a date axis; x becomes epoch milliseconds.
    pub fn dated(at: DateTime<Utc>, y: f64) -> Self {
        Self::xy(at.timestamp_millis() as f64, y)
    }

    pub fn with_meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = Some(Arc::new(meta.into()));
        self
    }

    fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => Self::hole(),
            Value::Object(map) if map.contains_key("value") => {
                let mut inner = Self::from_json(&map["value"]);
                if let Some(meta) = map.get("meta") {
                    inner.meta = Some(Arc::new(meta.clone()));
                }
                inner
            }
            Value::Object(map) if map.contains_key("x") || map.contains_key("y") => Self {
                value: RawValue::Point {
                    x: map.get("x").and_then(json_number),
                    y: map.get("y").and_then(json_number),
                },
                meta: map.get("meta").map(|m| Arc::new(m.clone())),
            },
            // Anything not expressible as a number is kept as NaN so normalization flags it.
            other => Self { value: RawValue::Number(json_number(other).unwrap_or(f64::NAN)), meta: None },
        }
    }
}

impl From<f64> for RawPoint {
    fn from(v: f64) -> Self {
        Self::number(v)
    }
}

impl From<Option<f64>> for RawPoint {
    fn from(v: Option<f64>) -> Self {
        v.map_or_else(Self::hole, Self::number)
    }
}

impl From<(f64, f64)> for RawPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::xy(x, y)
    }
}

impl<'de> Deserialize<'de> for RawPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self::from_json(&Value::deserialize(deserializer)?))
    }
}

fn json_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSeries {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub meta: Option<Meta>,
    pub data: Vec<RawPoint>,
}

impl RawSeries {
    pub fn new<I, P>(data: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<RawPoint>,
    {
        Self { data: data.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn named<I, P>(name: impl Into<String>, data: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<RawPoint>,
    {
        Self { name: Some(name.into()), ..Self::new(data) }
    }

    pub fn with_meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = Some(Arc::new(meta.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn from_json(v: &Value) -> Self {
        match v {
            Value::Array(items) => Self { data: items.iter().map(RawPoint::from_json).collect(), ..Self::default() },
            Value::Object(map) if map.contains_key("data") => {
                let inner = Self::from_json(&map["data"]);
                Self {
                    name: map.get("name").and_then(Value::as_str).map(str::to_owned),
                    class_name: map.get("className").and_then(Value::as_str).map(str::to_owned),
                    meta: map.get("meta").map(|m| Arc::new(m.clone())),
                    data: inner.data,
                }
            }
            // single value per series (pie-style data)
            single => {
                let point = RawPoint::from_json(single);
                let name = single.get("name").and_then(Value::as_str).map(str::to_owned);
                Self { name, data: vec![point], ..Self::default() }
            }
        }
    }
}

impl<'de> Deserialize<'de> for RawSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self::from_json(&Value::deserialize(deserializer)?))
    }
}

/// Chart input: category labels plus series.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChartData {
    #[serde(default, deserialize_with = "labels_as_strings")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub series: Vec<RawSeries>,
}

impl ChartData {
    pub fn new(labels: Vec<String>, series: Vec<RawSeries>) -> Self {
        Self { labels, series }
    }

    /// Unlabelled data, one series per row.
    pub fn from_rows<R, I, P>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = P>,
        P: Into<RawPoint>,
    {
        Self { labels: Vec::new(), series: rows.into_iter().map(RawSeries::new).collect() }
    }

    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn labels_as_strings<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}
