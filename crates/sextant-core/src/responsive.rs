// File: crates/sextant-core/src/responsive.rs
// Summary: Media-query keyed option overrides and their resolution against a viewport.

use serde::Deserialize;

use crate::error::Result;
use crate::media::MediaMatcher;
use crate::options::{ChartOptions, PartialChartOptions};

/// Ordered `(media query, overrides)` rules; later matching rules win.
/// JSON form: `[["(min-width: 640px)", { ... }], ...]`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ResponsiveOptions(pub Vec<(String, PartialChartOptions)>);

impl ResponsiveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: impl Into<String>, overrides: PartialChartOptions) -> Self {
        self.0.push((query.into(), overrides));
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of one resolution, for callers that report on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub options: ChartOptions,
    /// Indices of the rules that matched, in application order.
    pub matched: Vec<usize>,
    /// Queries the matcher could not evaluate.
    pub unsupported: Vec<String>,
}

/// Effective options: `base` with every matching rule applied in list order.
pub fn resolve(base: &ChartOptions, responsive: &ResponsiveOptions, matcher: &dyn MediaMatcher) -> ChartOptions {
    resolve_detailed(base, responsive, matcher).options
}

pub fn resolve_detailed(base: &ChartOptions, responsive: &ResponsiveOptions, matcher: &dyn MediaMatcher) -> Resolution {
    let mut options = base.clone();
    let mut matched = Vec::new();
    let mut unsupported = Vec::new();
    for (index, (query, overrides)) in responsive.0.iter().enumerate() {
        match matcher.matches(query) {
            Some(true) => {
                options.apply(overrides);
                matched.push(index);
            }
            Some(false) => {}
            None => unsupported.push(query.clone()),
        }
    }
    Resolution { options, matched, unsupported }
}
