// File: crates/sextant-core/src/media.rs
// Summary: Viewport description and a small CSS media query evaluator for responsive options.
// Notes:
// - Supported: comma lists, `not`/`only`, media types all|screen|print, width/height with
//   min-/max- prefixes (px, em, rem), orientation and aspect-ratio with min-/max- prefixes.
// - Anything else is unsupported: the matcher reports `None` and callers treat it as non-matching.

use std::sync::LazyLock;

use regex::Regex;

static FEATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\s*([a-z-]+)\s*(?::\s*([^)]*?))?\s*\)$").expect("valid feature regex"));
static LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d*\.?\d+)\s*(px|em|rem)?$").expect("valid length regex"));
static RATIO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*\.?\d+)\s*(?:/\s*(\d*\.?\d+))?$").expect("valid ratio regex"));
static AND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+and\s+").expect("valid and regex"));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaType {
    #[default]
    Screen,
    Print,
}

/// Evaluates media queries; `None` means the query is not understood.
pub trait MediaMatcher {
    fn matches(&self, query: &str) -> Option<bool>;
}

/// What responsive options are resolved against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub media: MediaType,
    /// Root font size in pixels, for `em`/`rem` lengths.
    pub font_size: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 640.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, media: MediaType::Screen, font_size: 16.0 }
    }

    pub fn with_media(mut self, media: MediaType) -> Self {
        self.media = media;
        self
    }

    fn length(&self, text: &str) -> Option<f64> {
        let caps = LENGTH.captures(text.trim())?;
        let value: f64 = caps[1].parse().ok()?;
        match caps.get(2).map(|m| m.as_str()) {
            Some("px") => Some(value),
            Some("em" | "rem") => Some(value * self.font_size),
            // unitless lengths are only valid for zero
            None if value == 0.0 => Some(0.0),
            _ => None,
        }
    }

    fn feature(&self, name: &str, value: Option<&str>) -> Option<bool> {
        let (prefix, feature) = match name.split_once('-') {
            Some(("min", rest)) => (Some(true), rest),
            Some(("max", rest)) => (Some(false), rest),
            _ => (None, name),
        };
        let compare = |actual: f64, wanted: f64| match prefix {
            Some(true) => actual >= wanted,
            Some(false) => actual <= wanted,
            None => actual == wanted,
        };

        match (feature, value) {
            ("width", None) if prefix.is_none() => Some(self.width > 0.0),
            ("height", None) if prefix.is_none() => Some(self.height > 0.0),
            ("width", Some(v)) => Some(compare(self.width, self.length(v)?)),
            ("height", Some(v)) => Some(compare(self.height, self.length(v)?)),
            ("orientation", Some(v)) if prefix.is_none() => match v.trim() {
                "portrait" => Some(self.height >= self.width),
                "landscape" => Some(self.width > self.height),
                _ => None,
            },
            ("aspect-ratio", Some(v)) => {
                let caps = RATIO.captures(v.trim())?;
                let num: f64 = caps[1].parse().ok()?;
                let den: f64 = caps.get(2).map_or(Some(1.0), |m| m.as_str().parse().ok())?;
                if den == 0.0 || self.height == 0.0 {
                    return None;
                }
                Some(compare(self.width / self.height, num / den))
            }
            _ => None,
        }
    }

    fn single(&self, query: &str) -> Option<bool> {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return Some(true);
        }
        let (negated, rest) = match query.strip_prefix("not ") {
            Some(rest) => (true, rest.trim_start()),
            None => (false, query.strip_prefix("only ").map_or(query.as_str(), str::trim_start)),
        };

        let mut matched = true;
        for (i, part) in AND.split(rest).enumerate() {
            let part = part.trim();
            let ok = if let Some(caps) = FEATURE.captures(part) {
                let value = caps.get(2).map(|m| m.as_str()).filter(|v| !v.is_empty());
                self.feature(&caps[1], value)?
            } else if i == 0 {
                match part {
                    "all" => true,
                    "screen" => self.media == MediaType::Screen,
                    "print" => self.media == MediaType::Print,
                    // unknown media types are valid and match nothing
                    t if t.chars().all(|c| c.is_ascii_alphabetic() || c == '-') && !t.is_empty() => false,
                    _ => return None,
                }
            } else {
                return None;
            };
            matched &= ok;
        }
        Some(matched != negated)
    }
}

impl MediaMatcher for Viewport {
    /// A list matches when any of its queries does; unsupported queries count as non-matching.
    /// The whole list is `None` only when none of its queries could be evaluated.
    fn matches(&self, query: &str) -> Option<bool> {
        let mut any_supported = false;
        let mut matched = false;
        for q in query.split(',') {
            if let Some(m) = self.single(q) {
                any_supported = true;
                matched |= m;
            }
        }
        any_supported.then_some(matched)
    }
}
