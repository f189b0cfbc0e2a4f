// File: crates/sextant-core/src/geometry.rs
// Summary: Chart rectangle and axis orientation units used for pixel math.

use serde::Deserialize;

use crate::error::{ChartError, Result};

/// Value dimension of a data point, which is also the orientation of the axis that projects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Dimension {
    pub const fn counter(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Self::X => Direction::Horizontal,
            Self::Y => Direction::Vertical,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "axisX",
            Self::Y => "axisY",
        }
    }

    /// Pixel length of the rectangle along this dimension.
    pub fn length(self, rect: &ChartRect) -> f64 {
        match self {
            Self::X => rect.width(),
            Self::Y => rect.height(),
        }
    }

    /// Edge the grid lines of the counter axis start from (top for x, left for y).
    pub fn grid_offset(self, rect: &ChartRect) -> f64 {
        match self {
            Self::X => rect.y2,
            Self::Y => rect.x1,
        }
    }

    /// Convert an axis-relative projection into an absolute pixel coordinate.
    /// The y axis grows upwards from the bottom edge.
    pub fn to_pixel(self, rect: &ChartRect, projected: f64) -> f64 {
        match self {
            Self::X => rect.x1 + projected,
            Self::Y => rect.y1 - projected,
        }
    }
}

/// Plot area in pixels, supplied by external layout.
/// Contract: `x1 <= x2` (left, right) and `y2 <= y1` (top, bottom).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ChartRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ChartRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        let rect = Self { x1, y1, x2, y2 };
        let finite = [x1, y1, x2, y2].iter().all(|v| v.is_finite());
        if !finite || rect.width() < 0.0 || rect.height() < 0.0 {
            return Err(ChartError::InvalidChartRect);
        }
        Ok(rect)
    }

    /// Rectangle from a top-left corner and a size.
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(left, top + height, left + width, top)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y2
    }
}
