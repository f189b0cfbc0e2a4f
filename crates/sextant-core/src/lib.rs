// File: crates/sextant-core/src/lib.rs
// Summary: Core library entry point; exports the scaling, interpolation and render pipeline API.

pub mod axis;
pub mod bar;
pub mod bounds;
pub mod chart;
pub mod error;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod interpolation;
pub mod line;
pub mod media;
pub mod normalize;
pub mod numeric;
pub mod options;
pub mod path;
pub mod pie;
pub mod responsive;
pub mod series;

pub use axis::{Axis, AxisScale, AxisType, Tick};
pub use bounds::{compute_bounds, Bounds, ExtentOverrides, HighLow};
pub use chart::{Chart, ChartKind, PipelineState, RenderReport, UpdateHandle};
pub use error::{ChartError, Result};
pub use event::{ChartEvent, CreatedEvent, DrawEvent, DrawKind, ListenerId};
pub use geometry::{ChartRect, Dimension};
pub use interpolation::{Interpolation, PathPoint};
pub use media::{MediaMatcher, MediaType, Viewport};
pub use normalize::{normalize, DataValue, NormalizeOptions, NormalizedData};
pub use numeric::NumericConfig;
pub use options::{AxisOptions, ChartOptions, LabelFormatter, PartialAxisOptions, PartialChartOptions, SeriesOptions};
pub use path::{PathElement, SegmentData, SvgPath};
pub use responsive::{resolve, ResponsiveOptions};
pub use series::{ChartData, RawPoint, RawSeries};
