//! Time-series charting engine.
//!
//! Leaves first: a time-windowed [`RetentionBuffer`] per metric, a
//! [`Renderer`] that paints it onto a [`DrawingSurface`], and the
//! [`ChartRegistry`] that owns both under a metric id.

mod buffer;
mod color;
mod definition;
pub mod renderer;
mod registry;
pub mod surface;

pub use buffer::{RetentionBuffer, Sample, WINDOW_SECONDS};
pub use color::{Rgba, FALLBACK_COLOR};
pub use definition::ChartDefinition;
pub use registry::{Chart, ChartRegistry};
pub use renderer::Renderer;
pub use surface::{
    ChartContainer, DrawCommand, DrawingSurface, Point, RecordingSurface, Size, StaticContainer,
    SurfaceHandle,
};
